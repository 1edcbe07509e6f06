//! Static table of `java.lang` simple class names.
//!
//! Used by the resolver as a last-resort guess before falling back to the
//! referencing file's own package. The wrapper classes (`Integer`, `Long`, ...)
//! are handled earlier in the chain and are not listed here.

/// Simple names of public `java.lang` types, sorted for binary search.
pub const JAVA_LANG_TYPES: &[&str] = &[
    "AbstractMethodError", "Appendable", "ArithmeticException",
    "ArrayIndexOutOfBoundsException", "ArrayStoreException", "AssertionError", "AutoCloseable",
    "BootstrapMethodError", "CharSequence", "Class", "ClassCastException",
    "ClassCircularityError", "ClassFormatError", "ClassLoader", "ClassNotFoundException",
    "ClassValue", "CloneNotSupportedException", "Cloneable", "Comparable", "Deprecated", "Enum",
    "EnumConstantNotPresentException", "Error", "Exception", "ExceptionInInitializerError",
    "FunctionalInterface", "IllegalAccessError", "IllegalAccessException",
    "IllegalArgumentException", "IllegalCallerException", "IllegalMonitorStateException",
    "IllegalStateException", "IllegalThreadStateException", "IncompatibleClassChangeError",
    "IndexOutOfBoundsException", "InheritableThreadLocal", "InstantiationError",
    "InstantiationException", "InternalError", "InterruptedException", "Iterable",
    "LinkageError", "MatchException", "Math", "Module", "ModuleLayer",
    "NegativeArraySizeException", "NoClassDefFoundError", "NoSuchFieldError",
    "NoSuchFieldException", "NoSuchMethodError", "NoSuchMethodException",
    "NullPointerException", "Number", "NumberFormatException", "Object", "OutOfMemoryError",
    "Override", "Package", "Process", "ProcessBuilder", "ProcessHandle", "Readable", "Record",
    "ReflectiveOperationException", "Runnable", "Runtime", "RuntimeException", "SafeVarargs",
    "ScopedValue", "SecurityException", "StackOverflowError", "StackTraceElement",
    "StackWalker", "StrictMath", "String", "StringBuffer", "StringBuilder",
    "StringIndexOutOfBoundsException", "SuppressWarnings", "System", "Thread", "ThreadDeath",
    "ThreadGroup", "ThreadLocal", "Throwable", "TypeNotPresentException", "UnknownError",
    "UnsatisfiedLinkError", "UnsupportedClassVersionError", "UnsupportedOperationException",
    "VerifyError", "VirtualMachineError", "Void", "WrongThreadException",
];

/// Package every name in [`JAVA_LANG_TYPES`] is assumed to live in.
pub const JAVA_LANG_PACKAGE: &str = "java.lang";

/// Whether `simple_name` is a well-known `java.lang` type.
#[must_use]
pub fn is_java_lang_type(simple_name: &str) -> bool {
    JAVA_LANG_TYPES.binary_search(&simple_name).is_ok()
}
