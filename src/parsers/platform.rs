//! Platform-sensitive defaults.

/// Return the value of `env` when set, otherwise the default for the
/// current platform.
///
/// ```
/// use cairn::parsers::env_or_platform_default;
///
/// let cc = env_or_platform_default("CC", "cl.exe", "clang", "gcc");
/// assert!(!cc.is_empty());
/// ```
pub fn env_or_platform_default(env: &str, windows: &str, darwin: &str, other: &str) -> String {
    if let Ok(value) = std::env::var(env) {
        return value;
    }
    if cfg!(windows) {
        windows.to_string()
    } else if cfg!(target_os = "macos") {
        darwin.to_string()
    } else {
        other.to_string()
    }
}
