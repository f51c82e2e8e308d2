//! Environment variable utilities
//!
//! A single boolean-parsing helper, used by `logging` to read its
//! `QDISPATCH_*` switches.
//!
//! # Usage
//!
//! ```ignore
//! use qdispatch_core::env::env_get_bool;
//!
//! // Boolean helper (accepts "1", "true", "yes", "on")
//! let flush: bool = env_get_bool("QDISPATCH_FLUSH_EPRINT", false);
//! ```

/// Get environment variable as boolean
///
/// Accepts: "1", "true", "yes", "on" (case-insensitive) as true.
/// Everything else (including unset) returns the default.
///
/// # Examples
///
/// ```ignore
/// let flush = env_get_bool("QDISPATCH_FLUSH_EPRINT", false);
/// let timed = env_get_bool("QDISPATCH_LOG_TIME", true);
/// ```
#[inline]
pub fn env_get_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => matches!(val.to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_get_bool_default() {
        let val = env_get_bool("__TEST_UNSET_VAR_12345__", true);
        assert!(val);

        let val = env_get_bool("__TEST_UNSET_VAR_12345__", false);
        assert!(!val);
    }

    #[test]
    fn env_get_bool_variants() {
        std::env::set_var("__TEST_BOOL__", "1");
        assert!(env_get_bool("__TEST_BOOL__", false));

        std::env::set_var("__TEST_BOOL__", "true");
        assert!(env_get_bool("__TEST_BOOL__", false));

        std::env::set_var("__TEST_BOOL__", "TRUE");
        assert!(env_get_bool("__TEST_BOOL__", false));

        std::env::set_var("__TEST_BOOL__", "yes");
        assert!(env_get_bool("__TEST_BOOL__", false));

        std::env::set_var("__TEST_BOOL__", "on");
        assert!(env_get_bool("__TEST_BOOL__", false));

        std::env::set_var("__TEST_BOOL__", "0");
        assert!(!env_get_bool("__TEST_BOOL__", true));

        std::env::set_var("__TEST_BOOL__", "false");
        assert!(!env_get_bool("__TEST_BOOL__", true));

        std::env::set_var("__TEST_BOOL__", "garbage");
        assert!(!env_get_bool("__TEST_BOOL__", false));

        std::env::remove_var("__TEST_BOOL__");
    }
}
