//! Environment variable parsing with warn-level logging for invalid values.

use std::time::Duration;

/// Parse an environment variable with a default fallback.
///
/// - If the variable is not set: returns `default` silently (expected case).
/// - If the variable is set but cannot be parsed: logs a warning and returns `default`.
pub fn env_parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    default: T,
) -> T {
    match std::env::var(var) {
        Ok(v) => match v.trim().parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %v,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            },
        },
        Err(_) => default,
    }
}

/// Read a string variable, treating unset and blank the same.
pub fn env_string_with_default(var: &str, default: &str) -> String {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default.to_owned(),
    }
}

/// Read a timeout in whole seconds. `0` means "no timeout".
pub fn env_timeout_secs(var: &str, default_secs: u64) -> Option<Duration> {
    match env_parse_with_default(var, default_secs) {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test owns a unique variable name, so set/remove do not race.
    fn set(var: &str, value: &str) {
        unsafe { std::env::set_var(var, value) };
    }

    fn unset(var: &str) {
        unsafe { std::env::remove_var(var) };
    }

    #[test]
    fn test_env_parse_valid_value() {
        let var_name = "TEST_CASEBOOK_ENV_PARSE_VALID_41871";
        set(var_name, "42");
        let result: u32 = env_parse_with_default(var_name, 10);
        assert_eq!(result, 42);
        unset(var_name);
    }

    #[test]
    fn test_env_parse_invalid_value() {
        let var_name = "TEST_CASEBOOK_ENV_PARSE_INVALID_41872";
        set(var_name, "banana");
        let result: u32 = env_parse_with_default(var_name, 10);
        assert_eq!(result, 10);
        unset(var_name);
    }

    #[test]
    fn test_env_parse_missing_var() {
        let var_name = "TEST_CASEBOOK_ENV_PARSE_MISSING_41873";
        unset(var_name);
        let result: u32 = env_parse_with_default(var_name, 10);
        assert_eq!(result, 10);
    }

    #[test]
    fn test_env_string_blank_uses_default() {
        let var_name = "TEST_CASEBOOK_ENV_STRING_BLANK_41874";
        set(var_name, "   ");
        assert_eq!(env_string_with_default(var_name, "migrations"), "migrations");
        set(var_name, "db/sql");
        assert_eq!(env_string_with_default(var_name, "migrations"), "db/sql");
        unset(var_name);
    }

    #[test]
    fn test_env_timeout_zero_disables() {
        let var_name = "TEST_CASEBOOK_ENV_TIMEOUT_41875";
        set(var_name, "0");
        assert_eq!(env_timeout_secs(var_name, 300), None);
        set(var_name, "15");
        assert_eq!(env_timeout_secs(var_name, 300), Some(Duration::from_secs(15)));
        unset(var_name);
        assert_eq!(env_timeout_secs(var_name, 300), Some(Duration::from_secs(300)));
    }
}
