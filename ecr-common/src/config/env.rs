//! Environment variable parsing with type safety.
//!
//! Provides a type-safe parser for ECR environment variables with
//! validation, error collection, and source tracking.

use super::source::Sourced;
use std::env;
use thiserror::Error;

/// Errors that can occur during environment variable parsing.
#[derive(Debug, Error)]
pub enum EnvError {
    /// Invalid value for a variable.
    #[error("Invalid value for {var}: expected {expected}, got '{value}'")]
    InvalidValue {
        var: String,
        expected: String,
        value: String,
    },

    /// Invalid log level.
    #[error("Invalid log level for {var}: {value}")]
    InvalidLogLevel { var: String, value: String },
}

/// Type-safe environment variable parser.
///
/// Collects errors during parsing so all issues can be reported at once.
pub struct EnvParser {
    prefix: &'static str,
    errors: Vec<EnvError>,
}

impl EnvParser {
    /// Create a new parser with the ECR_ prefix.
    pub fn new() -> Self {
        Self {
            prefix: "ECR_",
            errors: Vec::new(),
        }
    }

    /// Get all accumulated errors.
    pub fn errors(&self) -> &[EnvError] {
        &self.errors
    }

    /// Check if any errors occurred.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Take ownership of errors.
    pub fn take_errors(&mut self) -> Vec<EnvError> {
        std::mem::take(&mut self.errors)
    }

    /// Get the full variable name with prefix.
    fn var_name(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    /// Get an optional string (None if not set or empty).
    pub fn get_optional_string(&mut self, name: &str) -> Sourced<Option<String>> {
        let var_name = self.var_name(name);
        match env::var(&var_name) {
            Ok(value) if value.is_empty() => Sourced::from_env(None, var_name),
            Ok(value) => Sourced::from_env(Some(value), var_name),
            Err(_) => Sourced::default_value(None),
        }
    }

    /// Get a log level value with validation.
    pub fn get_log_level(&mut self, name: &str, default: &str) -> Sourced<String> {
        let var_name = self.var_name(name);
        match env::var(&var_name) {
            Ok(value) => {
                let lower = value.to_lowercase();
                match lower.as_str() {
                    "trace" | "debug" | "info" | "warn" | "error" | "off" => {
                        Sourced::from_env(lower, var_name)
                    }
                    _ => {
                        self.errors.push(EnvError::InvalidLogLevel {
                            var: var_name.clone(),
                            value: value.clone(),
                        });
                        Sourced::from_env(default.to_string(), var_name)
                    }
                }
            }
            Err(_) => Sourced::default_value(default.to_string()),
        }
    }

    /// Get one of a fixed set of values (case-insensitive).
    ///
    /// Anything outside `allowed` records an error and falls back to `default`.
    pub fn get_choice(&mut self, name: &str, default: &str, allowed: &[&str]) -> Sourced<String> {
        let var_name = self.var_name(name);
        match env::var(&var_name) {
            Ok(value) => {
                let lower = value.to_lowercase();
                if allowed.contains(&lower.as_str()) {
                    Sourced::from_env(lower, var_name)
                } else {
                    self.errors.push(EnvError::InvalidValue {
                        var: var_name.clone(),
                        expected: format!("one of {}", allowed.join("/")),
                        value,
                    });
                    Sourced::from_env(default.to_string(), var_name)
                }
            }
            Err(_) => Sourced::default_value(default.to_string()),
        }
    }
}

impl Default for EnvParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;
    use crate::config::ConfigSource;
    use crate::config::env_test_lock;
    use std::env;

    fn cleanup_env(vars: &[&str]) {
        for var in vars {
            // SAFETY: Tests are serialized via env_test_lock
            unsafe { env::remove_var(var) };
        }
    }

    fn set_env(key: &str, value: &str) {
        // SAFETY: Tests are serialized via env_test_lock
        unsafe { env::set_var(key, value) };
    }

    #[test]
    fn test_get_optional_string() {
        let _guard = env_test_lock();
        let vars = ["ECR_TEST_OPT"];
        cleanup_env(&vars);

        // Not set
        let mut parser = EnvParser::new();
        let result = parser.get_optional_string("TEST_OPT");
        assert!(result.value.is_none());
        assert_eq!(result.source, ConfigSource::Default);

        // Set to empty
        set_env("ECR_TEST_OPT", "");
        let mut parser = EnvParser::new();
        assert!(parser.get_optional_string("TEST_OPT").value.is_none());

        // Set to value
        set_env("ECR_TEST_OPT", "value");
        let mut parser = EnvParser::new();
        let result = parser.get_optional_string("TEST_OPT");
        assert_eq!(result.value, Some("value".to_string()));
        assert_eq!(
            result.source,
            ConfigSource::Environment("ECR_TEST_OPT".to_string())
        );

        cleanup_env(&vars);
    }

    #[test]
    fn test_get_log_level_valid() {
        let _guard = env_test_lock();
        let vars = ["ECR_TEST_LEVEL"];
        cleanup_env(&vars);

        for level in &["trace", "debug", "info", "warn", "error", "off", "DEBUG"] {
            set_env("ECR_TEST_LEVEL", level);
            let mut parser = EnvParser::new();
            let result = parser.get_log_level("TEST_LEVEL", "info");
            assert!(!parser.has_errors(), "Expected valid for '{}'", level);
            assert_eq!(result.value, level.to_lowercase());
        }

        cleanup_env(&vars);
    }

    #[test]
    fn test_get_log_level_invalid() {
        let _guard = env_test_lock();
        let vars = ["ECR_TEST_LEVEL_BAD"];
        cleanup_env(&vars);

        set_env("ECR_TEST_LEVEL_BAD", "verbose");
        let mut parser = EnvParser::new();
        let result = parser.get_log_level("TEST_LEVEL_BAD", "info");
        assert!(parser.has_errors());
        assert_eq!(result.value, "info");

        let errors = parser.take_errors();
        assert!(matches!(errors[0], EnvError::InvalidLogLevel { .. }));
        assert!(!parser.has_errors());

        cleanup_env(&vars);
    }

    #[test]
    fn test_get_choice() {
        let _guard = env_test_lock();
        let vars = ["ECR_TEST_CHOICE"];
        cleanup_env(&vars);

        set_env("ECR_TEST_CHOICE", "JSON");
        let mut parser = EnvParser::new();
        let result = parser.get_choice("TEST_CHOICE", "pretty", &["pretty", "json"]);
        assert_eq!(result.value, "json");
        assert!(!parser.has_errors());

        set_env("ECR_TEST_CHOICE", "xml");
        let mut parser = EnvParser::new();
        let result = parser.get_choice("TEST_CHOICE", "pretty", &["pretty", "json"]);
        assert_eq!(result.value, "pretty");
        assert_eq!(
            parser.errors()[0].to_string(),
            "Invalid value for ECR_TEST_CHOICE: expected one of pretty/json, got 'xml'"
        );

        cleanup_env(&vars);
    }

    mod proptest_env_parsing {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn test_log_level_never_panics(value in "[a-zA-Z]{1,12}") {
                let _guard = env_test_lock();
                set_env("ECR_PROP_LEVEL", &value);

                let mut parser = EnvParser::new();
                let result = parser.get_log_level("PROP_LEVEL", "info");
                let valid = ["trace", "debug", "info", "warn", "error", "off"];
                if valid.contains(&value.to_lowercase().as_str()) {
                    prop_assert!(!parser.has_errors());
                    prop_assert_eq!(result.value, value.to_lowercase());
                } else {
                    prop_assert!(parser.has_errors());
                    prop_assert_eq!(result.value, "info");
                }

                cleanup_env(&["ECR_PROP_LEVEL"]);
            }
        }
    }
}
