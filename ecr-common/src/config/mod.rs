//! Configuration for ECR.
//!
//! - Resolver settings fixed at construction ([`ResolverConfig`])
//! - Environment variable parsing with type safety
//! - Source tracking for debugging

pub mod env;
pub mod source;

pub use env::{EnvError, EnvParser};
pub use source::{ConfigSource, Sourced};

use serde::{Deserialize, Serialize};

/// Body field consulted when no custom name is configured.
pub const DEFAULT_ERROR_CODE_FIELD: &str = "__type";

/// Suffix of the environment variable overriding the body field name.
pub const ERROR_CODE_FIELD_VAR: &str = "ERROR_CODE_FIELD";

/// Resolver settings. Immutable once a resolver is built from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ResolverConfigFields")]
pub struct ResolverConfig {
    error_code_field_name: String,
}

/// Wire shape of [`ResolverConfig`]; deserialization goes through
/// [`ResolverConfig::new`] so the default applies.
#[derive(Deserialize)]
struct ResolverConfigFields {
    #[serde(default)]
    error_code_field_name: Option<String>,
}

impl From<ResolverConfigFields> for ResolverConfig {
    fn from(fields: ResolverConfigFields) -> Self {
        Self::new(fields.error_code_field_name)
    }
}

impl ResolverConfig {
    /// Build a config, falling back to `"__type"` when no name (or an empty
    /// one) is given.
    pub fn new(error_code_field_name: Option<String>) -> Self {
        let error_code_field_name = error_code_field_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_ERROR_CODE_FIELD.to_string());
        Self {
            error_code_field_name,
        }
    }

    /// Name of the body field holding the error code.
    pub fn error_code_field_name(&self) -> &str {
        &self.error_code_field_name
    }

    /// Load from `ECR_ERROR_CODE_FIELD`, defaulting to `"__type"`.
    pub fn from_env(parser: &mut EnvParser) -> Sourced<Self> {
        parser
            .get_optional_string(ERROR_CODE_FIELD_VAR)
            .map(Self::new)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
pub(crate) fn env_test_lock() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
