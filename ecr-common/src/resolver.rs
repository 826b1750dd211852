//! Error-code resolution.
//!
//! Reconciles the places a service may put its error code:
//!
//! 1. one of the [`RECOGNIZED_HEADER_KEYS`] (strict precedence), where
//!    `x-amzn-ErrorType` may carry a legacy `"<Code>:<url>"` suffix;
//! 2. a body field (default `__type`), possibly nested and possibly
//!    namespaced as `"prefix#TypeName"`.
//!
//! Two recognized header keys in one response is a fault. Everything else
//! that yields no code is `Ok(None)`.

use crate::body::{StructuredBody, strip_namespace};
use crate::config::ResolverConfig;
use crate::errors::ResolveError;
use crate::headers::{
    HeaderMap, RECOGNIZED_HEADER_KEYS, X_AMZN_ERROR_TYPE, strip_error_type_suffix,
};
use serde::Serialize;
use tracing::{debug, trace, warn};

/// Anything that can turn a response into a canonical error code.
pub trait ErrorCodeParser: Send + Sync {
    /// Resolve the error code of a response.
    ///
    /// `Ok(None)` means no code could be determined.
    fn parse_error_code(
        &self,
        headers: &HeaderMap,
        body: Option<&dyn StructuredBody>,
    ) -> Result<Option<String>, ResolveError>;
}

/// Where a resolved code was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CodeSource {
    /// One of the recognized error-code headers.
    Header { key: &'static str },
    /// A body field; `nested` is true when it was not at the top level.
    Body { field: String, nested: bool },
}

/// A resolved code together with its origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub code: String,
    pub source: CodeSource,
}

/// Resolves the canonical error code of a service response.
///
/// Holds only its immutable [`ResolverConfig`]; share it freely across
/// threads.
#[derive(Debug, Clone, Default)]
pub struct ErrorCodeResolver {
    config: ResolverConfig,
}

impl ErrorCodeResolver {
    /// Resolver reading the default `__type` body field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver reading a custom body field.
    pub fn with_field_name(field_name: impl Into<String>) -> Self {
        Self::from_config(ResolverConfig::new(Some(field_name.into())))
    }

    pub fn from_config(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn field_name(&self) -> &str {
        self.config.error_code_field_name()
    }

    /// Resolve the error code of a response.
    ///
    /// Headers win over the body; the body is only consulted when no
    /// recognized header is present.
    pub fn resolve(
        &self,
        headers: &HeaderMap,
        body: Option<&dyn StructuredBody>,
    ) -> Result<Option<String>, ResolveError> {
        Ok(self
            .resolve_detailed(headers, body)?
            .map(|resolution| resolution.code))
    }

    /// Like [`resolve`](Self::resolve), but also reports where the code
    /// came from.
    pub fn resolve_detailed(
        &self,
        headers: &HeaderMap,
        body: Option<&dyn StructuredBody>,
    ) -> Result<Option<Resolution>, ResolveError> {
        if let Some(resolution) = self.resolve_from_headers(headers)? {
            debug!(code = %resolution.code, header = ?resolution.source, "Resolved error code from header");
            return Ok(Some(resolution));
        }

        let resolution = body.and_then(|body| self.resolve_from_body(body));
        match &resolution {
            Some(found) => {
                debug!(code = %found.code, source = ?found.source, "Resolved error code from body");
            }
            None => trace!(
                field = self.field_name(),
                has_body = body.is_some(),
                "No error code signal in response"
            ),
        }
        Ok(resolution)
    }

    /// Header step on its own.
    ///
    /// Fails with [`ResolveError::AmbiguousErrorHeader`] when more than one
    /// recognized key is present. A recognized key with no values counts
    /// towards that check but yields no code.
    pub fn resolve_from_headers(
        &self,
        headers: &HeaderMap,
    ) -> Result<Option<Resolution>, ResolveError> {
        let keys = headers.recognized_keys();

        let key = match keys.as_slice() {
            [] => {
                let near_misses = headers.near_miss_keys();
                if !near_misses.is_empty() {
                    debug!(headers = ?near_misses, "Ignoring headers that match an error-code key only by case");
                }
                return Ok(None);
            }
            [key] => *key,
            _ => {
                warn!(headers = ?keys, "Response carries more than one error-code header");
                return Err(ResolveError::AmbiguousErrorHeader {
                    keys: keys.iter().map(|key| key.to_string()).collect(),
                });
            }
        };

        let values = headers.get_all(key);
        let Some(first) = values.first() else {
            debug!(header = key, "Error-code header present without a value");
            return Ok(None);
        };
        if values.len() > 1 {
            debug!(
                header = key,
                discarded = values.len() - 1,
                "Using first value of repeated error-code header"
            );
        }

        let code = if key == X_AMZN_ERROR_TYPE {
            strip_error_type_suffix(first)
        } else {
            first.as_str()
        };

        Ok(Some(Resolution {
            code: code.to_string(),
            source: CodeSource::Header { key },
        }))
    }

    /// Body step on its own. Never fails.
    pub fn resolve_from_body(&self, body: &dyn StructuredBody) -> Option<Resolution> {
        let field = self.field_name();
        let raw = body.find_field(field)?;

        Some(Resolution {
            code: strip_namespace(&raw).to_string(),
            source: CodeSource::Body {
                field: field.to_string(),
                nested: !body.has_field(field),
            },
        })
    }

    /// The header keys this resolver looks at.
    pub fn recognized_header_keys(&self) -> &'static [&'static str] {
        &RECOGNIZED_HEADER_KEYS
    }
}

impl ErrorCodeParser for ErrorCodeResolver {
    fn parse_error_code(
        &self,
        headers: &HeaderMap,
        body: Option<&dyn StructuredBody>,
    ) -> Result<Option<String>, ResolveError> {
        self.resolve(headers, body)
    }
}
