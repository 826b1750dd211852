//! Error types for ECR.
//!
//! Resolution has exactly one fault, [`ResolveError::AmbiguousErrorHeader`].
//! Every other "no code here" outcome is `Ok(None)`, never an error, so
//! callers can stack their own fallbacks on top.
//!
//! # Error Codes
//!
//! | Code      | Error                                   |
//! |-----------|-----------------------------------------|
//! | ECR-E001  | Ambiguous error-code headers            |
//! | ECR-E101  | Header line without a `:` separator     |
//! | ECR-E102  | Header line with an empty name          |

use thiserror::Error;

/// Faults raised while resolving an error code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// More than one recognized error-code header was present.
    ///
    /// The response is malformed; retrying resolution with the same input
    /// gives the same answer.
    #[error("response contains multiple headers representing the error code: {keys:?}")]
    AmbiguousErrorHeader {
        /// The conflicting header names, in recognized-key order.
        keys: Vec<String>,
    },
}

impl ResolveError {
    /// Stable identifier for this error, suitable for logs and tooling.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AmbiguousErrorHeader { .. } => "ECR-E001",
        }
    }

    /// Header names involved in the conflict.
    pub fn conflicting_keys(&self) -> &[String] {
        match self {
            Self::AmbiguousErrorHeader { keys } => keys,
        }
    }
}

/// Errors from parsing a raw `Name: value` header block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderParseError {
    /// The line has no `:` separating name from value.
    #[error("header line {line} has no ':' separator")]
    MissingSeparator { line: usize },

    /// The line has a separator but nothing before it.
    #[error("header line {line} has an empty name")]
    EmptyName { line: usize },
}

impl HeaderParseError {
    /// Stable identifier for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingSeparator { .. } => "ECR-E101",
            Self::EmptyName { .. } => "ECR-E102",
        }
    }
}
