//! Shared types and utilities for ECR.
//!
//! The centre of this crate is [`ErrorCodeResolver`]: given the headers of a
//! failed service response and, optionally, its parsed JSON body, it works out
//! the single canonical error code used to pick an error type downstream.
//!
//! ```ignore
//! use ecr_common::{ErrorCodeResolver, HeaderMap};
//!
//! let headers: HeaderMap = [("x-amzn-ErrorType", "AccessDeniedException:http://internal/")]
//!     .into_iter()
//!     .collect();
//! let code = ErrorCodeResolver::new().resolve(&headers, None)?;
//! assert_eq!(code.as_deref(), Some("AccessDeniedException"));
//! ```

pub mod body;
pub mod config;
pub mod errors;
pub mod headers;
pub mod logging;
pub mod resolver;
pub mod testing;

pub use body::{StructuredBody, strip_namespace};
pub use config::{ConfigSource, EnvError, EnvParser, ResolverConfig, Sourced};
pub use errors::{HeaderParseError, ResolveError};
pub use headers::{
    ERROR_CODE_HEADER, EXCEPTION_TYPE_HEADER, HeaderMap, RECOGNIZED_HEADER_KEYS,
    X_AMZN_ERROR_TYPE, strip_error_type_suffix,
};
pub use logging::{LogConfig, LogFormat, LoggingError, LoggingGuards, init_logging};
pub use resolver::{CodeSource, ErrorCodeParser, ErrorCodeResolver, Resolution};
