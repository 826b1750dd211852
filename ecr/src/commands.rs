//! Subcommand implementations.

use crate::input;
use anyhow::Result;
use clap::ValueEnum;
use ecr_common::{
    EnvParser, ErrorCodeResolver, RECOGNIZED_HEADER_KEYS, ResolveError,
    Resolution, ResolverConfig, Sourced, StructuredBody, X_AMZN_ERROR_TYPE,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

pub const EXIT_RESOLVED: u8 = 0;
pub const EXIT_NO_CODE: u8 = 1;
pub const EXIT_AMBIGUOUS: u8 = 2;
pub const EXIT_INPUT_ERROR: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Result of a `resolve` run, mapped onto the process exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Resolved,
    NoCode,
    Ambiguous,
}

impl Outcome {
    pub fn status(&self) -> u8 {
        match self {
            Self::Resolved => EXIT_RESOLVED,
            Self::NoCode => EXIT_NO_CODE,
            Self::Ambiguous => EXIT_AMBIGUOUS,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.status())
    }
}

pub struct ResolveArgs {
    pub headers_file: Option<PathBuf>,
    pub header_flags: Vec<String>,
    pub body: Option<String>,
    pub field_name: Option<String>,
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct JsonFault<'a> {
    error: JsonFaultBody<'a>,
}

#[derive(Serialize)]
struct JsonFaultBody<'a> {
    code: &'static str,
    message: String,
    keys: &'a [String],
}

/// Field name precedence: `--field-name`, then `ECR_ERROR_CODE_FIELD`, then `__type`.
pub fn effective_config(flag: Option<String>) -> Sourced<ResolverConfig> {
    match flag.filter(|name| !name.is_empty()) {
        Some(name) => Sourced::from_cli(ResolverConfig::new(Some(name)), "--field-name"),
        None => ResolverConfig::from_env(&mut EnvParser::new()),
    }
}

pub fn resolve(args: ResolveArgs) -> Result<Outcome> {
    let config = effective_config(args.field_name);
    debug!(
        field = config.value.error_code_field_name(),
        source = %config.source,
        "Using error code field"
    );

    let headers = input::load_headers(args.headers_file.as_deref(), &args.header_flags)?;
    let body = input::load_body(args.body.as_deref())?;

    let resolver = ErrorCodeResolver::from_config(config.into_inner());
    let result = resolver.resolve_detailed(&headers, body.as_ref().map(|b| b as &dyn StructuredBody));

    let outcome = match &result {
        Ok(Some(_)) => Outcome::Resolved,
        Ok(None) => Outcome::NoCode,
        Err(ResolveError::AmbiguousErrorHeader { .. }) => Outcome::Ambiguous,
    };
    info!(outcome = ?outcome, "Resolution finished");

    match (args.format, result) {
        (OutputFormat::Text, Ok(Some(resolution))) => println!("{}", resolution.code),
        (OutputFormat::Text, Ok(None)) => {}
        (OutputFormat::Text, Err(err)) => eprintln!("{}: {err}", err.code()),
        (OutputFormat::Json, Ok(resolution)) => {
            println!("{}", serde_json::to_string(&json_resolution(resolution.as_ref()))?);
        }
        (OutputFormat::Json, Err(err)) => {
            let fault = JsonFault {
                error: JsonFaultBody {
                    code: err.code(),
                    message: err.to_string(),
                    keys: err.conflicting_keys(),
                },
            };
            println!("{}", serde_json::to_string(&fault)?);
        }
    }

    Ok(outcome)
}

fn json_resolution(resolution: Option<&Resolution>) -> serde_json::Value {
    match resolution {
        Some(resolution) => serde_json::json!(resolution),
        None => serde_json::json!({"code": null, "source": null}),
    }
}

pub fn headers(field_name: Option<String>) {
    let config = effective_config(field_name);

    println!("Recognized error-code headers (at most one per response):");
    for key in RECOGNIZED_HEADER_KEYS {
        if key == X_AMZN_ERROR_TYPE {
            println!("  {key:<18} legacy \"<Code>:<url>\" suffix is dropped");
        } else {
            println!("  {key:<18} used verbatim");
        }
    }

    println!(
        "Body field: {} ({}); \"prefix#Name\" resolves to \"Name\"",
        config.value.error_code_field_name(),
        config.source
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecr_common::{CodeSource, ConfigSource};

    #[test]
    fn test_cli_flag_wins() {
        let config = effective_config(Some("code".to_string()));
        assert_eq!(config.value.error_code_field_name(), "code");
        assert_eq!(
            config.source,
            ConfigSource::CommandLine("--field-name".to_string())
        );
    }

    #[test]
    fn test_json_resolution_shapes() {
        let resolution = Resolution {
            code: "Foo".to_string(),
            source: CodeSource::Body {
                field: "__type".to_string(),
                nested: false,
            },
        };
        assert_eq!(
            json_resolution(Some(&resolution)),
            serde_json::json!({
                "code": "Foo",
                "source": {"kind": "body", "field": "__type", "nested": false}
            })
        );
        assert_eq!(
            json_resolution(None),
            serde_json::json!({"code": null, "source": null})
        );
    }

    #[test]
    fn test_outcome_exit_codes() {
        assert_eq!(Outcome::Resolved.status(), EXIT_RESOLVED);
        assert_eq!(Outcome::NoCode.status(), EXIT_NO_CODE);
        assert_eq!(Outcome::Ambiguous.status(), EXIT_AMBIGUOUS);
    }
}
