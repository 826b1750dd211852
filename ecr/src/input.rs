//! Loading response headers and bodies from files, flags and stdin.

use anyhow::{Context, Result};
use ecr_common::HeaderMap;
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Build the header map from an optional header file plus `--header` flags.
///
/// Flag values are appended after the file's values.
pub fn load_headers(file: Option<&Path>, flags: &[String]) -> Result<HeaderMap> {
    let mut headers = match file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read headers from {}", path.display()))?;
            HeaderMap::parse_block(&text)
                .with_context(|| format!("Invalid header file {}", path.display()))?
        }
        None => HeaderMap::new(),
    };

    for flag in flags {
        let parsed = HeaderMap::parse_block(flag)
            .with_context(|| format!("Invalid --header value '{flag}'"))?;
        for (name, values) in parsed.iter() {
            for value in values {
                headers.append(name, value.as_str());
            }
        }
    }

    debug!(count = headers.len(), "Loaded response headers");
    Ok(headers)
}

/// Load and parse a JSON body. `-` reads stdin.
///
/// A blank body means the response had no payload and yields `None`.
pub fn load_body(source: Option<&str>) -> Result<Option<Value>> {
    let Some(source) = source else {
        return Ok(None);
    };

    let text = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read body from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read body from {source}"))?
    };

    parse_body(&text).with_context(|| format!("Body from {source} is not valid JSON"))
}

pub fn parse_body(text: &str) -> Result<Option<Value>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(text)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecr_common::ERROR_CODE_HEADER;
    use std::io::Write;

    #[test]
    fn test_flags_append_after_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, ":error-code: FromFile").unwrap();

        let headers = load_headers(
            Some(file.path()),
            &[":error-code: FromFlag".to_string()],
        )
        .unwrap();
        assert_eq!(headers.get_all(ERROR_CODE_HEADER), ["FromFile", "FromFlag"]);
    }

    #[test]
    fn test_bad_flag_is_error() {
        let err = load_headers(None, &["no separator".to_string()]).unwrap_err();
        assert!(err.to_string().contains("Invalid --header value"));
    }

    #[test]
    fn test_blank_body_is_none() {
        assert!(parse_body("  \n").unwrap().is_none());
        assert!(parse_body("{\"__type\":\"x\"}").unwrap().is_some());
        assert!(parse_body("{not json").is_err());
    }

    #[test]
    fn test_missing_body_file() {
        let err = load_body(Some("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read body"));
    }
}
