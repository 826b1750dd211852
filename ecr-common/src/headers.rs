//! Response header mapping and the error-code header keys.
//!
//! Header names are kept exactly as received. Matching against the
//! recognized keys is case-sensitive.

use crate::errors::HeaderParseError;
use std::collections::BTreeMap;

/// Services using the JSON protocol with HTTP bindings send the error code in
/// this header. The value may carry a legacy `"<Code>:<url>"` suffix.
pub const X_AMZN_ERROR_TYPE: &str = "x-amzn-ErrorType";

/// Event-stream pseudo-header carrying the error code.
pub const ERROR_CODE_HEADER: &str = ":error-code";

/// Event-stream pseudo-header carrying the exception type.
pub const EXCEPTION_TYPE_HEADER: &str = ":exception-type";

/// Header keys known to carry an error code. A well-formed response holds at
/// most one of them.
pub const RECOGNIZED_HEADER_KEYS: [&str; 3] =
    [X_AMZN_ERROR_TYPE, ERROR_CODE_HEADER, EXCEPTION_TYPE_HEADER];

/// Drop the legacy suffix from an `x-amzn-ErrorType` value.
///
/// `"AccessDeniedException:http://internal/"` becomes `"AccessDeniedException"`.
/// Values without a colon come back unchanged.
pub fn strip_error_type_suffix(value: &str) -> &str {
    match value.find(':') {
        Some(idx) => &value[..idx],
        None => value,
    }
}

/// Header name → ordered list of values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: BTreeMap<String, Vec<String>>,
}

impl HeaderMap {
    /// Create an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to the sequence for `name`.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries
            .entry(name.into())
            .or_default()
            .push(value.into());
    }

    /// Replace all values for `name`.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<String>) -> Option<Vec<String>> {
        self.entries.insert(name.into(), values)
    }

    /// All values for `name`, empty if the header is absent.
    pub fn get_all(&self, name: &str) -> &[String] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First value for `name`.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recognized error-code keys present in this map, in
    /// [`RECOGNIZED_HEADER_KEYS`] order.
    pub fn recognized_keys(&self) -> Vec<&'static str> {
        RECOGNIZED_HEADER_KEYS
            .iter()
            .copied()
            .filter(|key| self.contains(key))
            .collect()
    }

    /// Header names that equal a recognized key only when case is ignored.
    ///
    /// These are not error-code signals; callers may want to log them.
    pub fn near_miss_keys(&self) -> Vec<&str> {
        self.names()
            .filter(|name| {
                RECOGNIZED_HEADER_KEYS
                    .iter()
                    .any(|key| key != name && key.eq_ignore_ascii_case(name))
            })
            .collect()
    }

    /// Parse a raw header block, one `Name: value` per line.
    ///
    /// Accepts LF or CRLF line endings and skips blank lines. A leading `:`
    /// belongs to the name, so `:error-code: Throttling` yields the
    /// pseudo-header `:error-code`. Repeated names append in line order.
    pub fn parse_block(text: &str) -> Result<Self, HeaderParseError> {
        let mut headers = Self::new();

        for (idx, raw_line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            let search_from = usize::from(line.starts_with(':'));
            let Some(sep) = line[search_from..].find(':').map(|pos| pos + search_from) else {
                return Err(HeaderParseError::MissingSeparator { line: line_no });
            };

            let name = line[..sep].trim();
            if name.is_empty() || name == ":" {
                return Err(HeaderParseError::EmptyName { line: line_no });
            }
            headers.append(name, line[sep + 1..].trim());
        }

        Ok(headers)
    }
}

impl<K, V> FromIterator<(K, V)> for HeaderMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        headers.extend(iter);
        headers
    }
}

impl<K, V> Extend<(K, V)> for HeaderMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.append(name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_error_type_suffix() {
        assert_eq!(
            strip_error_type_suffix("AccessDeniedException:http://internal/type"),
            "AccessDeniedException"
        );
        assert_eq!(strip_error_type_suffix("ValidationException"), "ValidationException");
        assert_eq!(strip_error_type_suffix("A:b:c"), "A");
        assert_eq!(strip_error_type_suffix(":leading"), "");
    }

    #[test]
    fn test_append_keeps_value_order() {
        let mut headers = HeaderMap::new();
        headers.append(ERROR_CODE_HEADER, "First");
        headers.append(ERROR_CODE_HEADER, "Second");

        assert_eq!(headers.get_all(ERROR_CODE_HEADER), ["First", "Second"]);
        assert_eq!(headers.first(ERROR_CODE_HEADER), Some("First"));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_missing_header_is_empty() {
        let headers = HeaderMap::new();
        assert!(headers.get_all("Content-Type").is_empty());
        assert_eq!(headers.first("Content-Type"), None);
        assert!(headers.is_empty());
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let headers: HeaderMap = [("X-Amzn-ErrorType", "Foo")].into_iter().collect();
        assert!(!headers.contains(X_AMZN_ERROR_TYPE));
        assert!(headers.recognized_keys().is_empty());
        assert_eq!(headers.near_miss_keys(), vec!["X-Amzn-ErrorType"]);
    }

    #[test]
    fn test_recognized_keys_in_declared_order() {
        let headers: HeaderMap = [
            (EXCEPTION_TYPE_HEADER, "B"),
            ("Content-Type", "application/json"),
            (ERROR_CODE_HEADER, "A"),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            headers.recognized_keys(),
            vec![ERROR_CODE_HEADER, EXCEPTION_TYPE_HEADER]
        );
    }

    #[test]
    fn test_parse_block_handles_pseudo_headers_and_crlf() {
        let block = "Content-Type: application/json\r\n:error-code: ThrottlingException\r\n\r\nx-amzn-ErrorType: Foo:http://bar\r\n";
        let headers = HeaderMap::parse_block(block).unwrap();

        assert_eq!(headers.first("Content-Type"), Some("application/json"));
        assert_eq!(headers.first(ERROR_CODE_HEADER), Some("ThrottlingException"));
        // Only the name/value split is taken; the value keeps its own colons.
        assert_eq!(headers.first(X_AMZN_ERROR_TYPE), Some("Foo:http://bar"));
    }

    #[test]
    fn test_parse_block_repeated_names_append() {
        let headers = HeaderMap::parse_block("Set-Cookie: a=1\nSet-Cookie: b=2\n").unwrap();
        assert_eq!(headers.get_all("Set-Cookie"), ["a=1", "b=2"]);
    }

    #[test]
    fn test_parse_block_errors() {
        assert_eq!(
            HeaderMap::parse_block("Content-Type: a\nbogus line"),
            Err(HeaderParseError::MissingSeparator { line: 2 })
        );
        assert_eq!(
            HeaderMap::parse_block(":: value"),
            Err(HeaderParseError::EmptyName { line: 1 })
        );
    }

    #[test]
    fn test_parse_block_empty_input() {
        assert!(HeaderMap::parse_block("\n\n").unwrap().is_empty());
    }
}
