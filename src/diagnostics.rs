//! Dataset syntax diagnostics with source locations

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Dataset parse error pointing into the offending file
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(gbx::dataset::syntax))]
pub struct DatasetSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    /// The underlying parser message
    message: String,
}

impl DatasetSyntaxError {
    /// Create a syntax error from a serde_json error
    pub fn from_json_error(err: &serde_json::Error, source: &str, filename: &str) -> Self {
        Self::at_location(
            err.to_string(),
            source,
            filename,
            err.line().max(1),
            err.column().max(1),
        )
    }

    /// Create a syntax error from a serde_yml error
    pub fn from_yaml_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));

        Self::at_location(err.to_string(), source, filename, line, column)
    }

    /// Create a syntax error at a specific location
    pub fn at_location(
        message: impl Into<String>,
        source: &str,
        filename: &str,
        line: usize,
        column: usize,
    ) -> Self {
        let message = message.into();
        let offset = line_col_to_offset(source, line, column);
        let help = generate_help(&message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help,
            message,
        }
    }
}

/// Convert 1-based line/column to a byte offset, clamped to the source
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let mut line_start = 0;

    for (idx, text) in source.split_inclusive('\n').enumerate() {
        if idx + 1 == line {
            let within = text
                .char_indices()
                .nth(column.saturating_sub(1))
                .map(|(i, _)| i)
                .unwrap_or(text.len().saturating_sub(1));
            return line_start + within;
        }
        line_start += text.len();
    }

    source.len().saturating_sub(1)
}

/// Suggest a fix for the parser messages users hit most with hand-edited catalogs
fn generate_help(message: &str) -> Option<String> {
    let msg_lower = message.to_lowercase();

    if msg_lower.contains("trailing comma") {
        return Some("JSON does not allow a comma after the last item of a list or object.".to_string());
    }

    if msg_lower.contains("eof while parsing") {
        return Some("The file ends early - check for a missing closing ']' or '}'.".to_string());
    }

    if msg_lower.contains("missing field") {
        return Some("Every record needs the fields listed in the catalog schema (e.g. id, shaftDiameter).".to_string());
    }

    if msg_lower.contains("invalid type") {
        return Some("Dimensions and ratings must be numbers, not quoted strings.".to_string());
    }

    if msg_lower.contains("tab") {
        return Some(
            "YAML requires spaces for indentation, not tabs. Replace tabs with spaces.".to_string(),
        );
    }

    if msg_lower.contains("duplicate key") {
        return Some("Each key can only appear once. Remove or rename the duplicate key.".to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_to_offset() {
        let source = "line1\nline2\nline3";
        assert_eq!(line_col_to_offset(source, 1, 1), 0);
        assert_eq!(line_col_to_offset(source, 2, 1), 6);
        assert_eq!(line_col_to_offset(source, 3, 2), 13);
        assert_eq!(line_col_to_offset(source, 9, 1), source.len() - 1);
    }

    #[test]
    fn test_help_generation() {
        assert!(generate_help("trailing comma at line 3 column 1").is_some());
        assert!(generate_help("missing field `shaftDiameter`").is_some());
        assert!(generate_help("found tab character").is_some());
        assert!(generate_help("some random error").is_none());
    }

    #[test]
    fn test_from_json_error_keeps_message() {
        let source = "[\n  {\"id\": 1,}\n]";
        let err = serde_json::from_str::<serde_json::Value>(source).unwrap_err();
        let diag = DatasetSyntaxError::from_json_error(&err, source, "motors.json");
        assert!(diag.message.contains("line 2"));
    }
}
