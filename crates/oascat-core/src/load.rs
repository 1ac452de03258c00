use std::fmt;
use std::fs;
use std::path::Path;
use std::string::FromUtf8Error;

use serde::Serialize;

use crate::document::Document;
use crate::error::{LoadError, ParseError};

/// Textual format of a spec file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    Json,
    Yaml,
}

impl SourceFormat {
    /// Map a file path to its format. `None` for anything that is not
    /// `.json`, `.yaml` or `.yml` (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(SourceFormat::Json),
            "yaml" | "yml" => Some(SourceFormat::Yaml),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SourceFormat::Json => "json",
            SourceFormat::Yaml => "yaml",
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            SourceFormat::Json => "application/json",
            SourceFormat::Yaml => "application/x-yaml",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read and parse a spec file. The caller is expected to have filtered out
/// unsupported extensions; anything unrecognized is parsed as YAML, which is
/// a superset of JSON.
pub fn load_document(path: &Path) -> Result<(Document, SourceFormat), LoadError> {
    let format = SourceFormat::from_path(path).unwrap_or(SourceFormat::Yaml);
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let content = String::from_utf8(bytes).map_err(|e| utf8_error(&e, format, path))?;
    let document = parse_str(&content, format, path)?;
    Ok((document, format))
}

/// Parse text already in memory. `path` is only used for error reporting.
///
/// YAML merge keys (`<<: *anchor`) are resolved before the document is
/// built.
pub fn parse_str(content: &str, format: SourceFormat, path: &Path) -> Result<Document, ParseError> {
    match format {
        SourceFormat::Json => serde_json::from_str(content).map_err(|e| ParseError {
            path: path.to_path_buf(),
            format,
            message: json_message(&e),
            line: Some(e.line()).filter(|&l| l > 0),
            column: Some(e.column()).filter(|_| e.line() > 0),
        }),
        SourceFormat::Yaml => {
            let mut value: serde_yaml_ng::Value =
                serde_yaml_ng::from_str(content).map_err(|e| yaml_error(&e, path))?;
            value.apply_merge().map_err(|e| yaml_error(&e, path))?;
            serde_yaml_ng::from_value(value).map_err(|e| yaml_error(&e, path))
        }
    }
}

fn yaml_error(e: &serde_yaml_ng::Error, path: &Path) -> ParseError {
    let location = e.location();
    ParseError {
        path: path.to_path_buf(),
        format: SourceFormat::Yaml,
        message: e.to_string(),
        line: location.as_ref().map(|l| l.line()),
        column: location.as_ref().map(|l| l.column()),
    }
}

/// Locate the first invalid byte as a 1-based line and column.
fn utf8_error(e: &FromUtf8Error, format: SourceFormat, path: &Path) -> ParseError {
    let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
    let line_start = valid
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |idx| idx + 1);
    let column = String::from_utf8_lossy(&valid[line_start..]).chars().count() + 1;

    ParseError {
        path: path.to_path_buf(),
        format,
        message: format!("invalid UTF-8: {}", e.utf8_error()),
        line: Some(valid.iter().filter(|&&b| b == b'\n').count() + 1),
        column: Some(column),
    }
}

/// serde_json appends " at line X column Y" to its messages; the location is
/// carried separately.
fn json_message(e: &serde_json::Error) -> String {
    let full = e.to_string();
    match full.rfind(" at line ") {
        Some(idx) if e.line() > 0 => full[..idx].to_string(),
        _ => full,
    }
}
