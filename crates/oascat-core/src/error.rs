use std::path::PathBuf;

use thiserror::Error;

use crate::load::SourceFormat;

/// Malformed JSON or YAML text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "failed to parse {} as {format}: {message}{}",
    .path.display(),
    location_suffix(.line, .column)
)]
pub struct ParseError {
    pub path: PathBuf,
    pub format: SourceFormat,
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

fn location_suffix(line: &Option<usize>, column: &Option<usize>) -> String {
    match (line, column) {
        (Some(line), Some(column)) => format!(" (line {line}, column {column})"),
        (Some(line), None) => format!(" (line {line})"),
        _ => String::new(),
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A well-formed document that is not recognizable as OpenAPI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} is not an OpenAPI document: {reason}", .path.display())]
pub struct NormalizationError {
    pub path: PathBuf,
    pub reason: String,
}

/// Why a single file was left out of a scan.
#[derive(Debug, Error)]
pub enum FileError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Normalize(#[from] NormalizationError),
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("specification '{0}' not found")]
    NotFound(String),

    #[error("failed to read specs directory {}: {source}", .path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}
