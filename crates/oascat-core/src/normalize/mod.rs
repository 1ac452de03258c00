pub mod paths;
pub mod servers;

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;

use crate::document::Document;
use crate::error::NormalizationError;
use crate::load::SourceFormat;
use crate::slug::{slug_from_path, title_from_slug};

pub use paths::{HttpMethod, Operation, PathItem};

/// Default `version` when `info.version` is missing.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Document shape, selected by the top-level version marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// `swagger: "2.0"`
    Swagger2,
    /// `openapi: 3.x`
    OpenApi3,
}

/// One parsed, normalized specification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecRecord {
    pub slug: String,
    pub title: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub dialect: Dialect,
    /// The `openapi`/`swagger` marker as written.
    pub spec_version: String,
    pub servers: Vec<String>,
    pub paths: IndexMap<String, PathItem>,
    pub schema_count: usize,
    pub security_scheme_count: usize,
    pub source_path: PathBuf,
    pub source_format: SourceFormat,
    #[serde(skip)]
    pub raw_document: Document,
}

impl SpecRecord {
    /// File name of the source, e.g. `weather.yaml`.
    pub fn file_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Every operation across all paths, paired with its path template.
    pub fn operations(&self) -> impl Iterator<Item = (&str, &Operation)> {
        self.paths
            .iter()
            .flat_map(|(path, item)| item.operations.iter().map(move |op| (path.as_str(), op)))
    }
}

/// Build a `SpecRecord` from a parsed document.
///
/// Fails when the root is not a mapping or carries neither an `openapi` nor a
/// `swagger` marker. Nothing else is validated.
pub fn normalize(
    document: Document,
    source_path: &Path,
    source_format: SourceFormat,
) -> Result<SpecRecord, NormalizationError> {
    let reject = |reason: &str| NormalizationError {
        path: source_path.to_path_buf(),
        reason: reason.to_string(),
    };

    if document.as_mapping().is_none() {
        return Err(reject("document root is not a mapping"));
    }

    let (dialect, spec_version) = detect_dialect(&document)
        .ok_or_else(|| reject("missing both `openapi` and `swagger` version markers"))?;

    let slug = slug_from_path(source_path);
    let info = document.get("info");

    let title = info
        .and_then(|i| i.get_text("title"))
        .unwrap_or_else(|| title_from_slug(&slug));
    let version = info
        .and_then(|i| i.get_text("version"))
        .unwrap_or_else(|| UNKNOWN_VERSION.to_string());
    let description = info
        .and_then(|i| i.get("description"))
        .and_then(Document::as_str)
        .filter(|d| !d.trim().is_empty())
        .map(str::to_string);

    let servers = servers::extract_servers(&document, dialect);
    let paths = paths::extract_paths(&document);
    let (schema_count, security_scheme_count) = component_counts(&document, dialect);

    Ok(SpecRecord {
        slug,
        title,
        version,
        description,
        dialect,
        spec_version,
        servers,
        paths,
        schema_count,
        security_scheme_count,
        source_path: source_path.to_path_buf(),
        source_format,
        raw_document: document,
    })
}

/// `openapi` wins when a document carries both markers.
fn detect_dialect(doc: &Document) -> Option<(Dialect, String)> {
    if let Some(version) = doc.get_text("openapi") {
        return Some((Dialect::OpenApi3, version));
    }
    doc.get_text("swagger")
        .map(|version| (Dialect::Swagger2, version))
}

fn component_counts(doc: &Document, dialect: Dialect) -> (usize, usize) {
    match dialect {
        Dialect::OpenApi3 => {
            let Some(components) = doc.get("components") else {
                return (0, 0);
            };
            (
                components.mapping_len("schemas"),
                components.mapping_len("securitySchemes"),
            )
        }
        Dialect::Swagger2 => (
            doc.mapping_len("definitions"),
            doc.mapping_len("securityDefinitions"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Document {
        serde_yaml_ng::from_str(text).unwrap()
    }

    #[test]
    fn test_openapi3_record() {
        let doc = yaml(
            r#"
openapi: 3.0.3
info:
  title: Weather API
  version: 1.2.0
  description: Forecasts and observations.
servers:
  - url: https://weather.example.com
paths:
  /current:
    get:
      tags: [weather]
components:
  schemas:
    Forecast: {}
    Reading: {}
  securitySchemes:
    apiKey: {}
"#,
        );
        let record = normalize(doc, Path::new("specs/weather.yaml"), SourceFormat::Yaml).unwrap();
        assert_eq!(record.slug, "weather");
        assert_eq!(record.title, "Weather API");
        assert_eq!(record.version, "1.2.0");
        assert_eq!(record.description.as_deref(), Some("Forecasts and observations."));
        assert_eq!(record.dialect, Dialect::OpenApi3);
        assert_eq!(record.spec_version, "3.0.3");
        assert_eq!(record.servers, vec!["https://weather.example.com"]);
        assert_eq!(record.paths.len(), 1);
        assert_eq!(record.schema_count, 2);
        assert_eq!(record.security_scheme_count, 1);
        assert_eq!(record.file_name(), "weather.yaml");
    }

    #[test]
    fn test_swagger2_record() {
        let doc = yaml(
            r#"
swagger: 2.0
info:
  title: Petstore
  version: 1
host: petstore.swagger.io
basePath: /v2
paths:
  /pet:
    post: {}
  /pet/{petId}:
    get: {}
definitions:
  Pet: {}
securityDefinitions:
  petstore_auth: {}
  api_key: {}
"#,
        );
        let record = normalize(doc, Path::new("petstore.yaml"), SourceFormat::Yaml).unwrap();
        assert_eq!(record.dialect, Dialect::Swagger2);
        assert_eq!(record.spec_version, "2.0");
        assert_eq!(record.version, "1");
        assert_eq!(record.servers, vec!["https://petstore.swagger.io/v2"]);
        assert_eq!(record.paths.len(), 2);
        assert_eq!(record.schema_count, 1);
        assert_eq!(record.security_scheme_count, 2);
    }

    #[test]
    fn test_defaults_without_info() {
        let doc = yaml("openapi: 3.1.0\npaths: {}\n");
        let record = normalize(doc, Path::new("my-api.json"), SourceFormat::Json).unwrap();
        assert_eq!(record.slug, "my_api");
        assert_eq!(record.title, "My Api");
        assert_eq!(record.version, UNKNOWN_VERSION);
        assert_eq!(record.description, None);
        assert!(record.servers.is_empty());
    }

    #[test]
    fn test_rejects_missing_markers() {
        let doc = yaml("info:\n  title: Not a spec\n");
        let err = normalize(doc, Path::new("x.yaml"), SourceFormat::Yaml).unwrap_err();
        assert!(err.reason.contains("version markers"));
        assert_eq!(err.path, PathBuf::from("x.yaml"));
    }

    #[test]
    fn test_rejects_non_mapping_root() {
        let doc = yaml("- a\n- b\n");
        let err = normalize(doc, Path::new("list.yaml"), SourceFormat::Yaml).unwrap_err();
        assert!(err.reason.contains("not a mapping"));
    }

    #[test]
    fn test_raw_document_preserved() {
        let doc = yaml("openapi: 3.0.0\nx-custom: [1, 2]\n");
        let record = normalize(doc.clone(), Path::new("x.yaml"), SourceFormat::Yaml).unwrap();
        assert_eq!(record.raw_document, doc);
    }

    #[test]
    fn test_operations_iterator() {
        let doc = yaml("openapi: 3.0.0\npaths:\n  /a:\n    get: {}\n    post: {}\n  /b:\n    get: {}\n");
        let record = normalize(doc, Path::new("x.yaml"), SourceFormat::Yaml).unwrap();
        let ops: Vec<(&str, HttpMethod)> =
            record.operations().map(|(p, op)| (p, op.method)).collect();
        assert_eq!(
            ops,
            vec![
                ("/a", HttpMethod::Get),
                ("/a", HttpMethod::Post),
                ("/b", HttpMethod::Get)
            ]
        );
    }
}
