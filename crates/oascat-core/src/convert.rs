use crate::document::Document;
use crate::error::RenderError;
use crate::load::SourceFormat;

/// Render a document as pretty JSON or as YAML.
pub fn render(document: &Document, format: SourceFormat) -> Result<String, RenderError> {
    match format {
        SourceFormat::Json => Ok(serde_json::to_string_pretty(document)?),
        SourceFormat::Yaml => Ok(serde_yaml_ng::to_string(document)?),
    }
}
