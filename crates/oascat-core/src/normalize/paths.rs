use indexmap::IndexMap;
use serde::Serialize;

use crate::document::Document;

/// HTTP methods that may appear as operation keys inside a path item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    /// Recognize a path-item key as an operation. Keys such as `parameters`,
    /// `summary`, `servers` or `$ref` return `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "get" => Some(HttpMethod::Get),
            "put" => Some(HttpMethod::Put),
            "post" => Some(HttpMethod::Post),
            "delete" => Some(HttpMethod::Delete),
            "options" => Some(HttpMethod::Options),
            "head" => Some(HttpMethod::Head),
            "patch" => Some(HttpMethod::Patch),
            "trace" => Some(HttpMethod::Trace),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Trace => "TRACE",
        }
    }
}

/// One declared operation under a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operation {
    pub method: HttpMethod,

    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// The operations declared for one path template, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PathItem {
    pub operations: Vec<Operation>,
}

/// Collect every path template and its direct operations.
///
/// Every key under `paths` is kept, even when its item is not a mapping or
/// declares no operations, so the record's path count matches the document.
pub fn extract_paths(doc: &Document) -> IndexMap<String, PathItem> {
    let Some(paths) = doc.get("paths").and_then(Document::as_mapping) else {
        return IndexMap::new();
    };

    paths
        .iter()
        .map(|(template, item)| (template.clone(), extract_path_item(item)))
        .collect()
}

fn extract_path_item(item: &Document) -> PathItem {
    let Some(entries) = item.as_mapping() else {
        return PathItem::default();
    };

    let operations = entries
        .iter()
        .filter_map(|(key, value)| {
            let method = HttpMethod::from_key(key)?;
            value.as_mapping()?;
            Some(extract_operation(method, value))
        })
        .collect();

    PathItem { operations }
}

fn extract_operation(method: HttpMethod, op: &Document) -> Operation {
    let tags = op
        .get("tags")
        .and_then(Document::as_sequence)
        .map(|tags| {
            tags.iter()
                .filter_map(Document::scalar_text)
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default();

    Operation {
        method,
        operation_id: op.get_text("operationId"),
        summary: op.get_text("summary"),
        tags,
    }
}
