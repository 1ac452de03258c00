use indexmap::IndexMap;

use super::Dialect;
use crate::document::Document;

/// Server URLs in declaration order, regardless of dialect.
pub fn extract_servers(doc: &Document, dialect: Dialect) -> Vec<String> {
    match dialect {
        Dialect::OpenApi3 => openapi3_servers(doc),
        Dialect::Swagger2 => swagger2_servers(doc),
    }
}

/// `servers[].url`, with `{name}` placeholders replaced by the declared
/// variable defaults.
fn openapi3_servers(doc: &Document) -> Vec<String> {
    let Some(servers) = doc.get("servers").and_then(Document::as_sequence) else {
        return Vec::new();
    };

    servers
        .iter()
        .filter_map(|server| {
            let url = server.get_text("url")?;
            let variables = server.get("variables").and_then(Document::as_mapping);
            Some(expand_variables(&url, variables))
        })
        .collect()
}

/// `{scheme}://{host}{basePath}` for each declared scheme. Without a host the
/// base path alone is the only (relative) server.
fn swagger2_servers(doc: &Document) -> Vec<String> {
    let base_path = doc
        .get_text("basePath")
        .map(|p| {
            let trimmed = p.trim_end_matches('/');
            if trimmed.is_empty() || trimmed.starts_with('/') {
                trimmed.to_string()
            } else {
                format!("/{trimmed}")
            }
        })
        .unwrap_or_default();

    let Some(host) = doc.get_text("host") else {
        if base_path.is_empty() {
            return Vec::new();
        }
        return vec![base_path];
    };

    let mut schemes: Vec<String> = doc
        .get("schemes")
        .and_then(Document::as_sequence)
        .map(|s| {
            s.iter()
                .filter_map(Document::scalar_text)
                .map(|s| s.trim().to_ascii_lowercase())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();
    if schemes.is_empty() {
        schemes.push("https".to_string());
    }

    schemes
        .into_iter()
        .map(|scheme| format!("{scheme}://{host}{base_path}"))
        .collect()
}

fn expand_variables(url: &str, variables: Option<&IndexMap<String, Document>>) -> String {
    let Some(variables) = variables else {
        return url.to_string();
    };

    let mut expanded = url.to_string();
    for (name, variable) in variables {
        if let Some(default) = variable.get("default").and_then(Document::scalar_text) {
            expanded = expanded.replace(&format!("{{{name}}}"), &default);
        }
    }
    expanded
}
