//! Per-spec handlers: conversions, download, and info.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use oascat_core::{SourceFormat, render};
use serde_json::{Value, json};

use super::catalog::file_suffix;
use super::error::ApiError;
use super::router::AppState;

/// Path lists longer than this are summarized in `/info`.
const MAX_LISTED_PATHS: usize = 50;

const CACHE_CONTROL: &str = "public, max-age=3600";

/// GET /{slug}/openapi.json
pub async fn get_spec_json(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    rendered(&state, &slug, SourceFormat::Json)
}

/// GET /{slug}/openapi.yaml
pub async fn get_spec_yaml(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    rendered(&state, &slug, SourceFormat::Yaml)
}

fn rendered(state: &AppState, slug: &str, format: SourceFormat) -> Result<Response, ApiError> {
    let entry = state.registry.get(slug)?;
    let body = render(&entry.record.raw_document, format)?;
    let disposition = format!("inline; filename={slug}-openapi.{}", format.as_str());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, format.media_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CACHE_CONTROL, CACHE_CONTROL.to_string()),
        ],
        body,
    )
        .into_response())
}

/// GET /{slug}/download - The original file, byte for byte
pub async fn download_spec(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    let entry = state.registry.get(&slug)?;
    let path = &entry.record.source_path;

    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound(format!(
                "Specification file not found: {}",
                path.display()
            )));
        }
        Err(e) => {
            return Err(ApiError::Internal(format!(
                "Error downloading specification: {e}"
            )));
        }
    };

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", entry.record.file_name()),
            ),
            (header::CACHE_CONTROL, CACHE_CONTROL.to_string()),
        ],
        bytes,
    )
        .into_response())
}

/// GET /{slug}/info - Summary of one spec
pub async fn get_spec_info(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let entry = state.registry.get(&slug)?;
    let record = &entry.record;
    let metadata = &entry.metadata;

    let endpoint_paths = if record.paths.len() <= MAX_LISTED_PATHS {
        json!(record.paths.keys().collect::<Vec<_>>())
    } else {
        json!(format!(
            "{} endpoints (too many to list)",
            record.paths.len()
        ))
    };

    Ok(Json(json!({
        "spec_name": slug,
        "title": record.title,
        "version": record.version,
        "description": record.description.clone().unwrap_or_default(),
        "dialect": record.dialect,
        "spec_version": record.spec_version,
        "endpoints": record.paths.len(),
        "endpoint_paths": endpoint_paths,
        "schemas": record.schema_count,
        "security_schemes": record.security_scheme_count,
        "servers": record.servers,
        "tags": metadata.tags,
        "capabilities": metadata.capabilities,
        "base_url": metadata.base_url,
        "file_info": {
            "name": record.file_name(),
            "path": record.source_path.display().to_string(),
            "type": file_suffix(&entry),
            "size_bytes": entry.file.size_bytes,
            "modified": entry.file.modified,
        },
        "urls": {
            "yaml": format!("/{slug}/openapi.yaml"),
            "json": format!("/{slug}/openapi.json"),
            "download": format!("/{slug}/download"),
        },
    })))
}
