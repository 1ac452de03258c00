//! Catalog-wide handlers.

use axum::Json;
use axum::extract::State;
use oascat_core::CatalogEntry;
use serde::Serialize;

use super::error::ApiError;
use super::router::AppState;

/// One entry of the root collection listing.
#[derive(Debug, Serialize)]
pub struct Collection {
    pub name: String,
    pub tags: Vec<String>,
    pub description: String,
    pub openapi_spec: String,
    pub capabilities: Vec<String>,
    pub base_url: String,
}

impl Collection {
    fn new(entry: &CatalogEntry, public_url: &str) -> Self {
        Self {
            name: entry.record.title.clone(),
            tags: entry.metadata.tags.iter().cloned().collect(),
            description: entry.metadata.description.clone(),
            openapi_spec: format!("{public_url}/{}/openapi.json", entry.record.slug),
            capabilities: entry.metadata.capabilities.iter().cloned().collect(),
            base_url: entry.metadata.base_url.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub specs: usize,
}

#[derive(Debug, Serialize)]
pub struct SpecSummary {
    pub name: String,
    pub file_name: String,
    pub file_type: String,
    pub yaml_url: String,
    pub json_url: String,
    pub download_url: String,
    pub info_url: String,
    pub file_path: String,
    pub size_bytes: u64,
    pub modified_time: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct SpecListing {
    pub specifications: Vec<SpecSummary>,
    pub count: usize,
    pub specs_directory: String,
}

#[derive(Debug, Serialize)]
pub struct FailedFile {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    pub skipped: usize,
    pub count: usize,
    pub failed: Vec<FailedFile>,
}

/// GET / - Every catalogued spec with its derived metadata, ordered by slug
pub async fn list_collections(State(state): State<AppState>) -> Json<Vec<Collection>> {
    let snapshot = state.registry.snapshot();
    let collections = snapshot
        .entries()
        .map(|entry| Collection::new(entry, &state.public_url))
        .collect();
    Json(collections)
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "OpenAPI Spec Server is running",
        specs: state.registry.snapshot().len(),
    })
}

/// GET /specs - File-level view of the catalog
pub async fn list_specifications(State(state): State<AppState>) -> Json<SpecListing> {
    let snapshot = state.registry.snapshot();
    let specifications: Vec<SpecSummary> = snapshot
        .entries()
        .map(|entry| {
            let slug = &entry.record.slug;
            SpecSummary {
                name: slug.clone(),
                file_name: entry.record.file_name(),
                file_type: file_suffix(entry),
                yaml_url: format!("/{slug}/openapi.yaml"),
                json_url: format!("/{slug}/openapi.json"),
                download_url: format!("/{slug}/download"),
                info_url: format!("/{slug}/info"),
                file_path: entry.record.source_path.display().to_string(),
                size_bytes: entry.file.size_bytes,
                modified_time: entry.file.modified,
            }
        })
        .collect();

    let specs_directory = snapshot
        .directory()
        .unwrap_or_else(|| state.registry.root())
        .display()
        .to_string();

    Json(SpecListing {
        count: specifications.len(),
        specifications,
        specs_directory,
    })
}

/// POST /refresh - Rescan the specs directory and publish the new catalog
pub async fn refresh(State(state): State<AppState>) -> Result<Json<RefreshResponse>, ApiError> {
    let registry = state.registry.clone();
    let report = tokio::task::spawn_blocking(move || registry.refresh())
        .await
        .map_err(|e| ApiError::Internal(format!("refresh task failed: {e}")))??;

    Ok(Json(RefreshResponse {
        added: report.added,
        updated: report.updated,
        removed: report.removed,
        skipped: report.skipped,
        count: state.registry.snapshot().len(),
        failed: report
            .failed
            .iter()
            .map(|f| FailedFile {
                path: f.path.display().to_string(),
                error: f.error.to_string(),
            })
            .collect(),
    }))
}

/// Extension with a leading dot, as written on disk (`.yml`, `.json`).
pub(crate) fn file_suffix(entry: &CatalogEntry) -> String {
    entry
        .record
        .source_path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}
