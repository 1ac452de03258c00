//! Router tests.
//!
//! Requests are driven in-process with `tower::ServiceExt::oneshot()` against
//! a registry scanned from a temporary directory.

use std::fs;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use http_body_util::BodyExt;
use oascat_core::Registry;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::{AppState, create_router};

const WEATHER: &str = r#"openapi: 3.0.3
info:
  title: Weather API
  version: 1.0.0
servers:
  - url: https://weather.example.com
paths:
  /current:
    get:
      tags: [weather]
  /forecast/{city}:
    get:
      tags: [weather]
  /historical:
    get:
      tags: [weather]
"#;

const PETS: &str = r#"{
  "swagger": "2.0",
  "info": {"title": "Pets", "version": "2", "description": "Pets and owners."},
  "host": "pets.example.com",
  "paths": {"/pets": {"get": {"operationId": "listPets"}}}
}"#;

// ---------------------------------------------------------------------------
// Test harness
// ---------------------------------------------------------------------------

/// Scan a temp directory holding the given files and build the router.
fn make_app(files: &[(&str, &str)]) -> (TempDir, Arc<Registry>, Router) {
    let dir = tempfile::tempdir().unwrap();
    for (name, content) in files {
        fs::write(dir.path().join(name), content).unwrap();
    }
    let (registry, _) = Registry::init(dir.path()).unwrap();
    let registry = Arc::new(registry);
    let state = AppState::new(registry.clone(), "http://catalog.test");
    (dir, registry, create_router(state, true))
}

/// Send one request through the router and return the response parts.
async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, Response<()>, Bytes) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.expect("router returned error");
    let (parts, body) = resp.into_parts();
    let body = body.collect().await.expect("body collect failed").to_bytes();
    (parts.status, Response::from_parts(parts, ()), body)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = send(app, Method::GET, uri).await;
    (status, serde_json::from_slice(&body).expect("response is not valid JSON"))
}

fn header_value<'a>(resp: &'a Response<()>, name: header::HeaderName) -> &'a str {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[tokio::test]
async fn root_lists_collections_in_slug_order() {
    let (_dir, _, app) = make_app(&[("weather.yaml", WEATHER), ("pets.json", PETS)]);
    let (status, body) = get_json(app, "/").await;
    assert_eq!(status, StatusCode::OK);

    let collections = body.as_array().unwrap();
    assert_eq!(collections.len(), 2);
    assert_eq!(collections[0]["name"], "Pets");
    assert_eq!(collections[0]["description"], "Pets and owners.");
    assert_eq!(collections[0]["base_url"], "https://pets.example.com");

    let weather = &collections[1];
    assert_eq!(weather["name"], "Weather API");
    assert_eq!(weather["tags"], serde_json::json!(["weather"]));
    assert_eq!(
        weather["capabilities"],
        serde_json::json!(["current", "forecast", "historical"])
    );
    assert_eq!(
        weather["openapi_spec"],
        "http://catalog.test/weather/openapi.json"
    );
    assert_eq!(weather["base_url"], "https://weather.example.com");
}

#[tokio::test]
async fn root_on_empty_directory_is_empty_array() {
    let (_dir, _, app) = make_app(&[]);
    let (status, body) = get_json(app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn health_reports_spec_count() {
    let (_dir, _, app) = make_app(&[("weather.yaml", WEATHER)]);
    let (status, body) = get_json(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["specs"], 1);
}

#[tokio::test]
async fn specs_listing_describes_files() {
    let (dir, _, app) = make_app(&[("weather.yaml", WEATHER)]);
    let (status, body) = get_json(app, "/specs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(
        body["specs_directory"],
        dir.path().display().to_string().as_str()
    );

    let spec = &body["specifications"][0];
    assert_eq!(spec["name"], "weather");
    assert_eq!(spec["file_name"], "weather.yaml");
    assert_eq!(spec["file_type"], ".yaml");
    assert_eq!(spec["json_url"], "/weather/openapi.json");
    assert_eq!(spec["size_bytes"], WEATHER.len() as u64);
}

#[tokio::test]
async fn refresh_picks_up_new_files() {
    let (dir, registry, app) = make_app(&[("weather.yaml", WEATHER)]);
    fs::write(dir.path().join("pets.json"), PETS).unwrap();
    fs::write(dir.path().join("broken.yaml"), "openapi: [").unwrap();

    let (status, _, body) = send(app, Method::POST, "/refresh").await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["added"], 1);
    assert_eq!(body["updated"], 0);
    assert_eq!(body["count"], 2);
    assert_eq!(body["failed"].as_array().unwrap().len(), 1);
    assert_eq!(registry.list(), vec!["pets", "weather"]);
}

// ---------------------------------------------------------------------------
// Single spec
// ---------------------------------------------------------------------------

#[tokio::test]
async fn json_endpoint_renders_yaml_source() {
    let (_dir, _, app) = make_app(&[("weather.yaml", WEATHER)]);
    let (status, resp, body) = send(app, Method::GET, "/weather/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(header_value(&resp, header::CONTENT_TYPE), "application/json");
    assert_eq!(
        header_value(&resp, header::CACHE_CONTROL),
        "public, max-age=3600"
    );

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["info"]["title"], "Weather API");
    assert!(body["paths"]["/forecast/{city}"]["get"].is_object());
}

#[tokio::test]
async fn yaml_endpoint_renders_json_source() {
    let (_dir, _, app) = make_app(&[("pets.json", PETS)]);
    let (status, resp, body) = send(app, Method::GET, "/pets/openapi.yaml").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(header_value(&resp, header::CONTENT_TYPE), "application/x-yaml");
    assert_eq!(
        header_value(&resp, header::CONTENT_DISPOSITION),
        "inline; filename=pets-openapi.yaml"
    );

    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("title: Pets"));
}

#[tokio::test]
async fn download_returns_original_bytes() {
    let (_dir, _, app) = make_app(&[("weather.yaml", WEATHER)]);
    let (status, resp, body) = send(app, Method::GET, "/weather/download").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        header_value(&resp, header::CONTENT_DISPOSITION),
        "attachment; filename=weather.yaml"
    );
    assert_eq!(body.as_ref(), WEATHER.as_bytes());
}

#[tokio::test]
async fn download_of_vanished_file_is_not_found() {
    let (dir, _, app) = make_app(&[("weather.yaml", WEATHER)]);
    fs::remove_file(dir.path().join("weather.yaml")).unwrap();
    let (status, body) = get_json(app, "/weather/download").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .starts_with("Specification file not found")
    );
}

#[tokio::test]
async fn info_summarizes_spec() {
    let (_dir, _, app) = make_app(&[("weather.yaml", WEATHER)]);
    let (status, body) = get_json(app, "/weather/info").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["spec_name"], "weather");
    assert_eq!(body["title"], "Weather API");
    assert_eq!(body["version"], "1.0.0");
    assert_eq!(body["endpoints"], 3);
    assert_eq!(
        body["endpoint_paths"],
        serde_json::json!(["/current", "/forecast/{city}", "/historical"])
    );
    assert_eq!(body["servers"], serde_json::json!(["https://weather.example.com"]));
    assert_eq!(body["file_info"]["type"], ".yaml");
    assert_eq!(body["urls"]["download"], "/weather/download");
}

#[tokio::test]
async fn info_summarizes_long_path_lists() {
    let mut spec = String::from("openapi: 3.0.0\npaths:\n");
    for i in 0..60 {
        spec.push_str(&format!("  /items{i}: {{}}\n"));
    }
    let (_dir, _, app) = make_app(&[("big.yaml", spec.as_str())]);
    let (_, body) = get_json(app, "/big/info").await;
    assert_eq!(body["endpoint_paths"], "60 endpoints (too many to list)");
}

#[tokio::test]
async fn unknown_slug_is_404() {
    let (_dir, _, app) = make_app(&[("weather.yaml", WEATHER)]);
    for uri in [
        "/nonexistent/openapi.json",
        "/nonexistent/openapi.yaml",
        "/nonexistent/download",
        "/nonexistent/info",
    ] {
        let (status, body) = get_json(app.clone(), uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["detail"], "Specification 'nonexistent' not found");
    }
}
