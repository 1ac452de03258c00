use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::registry::DEFAULT_MAX_FILES;

/// Top-level project configuration loaded from `.oascat.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub specs_dir: String,
    pub scan: ScanConfig,
    pub server: ServerConfig,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            specs_dir: "specs".to_string(),
            scan: ScanConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

/// Directory scan limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub max_files: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

/// HTTP listener options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Externally visible base URL used in catalog links. Defaults to
    /// `http://{host}:{port}`.
    pub public_url: Option<String>,
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
            public_url: None,
            cors: true,
        }
    }
}

impl ServerConfig {
    /// Base URL for absolute links, without a trailing slash.
    pub fn public_url(&self) -> String {
        match &self.public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}:{}", self.host, self.port),
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".oascat.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<CatalogConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: CatalogConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# oascat configuration
specs_dir: specs        # directory holding .yaml/.yml/.json OpenAPI files

scan:
  max_files: 1000       # files beyond this cap are skipped

server:
  host: 0.0.0.0
  port: 8001
  # public_url: https://specs.example.com   # base for catalog links
  cors: true
"#
}
