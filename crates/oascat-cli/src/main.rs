use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use oascat_core::config::{self, CONFIG_FILE_NAME, CatalogConfig};
use oascat_core::registry::ScanReport;
use oascat_core::{CatalogEntry, Registry, SourceFormat, load_document, normalize, render};

#[derive(Parser)]
#[command(name = "oascat", about = "OpenAPI spec catalog server", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the specs directory and serve the catalog over HTTP
    Serve {
        /// Directory holding OpenAPI specs (YAML or JSON)
        #[arg(short, long, env = "OASCAT_SPECS_DIR")]
        dir: Option<PathBuf>,

        /// Address to bind
        #[arg(long, env = "OASCAT_HOST")]
        host: Option<String>,

        /// Port to bind
        #[arg(short, long, env = "OASCAT_PORT")]
        port: Option<u16>,

        /// Externally visible base URL used in catalog links
        #[arg(long)]
        public_url: Option<String>,
    },

    /// Scan the specs directory once and print the catalog
    Scan {
        /// Directory holding OpenAPI specs
        #[arg(short, long, env = "OASCAT_SPECS_DIR")]
        dir: Option<PathBuf>,
    },

    /// Show the catalog entry for one spec
    Inspect {
        /// Directory holding OpenAPI specs
        #[arg(short, long, env = "OASCAT_SPECS_DIR")]
        dir: Option<PathBuf>,

        /// Slug of the spec to inspect
        #[arg(short, long)]
        slug: String,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: OutputFormat,
    },

    /// Convert a single spec file between JSON and YAML
    Convert {
        /// Path to the OpenAPI spec file
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "json")]
        format: OutputFormat,
    },

    /// Initialize a new oascat configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

impl From<OutputFormat> for SourceFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Yaml => SourceFormat::Yaml,
            OutputFormat::Json => SourceFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            dir,
            host,
            port,
            public_url,
        } => cmd_serve(dir, host, port, public_url),

        Commands::Scan { dir } => cmd_scan(dir),

        Commands::Inspect { dir, slug, format } => cmd_inspect(dir, slug, format),

        Commands::Convert { input, format } => cmd_convert(input, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "oascat", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<CatalogConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

fn build_registry(dir: Option<PathBuf>, cfg: &CatalogConfig) -> Registry {
    let dir = dir.unwrap_or_else(|| PathBuf::from(&cfg.specs_dir));
    Registry::new(dir).with_max_files(cfg.scan.max_files)
}

fn print_report(report: &ScanReport) {
    eprintln!(
        "Scanned: {} added, {} updated, {} removed, {} skipped, {} failed",
        report.added,
        report.updated,
        report.removed,
        report.skipped,
        report.failed.len()
    );
    for failure in &report.failed {
        eprintln!("  failed {}: {}", failure.path.display(), failure.error);
    }
}

fn cmd_serve(
    dir: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    public_url: Option<String>,
) -> Result<()> {
    let mut cfg = try_load_config()?.unwrap_or_default();
    if let Some(host) = host {
        cfg.server.host = host;
    }
    if let Some(port) = port {
        cfg.server.port = port;
    }
    if public_url.is_some() {
        cfg.server.public_url = public_url;
    }

    let registry = build_registry(dir, &cfg);
    match registry.refresh() {
        Ok(report) => print_report(&report),
        Err(e) => log::error!("initial scan failed, serving an empty catalog: {e}"),
    }

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime
        .block_on(oascat_server::serve(Arc::new(registry), &cfg.server))
        .with_context(|| format!("failed to serve on {}:{}", cfg.server.host, cfg.server.port))?;
    Ok(())
}

fn cmd_scan(dir: Option<PathBuf>) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let registry = build_registry(dir, &cfg);
    let report = registry
        .refresh()
        .with_context(|| format!("failed to scan {}", registry.root().display()))?;

    print_report(&report);

    let snapshot = registry.snapshot();
    if snapshot.is_empty() {
        eprintln!("No OpenAPI specifications found in {}", registry.root().display());
        return Ok(());
    }

    for entry in snapshot.entries() {
        println!(
            "{}\t{}\t{}\t[{}]",
            entry.record.slug,
            entry.record.title,
            entry.record.version,
            entry.metadata.tags.iter().cloned().collect::<Vec<_>>().join(", ")
        );
    }
    Ok(())
}

fn cmd_inspect(dir: Option<PathBuf>, slug: String, format: OutputFormat) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let registry = build_registry(dir, &cfg);
    registry
        .refresh()
        .with_context(|| format!("failed to scan {}", registry.root().display()))?;

    let entry = registry.get(&slug)?;
    let summary = build_inspect_summary(&entry);

    match format {
        OutputFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_inspect_summary(entry: &CatalogEntry) -> serde_json::Value {
    let record = &entry.record;

    let paths: Vec<serde_json::Value> = record
        .paths
        .iter()
        .map(|(path, item)| {
            serde_json::json!({
                "path": path,
                "operations": item.operations,
            })
        })
        .collect();

    serde_json::json!({
        "slug": record.slug,
        "name": record.title,
        "version": record.version,
        "dialect": record.dialect,
        "spec_version": record.spec_version,
        "source": record.source_path.display().to_string(),
        "tags": entry.metadata.tags,
        "capabilities": entry.metadata.capabilities,
        "base_url": entry.metadata.base_url,
        "description": entry.metadata.description,
        "servers": record.servers,
        "paths": paths,
    })
}

fn cmd_convert(input: PathBuf, format: OutputFormat) -> Result<()> {
    let (document, source_format) = load_document(&input)?;
    let record = normalize(document, &input, source_format)?;

    let output = render(&record.raw_document, format.into())?;
    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }

    eprintln!(
        "Converted {} ({} {}, {} paths) to {}",
        input.display(),
        record.title,
        record.version,
        record.paths.len(),
        SourceFormat::from(format)
    );
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
