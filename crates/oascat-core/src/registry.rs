use std::collections::{BTreeMap, BinaryHeap};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::UNIX_EPOCH;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use serde::Serialize;

use crate::error::{FileError, LoadError, RegistryError};
use crate::load::{SourceFormat, load_document};
use crate::metadata::{DerivedMetadata, extract};
use crate::normalize::{SpecRecord, normalize};

/// Upper bound on spec files considered by one scan.
pub const DEFAULT_MAX_FILES: usize = 1000;

/// Size and modification time of a spec file when it was scanned.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FileStats {
    pub size_bytes: u64,
    /// Seconds since the Unix epoch.
    pub modified: Option<f64>,
}

/// A record together with its derived metadata.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub record: SpecRecord,
    pub metadata: DerivedMetadata,
    pub file: FileStats,
}

impl CatalogEntry {
    /// Load, normalize and describe one spec file.
    pub fn from_file(path: &Path) -> Result<Self, FileError> {
        let (document, format) = load_document(path)?;
        let stats = fs::metadata(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let record = normalize(document, path, format)?;
        let metadata = extract(&record);

        Ok(Self {
            record,
            metadata,
            file: FileStats {
                size_bytes: stats.len(),
                modified: stats
                    .modified()
                    .ok()
                    .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                    .map(|d| d.as_secs_f64()),
            },
        })
    }

    /// Whether the content differs; file statistics are ignored.
    fn content_differs(&self, other: &CatalogEntry) -> bool {
        self.record != other.record || self.metadata != other.metadata
    }
}

/// An immutable view of the catalog as published by one scan.
#[derive(Debug, Default)]
pub struct Snapshot {
    entries: BTreeMap<String, Arc<CatalogEntry>>,
    directory: Option<PathBuf>,
}

impl Snapshot {
    pub fn get(&self, slug: &str) -> Option<&Arc<CatalogEntry>> {
        self.entries.get(slug)
    }

    /// Slugs in ascending order.
    pub fn slugs(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Entries in slug order.
    pub fn entries(&self) -> impl Iterator<Item = &Arc<CatalogEntry>> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Directory the snapshot was scanned from, if any scan has run.
    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }
}

/// A file that could not be added to the catalog.
#[derive(Debug)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub error: FileError,
}

/// Outcome of one scan, relative to the snapshot it replaced.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    /// Files beyond the `max_files` cap.
    pub skipped: usize,
    pub failed: Vec<ScanFailure>,
}

/// Catalog of every spec found in a directory, keyed by slug.
///
/// Readers load the current snapshot without locking. Scans are serialized
/// and publish their result with a single pointer swap, so a reader sees
/// either the whole previous catalog or the whole new one.
pub struct Registry {
    root: PathBuf,
    max_files: usize,
    snapshot: ArcSwap<Snapshot>,
    writer: Mutex<()>,
}

impl Registry {
    /// An empty registry rooted at `root`. Nothing is read until a scan.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_files: DEFAULT_MAX_FILES,
            snapshot: ArcSwap::from_pointee(Snapshot::default()),
            writer: Mutex::new(()),
        }
    }

    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    /// Create a registry and populate it from `root`.
    pub fn init(root: impl Into<PathBuf>) -> Result<(Self, ScanReport), RegistryError> {
        let registry = Self::new(root);
        let report = registry.refresh()?;
        Ok((registry, report))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Rescan the configured root.
    pub fn refresh(&self) -> Result<ScanReport, RegistryError> {
        self.scan(&self.root)
    }

    /// Rebuild the catalog from `directory` and publish it.
    ///
    /// Files are visited in file-name order, so when two files share a slug
    /// the later name wins. Per-file failures land in the report. A missing
    /// directory yields an empty catalog; any other directory error aborts
    /// the scan and leaves the current snapshot in place.
    pub fn scan(&self, directory: &Path) -> Result<ScanReport, RegistryError> {
        let _writer = self.writer.lock();
        log::info!("scanning {} for OpenAPI specs", directory.display());

        let mut report = ScanReport::default();
        let listing = list_spec_files(directory, self.max_files)?;

        if listing.found > listing.files.len() {
            report.skipped = listing.found - listing.files.len();
            log::warn!(
                "{} holds {} spec files; only the first {} are catalogued",
                directory.display(),
                listing.found,
                self.max_files
            );
        }

        let mut entries: BTreeMap<String, Arc<CatalogEntry>> = BTreeMap::new();
        for path in listing.files {
            match CatalogEntry::from_file(&path) {
                Ok(entry) => {
                    let slug = entry.record.slug.clone();
                    if let Some(previous) = entries.get(&slug) {
                        log::warn!(
                            "{} and {} share slug '{}'; keeping {}",
                            previous.record.source_path.display(),
                            path.display(),
                            slug,
                            path.display()
                        );
                    }
                    entries.insert(slug, Arc::new(entry));
                }
                Err(error) => {
                    log::warn!("skipping {}: {}", path.display(), error);
                    report.failed.push(ScanFailure { path, error });
                }
            }
        }

        let previous = self.snapshot.load_full();
        for (slug, entry) in &entries {
            match previous.get(slug) {
                None => report.added += 1,
                Some(old) if old.content_differs(entry) => report.updated += 1,
                Some(_) => {}
            }
        }
        report.removed = previous
            .entries
            .keys()
            .filter(|slug| !entries.contains_key(*slug))
            .count();

        let total = entries.len();
        self.snapshot.store(Arc::new(Snapshot {
            entries,
            directory: Some(directory.to_path_buf()),
        }));

        log::info!(
            "catalogued {} specs ({} added, {} updated, {} removed, {} failed)",
            total,
            report.added,
            report.updated,
            report.removed,
            report.failed.len()
        );
        Ok(report)
    }

    pub fn get(&self, slug: &str) -> Result<Arc<CatalogEntry>, RegistryError> {
        self.snapshot
            .load()
            .get(slug)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(slug.to_string()))
    }

    /// Slugs in ascending order.
    pub fn list(&self) -> Vec<String> {
        self.snapshot.load().slugs()
    }

    /// The current snapshot, for callers that need several consistent reads.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.load_full()
    }
}

/// Spec files found in one directory listing.
struct Listing {
    /// At most `limit` paths, sorted by file name.
    files: Vec<PathBuf>,
    /// Spec files seen in total, including those past the limit.
    found: usize,
}

/// `.json`, `.yaml` and `.yml` files directly inside `directory`.
///
/// Only the `limit` smallest file names are kept while the directory is
/// read, so a huge directory costs memory proportional to the limit and the
/// cut is the same on every scan.
fn list_spec_files(directory: &Path, limit: usize) -> Result<Listing, RegistryError> {
    let read_dir = match fs::read_dir(directory) {
        Ok(read_dir) => read_dir,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("specs directory not found: {}", directory.display());
            return Ok(Listing {
                files: Vec::new(),
                found: 0,
            });
        }
        Err(source) => {
            return Err(RegistryError::Directory {
                path: directory.to_path_buf(),
                source,
            });
        }
    };

    let mut kept: BinaryHeap<(OsString, PathBuf)> = BinaryHeap::new();
    let mut found = 0;
    for entry in read_dir {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                log::warn!("unreadable entry in {}: {}", directory.display(), e);
                continue;
            }
        };
        if SourceFormat::from_path(&path).is_none() || !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().map(OsStr::to_os_string) else {
            continue;
        };

        found += 1;
        kept.push((name, path));
        if kept.len() > limit {
            kept.pop();
        }
    }

    let files = kept
        .into_sorted_vec()
        .into_iter()
        .map(|(_, path)| path)
        .collect();
    Ok(Listing { files, found })
}
