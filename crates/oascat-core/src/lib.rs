pub mod config;
pub mod convert;
pub mod document;
pub mod error;
pub mod load;
pub mod metadata;
pub mod normalize;
pub mod registry;
pub mod slug;

pub use convert::render;
pub use document::Document;
pub use load::{SourceFormat, load_document};
pub use metadata::{DerivedMetadata, extract};
pub use normalize::{SpecRecord, normalize};
pub use registry::{CatalogEntry, Registry, ScanReport};
