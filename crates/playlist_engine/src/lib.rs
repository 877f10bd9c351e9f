//! Playlist engine: catalog client, ingestion pipeline and durable storage.
mod catalog;
mod engine;
mod fetch;
mod filename;
mod ingest;
mod persist;
mod request;
mod types;

pub use catalog::{CatalogClient, PlaylistEntry, PlaylistMetadata, PlaylistPage};
pub use engine::EngineHandle;
pub use fetch::{CatalogSettings, YouTubeCatalogClient, DEFAULT_API_BASE};
pub use filename::storage_filename;
pub use ingest::IngestPipeline;
pub use persist::{ensure_storage_dir, AtomicFileWriter, FileStore, PersistError};
pub use request::IngestRequest;
pub use types::{EngineEvent, FailureKind, IngestError, RequestId};
