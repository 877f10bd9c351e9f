use std::collections::HashMap;

use crate::IngestError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistMetadata {
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub video_id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlaylistPage {
    pub entries: Vec<PlaylistEntry>,
    pub next_page_token: Option<String>,
}

/// The three catalog operations ingestion is built from.
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// `Ok(None)` when the catalog reports no playlist with this id.
    async fn playlist_metadata(
        &self,
        playlist_id: &str,
        credential: &str,
    ) -> Result<Option<PlaylistMetadata>, IngestError>;

    async fn playlist_page(
        &self,
        playlist_id: &str,
        credential: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistPage, IngestError>;

    /// Batched lookup; ids the catalog does not know are simply absent.
    async fn embeddability(
        &self,
        video_ids: &[String],
        credential: &str,
    ) -> Result<HashMap<String, bool>, IngestError>;
}
