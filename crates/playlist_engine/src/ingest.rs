use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;

use engine_logging::{engine_debug, engine_info};
use playlist_core::{Playlist, Video};
use tokio_util::sync::CancellationToken;

use crate::catalog::{CatalogClient, PlaylistEntry};
use crate::{FailureKind, IngestError};

/// Turns a playlist id into a complete, embeddability-annotated [`Playlist`].
///
/// Requests are strictly sequential: metadata first, then for every
/// membership page one page request followed by one batched embeddability
/// lookup for that page's videos. Any failure discards everything gathered
/// so far.
#[derive(Clone)]
pub struct IngestPipeline {
    client: Arc<dyn CatalogClient>,
    max_pages: usize,
}

impl IngestPipeline {
    pub fn new(client: Arc<dyn CatalogClient>, max_pages: usize) -> Self {
        Self { client, max_pages }
    }

    pub async fn ingest(
        &self,
        playlist_id: &str,
        credential: &str,
        cancel: &CancellationToken,
    ) -> Result<Playlist, IngestError> {
        let metadata = guarded(cancel, self.client.playlist_metadata(playlist_id, credential))
            .await?
            .ok_or_else(|| {
                IngestError::new(FailureKind::NotFound, format!("playlist {playlist_id} not found"))
            })?;

        let mut videos = Vec::new();
        let mut page_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();
        let mut pages = 0usize;

        loop {
            if pages >= self.max_pages {
                return Err(IngestError::malformed(format!(
                    "pagination exceeded {} pages",
                    self.max_pages
                )));
            }
            let page = guarded(
                cancel,
                self.client
                    .playlist_page(playlist_id, credential, page_token.as_deref()),
            )
            .await?;
            pages += 1;

            let next_token = page.next_page_token.filter(|token| !token.is_empty());
            if page.entries.is_empty() && next_token.is_some() {
                return Err(IngestError::malformed(format!(
                    "empty membership page {pages} still carries a continuation token"
                )));
            }

            if !page.entries.is_empty() {
                let ids = unique_ids(&page.entries);
                let embeddable =
                    guarded(cancel, self.client.embeddability(&ids, credential)).await?;
                engine_debug!(
                    "Page {} of {}: {} entries, {} embeddability results",
                    pages,
                    playlist_id,
                    page.entries.len(),
                    embeddable.len()
                );
                videos.extend(join_page(page.entries, &embeddable));
            }

            match next_token {
                None => break,
                Some(token) => {
                    if !seen_tokens.insert(token.clone()) {
                        return Err(IngestError::malformed(format!(
                            "continuation token repeated after page {pages}"
                        )));
                    }
                    page_token = Some(token);
                }
            }
        }

        engine_info!(
            "Ingested playlist {} with {} videos over {} pages",
            playlist_id,
            videos.len(),
            pages
        );

        Ok(Playlist {
            id: playlist_id.to_string(),
            title: metadata.title,
            videos,
            thumbnail: metadata.thumbnail_url,
            description: metadata.description,
            progress: None,
            last_accessed: None,
        })
    }
}

async fn guarded<T, F>(cancel: &CancellationToken, call: F) -> Result<T, IngestError>
where
    F: Future<Output = Result<T, IngestError>>,
{
    if cancel.is_cancelled() {
        return Err(IngestError::new(FailureKind::Cancelled, "ingestion cancelled"));
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(IngestError::new(FailureKind::Cancelled, "ingestion cancelled")),
        result = call => result,
    }
}

fn unique_ids(entries: &[PlaylistEntry]) -> Vec<String> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .filter(|entry| seen.insert(entry.video_id.as_str()))
        .map(|entry| entry.video_id.clone())
        .collect()
}

/// Entries without an embeddability answer are treated as not embeddable.
fn join_page(entries: Vec<PlaylistEntry>, embeddable: &HashMap<String, bool>) -> Vec<Video> {
    entries
        .into_iter()
        .map(|entry| Video {
            embed_allowed: embeddable.get(&entry.video_id).copied().unwrap_or(false),
            id: entry.video_id,
            title: entry.title,
            thumbnail: entry.thumbnail_url,
            description: entry.description,
        })
        .collect()
}
