use std::collections::HashMap;
use std::time::Duration;

use engine_logging::{engine_debug, engine_warn};
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::catalog::{CatalogClient, PlaylistEntry, PlaylistMetadata, PlaylistPage};
use crate::{FailureKind, IngestError};

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

#[derive(Debug, Clone)]
pub struct CatalogSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Membership page size; the catalog caps it at 50.
    pub page_size: u32,
    /// Pagination ceiling; a continuation chain longer than this is malformed.
    pub max_pages: usize,
    pub max_response_bytes: u64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            page_size: 50,
            max_pages: 200,
            max_response_bytes: 5 * 1024 * 1024,
        }
    }
}

/// [`CatalogClient`] over the YouTube Data API v3.
#[derive(Debug, Clone)]
pub struct YouTubeCatalogClient {
    settings: CatalogSettings,
    http: reqwest::Client,
}

impl YouTubeCatalogClient {
    pub fn new(settings: CatalogSettings) -> Result<Self, IngestError> {
        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| IngestError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, http })
    }

    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    fn endpoint(&self, resource: &str, params: &[(&str, &str)]) -> Result<Url, IngestError> {
        let base = self.settings.base_url.trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/{resource}"))
            .map_err(|err| IngestError::new(FailureKind::InvalidUrl, err.to_string()))?;
        url.query_pairs_mut().extend_pairs(params.iter().copied());
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, IngestError> {
        engine_debug!("GET {}{}", url.origin().ascii_serialization(), url.path());
        let response = self.http.get(url).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_response_bytes {
                return Err(IngestError::malformed(format!(
                    "response too large ({content_len} bytes)"
                )));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_response_bytes {
                return Err(IngestError::malformed(format!(
                    "response too large (over {} bytes)",
                    self.settings.max_response_bytes
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        if !status.is_success() {
            return Err(map_status(status.as_u16(), &bytes));
        }

        serde_json::from_slice(&bytes).map_err(|err| IngestError::malformed(err.to_string()))
    }
}

#[async_trait::async_trait]
impl CatalogClient for YouTubeCatalogClient {
    async fn playlist_metadata(
        &self,
        playlist_id: &str,
        credential: &str,
    ) -> Result<Option<PlaylistMetadata>, IngestError> {
        let url = self.endpoint(
            "playlists",
            &[("part", "snippet"), ("id", playlist_id), ("key", credential)],
        )?;
        let body: ListResponse<PlaylistResource> = self.get_json(url).await?;

        Ok(body.items.into_iter().next().map(|item| PlaylistMetadata {
            title: item.snippet.title,
            description: non_empty(item.snippet.description),
            thumbnail_url: item.snippet.thumbnails.high.map(|thumb| thumb.url),
        }))
    }

    async fn playlist_page(
        &self,
        playlist_id: &str,
        credential: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistPage, IngestError> {
        let page_size = self.settings.page_size.min(50).to_string();
        let mut params = vec![
            ("part", "snippet,contentDetails"),
            ("maxResults", page_size.as_str()),
            ("playlistId", playlist_id),
            ("key", credential),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }
        let url = self.endpoint("playlistItems", &params)?;
        let body: ListResponse<PlaylistItemResource> = self.get_json(url).await?;

        let entries = body
            .items
            .into_iter()
            .map(PlaylistItemResource::into_entry)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PlaylistPage {
            entries,
            next_page_token: body.next_page_token,
        })
    }

    async fn embeddability(
        &self,
        video_ids: &[String],
        credential: &str,
    ) -> Result<HashMap<String, bool>, IngestError> {
        let ids = video_ids.join(",");
        let url = self.endpoint(
            "videos",
            &[("part", "status"), ("id", ids.as_str()), ("key", credential)],
        )?;
        let body: ListResponse<VideoResource> = self.get_json(url).await?;

        Ok(body
            .items
            .into_iter()
            .filter_map(|video| {
                let embeddable = video.status.and_then(|status| status.embeddable)?;
                Some((video.id, embeddable))
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistResource {
    snippet: PlaylistSnippet,
}

#[derive(Debug, Deserialize)]
struct PlaylistSnippet {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    default: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    high: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct PlaylistItemResource {
    snippet: PlaylistItemSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemSnippet {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    thumbnails: Thumbnails,
    resource_id: ResourceId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    #[serde(default)]
    video_id: Option<String>,
}

impl PlaylistItemResource {
    fn into_entry(self) -> Result<PlaylistEntry, IngestError> {
        let snippet = self.snippet;
        let video_id = snippet
            .resource_id
            .video_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| IngestError::malformed("playlist item without video id"))?;
        let Thumbnails {
            default,
            medium,
            high,
        } = snippet.thumbnails;
        let thumbnail_url = medium
            .or(default)
            .or(high)
            .map(|thumb| thumb.url)
            .ok_or_else(|| IngestError::malformed(format!("video {video_id} has no thumbnail")))?;

        Ok(PlaylistEntry {
            video_id,
            title: snippet.title,
            thumbnail_url,
            description: non_empty(snippet.description),
        })
    }
}

#[derive(Debug, Deserialize)]
struct VideoResource {
    id: String,
    #[serde(default)]
    status: Option<VideoStatus>,
}

#[derive(Debug, Deserialize)]
struct VideoStatus {
    #[serde(default)]
    embeddable: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    reason: Option<String>,
}

const RATE_LIMIT_REASONS: &[&str] = &["quotaExceeded", "rateLimitExceeded", "userRateLimitExceeded"];

fn map_status(code: u16, body: &[u8]) -> IngestError {
    let envelope: ErrorEnvelope = serde_json::from_slice(body).unwrap_or_default();
    let message = envelope
        .error
        .message
        .clone()
        .unwrap_or_else(|| format!("catalog responded with status {code}"));
    let rate_limited = envelope.error.errors.iter().any(|detail| {
        detail
            .reason
            .as_deref()
            .is_some_and(|reason| RATE_LIMIT_REASONS.contains(&reason))
    });

    let kind = match code {
        404 => FailureKind::NotFound,
        429 => FailureKind::RateLimited,
        403 if rate_limited => FailureKind::RateLimited,
        other => FailureKind::HttpStatus(other),
    };
    engine_warn!("Catalog request failed: {} ({})", kind, message);
    IngestError::new(kind, message)
}

/// The request URL carries the credential, so it never reaches the message.
fn map_reqwest_error(err: reqwest::Error) -> IngestError {
    let kind = if err.is_timeout() {
        FailureKind::Timeout
    } else {
        FailureKind::Network
    };
    IngestError::new(kind, err.without_url().to_string())
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|value| !value.trim().is_empty())
}
