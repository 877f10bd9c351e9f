use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type PlaylistId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Inline playback is allowed; otherwise the viewer must deep-link.
    #[serde(default)]
    pub embed_allowed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistProgress {
    pub current_video_index: usize,
    pub total_videos: usize,
    pub last_watched: DateTime<Utc>,
}

impl PlaylistProgress {
    pub fn is_valid(&self) -> bool {
        self.total_videos > 0 && self.current_video_index < self.total_videos
    }

    /// Share of the playlist reached, counting the current video as watched.
    pub fn percent(&self) -> u8 {
        if self.total_videos == 0 {
            return 0;
        }
        let watched = (self.current_video_index + 1).min(self.total_videos) as f64;
        (watched / self.total_videos as f64 * 100.0).round() as u8
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: PlaylistId,
    pub title: String,
    /// Catalog membership order.
    #[serde(default)]
    pub videos: Vec<Video>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<PlaylistProgress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<DateTime<Utc>>,
}

impl Playlist {
    pub fn video(&self, index: usize) -> Option<&Video> {
        self.videos.get(index)
    }
}
