use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::playlist::{Playlist, PlaylistId, PlaylistProgress};
use crate::view_model::AppViewModel;

/// Upper bound on the "recently viewed" list.
pub const RECENT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub credential: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    playlists: Vec<Playlist>,
    #[serde(default)]
    active_playlist_id: Option<PlaylistId>,
    #[serde(default)]
    config: AppConfig,
    #[serde(default)]
    recent_playlist_ids: Vec<PlaylistId>,
    #[serde(default)]
    favorite_playlist_ids: Vec<PlaylistId>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    pub fn playlist(&self, id: &str) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.playlist(id).is_some()
    }

    pub fn active_playlist_id(&self) -> Option<&str> {
        self.active_playlist_id.as_deref()
    }

    pub fn active_playlist(&self) -> Option<&Playlist> {
        self.active_playlist_id().and_then(|id| self.playlist(id))
    }

    pub fn credential(&self) -> Option<&str> {
        self.config.credential.as_deref()
    }

    pub fn recent_playlist_ids(&self) -> &[PlaylistId] {
        &self.recent_playlist_ids
    }

    pub fn favorite_playlist_ids(&self) -> &[PlaylistId] {
        &self.favorite_playlist_ids
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorite_playlist_ids.iter().any(|fav| fav == id)
    }

    /// Read-side projection for collaborators; recomputed on every call.
    pub fn view(&self) -> AppViewModel {
        AppViewModel::project(self)
    }

    pub(crate) fn set_credential(&mut self, credential: Option<String>) {
        self.config.credential = credential;
    }

    pub(crate) fn upsert_playlist(&mut self, playlist: Playlist) {
        match self.playlists.iter_mut().find(|p| p.id == playlist.id) {
            Some(existing) => *existing = playlist,
            None => self.playlists.push(playlist),
        }
    }

    /// Drops the playlist and every reference to it. Returns whether it existed.
    pub(crate) fn remove_playlist(&mut self, id: &str) -> bool {
        let before = self.playlists.len();
        self.playlists.retain(|p| p.id != id);
        self.recent_playlist_ids.retain(|recent| recent != id);
        self.favorite_playlist_ids.retain(|fav| fav != id);
        let removed = self.playlists.len() != before;

        if self.active_playlist_id.as_deref() == Some(id) {
            self.active_playlist_id = self.playlists.first().map(|p| p.id.clone());
        }
        removed
    }

    pub(crate) fn set_active(&mut self, id: &str) {
        self.active_playlist_id = Some(id.to_string());
    }

    pub(crate) fn activate_if_none(&mut self, id: &str) {
        if self.active_playlist_id.is_none() {
            self.set_active(id);
        }
    }

    pub(crate) fn touch(&mut self, id: &str, now: DateTime<Utc>) {
        if let Some(playlist) = self.playlists.iter_mut().find(|p| p.id == id) {
            playlist.last_accessed = Some(now);
        }
    }

    pub(crate) fn set_progress(&mut self, id: &str, progress: PlaylistProgress) -> bool {
        match self.playlists.iter_mut().find(|p| p.id == id) {
            Some(playlist) => {
                playlist.progress = Some(progress);
                true
            }
            None => false,
        }
    }

    pub(crate) fn push_recent(&mut self, id: &str) {
        self.recent_playlist_ids = update_recency(&self.recent_playlist_ids, id);
    }

    pub(crate) fn toggle_favorite(&mut self, id: &str) {
        if self.is_favorite(id) {
            self.favorite_playlist_ids.retain(|fav| fav != id);
        } else {
            self.favorite_playlist_ids.push(id.to_string());
        }
    }

    /// Repairs a snapshot that came from outside the reducer: duplicate
    /// playlists collapse to the last occurrence in place, dangling ids are
    /// dropped, and recency is deduplicated and bounded.
    pub(crate) fn normalized(mut self) -> Self {
        let mut seen = HashSet::new();
        let mut playlists: Vec<Playlist> = Vec::with_capacity(self.playlists.len());
        for playlist in self.playlists.drain(..) {
            if seen.insert(playlist.id.clone()) {
                playlists.push(playlist);
            } else if let Some(slot) = playlists.iter_mut().find(|p| p.id == playlist.id) {
                *slot = playlist;
            }
        }
        self.playlists = playlists;

        let known: HashSet<&str> = self.playlists.iter().map(|p| p.id.as_str()).collect();
        let keep = |ids: &[PlaylistId]| -> Vec<PlaylistId> {
            let mut seen = HashSet::new();
            ids.iter()
                .filter(|id| known.contains(id.as_str()) && seen.insert(id.as_str()))
                .cloned()
                .collect()
        };
        let mut recent = keep(&self.recent_playlist_ids);
        recent.truncate(RECENT_LIMIT);
        let favorites = keep(&self.favorite_playlist_ids);

        let active = self
            .active_playlist_id
            .take()
            .filter(|id| known.contains(id.as_str()));

        self.recent_playlist_ids = recent;
        self.favorite_playlist_ids = favorites;
        self.active_playlist_id = active;
        self
    }
}

/// Moves `id` to the front of the recency list, evicting entries beyond
/// [`RECENT_LIMIT`].
pub fn update_recency(recent: &[PlaylistId], id: &str) -> Vec<PlaylistId> {
    std::iter::once(id.to_string())
        .chain(recent.iter().filter(|existing| *existing != id).cloned())
        .take(RECENT_LIMIT)
        .collect()
}
