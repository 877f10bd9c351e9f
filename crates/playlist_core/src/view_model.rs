use chrono::{DateTime, Utc};

use crate::playlist::{Playlist, PlaylistId};
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub active_playlist_id: Option<PlaylistId>,
    pub has_credential: bool,
    pub favorites: Vec<PlaylistCardView>,
    pub recent: Vec<PlaylistCardView>,
    pub others: Vec<PlaylistCardView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistCardView {
    pub id: PlaylistId,
    pub title: String,
    pub video_count: usize,
    pub is_active: bool,
    pub is_favorite: bool,
    pub last_accessed: Option<DateTime<Utc>>,
    pub progress: Option<ProgressView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressView {
    pub percent: u8,
    /// One-based position, as shown to the user ("Video 3 of 12").
    pub position: usize,
    pub total: usize,
}

impl AppViewModel {
    pub(crate) fn project(state: &AppState) -> Self {
        let recent = state.recent_playlist_ids();
        let mut favorites = Vec::new();
        let mut recent_cards: Vec<(usize, PlaylistCardView)> = Vec::new();
        let mut others = Vec::new();

        for fav_id in state.favorite_playlist_ids() {
            if let Some(playlist) = state.playlist(fav_id) {
                favorites.push(card(state, playlist));
            }
        }

        for playlist in state.playlists() {
            if state.is_favorite(&playlist.id) {
                continue;
            }
            match recent.iter().position(|id| *id == playlist.id) {
                Some(rank) => recent_cards.push((rank, card(state, playlist))),
                None => others.push(card(state, playlist)),
            }
        }
        recent_cards.sort_by_key(|(rank, _)| *rank);

        Self {
            active_playlist_id: state.active_playlist_id().map(ToOwned::to_owned),
            has_credential: state.credential().is_some(),
            favorites,
            recent: recent_cards.into_iter().map(|(_, card)| card).collect(),
            others,
        }
    }

    pub fn playlist_count(&self) -> usize {
        self.favorites.len() + self.recent.len() + self.others.len()
    }

    /// All cards in display order: favorites, then recent, then the rest.
    pub fn cards(&self) -> impl Iterator<Item = &PlaylistCardView> {
        self.favorites
            .iter()
            .chain(self.recent.iter())
            .chain(self.others.iter())
    }
}

fn card(state: &AppState, playlist: &Playlist) -> PlaylistCardView {
    PlaylistCardView {
        id: playlist.id.clone(),
        title: playlist.title.clone(),
        video_count: playlist.videos.len(),
        is_active: state.active_playlist_id() == Some(playlist.id.as_str()),
        is_favorite: state.is_favorite(&playlist.id),
        last_accessed: playlist.last_accessed,
        progress: playlist.progress.as_ref().map(|progress| ProgressView {
            percent: progress.percent(),
            position: progress.current_video_index + 1,
            total: progress.total_videos,
        }),
    }
}
