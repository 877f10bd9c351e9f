use crate::playlist::{Playlist, PlaylistId, PlaylistProgress};
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// User saved a catalog API key.
    SetCredential(String),
    /// Ingestion finished; record the playlist (replacing one with the same id).
    AddPlaylist(Playlist),
    /// User removed a playlist from the library.
    RemovePlaylist(PlaylistId),
    /// User opened a playlist.
    SetActivePlaylist(PlaylistId),
    /// User toggled the favorite marker on a playlist.
    ToggleFavorite(PlaylistId),
    /// Player reported a new watch position.
    UpdateProgress {
        playlist_id: PlaylistId,
        progress: PlaylistProgress,
    },
    /// Replace the whole state with a persisted snapshot.
    LoadState(Box<AppState>),
}
