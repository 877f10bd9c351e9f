use thiserror::Error;

use crate::playlist::PlaylistId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// State changed; write the snapshot through to durable storage.
    Persist,
    /// Action violated a precondition and was ignored.
    Rejected(Rejection),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("credential is blank")]
    EmptyCredential,
    #[error("unknown playlist {0}")]
    UnknownPlaylist(PlaylistId),
    #[error("invalid progress for {playlist_id}: index {current_video_index} of {total_videos}")]
    InvalidProgress {
        playlist_id: PlaylistId,
        current_video_index: usize,
        total_videos: usize,
    },
}
