//! Playlist viewer core: domain model, pure reducer, view-model projection
//! and the write-through state store.
mod action;
mod effect;
mod links;
mod playlist;
mod state;
mod storage;
mod store;
mod update;
mod view_model;

pub use action::Action;
pub use effect::{Effect, Rejection};
pub use links::{extract_playlist_id, playback_target, watch_url, PlaybackTarget};
pub use playlist::{Playlist, PlaylistId, PlaylistProgress, Video};
pub use state::{update_recency, AppConfig, AppState, RECENT_LIMIT};
pub use storage::{KeyValueStore, MemoryStore, StorageError, CREDENTIAL_KEY, STATE_KEY};
pub use store::{system_clock, Clock, Store};
pub use update::update;
pub use view_model::{AppViewModel, PlaylistCardView, ProgressView};
