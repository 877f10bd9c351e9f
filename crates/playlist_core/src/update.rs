use chrono::{DateTime, Utc};

use crate::{Action, AppState, Effect, Rejection};

/// Pure update function: applies an action to state and returns any effects.
///
/// `now` stamps `last_accessed` when a playlist is activated. Actions that
/// violate a precondition return the state untouched with a single
/// [`Effect::Rejected`]; every other action returns [`Effect::Persist`].
pub fn update(mut state: AppState, action: Action, now: DateTime<Utc>) -> (AppState, Vec<Effect>) {
    let effects = match action {
        Action::SetCredential(raw) => {
            let key = raw.trim();
            if key.is_empty() {
                return reject(state, Rejection::EmptyCredential);
            }
            state.set_credential(Some(key.to_string()));
            vec![Effect::Persist]
        }
        Action::AddPlaylist(playlist) => {
            let id = playlist.id.clone();
            state.upsert_playlist(playlist);
            state.activate_if_none(&id);
            state.push_recent(&id);
            vec![Effect::Persist]
        }
        Action::RemovePlaylist(id) => {
            if state.remove_playlist(&id) {
                vec![Effect::Persist]
            } else {
                Vec::new()
            }
        }
        Action::SetActivePlaylist(id) => {
            if !state.contains(&id) {
                return reject(state, Rejection::UnknownPlaylist(id));
            }
            state.set_active(&id);
            state.touch(&id, now);
            state.push_recent(&id);
            vec![Effect::Persist]
        }
        Action::ToggleFavorite(id) => {
            if !state.contains(&id) {
                return reject(state, Rejection::UnknownPlaylist(id));
            }
            state.toggle_favorite(&id);
            vec![Effect::Persist]
        }
        Action::UpdateProgress {
            playlist_id,
            progress,
        } => {
            if !progress.is_valid() {
                return reject(
                    state,
                    Rejection::InvalidProgress {
                        playlist_id,
                        current_video_index: progress.current_video_index,
                        total_videos: progress.total_videos,
                    },
                );
            }
            if !state.set_progress(&playlist_id, progress) {
                return reject(state, Rejection::UnknownPlaylist(playlist_id));
            }
            vec![Effect::Persist]
        }
        Action::LoadState(snapshot) => {
            state = (*snapshot).normalized();
            vec![Effect::Persist]
        }
    };

    (state, effects)
}

fn reject(state: AppState, rejection: Rejection) -> (AppState, Vec<Effect>) {
    (state, vec![Effect::Rejected(rejection)])
}
