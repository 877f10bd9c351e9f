use chrono::{TimeZone, Utc};
use playlist_core::{update, Action, AppState, Playlist, PlaylistProgress};

fn playlist(id: &str, videos: usize) -> Playlist {
    Playlist {
        id: id.to_string(),
        title: format!("Playlist {id}"),
        videos: (0..videos)
            .map(|i| playlist_core::Video {
                id: format!("{id}-{i}"),
                title: format!("Video {i}"),
                thumbnail: format!("https://img.example/{id}/{i}.jpg"),
                description: None,
                embed_allowed: true,
            })
            .collect(),
        thumbnail: None,
        description: None,
        progress: None,
        last_accessed: None,
    }
}

fn apply(state: AppState, action: Action) -> AppState {
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    update(state, action, now).0
}

fn ids(cards: &[playlist_core::PlaylistCardView]) -> Vec<&str> {
    cards.iter().map(|card| card.id.as_str()).collect()
}

#[test]
fn cards_partition_into_favorites_recent_and_others() {
    let mut state = AppState::new();
    for id in ["A", "B", "C", "D"] {
        state = apply(state, Action::AddPlaylist(playlist(id, 3)));
    }
    // Add order puts all four in recency; rebuild from a snapshot without D.
    let mut raw: serde_json::Value = serde_json::from_str(&state.to_json().unwrap()).unwrap();
    raw["recentPlaylistIds"] = serde_json::json!(["B", "A", "C"]);
    state = apply(
        AppState::new(),
        Action::LoadState(Box::new(AppState::from_json(&raw.to_string()).unwrap())),
    );
    state = apply(state, Action::ToggleFavorite("C".into()));
    state = apply(state, Action::ToggleFavorite("D".into()));

    let view = state.view();
    assert_eq!(ids(&view.favorites), vec!["C", "D"]);
    assert_eq!(ids(&view.recent), vec!["B", "A"]);
    assert!(view.others.is_empty());
    assert_eq!(view.playlist_count(), 4);
    assert_eq!(
        view.cards().map(|card| card.id.as_str()).collect::<Vec<_>>(),
        vec!["C", "D", "B", "A"]
    );
}

#[test]
fn playlists_outside_recency_fall_into_others() {
    let mut state = AppState::new();
    for i in 0..12 {
        state = apply(state, Action::AddPlaylist(playlist(&format!("P{i}"), 1)));
    }

    let view = state.view();
    assert_eq!(view.recent.len(), 10);
    assert_eq!(view.recent[0].id, "P11");
    assert_eq!(ids(&view.others), vec!["P0", "P1"]);
}

#[test]
fn progress_view_reports_percentage_and_position() {
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let state = apply(AppState::new(), Action::AddPlaylist(playlist("A", 3)));
    let state = apply(
        state,
        Action::UpdateProgress {
            playlist_id: "A".into(),
            progress: PlaylistProgress {
                current_video_index: 0,
                total_videos: 3,
                last_watched: now,
            },
        },
    );

    let view = state.view();
    let card = &view.recent[0];
    let progress = card.progress.as_ref().unwrap();
    assert_eq!(progress.percent, 33);
    assert_eq!(progress.position, 1);
    assert_eq!(progress.total, 3);
    assert_eq!(card.video_count, 3);
    assert!(card.is_active);
}

#[test]
fn view_is_recomputed_after_each_transition() {
    let state = apply(AppState::new(), Action::AddPlaylist(playlist("A", 1)));
    assert!(state.view().favorites.is_empty());

    let state = apply(state, Action::ToggleFavorite("A".into()));
    assert_eq!(ids(&state.view().favorites), vec!["A"]);
    assert!(state.view().recent.is_empty());
}
