use playlist_core::{extract_playlist_id, playback_target, watch_url, PlaybackTarget, Video};

fn video(embed_allowed: bool) -> Video {
    Video {
        id: "abc123".to_string(),
        title: "Clip".to_string(),
        thumbnail: "https://img.example/abc123.jpg".to_string(),
        description: None,
        embed_allowed,
    }
}

#[test]
fn extracts_list_parameter_from_watch_url() {
    assert_eq!(
        extract_playlist_id("https://x/watch?v=abc&list=PL123"),
        Some("PL123".to_string())
    );
}

#[test]
fn missing_list_parameter_yields_none() {
    assert_eq!(extract_playlist_id("https://x/watch?v=abc"), None);
    assert_eq!(extract_playlist_id("https://x/watch?v=abc&list="), None);
    assert_eq!(extract_playlist_id(""), None);
}

#[test]
fn extracts_from_playlist_page_and_schemeless_input() {
    assert_eq!(
        extract_playlist_id("https://www.youtube.com/playlist?list=PLxyz&si=share"),
        Some("PLxyz".to_string())
    );
    assert_eq!(
        extract_playlist_id("youtube.com/watch?v=abc&list=PL9#t=30"),
        Some("PL9".to_string())
    );
}

#[test]
fn ignores_parameters_that_merely_end_in_list() {
    assert_eq!(extract_playlist_id("youtube.com/watch?playlist=nope"), None);
}

#[test]
fn restricted_videos_deep_link_to_watch_page() {
    assert_eq!(
        playback_target(&video(false)),
        PlaybackTarget::DeepLink {
            url: "https://www.youtube.com/watch?v=abc123".to_string()
        }
    );
    assert_eq!(
        playback_target(&video(true)),
        PlaybackTarget::Embed {
            video_id: "abc123".to_string()
        }
    );
    assert_eq!(watch_url("a b"), "https://www.youtube.com/watch?v=a+b");
}

#[test]
fn empty_list_parameter_is_skipped_for_a_later_one() {
    assert_eq!(
        extract_playlist_id("https://www.youtube.com/playlist?list=&list=PL2"),
        Some("PL2".to_string())
    );
}

#[test]
fn list_value_is_taken_verbatim() {
    assert_eq!(
        extract_playlist_id("https://www.youtube.com/playlist?list=PL+a%2Db"),
        Some("PL+a%2Db".to_string())
    );
}
