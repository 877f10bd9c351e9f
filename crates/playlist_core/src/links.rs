use crate::playlist::Video;

const WATCH_URL: &str = "https://www.youtube.com/watch";

/// Pulls the playlist identifier out of a catalog URL's `list=` parameter.
///
/// Accepts full URLs as well as scheme-less input such as
/// `youtube.com/playlist?list=PL123`. The value is taken verbatim, up to the
/// next `#`, `&` or `?`; empty `list=` occurrences are skipped.
pub fn extract_playlist_id(input: &str) -> Option<String> {
    scan_list_param(input.trim())
}

fn scan_list_param(input: &str) -> Option<String> {
    let mut rest = input;
    while let Some(pos) = rest.find("list=") {
        let preceded_by_separator = rest[..pos].ends_with(|c: char| c == '?' || c == '&');
        let after = &rest[pos + "list=".len()..];
        if preceded_by_separator {
            let end = after.find(['#', '&', '?']).unwrap_or(after.len());
            let value = &after[..end];
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
        rest = after;
    }
    None
}

pub fn watch_url(video_id: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(video_id.as_bytes()).collect();
    format!("{WATCH_URL}?v={encoded}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackTarget {
    Embed { video_id: String },
    /// The owner disabled embedding; open the catalog site instead.
    DeepLink { url: String },
}

pub fn playback_target(video: &Video) -> PlaybackTarget {
    if video.embed_allowed {
        PlaybackTarget::Embed {
            video_id: video.id.clone(),
        }
    } else {
        PlaybackTarget::DeepLink {
            url: watch_url(&video.id),
        }
    }
}
