// YouTube URL parsing
use regex::Regex;
use std::sync::OnceLock;

/// Accepted URL shapes: standard watch link, short link, embed link.
fn get_watch_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r#"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^&?/]+)"#)
            .unwrap()
    })
}

/// Shorts links use a separate path shape.
fn get_shorts_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r#"youtube\.com/shorts/([^&?/]+)"#).unwrap())
}

/// Extract the video id from a YouTube URL.
///
/// Returns `None` when the URL matches none of the accepted shapes or the
/// id capture is empty.
pub fn extract_video_id(url: &str) -> Option<String> {
    for regex in [get_watch_regex(), get_shorts_regex()] {
        if let Some(captures) = regex.captures(url) {
            let id = captures.get(1).map(|m| m.as_str()).unwrap_or("");
            if !id.is_empty() {
                return Some(id.to_string());
            }
        }
    }
    None
}

/// Canonical watch link for a video id.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Medium-quality thumbnail served by YouTube for a video id.
pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{}/mqdefault.jpg", video_id)
}
