// Data models for the persisted TV settings record
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Slideshow interval used when no row exists yet.
pub const DEFAULT_INTERVAL_SECONDS: u32 = 15;

/// Inclusive bounds for the slideshow interval.
pub const MIN_INTERVAL_SECONDS: u32 = 3;
pub const MAX_INTERVAL_SECONDS: u32 = 300;

/// Where a photo's bytes live. The TV client only follows `url`; the
/// admin needs `Storage` to know a backend object must be deleted too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoKind {
    Url,
    Storage,
}

/// One slideshow photo. `path` is present iff `kind` is `Storage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: i64,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: PhotoKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Photo {
    /// Photo referencing an external image URL.
    pub fn from_url(id: i64, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            kind: PhotoKind::Url,
            path: None,
        }
    }

    /// Photo backed by an uploaded storage object.
    pub fn from_storage(id: i64, url: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            kind: PhotoKind::Storage,
            path: Some(path.into()),
        }
    }

    /// Storage path for deletion, if this photo was uploaded.
    pub fn storage_path(&self) -> Option<&str> {
        match self.kind {
            PhotoKind::Storage => self.path.as_deref(),
            PhotoKind::Url => None,
        }
    }
}

/// One YouTube entry. `video_id` is the extracted 11-character id and is
/// unique across the collection; `url` keeps what the operator typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YoutubeVideo {
    pub id: i64,
    #[serde(rename = "videoId")]
    pub video_id: String,
    pub url: String,
}

impl YoutubeVideo {
    pub fn new(id: i64, video_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id,
            video_id: video_id.into(),
            url: url.into(),
        }
    }
}

/// The single persisted settings document (row id 1 on the backend).
/// Field names match the stored row so the TV client reads the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsRecord {
    pub interval_seconds: u32,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub youtube_videos: Vec<YoutubeVideo>,
    #[serde(default)]
    pub bgm_url: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for SettingsRecord {
    fn default() -> Self {
        Self {
            interval_seconds: DEFAULT_INTERVAL_SECONDS,
            photos: Vec::new(),
            youtube_videos: Vec::new(),
            bgm_url: None,
            updated_at: None,
        }
    }
}

impl SettingsRecord {
    /// Equality ignoring `updated_at`, which the gateway stamps on save.
    pub fn same_content(&self, other: &Self) -> bool {
        self.interval_seconds == other.interval_seconds
            && self.photos == other.photos
            && self.youtube_videos == other.youtube_videos
            && self.bgm_url == other.bgm_url
    }
}

/// Creation-time-derived entity id: current Unix time in milliseconds,
/// offset by the index when several entities are created in one batch.
pub fn creation_id(offset: usize) -> i64 {
    Utc::now().timestamp_millis() + offset as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_wire_format_storage() {
        let photo = Photo::from_storage(42, "https://cdn.example/p.png", "photos/p.png");
        let json = serde_json::to_value(&photo).unwrap();
        assert_eq!(json["type"], "storage");
        assert_eq!(json["path"], "photos/p.png");
        assert_eq!(photo.storage_path(), Some("photos/p.png"));
    }

    #[test]
    fn test_photo_wire_format_url_omits_path() {
        let photo = Photo::from_url(1, "https://example.com/a.jpg");
        let json = serde_json::to_value(&photo).unwrap();
        assert_eq!(json["type"], "url");
        assert!(json.get("path").is_none());
        assert_eq!(photo.storage_path(), None);
    }

    #[test]
    fn test_video_wire_format_uses_camel_case_id() {
        let video = YoutubeVideo::new(7, "abc123", "https://youtu.be/abc123");
        let json = serde_json::to_value(&video).unwrap();
        assert_eq!(json["videoId"], "abc123");
        assert_eq!(json["url"], "https://youtu.be/abc123");
    }

    #[test]
    fn test_record_roundtrip_preserves_content() {
        let record = SettingsRecord {
            interval_seconds: 30,
            photos: vec![Photo::from_url(1, "https://example.com/a.jpg")],
            youtube_videos: vec![YoutubeVideo::new(2, "xyz", "https://youtu.be/xyz")],
            bgm_url: Some("https://youtu.be/bgm42".to_string()),
            updated_at: None,
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: SettingsRecord = serde_json::from_str(&json).unwrap();
        assert!(record.same_content(&back));
    }

    #[test]
    fn test_record_defaults() {
        let record = SettingsRecord::default();
        assert_eq!(record.interval_seconds, 15);
        assert!(record.photos.is_empty());
        assert!(record.youtube_videos.is_empty());
        assert!(record.bgm_url.is_none());
    }

    #[test]
    fn test_missing_collections_deserialize_empty() {
        // Rows written by the photo-only variant carry no youtube_videos
        // or bgm_url columns.
        let back: SettingsRecord = serde_json::from_str(r#"{"interval_seconds": 20}"#).unwrap();
        assert_eq!(back.interval_seconds, 20);
        assert!(back.youtube_videos.is_empty());
        assert!(back.bgm_url.is_none());
    }
}
