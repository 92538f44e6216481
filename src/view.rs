// Pure view projections of the settings record; no state of their own
use serde::Serialize;

use crate::media::youtube;
use crate::settings::model::{PhotoKind, SettingsRecord};

/// Sync indicator state shown next to the free-text label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncState {
    Loading,
    Connected,
    Error,
}

/// The operator-facing sync indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncStatus {
    pub state: SyncState,
    pub label: String,
}

impl SyncStatus {
    pub fn loading(label: impl Into<String>) -> Self {
        Self {
            state: SyncState::Loading,
            label: label.into(),
        }
    }

    pub fn connected(label: impl Into<String>) -> Self {
        Self {
            state: SyncState::Connected,
            label: label.into(),
        }
    }

    pub fn error(label: impl Into<String>) -> Self {
        Self {
            state: SyncState::Error,
            label: label.into(),
        }
    }
}

impl Default for SyncStatus {
    fn default() -> Self {
        Self::loading("Loading...")
    }
}

/// One cell of the photo grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoTile {
    pub id: i64,
    pub url: String,
    /// Badge text distinguishing uploaded photos from linked ones.
    pub badge: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoGrid {
    pub count: usize,
    pub tiles: Vec<PhotoTile>,
}

impl PhotoGrid {
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

pub fn photo_grid(record: &SettingsRecord) -> PhotoGrid {
    let tiles: Vec<PhotoTile> = record
        .photos
        .iter()
        .map(|photo| PhotoTile {
            id: photo.id,
            url: photo.url.clone(),
            badge: match photo.kind {
                PhotoKind::Storage => "Storage",
                PhotoKind::Url => "URL",
            },
        })
        .collect();

    PhotoGrid {
        count: tiles.len(),
        tiles,
    }
}

/// One cell of the YouTube grid; clicking opens `watch_url`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoTile {
    pub id: i64,
    pub thumbnail_url: String,
    pub watch_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YoutubeGrid {
    pub count: usize,
    pub tiles: Vec<VideoTile>,
}

impl YoutubeGrid {
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

pub fn youtube_grid(record: &SettingsRecord) -> YoutubeGrid {
    let tiles: Vec<VideoTile> = record
        .youtube_videos
        .iter()
        .map(|video| VideoTile {
            id: video.id,
            thumbnail_url: youtube::thumbnail_url(&video.video_id),
            watch_url: youtube::watch_url(&video.video_id),
        })
        .collect();

    YoutubeGrid {
        count: tiles.len(),
        tiles,
    }
}

/// Current background-music slot, as shown under the BGM controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum BgmStatus {
    None,
    Playing { watch_url: String },
}

pub fn bgm_status(record: &SettingsRecord) -> BgmStatus {
    match record.bgm_url.as_deref() {
        Some(url) => match youtube::extract_video_id(url) {
            Some(video_id) => BgmStatus::Playing {
                watch_url: youtube::watch_url(&video_id),
            },
            None => BgmStatus::None,
        },
        None => BgmStatus::None,
    }
}

/// Preview pane model for a clicked photo.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewPane {
    pub image_url: String,
}

pub fn preview(url: &str) -> PreviewPane {
    PreviewPane {
        image_url: url.to_string(),
    }
}

/// Address of the sibling TV playback page: same directory as the admin
/// page, fixed file name.
pub fn playback_page_url(admin_url: &str) -> String {
    match admin_url.rfind('/') {
        Some(pos) => format!("{}tv.html", &admin_url[..pos + 1]),
        None => "tv.html".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::model::{Photo, YoutubeVideo};

    #[test]
    fn test_photo_grid_badges() {
        let mut record = SettingsRecord::default();
        record.photos.push(Photo::from_url(1, "https://a/1.jpg"));
        record
            .photos
            .push(Photo::from_storage(2, "https://cdn/2.png", "photos/2.png"));

        let grid = photo_grid(&record);
        assert_eq!(grid.count, 2);
        assert_eq!(grid.tiles[0].badge, "URL");
        assert_eq!(grid.tiles[1].badge, "Storage");
    }

    #[test]
    fn test_empty_grids() {
        let record = SettingsRecord::default();
        assert!(photo_grid(&record).is_empty());
        assert!(youtube_grid(&record).is_empty());
    }

    #[test]
    fn test_youtube_grid_tiles() {
        let mut record = SettingsRecord::default();
        record
            .youtube_videos
            .push(YoutubeVideo::new(1, "abc123", "https://youtu.be/abc123"));

        let grid = youtube_grid(&record);
        assert_eq!(grid.count, 1);
        assert_eq!(
            grid.tiles[0].thumbnail_url,
            "https://img.youtube.com/vi/abc123/mqdefault.jpg"
        );
        assert_eq!(
            grid.tiles[0].watch_url,
            "https://www.youtube.com/watch?v=abc123"
        );
    }

    #[test]
    fn test_bgm_status() {
        let mut record = SettingsRecord::default();
        assert_eq!(bgm_status(&record), BgmStatus::None);

        record.bgm_url = Some("https://youtu.be/bgm42".to_string());
        assert_eq!(
            bgm_status(&record),
            BgmStatus::Playing {
                watch_url: "https://www.youtube.com/watch?v=bgm42".to_string()
            }
        );
    }

    #[test]
    fn test_playback_page_url() {
        assert_eq!(
            playback_page_url("https://host/signage/settings.html"),
            "https://host/signage/tv.html"
        );
        assert_eq!(
            playback_page_url("https://host/signage/"),
            "https://host/signage/tv.html"
        );
    }
}
