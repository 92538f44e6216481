// In-memory settings store: the authoritative snapshot between saves
use super::model::{Photo, SettingsRecord, YoutubeVideo};

/// Holds the current settings snapshot. Mutators perform no validation;
/// callers validate before mutating, then persist the whole snapshot and
/// restore the previous one if the save fails.
#[derive(Debug, Default)]
pub struct SettingsStore {
    record: SettingsRecord,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole record, used on startup and on external change.
    pub fn load(&mut self, record: SettingsRecord) {
        self.record = record;
    }

    /// Cloned copy of the current record, for saving or for rollback.
    pub fn snapshot(&self) -> SettingsRecord {
        self.record.clone()
    }

    pub fn interval_seconds(&self) -> u32 {
        self.record.interval_seconds
    }

    pub fn set_interval(&mut self, seconds: u32) {
        self.record.interval_seconds = seconds;
    }

    // ===== Photos =====

    pub fn photos(&self) -> &[Photo] {
        &self.record.photos
    }

    pub fn add_photo(&mut self, photo: Photo) {
        self.record.photos.push(photo);
    }

    /// Remove a photo by id, returning it with its former position so a
    /// failed save can reinsert it in display order.
    pub fn remove_photo(&mut self, id: i64) -> Option<(usize, Photo)> {
        let index = self.record.photos.iter().position(|p| p.id == id)?;
        Some((index, self.record.photos.remove(index)))
    }

    pub fn insert_photo(&mut self, index: usize, photo: Photo) {
        let index = index.min(self.record.photos.len());
        self.record.photos.insert(index, photo);
    }

    // ===== YouTube videos =====

    pub fn videos(&self) -> &[YoutubeVideo] {
        &self.record.youtube_videos
    }

    pub fn has_video(&self, video_id: &str) -> bool {
        self.record
            .youtube_videos
            .iter()
            .any(|v| v.video_id == video_id)
    }

    pub fn add_video(&mut self, video: YoutubeVideo) {
        self.record.youtube_videos.push(video);
    }

    pub fn remove_video(&mut self, id: i64) -> Option<(usize, YoutubeVideo)> {
        let index = self.record.youtube_videos.iter().position(|v| v.id == id)?;
        Some((index, self.record.youtube_videos.remove(index)))
    }

    pub fn insert_video(&mut self, index: usize, video: YoutubeVideo) {
        let index = index.min(self.record.youtube_videos.len());
        self.record.youtube_videos.insert(index, video);
    }

    // ===== BGM =====

    pub fn bgm_url(&self) -> Option<&str> {
        self.record.bgm_url.as_deref()
    }

    /// Set the single BGM slot, returning the previous value for rollback.
    pub fn set_bgm(&mut self, url: impl Into<String>) -> Option<String> {
        self.record.bgm_url.replace(url.into())
    }

    pub fn clear_bgm(&mut self) -> Option<String> {
        self.record.bgm_url.take()
    }

    pub fn restore_bgm(&mut self, previous: Option<String>) {
        self.record.bgm_url = previous;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_photos(urls: &[&str]) -> SettingsStore {
        let mut store = SettingsStore::new();
        for (i, url) in urls.iter().enumerate() {
            store.add_photo(Photo::from_url(i as i64 + 1, *url));
        }
        store
    }

    #[test]
    fn test_load_replaces_wholesale() {
        let mut store = store_with_photos(&["https://a/1.jpg"]);
        store.set_bgm("https://youtu.be/old");

        let mut incoming = SettingsRecord::default();
        incoming.interval_seconds = 60;
        store.load(incoming);

        assert_eq!(store.interval_seconds(), 60);
        assert!(store.photos().is_empty());
        assert!(store.bgm_url().is_none());
    }

    #[test]
    fn test_photos_keep_insertion_order() {
        let store = store_with_photos(&["https://a/1.jpg", "https://a/2.jpg", "https://a/3.jpg"]);
        let urls: Vec<&str> = store.photos().iter().map(|p| p.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a/1.jpg", "https://a/2.jpg", "https://a/3.jpg"]);
    }

    #[test]
    fn test_remove_photo_returns_index_for_rollback() {
        let mut store = store_with_photos(&["https://a/1.jpg", "https://a/2.jpg", "https://a/3.jpg"]);

        let (index, photo) = store.remove_photo(2).unwrap();
        assert_eq!(index, 1);
        assert_eq!(store.photos().len(), 2);

        // Rollback puts it back where it was.
        store.insert_photo(index, photo);
        assert_eq!(store.photos()[1].id, 2);
    }

    #[test]
    fn test_remove_unknown_photo_is_none() {
        let mut store = store_with_photos(&["https://a/1.jpg"]);
        assert!(store.remove_photo(999).is_none());
        assert_eq!(store.photos().len(), 1);
    }

    #[test]
    fn test_duplicate_video_lookup() {
        let mut store = SettingsStore::new();
        store.add_video(YoutubeVideo::new(1, "abc123", "https://youtu.be/abc123"));
        assert!(store.has_video("abc123"));
        assert!(!store.has_video("zzz999"));
    }

    #[test]
    fn test_bgm_slot_replace_and_restore() {
        let mut store = SettingsStore::new();
        assert_eq!(store.set_bgm("https://youtu.be/first"), None);

        let previous = store.set_bgm("https://youtu.be/second");
        assert_eq!(previous.as_deref(), Some("https://youtu.be/first"));

        store.restore_bgm(previous);
        assert_eq!(store.bgm_url(), Some("https://youtu.be/first"));

        assert_eq!(store.clear_bgm().as_deref(), Some("https://youtu.be/first"));
        assert!(store.bgm_url().is_none());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut store = store_with_photos(&["https://a/1.jpg"]);
        let snapshot = store.snapshot();
        store.add_photo(Photo::from_url(2, "https://a/2.jpg"));

        assert_eq!(snapshot.photos.len(), 1);
        assert_eq!(store.photos().len(), 2);
    }
}
