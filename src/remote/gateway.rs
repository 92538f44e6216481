// Gateway contract over the remote settings backend
use async_trait::async_trait;

use crate::settings::model::SettingsRecord;

/// A file picked for upload, carrying the declared media type alongside
/// the raw bytes.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Only files declaring an `image/*` media type get uploaded.
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }

    /// Final dot-separated segment of the file name; the whole name when
    /// there is no dot.
    pub fn extension(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or("bin")
    }
}

/// An object stored in the photo bucket: its public retrieval URL and the
/// bucket-relative path used for later deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub url: String,
    pub path: String,
}

/// The only component that talks to the external backend.
///
/// Every transport failure is caught behind this boundary and converted
/// to `None`/`false`; callers consult the sentinel, nothing propagates.
#[async_trait]
pub trait SettingsGateway: Send + Sync {
    /// Fetch the single settings row. `None` means "no row yet" (absence
    /// and load errors alike), signaling the caller to initialize
    /// defaults and save them.
    async fn load_settings(&self) -> Option<SettingsRecord>;

    /// Whole-record upsert keyed by the fixed row id. Stamps `updated_at`
    /// with the current time as part of the write.
    async fn save_settings(&self, record: &SettingsRecord) -> bool;

    /// Store the bytes under a generated collision-resistant path in the
    /// photo bucket and return the public URL plus the storage path.
    async fn upload_file(&self, file: &UploadFile) -> Option<StoredObject>;

    /// Remove an object by path. An empty path or a full external URL
    /// means the photo was never backend-stored: no-op success.
    async fn delete_file(&self, path: &str) -> bool;
}
