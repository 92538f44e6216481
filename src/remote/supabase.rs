// Production gateway over the backend's REST and storage HTTP APIs
use async_trait::async_trait;
use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};
use reqwest::header;
use serde::{Deserialize, Serialize};

use super::gateway::{SettingsGateway, StoredObject, UploadFile};
use crate::config::BackendConfig;
use crate::settings::model::SettingsRecord;

/// Fixed id of the single settings row.
const SETTINGS_ROW_ID: i64 = 1;

/// Prefix under which photo objects live inside the bucket.
const STORAGE_PREFIX: &str = "photos";

/// Wire shape of the settings table row: the record plus its fixed key.
#[derive(Debug, Serialize, Deserialize)]
struct SettingsRow {
    id: i64,
    #[serde(flatten)]
    record: SettingsRecord,
}

/// Gateway talking to a Supabase-style backend: PostgREST row access,
/// storage object upload/delete, public URL derivation.
pub struct SupabaseGateway {
    client: reqwest::Client,
    config: BackendConfig,
}

impl SupabaseGateway {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn rest_url(&self) -> String {
        format!("{}/rest/v1/{}", self.config.base_url, self.config.table)
    }

    fn object_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.config.base_url, self.config.bucket, path
        )
    }

    /// Public retrieval URL for an object in the photo bucket.
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.config.base_url, self.config.bucket, path
        )
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&self.config.anon_key)
    }

    async fn fetch_row(&self) -> anyhow::Result<SettingsRecord> {
        let request = self
            .client
            .get(self.rest_url())
            .query(&[
                ("id", format!("eq.{}", SETTINGS_ROW_ID)),
                ("select", "*".to_string()),
            ])
            // Single-object response instead of a one-element array.
            .header(header::ACCEPT, "application/vnd.pgrst.object+json");

        let row: SettingsRow = self
            .authed(request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(row.record)
    }

    async fn upsert_row(&self, record: &SettingsRecord) -> anyhow::Result<()> {
        let mut stamped = record.clone();
        stamped.updated_at = Some(Utc::now());
        let row = SettingsRow {
            id: SETTINGS_ROW_ID,
            record: stamped,
        };

        let request = self
            .client
            .post(self.rest_url())
            .header("Prefer", "resolution=merge-duplicates")
            .json(&row);

        self.authed(request).send().await?.error_for_status()?;
        Ok(())
    }

    async fn store_object(&self, path: &str, file: &UploadFile) -> anyhow::Result<()> {
        let request = self
            .client
            .post(self.object_url(path))
            .header(header::CONTENT_TYPE, &file.media_type)
            .header(header::CACHE_CONTROL, "max-age=3600")
            .body(file.bytes.clone());

        self.authed(request).send().await?.error_for_status()?;
        Ok(())
    }

    async fn remove_object(&self, path: &str) -> anyhow::Result<()> {
        let request = self.client.delete(self.object_url(path));
        self.authed(request).send().await?.error_for_status()?;
        Ok(())
    }
}

#[async_trait]
impl SettingsGateway for SupabaseGateway {
    async fn load_settings(&self) -> Option<SettingsRecord> {
        match self.fetch_row().await {
            Ok(record) => Some(record),
            Err(e) => {
                // Absence and transport errors look the same to callers:
                // no row yet.
                tracing::info!("settings row not loaded: {}", e);
                None
            }
        }
    }

    async fn save_settings(&self, record: &SettingsRecord) -> bool {
        match self.upsert_row(record).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("settings save failed: {}", e);
                false
            }
        }
    }

    async fn upload_file(&self, file: &UploadFile) -> Option<StoredObject> {
        let path = object_path(
            Utc::now().timestamp_millis(),
            &random_suffix(),
            file.extension(),
        );

        match self.store_object(&path, file).await {
            Ok(()) => Some(StoredObject {
                url: self.public_url(&path),
                path,
            }),
            Err(e) => {
                tracing::warn!("upload of {} failed: {}", file.name, e);
                None
            }
        }
    }

    async fn delete_file(&self, path: &str) -> bool {
        // Photos added by URL carry no storage path, or a full external
        // URL: nothing to remove on the backend.
        if path.is_empty() || path.starts_with("http") {
            return true;
        }

        match self.remove_object(path).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("storage delete of {} failed: {}", path, e);
                false
            }
        }
    }
}

/// Collision-resistant object path: millisecond timestamp plus a random
/// suffix, keeping the original extension.
fn object_path(millis: i64, suffix: &str, extension: &str) -> String {
    format!("{}/{}_{}.{}", STORAGE_PREFIX, millis, suffix, extension)
}

fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::model::Photo;

    fn test_gateway() -> SupabaseGateway {
        SupabaseGateway::new(BackendConfig::new("https://proj.supabase.co", "anon-key"))
    }

    #[test]
    fn test_object_path_shape() {
        let path = object_path(1700000000000, "a1b2c3", "png");
        assert_eq!(path, "photos/1700000000000_a1b2c3.png");
    }

    #[test]
    fn test_random_suffix_charset() {
        let suffix = random_suffix();
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_public_url() {
        let gateway = test_gateway();
        assert_eq!(
            gateway.public_url("photos/1_x.png"),
            "https://proj.supabase.co/storage/v1/object/public/tv-photos/photos/1_x.png"
        );
    }

    #[test]
    fn test_row_serialization_flattens_record() {
        let mut record = SettingsRecord::default();
        record.photos.push(Photo::from_url(1, "https://example.com/a.jpg"));

        let row = SettingsRow { id: 1, record };
        let json = serde_json::to_value(&row).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["interval_seconds"], 15);
        assert_eq!(json["photos"][0]["type"], "url");
    }

    #[tokio::test]
    async fn test_delete_skips_external_urls() {
        let gateway = test_gateway();
        // No backend object behind these: treated as already gone,
        // without any network call.
        assert!(gateway.delete_file("").await);
        assert!(gateway.delete_file("https://example.com/external.jpg").await);
        assert!(gateway.delete_file("http://example.com/external.jpg").await);
    }
}
