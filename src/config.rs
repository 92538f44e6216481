// Backend connection configuration loaded from environment variables
use anyhow::Context;

/// Settings table used when `SIGNDECK_TABLE` is not set.
pub const DEFAULT_TABLE: &str = "tv_settings";

/// Photo bucket used when `SIGNDECK_BUCKET` is not set.
pub const DEFAULT_BUCKET: &str = "tv-photos";

/// Connection constants for the hosted backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Project base URL, e.g. `https://abc.supabase.co` (no trailing slash).
    pub base_url: String,
    /// Anonymous API key sent with every request.
    pub anon_key: String,
    /// Settings table name (default: `tv_settings`).
    pub table: String,
    /// Photo bucket name (default: `tv-photos`).
    pub bucket: String,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            anon_key: anon_key.into(),
            table: DEFAULT_TABLE.to_string(),
            bucket: DEFAULT_BUCKET.to_string(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Env Var                | Default       |
    /// |------------------------|---------------|
    /// | `SIGNDECK_BACKEND_URL` | required      |
    /// | `SIGNDECK_ANON_KEY`    | required      |
    /// | `SIGNDECK_TABLE`       | `tv_settings` |
    /// | `SIGNDECK_BUCKET`      | `tv-photos`   |
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url = std::env::var("SIGNDECK_BACKEND_URL")
            .context("SIGNDECK_BACKEND_URL must be set to the backend project URL")?;
        let anon_key = std::env::var("SIGNDECK_ANON_KEY")
            .context("SIGNDECK_ANON_KEY must be set to the backend anon key")?;

        let mut config = Self::new(base_url, anon_key);
        if let Ok(table) = std::env::var("SIGNDECK_TABLE") {
            config.table = table;
        }
        if let Ok(bucket) = std::env::var("SIGNDECK_BUCKET") {
            config.bucket = bucket;
        }
        Ok(config)
    }
}

fn normalize_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
