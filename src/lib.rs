// Signdeck - admin console for a digital-signage TV display
// Module declarations
pub mod commands;
pub mod config;
pub mod media;
pub mod remote;
pub mod settings;
pub mod state;
pub mod view;

use std::sync::Arc;

use config::BackendConfig;
use remote::realtime;
use remote::supabase::SupabaseGateway;
use state::AppState;

/// Boot a headless admin session: connect to the backend, load (or
/// initialize) the settings row, then keep the realtime channel open
/// until interrupted.
pub async fn run() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let config = BackendConfig::from_env()?;

    let gateway = Arc::new(SupabaseGateway::new(config.clone()));
    let state = AppState::new(gateway);

    commands::load_settings(&state).await;
    let status = state.status();
    tracing::info!("settings loaded: {}", status.label);

    let snapshot = state.with_store(|store| store.snapshot());
    tracing::info!(
        "interval {}s, {} photos, {} videos, bgm {}",
        snapshot.interval_seconds,
        snapshot.photos.len(),
        snapshot.youtube_videos.len(),
        if snapshot.bgm_url.is_some() { "set" } else { "none" }
    );

    let subscription = match realtime::subscribe_to_changes(&config, |record| {
        tracing::info!(
            "settings changed remotely: interval {}s, {} photos, {} videos",
            record.interval_seconds,
            record.photos.len(),
            record.youtube_videos.len()
        );
    })
    .await
    {
        Ok(subscription) => Some(subscription),
        Err(e) => {
            tracing::warn!("realtime subscription unavailable: {}", e);
            None
        }
    };

    tokio::signal::ctrl_c().await?;
    drop(subscription);
    tracing::info!("shutting down");
    Ok(())
}
