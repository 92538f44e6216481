// Realtime subscription to settings-row changes (Phoenix-style channel)
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::config::BackendConfig;
use crate::settings::model::SettingsRecord;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Errors that can occur when establishing the realtime subscription.
#[derive(Debug, thiserror::Error)]
pub enum RealtimeError {
    /// Failed to establish the websocket connection or join the channel.
    #[error("Connection error: {0}")]
    Connection(String),
}

/// Handle to a live subscription. Aborting (or dropping) it ends the
/// background listener task.
pub struct ChangeSubscription {
    handle: JoinHandle<()>,
}

impl ChangeSubscription {
    pub fn abort(&self) {
        self.handle.abort();
    }
}

impl Drop for ChangeSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Subscribe to row changes on the settings table.
///
/// Joins the table's channel and invokes `callback` with the new row
/// whenever any client updates it. The listener sends periodic heartbeats
/// and ends with a logged warning when the connection drops; the consumer
/// re-subscribes if it still cares.
pub async fn subscribe_to_changes<F>(
    config: &BackendConfig,
    mut callback: F,
) -> Result<ChangeSubscription, RealtimeError>
where
    F: FnMut(SettingsRecord) + Send + 'static,
{
    let url = websocket_url(config);
    let (ws_stream, _response) = connect_async(&url).await.map_err(|e| {
        RealtimeError::Connection(format!("Failed to connect to realtime channel: {e}"))
    })?;

    let (mut write, mut read) = ws_stream.split();

    write
        .send(Message::Text(join_message(&config.table)))
        .await
        .map_err(|e| RealtimeError::Connection(format!("Failed to join channel: {e}")))?;

    tracing::info!("subscribed to changes on table {}", config.table);

    let handle = tokio::spawn(async move {
        let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
        // The first tick completes immediately.
        heartbeat.tick().await;
        let mut heartbeat_ref: u64 = 1;

        loop {
            tokio::select! {
                message = read.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            if let Some(record) = extract_changed_record(&text) {
                                callback(record);
                            }
                        }
                        Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
                        Some(Ok(Message::Close(frame))) => {
                            tracing::warn!("realtime channel closed by server: {:?}", frame);
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            tracing::warn!("realtime channel error: {}", e);
                            break;
                        }
                        None => {
                            tracing::warn!("realtime channel ended");
                            break;
                        }
                    }
                }
                _ = heartbeat.tick() => {
                    heartbeat_ref += 1;
                    let beat = heartbeat_message(heartbeat_ref);
                    if write.send(Message::Text(beat)).await.is_err() {
                        tracing::warn!("realtime heartbeat failed, ending subscription");
                        break;
                    }
                }
            }
        }
    });

    Ok(ChangeSubscription { handle })
}

fn websocket_url(config: &BackendConfig) -> String {
    let ws_base = if let Some(rest) = config.base_url.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = config.base_url.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        config.base_url.clone()
    };

    format!(
        "{}/realtime/v1/websocket?apikey={}&vsn=1.0.0",
        ws_base, config.anon_key
    )
}

fn join_message(table: &str) -> String {
    serde_json::json!({
        "topic": format!("realtime:public:{}", table),
        "event": "phx_join",
        "payload": {
            "config": {
                "postgres_changes": [
                    { "event": "*", "schema": "public", "table": table }
                ]
            }
        },
        "ref": "1"
    })
    .to_string()
}

fn heartbeat_message(reference: u64) -> String {
    serde_json::json!({
        "topic": "phoenix",
        "event": "heartbeat",
        "payload": {},
        "ref": reference.to_string()
    })
    .to_string()
}

/// Pull the changed row out of a channel message, if it is one.
fn extract_changed_record(text: &str) -> Option<SettingsRecord> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    if value["event"] != "postgres_changes" {
        return None;
    }

    let record = value
        .pointer("/payload/data/record")
        .or_else(|| value.pointer("/payload/record"))?;
    serde_json::from_value(record.clone()).ok()
}
