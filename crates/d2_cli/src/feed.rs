use anyhow::{Context, Result};
use d2_core::core_api::{Engine, Snapshot};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc::UnboundedSender;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// Sent once right after the socket opens.
pub const HANDSHAKE: &str = "helo";

#[derive(Debug)]
pub enum FeedEvent {
    Connected,
    Snapshot(Snapshot),
    Disconnected,
}

/// Connects to `url`, sends the handshake and forwards every decodable
/// snapshot. Undecodable text is logged and dropped. Returns when the
/// socket closes or errors; there is no reconnect.
pub async fn run(url: &str, engine: Engine, events: UnboundedSender<FeedEvent>) -> Result<()> {
    let (mut socket, _response) = connect_async(url)
        .await
        .with_context(|| format!("failed to connect to {url}"))?;
    info!(%url, "connected to inventory feed");
    if events.send(FeedEvent::Connected).is_err() {
        return Ok(());
    }

    socket
        .send(Message::Text(HANDSHAKE.to_string()))
        .await
        .context("failed to send handshake")?;

    while let Some(next) = socket.next().await {
        let text = match next {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(err) => {
                warn!(?err, "inventory feed read error");
                break;
            }
        };

        match engine.decode_snapshot(&text) {
            Ok(snapshot) => {
                debug!(bytes = text.len(), "received snapshot");
                if events.send(FeedEvent::Snapshot(snapshot)).is_err() {
                    debug!("feed receiver dropped; stopping");
                    return Ok(());
                }
            }
            Err(err) => warn!(bytes = text.len(), %err, "discarding undecodable feed message"),
        }
    }

    info!(%url, "inventory feed closed");
    let _ = events.send(FeedEvent::Disconnected);
    Ok(())
}
