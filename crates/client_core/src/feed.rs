//! Push-channel client: one websocket connection, one full snapshot per
//! message, no reconnection.

use futures::StreamExt;
use shared::{domain::QueueSnapshot, protocol::QueueFeedMessage};
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{error, info, warn};
use url::Url;

use crate::error::FeedError;

/// What the feed reports to the board.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    Snapshot(QueueSnapshot),
    TransportError(String),
    Closed,
}

pub struct FeedClient {
    url: Url,
}

impl FeedClient {
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    /// Derives the feed url from the server's http base url:
    /// `http://host:8000` + `/newOrder` becomes `ws://host:8000/newOrder`.
    pub fn from_server_url(server_url: &str, feed_path: &str) -> Result<Self, FeedError> {
        let invalid = |reason: String| FeedError::InvalidUrl {
            url: server_url.to_string(),
            reason,
        };

        let mut url = Url::parse(server_url).map_err(|err| invalid(err.to_string()))?;
        let scheme = match url.scheme() {
            "http" | "ws" => "ws",
            "https" | "wss" => "wss",
            other => {
                return Err(invalid(format!(
                    "scheme must be http, https, ws or wss, got {other}"
                )))
            }
        };
        url.set_scheme(scheme)
            .map_err(|()| invalid(format!("cannot switch scheme to {scheme}")))?;
        let url = url
            .join(feed_path)
            .map_err(|err| invalid(err.to_string()))?;
        Ok(Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Connects and spawns the reader task. Connection failures are returned
    /// to the caller; everything after the handshake is reported through
    /// `events`.
    pub async fn spawn<E>(self, events: mpsc::Sender<E>) -> Result<JoinHandle<()>, FeedError>
    where
        E: From<FeedEvent> + Send + 'static,
    {
        let (ws_stream, _) =
            connect_async(self.url.as_str())
                .await
                .map_err(|source| FeedError::Connect {
                    url: self.url.to_string(),
                    source,
                })?;
        info!(url = %self.url, "feed: connected, waiting for queue snapshots");
        let (_, mut ws_reader) = ws_stream.split();

        Ok(tokio::spawn(async move {
            while let Some(msg) = ws_reader.next().await {
                let event = match msg {
                    Ok(Message::Text(text)) => match QueueFeedMessage::decode(&text) {
                        Ok(snapshot) => FeedEvent::Snapshot(snapshot),
                        Err(err) => {
                            warn!(error = %err, "feed: skipping undecodable queue snapshot");
                            continue;
                        }
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => continue,
                    Err(err) => {
                        error!(error = %err, "feed: websocket receive failed");
                        let _ = events
                            .send(FeedEvent::TransportError(err.to_string()).into())
                            .await;
                        break;
                    }
                };
                if events.send(event.into()).await.is_err() {
                    info!("feed: board stopped listening, dropping connection");
                    return;
                }
            }
            info!("feed: connection closed; board is stale until a new connection is made");
            let _ = events.send(FeedEvent::Closed.into()).await;
        }))
    }
}

#[cfg(test)]
#[path = "tests/feed_tests.rs"]
mod tests;
