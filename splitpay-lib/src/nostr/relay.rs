use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use super::{keys, protocol, IdentityResolver, ResolvedIdentity};
use crate::config::RelayConfig;
use crate::errors::ResolutionError;

type RelaySocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Resolves `npub` identities against a single nostr relay.
///
/// Every call opens its own connection, sends one `REQ`, reads one answer
/// and closes the connection again. The whole exchange is bounded by
/// [`RelayConfig::timeout_secs`].
#[derive(Clone, Debug)]
pub struct RelayResolver {
    config: RelayConfig,
}

impl RelayResolver {
    /// Build a resolver for the given relay.
    ///
    /// Installs the ring crypto provider for `wss://` relays unless the
    /// process already has one.
    pub fn new(config: RelayConfig) -> Self {
        let _ = rustls::crypto::ring::default_provider().install_default();
        Self { config }
    }

    fn unreachable(&self, reason: impl ToString) -> ResolutionError {
        ResolutionError::Unreachable {
            relay: self.config.url.clone(),
            reason: reason.to_string(),
        }
    }

    /// Connect, run one request/response exchange and close.
    async fn exchange(&self, request: String) -> Result<String, ResolutionError> {
        let (mut socket, _) = connect_async(self.config.url.as_str())
            .await
            .map_err(|err| self.unreachable(err))?;
        tracing::debug!(relay = %self.config.url, "connected to relay");

        let outcome = self.send_and_receive(&mut socket, request).await;

        if let Err(err) = socket.close(None).await {
            tracing::debug!(relay = %self.config.url, "closing relay connection failed: {err}");
        }
        outcome
    }

    async fn send_and_receive(
        &self,
        socket: &mut RelaySocket,
        request: String,
    ) -> Result<String, ResolutionError> {
        socket
            .send(Message::Text(request))
            .await
            .map_err(|err| self.unreachable(err))?;

        while let Some(frame) = socket.next().await {
            match frame.map_err(|err| self.unreachable(err))? {
                Message::Text(text) => return Ok(text),
                Message::Close(_) => break,
                Message::Binary(_) | Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {
                    continue
                }
            }
        }

        Err(ResolutionError::protocol(
            "relay closed the connection without answering",
        ))
    }
}

#[async_trait]
impl IdentityResolver for RelayResolver {
    #[tracing::instrument(skip(self), fields(relay = %self.config.url))]
    async fn resolve(&self, identifier: &str) -> Result<ResolvedIdentity, ResolutionError> {
        let public_key = keys::decode_npub(identifier)?;
        let request = protocol::metadata_request(
            &self.config.subscription_id,
            &public_key,
            self.config.limit,
        );

        let timeout = self.config.timeout();
        let response = tokio::time::timeout(timeout, self.exchange(request))
            .await
            .map_err(|_| ResolutionError::Timeout {
                relay: self.config.url.clone(),
                timeout_ms: timeout.as_millis() as u64,
            })??;

        let event = protocol::parse_event_message(&response, &public_key)?;
        tracing::debug!(subscription = %event.subscription_id, "received profile event");
        let payable_address = protocol::payable_address(&event.content, &public_key)?;
        tracing::debug!(%public_key, address = %payable_address, "resolved public key");

        Ok(ResolvedIdentity {
            public_key,
            payable_address,
        })
    }
}
