//! # Messenger Boundary
//!
//! The interface to whatever carries bytes to and from the engine.
//!
//! ## Philosophy
//!
//! - **Byte-Oriented**: A messenger moves opaque buffers tagged with a channel
//!   name. It knows nothing about codecs, calls or values.
//! - **Empty Means Unhandled**: An empty reply is how the far side says no
//!   handler exists. Handlers that fail reply empty as well.

use std::sync::Arc;

use bytes::Bytes;
use dashmap::DashMap;
use tracing::debug;
use tracing::warn;

use crate::types::MessengerError;
use crate::types::Result;

/// Sends messages to the engine and routes incoming ones to handlers.
///
/// Object-safe, so channels hold it as `Arc<dyn BinaryMessenger>`.
#[async_trait::async_trait]
pub trait BinaryMessenger: Send + Sync + 'static {
    /// Sends without waiting for a reply.
    async fn send(&self, channel: &str, message: Bytes) -> std::result::Result<(), MessengerError>;

    /// Sends and waits for the reply. An empty reply means nothing handled it.
    async fn send_with_reply(
        &self,
        channel: &str,
        message: Bytes,
    ) -> std::result::Result<Bytes, MessengerError>;

    /// Installs or, with `None`, removes the handler for incoming messages on `channel`.
    fn set_message_handler(&self, channel: &str, handler: Option<Arc<dyn BinaryHandler>>);
}

/// Receives raw messages for one channel and produces the raw reply.
#[async_trait::async_trait]
pub trait BinaryHandler: Send + Sync + 'static {
    async fn handle(&self, message: Bytes) -> Result<Bytes>;
}

/// Channel-name to handler table for `BinaryMessenger` implementations.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: DashMap<String, Arc<dyn BinaryHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handler previously registered for `channel`.
    pub fn set_handler(
        &self,
        channel: impl Into<String>,
        handler: Arc<dyn BinaryHandler>,
    ) -> Option<Arc<dyn BinaryHandler>> {
        self.handlers.insert(channel.into(), handler)
    }

    pub fn remove_handler(&self, channel: &str) -> Option<Arc<dyn BinaryHandler>> {
        self.handlers.remove(channel).map(|(_, handler)| handler)
    }

    /// Applies `BinaryMessenger::set_message_handler` semantics.
    pub fn update(&self, channel: &str, handler: Option<Arc<dyn BinaryHandler>>) {
        match handler {
            Some(handler) => {
                self.set_handler(channel, handler);
            }
            None => {
                self.remove_handler(channel);
            }
        }
    }

    pub fn has_handler(&self, channel: &str) -> bool {
        self.handlers.contains_key(channel)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs the handler for `channel` and returns its reply.
    ///
    /// Replies empty when no handler is registered or the handler fails.
    pub async fn dispatch(&self, channel: &str, message: Bytes) -> Bytes {
        // clone out of the map so no shard lock is held across the await
        let handler = self.handlers.get(channel).map(|entry| Arc::clone(entry.value()));
        let Some(handler) = handler else {
            warn!(channel, "no handler registered for channel");
            return Bytes::new();
        };

        debug!(channel, len = message.len(), "dispatching message");
        match handler.handle(message).await {
            Ok(reply) => reply,
            Err(error) => {
                warn!(channel, %error, "channel handler failed");
                Bytes::new()
            }
        }
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let channels: Vec<String> = self.handlers.iter().map(|e| e.key().clone()).collect();
        f.debug_struct("HandlerRegistry").field("channels", &channels).finish()
    }
}
