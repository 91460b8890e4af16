//! Messengers for testing.
//!
//! These are used internally by the test suite and are not part of the public API.

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use bytes::Bytes;

use crate::messenger::BinaryHandler;
use crate::messenger::BinaryMessenger;
use crate::messenger::HandlerRegistry;
use crate::types::MessengerError;

/// Delivers every outgoing message to its own handler table.
///
/// Both ends of a channel live in the same process, so a handler installed
/// with `set_message_handler` serves the sends made on the same channel.
#[derive(Debug, Default)]
pub struct LoopbackMessenger {
    registry: HandlerRegistry,
    sent: AtomicUsize,
}

impl LoopbackMessenger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of messages sent so far.
    pub fn sent(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl BinaryMessenger for LoopbackMessenger {
    async fn send(&self, channel: &str, message: Bytes) -> Result<(), MessengerError> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        self.registry.dispatch(channel, message).await;
        Ok(())
    }

    async fn send_with_reply(&self, channel: &str, message: Bytes) -> Result<Bytes, MessengerError> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        Ok(self.registry.dispatch(channel, message).await)
    }

    fn set_message_handler(&self, channel: &str, handler: Option<Arc<dyn BinaryHandler>>) {
        self.registry.update(channel, handler);
    }
}

/// Answers every send with the same bytes, as captured from an engine.
pub struct CannedMessenger {
    reply: Bytes,
}

impl CannedMessenger {
    pub fn new(reply: impl Into<Bytes>) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.into(),
        })
    }
}

#[async_trait::async_trait]
impl BinaryMessenger for CannedMessenger {
    async fn send(&self, _channel: &str, _message: Bytes) -> Result<(), MessengerError> {
        Ok(())
    }

    async fn send_with_reply(&self, _channel: &str, _message: Bytes) -> Result<Bytes, MessengerError> {
        Ok(self.reply.clone())
    }

    fn set_message_handler(&self, _channel: &str, _handler: Option<Arc<dyn BinaryHandler>>) {}
}

/// A messenger whose engine has gone away.
pub struct ClosedMessenger;

#[async_trait::async_trait]
impl BinaryMessenger for ClosedMessenger {
    async fn send(&self, _channel: &str, _message: Bytes) -> Result<(), MessengerError> {
        Err(MessengerError::ConnectionLost("engine shut down".into()))
    }

    async fn send_with_reply(&self, _channel: &str, _message: Bytes) -> Result<Bytes, MessengerError> {
        Err(MessengerError::ConnectionLost("engine shut down".into()))
    }

    fn set_message_handler(&self, _channel: &str, _handler: Option<Arc<dyn BinaryHandler>>) {}
}
