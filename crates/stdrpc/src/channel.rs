//! Typed channels over a `BinaryMessenger`.

use std::sync::Arc;

use bytes::Bytes;
use stdpack::EncodableValue;
use stdpack::MessageCodec;
use tracing::debug;

use crate::codec::MethodCodec;
use crate::message::MethodCall;
use crate::message::MethodResult;
use crate::messenger::BinaryHandler;
use crate::messenger::BinaryMessenger;
use crate::types::Error;
use crate::types::Result;

/// Handles decoded messages arriving on a `BasicMessageChannel`.
#[async_trait::async_trait]
pub trait MessageHandler<T: Send + 'static>: Send + Sync + 'static {
    /// Returns the reply, or `None` to reply empty.
    async fn on_message(&self, message: T) -> Option<T>;
}

/// Handles method calls arriving on a `MethodChannel`.
#[async_trait::async_trait]
pub trait MethodHandler: Send + Sync + 'static {
    /// Returns the result, or `None` if the method is not implemented.
    async fn on_method_call(&self, call: MethodCall) -> Option<MethodResult>;
}

/// Sends and receives single messages of one codec's message type.
pub struct BasicMessageChannel<C: MessageCodec> {
    name: String,
    messenger: Arc<dyn BinaryMessenger>,
    codec: Arc<C>,
}

impl<C: MessageCodec> BasicMessageChannel<C> {
    pub fn new(name: impl Into<String>, messenger: Arc<dyn BinaryMessenger>, codec: C) -> Self {
        Self {
            name: name.into(),
            messenger,
            codec: Arc::new(codec),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn send(&self, message: &C::Message) -> Result<()> {
        let bytes = self.codec.encode_message(message)?;
        self.messenger.send(&self.name, bytes).await?;
        Ok(())
    }

    /// Sends `message` and decodes the reply. An empty reply is `None`.
    pub async fn send_with_reply(&self, message: &C::Message) -> Result<Option<C::Message>> {
        let bytes = self.codec.encode_message(message)?;
        let reply = self.messenger.send_with_reply(&self.name, bytes).await?;
        if reply.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.codec.decode_message(&reply)?))
    }

    pub fn set_message_handler(&self, handler: Option<Arc<dyn MessageHandler<C::Message>>>) {
        let adapter = handler.map(|handler| {
            Arc::new(MessageAdapter {
                codec: Arc::clone(&self.codec),
                handler,
            }) as Arc<dyn BinaryHandler>
        });
        self.messenger.set_message_handler(&self.name, adapter);
    }
}

struct MessageAdapter<C: MessageCodec> {
    codec: Arc<C>,
    handler: Arc<dyn MessageHandler<C::Message>>,
}

#[async_trait::async_trait]
impl<C: MessageCodec> BinaryHandler for MessageAdapter<C> {
    async fn handle(&self, message: Bytes) -> Result<Bytes> {
        let message = self.codec.decode_message(&message)?;
        match self.handler.on_message(message).await {
            Some(reply) => Ok(self.codec.encode_message(&reply)?),
            None => Ok(Bytes::new()),
        }
    }
}

/// Invokes named methods on the engine and serves calls from it.
pub struct MethodChannel<C: MethodCodec> {
    name: String,
    messenger: Arc<dyn BinaryMessenger>,
    codec: Arc<C>,
}

impl<C: MethodCodec> MethodChannel<C> {
    pub fn new(name: impl Into<String>, messenger: Arc<dyn BinaryMessenger>, codec: C) -> Self {
        Self {
            name: name.into(),
            messenger,
            codec: Arc::new(codec),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sends `call` and decodes the result envelope.
    ///
    /// An empty reply is `Error::NotImplemented`.
    pub async fn invoke_method(&self, call: &MethodCall) -> Result<MethodResult> {
        let bytes = self.codec.encode_method_call(call)?;
        debug!(channel = %self.name, method = %call.name, "invoking method");
        let reply = self.messenger.send_with_reply(&self.name, bytes).await?;
        if reply.is_empty() {
            return Err(Error::NotImplemented {
                channel: self.name.clone(),
            });
        }
        self.codec.decode_method_result(&reply)
    }

    /// Invokes `method` and returns its value, turning error results into `Error::Remote`.
    pub async fn invoke(
        &self,
        method: &str,
        arguments: impl Into<EncodableValue>,
    ) -> Result<EncodableValue> {
        let call = MethodCall::new(method, arguments);
        self.invoke_method(&call).await?.into_result()
    }

    pub fn set_method_call_handler(&self, handler: Option<Arc<dyn MethodHandler>>) {
        let adapter = handler.map(|handler| {
            Arc::new(MethodAdapter {
                codec: Arc::clone(&self.codec),
                handler,
            }) as Arc<dyn BinaryHandler>
        });
        self.messenger.set_message_handler(&self.name, adapter);
    }
}

struct MethodAdapter<C: MethodCodec> {
    codec: Arc<C>,
    handler: Arc<dyn MethodHandler>,
}

#[async_trait::async_trait]
impl<C: MethodCodec> BinaryHandler for MethodAdapter<C> {
    async fn handle(&self, message: Bytes) -> Result<Bytes> {
        let call = self.codec.decode_method_call(&message)?;
        let method = call.name.clone();
        match self.handler.on_method_call(call).await {
            Some(result) => self.codec.encode_method_result(&result),
            None => {
                debug!(%method, "method not implemented");
                Ok(Bytes::new())
            }
        }
    }
}
