//! Method calls, results and message channels layered on the stdpack codec.

mod types;
mod message;

pub mod codec;
pub mod messenger;
pub mod channel;

#[cfg(test)]
mod mock_messenger;


pub use crate::types::Result;
pub use crate::types::Error;
pub use crate::types::MessengerError;

pub use crate::message::MethodCall;
pub use crate::message::MethodResult;

pub use crate::codec::encode_method_call;
pub use crate::codec::decode_method_call;
pub use crate::codec::encode_method_result;
pub use crate::codec::decode_method_result;
pub use crate::codec::MethodCodec;
pub use crate::codec::StandardMethodCodec;

pub use crate::messenger::BinaryMessenger;
pub use crate::messenger::BinaryHandler;
pub use crate::messenger::HandlerRegistry;

pub use crate::channel::BasicMessageChannel;
pub use crate::channel::MethodChannel;
pub use crate::channel::MessageHandler;
pub use crate::channel::MethodHandler;
