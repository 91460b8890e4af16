use stdpack::EncodableValue;

/// Failures reported by a `BinaryMessenger`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessengerError {
    /// The engine side is gone or the channel was closed.
    #[error("connection lost: {0}")]
    ConnectionLost(String),
    /// The pending send was dropped before a reply arrived.
    #[error("send cancelled")]
    Cancelled,
    /// Any other transport failure.
    #[error("i/o error: {0}")]
    Io(String),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Encoding or decoding an envelope failed.
    #[error(transparent)]
    Codec(#[from] stdpack::Error),
    #[error("messenger error: {0}")]
    Messenger(#[from] MessengerError),
    /// The far side replied with an empty message: nothing handles this channel or method.
    #[error("no handler for channel {channel}")]
    NotImplemented { channel: String },
    /// A method call completed with an error result.
    #[error("method failed with code {code}")]
    Remote {
        code: String,
        message: Option<String>,
        details: Option<EncodableValue>,
    },
    /// `MethodResult::as_success` / `as_error` called on the other variant.
    #[error("expected {expected} result, found {found}")]
    ResultKind {
        expected: &'static str,
        found: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
