mod macros;

pub mod types;
pub mod value;
pub mod cursor;
pub mod reader;
pub mod sink;
pub mod writer;
pub mod traverse;
pub mod codec;

pub use types::Result;
pub use types::Error;
pub use types::FormatError;
pub use types::Tag;
pub use types::Kind;
pub use types::Limits;
pub use types::DEFAULT_MAX_DEPTH;

pub use value::EncodableValue;
pub use value::ValueMap;

pub use cursor::Cursor;

pub use reader::Reader;
pub use reader::Token;

pub use sink::Sink;
pub use sink::GrowableSink;
pub use sink::FixedSink;

pub use writer::Writer;

pub use traverse::read_value;
pub use traverse::read_value_with_limits;
pub use traverse::write_value;

pub use codec::encode;
pub use codec::encode_to_bytes;
pub use codec::encode_into;
pub use codec::decode;
pub use codec::decode_with_limits;
pub use codec::MessageCodec;
pub use codec::StandardMessageCodec;
pub use codec::StringCodec;
