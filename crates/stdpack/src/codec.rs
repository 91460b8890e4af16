//! Top-level entry points and message codecs.

use bytes::Bytes;
use tracing::debug;

use crate::reader::Reader;
use crate::sink::FixedSink;
use crate::traverse::read_value_with_limits;
use crate::traverse::write_value;
use crate::types::FormatError;
use crate::types::Limits;
use crate::types::Result;
use crate::value::EncodableValue;
use crate::writer::Writer;

/// Encodes `value` into a fresh buffer.
pub fn encode(value: &EncodableValue) -> Result<Vec<u8>> {
    let mut writer = Writer::new();
    write_value(&mut writer, value)?;
    Ok(writer.into_vec())
}

pub fn encode_to_bytes(value: &EncodableValue) -> Result<Bytes> {
    let mut writer = Writer::new();
    write_value(&mut writer, value)?;
    Ok(writer.into_bytes())
}

/// Encodes `value` into the front of `buf`, returning the number of bytes used.
///
/// On `SinkFull` the contents of `buf` are unspecified.
pub fn encode_into(buf: &mut [u8], value: &EncodableValue) -> Result<usize> {
    let mut writer = Writer::with_sink(FixedSink::new(buf));
    write_value(&mut writer, value)?;
    Ok(writer.written())
}

/// Decodes one value from the start of `buf`. Trailing bytes are ignored.
pub fn decode(buf: &[u8]) -> Result<EncodableValue> {
    decode_with_limits(buf, &Limits::default())
}

pub fn decode_with_limits(buf: &[u8], limits: &Limits) -> Result<EncodableValue> {
    let mut reader = Reader::new(buf);
    let value = read_value_with_limits(&mut reader, limits)?;
    if !reader.is_exhausted() {
        debug!(trailing = reader.remaining(), "ignoring bytes after value");
    }
    Ok(value)
}

/// Converts between one message type and its binary form.
pub trait MessageCodec: Send + Sync + 'static {
    type Message: Send + 'static;

    fn encode_message(&self, message: &Self::Message) -> Result<Bytes>;
    fn decode_message(&self, message: &[u8]) -> Result<Self::Message>;
}

/// Carries any `EncodableValue`. `Limits` apply to decoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardMessageCodec {
    limits: Limits,
}

impl StandardMessageCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }
}

impl MessageCodec for StandardMessageCodec {
    type Message = EncodableValue;

    fn encode_message(&self, message: &EncodableValue) -> Result<Bytes> {
        let mut writer = Writer::new();
        write_value(&mut writer, message)?;
        Ok(writer.into_bytes())
    }

    fn decode_message(&self, message: &[u8]) -> Result<EncodableValue> {
        decode_with_limits(message, &self.limits)
    }
}

/// Raw UTF-8 text with no tag or size field.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringCodec;

impl MessageCodec for StringCodec {
    type Message = String;

    fn encode_message(&self, message: &String) -> Result<Bytes> {
        Ok(Bytes::copy_from_slice(message.as_bytes()))
    }

    fn decode_message(&self, message: &[u8]) -> Result<String> {
        std::str::from_utf8(message)
            .map(str::to_owned)
            .map_err(|e| FormatError::InvalidUtf8 { offset: e.valid_up_to() }.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_MAX_DEPTH;
    use crate::types::Error;

    #[test]
    fn decode_ignores_trailing_padding() {
        let value = decode(&[7, 3, 102, 111, 111, 0, 0, 0]).unwrap();
        assert_eq!(value, EncodableValue::from("foo"));
    }

    #[test]
    fn encode_into_arena() {
        let mut arena = [0u8; 8];
        let used = encode_into(&mut arena, &EncodableValue::from("foo")).unwrap();
        assert_eq!(&arena[..used], &[7, 3, 102, 111, 111]);

        let mut tiny = [0u8; 2];
        assert!(matches!(
            encode_into(&mut tiny, &EncodableValue::from("foo")),
            Err(Error::SinkFull { .. })
        ));
    }

    #[test]
    fn standard_codec_round_trip() {
        let codec = StandardMessageCodec::new();
        let value = EncodableValue::map([("a", EncodableValue::TRUE), ("b", EncodableValue::FALSE)]);
        let bytes = codec.encode_message(&value).unwrap();
        assert_eq!(&bytes[..], &[13, 2, 7, 1, 97, 1, 7, 1, 98, 2]);
        assert_eq!(codec.decode_message(&bytes).unwrap(), value);
    }

    #[test]
    fn encode_accepts_values_past_the_decode_limit() {
        let mut deep = EncodableValue::Null;
        for _ in 0..=DEFAULT_MAX_DEPTH {
            deep = EncodableValue::List(vec![deep]);
        }
        let bytes = encode(&deep).unwrap();
        assert!(matches!(decode(&bytes), Err(Error::RecursionLimitExceeded { .. })));
        let raised = Limits { max_depth: DEFAULT_MAX_DEPTH + 1 };
        assert_eq!(decode_with_limits(&bytes, &raised).unwrap(), deep);
    }

    #[test]
    fn standard_codec_limits() {
        let codec = StandardMessageCodec::with_limits(Limits { max_depth: 0 });
        let value = EncodableValue::list([1i32]);
        let bytes = codec.encode_message(&value).unwrap();
        assert!(matches!(
            codec.decode_message(&bytes),
            Err(Error::RecursionLimitExceeded { limit: 0 })
        ));
        assert_eq!(StandardMessageCodec::new().decode_message(&bytes).unwrap(), value);
        assert_eq!(codec.decode_message(&[3, 1, 0, 0, 0]).unwrap(), EncodableValue::Int32(1));
    }

    #[test]
    fn string_codec_is_raw_utf8() {
        let codec = StringCodec;
        let bytes = codec.encode_message(&"héllo".to_owned()).unwrap();
        assert_eq!(&bytes[..], "héllo".as_bytes());
        assert_eq!(codec.decode_message(&bytes).unwrap(), "héllo");
        let err = codec.decode_message(&[b'o', b'k', 0xff, 0xfe]).unwrap_err();
        assert!(err.is_invalid_format());
        assert_eq!(err, Error::InvalidFormat(FormatError::InvalidUtf8 { offset: 2 }));
    }
}
