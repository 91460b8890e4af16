//! # Method Envelope
//!
//! Calls and results are sequences of plain stdpack values.
//!
//! - Call: `String(name)`, then the arguments value.
//! - Result: one raw byte, `0` for success or `1` for error. Success is
//!   followed by the result value. Error is followed by `String(code)`, the
//!   message (`String` or `Null`) and the details (any value, `Null` if absent).
//!
//! Bytes after the envelope are ignored.

use bytes::Bytes;
use stdpack::EncodableValue;
use stdpack::FormatError;
use stdpack::Kind;
use stdpack::Limits;
use stdpack::Reader;
use stdpack::Writer;
use stdpack::read_value_with_limits;
use stdpack::write_value;
use tracing::debug;
use tracing::trace;

use crate::message::MethodCall;
use crate::message::MethodResult;
use crate::types::Error;
use crate::types::Result;

pub const RESULT_SUCCESS: u8 = 0;
pub const RESULT_ERROR: u8 = 1;

fn unexpected(context: &'static str, found: Kind) -> Error {
    Error::Codec(FormatError::UnexpectedKind { context, found }.into())
}

fn note_trailing(reader: &Reader<'_>) {
    if !reader.is_exhausted() {
        debug!(trailing = reader.remaining(), "ignoring bytes after envelope");
    }
}

pub fn encode_method_call(call: &MethodCall) -> Result<Bytes> {
    let mut writer = Writer::new();
    writer.write_str(&call.name)?;
    write_value(&mut writer, &call.arguments)?;
    trace!(method = %call.name, len = writer.written(), "encoded method call");
    Ok(writer.into_bytes())
}

pub fn decode_method_call(buf: &[u8]) -> Result<MethodCall> {
    decode_method_call_with_limits(buf, &Limits::default())
}

pub fn decode_method_call_with_limits(buf: &[u8], limits: &Limits) -> Result<MethodCall> {
    let mut reader = Reader::new(buf);
    let name = match read_value_with_limits(&mut reader, limits)? {
        EncodableValue::String(name) => name,
        other => return Err(unexpected("method name", other.kind())),
    };
    let arguments = read_value_with_limits(&mut reader, limits)?;
    note_trailing(&reader);
    trace!(method = %name, "decoded method call");
    Ok(MethodCall { name, arguments })
}

pub fn encode_method_result(result: &MethodResult) -> Result<Bytes> {
    let mut writer = Writer::new();
    match result {
        MethodResult::Success(value) => {
            writer.write_raw_u8(RESULT_SUCCESS)?;
            write_value(&mut writer, value)?;
        }
        MethodResult::Error {
            code,
            message,
            details,
        } => {
            writer.write_raw_u8(RESULT_ERROR)?;
            writer.write_str(code)?;
            match message {
                Some(message) => writer.write_str(message)?,
                None => writer.write_null()?,
            }
            match details {
                Some(details) => write_value(&mut writer, details)?,
                None => writer.write_null()?,
            }
        }
    }
    trace!(success = result.is_success(), len = writer.written(), "encoded method result");
    Ok(writer.into_bytes())
}

pub fn decode_method_result(buf: &[u8]) -> Result<MethodResult> {
    decode_method_result_with_limits(buf, &Limits::default())
}

pub fn decode_method_result_with_limits(buf: &[u8], limits: &Limits) -> Result<MethodResult> {
    let mut reader = Reader::new(buf);
    let result = match reader.read_raw_u8()? {
        RESULT_SUCCESS => MethodResult::Success(read_value_with_limits(&mut reader, limits)?),
        RESULT_ERROR => {
            let code = match read_value_with_limits(&mut reader, limits)? {
                EncodableValue::String(code) => code,
                other => return Err(unexpected("error code", other.kind())),
            };
            let message = match read_value_with_limits(&mut reader, limits)? {
                EncodableValue::String(message) => Some(message),
                EncodableValue::Null => None,
                other => return Err(unexpected("error message", other.kind())),
            };
            let details = match read_value_with_limits(&mut reader, limits)? {
                EncodableValue::Null => None,
                details => Some(details),
            };
            MethodResult::Error {
                code,
                message,
                details,
            }
        }
        tag => return Err(Error::Codec(FormatError::InvalidResultTag(tag).into())),
    };
    note_trailing(&reader);
    Ok(result)
}

/// Converts method calls and results to and from their binary form.
pub trait MethodCodec: Send + Sync + 'static {
    fn encode_method_call(&self, call: &MethodCall) -> Result<Bytes>;
    fn decode_method_call(&self, buf: &[u8]) -> Result<MethodCall>;
    fn encode_method_result(&self, result: &MethodResult) -> Result<Bytes>;
    fn decode_method_result(&self, buf: &[u8]) -> Result<MethodResult>;
}

/// The standard envelope. `Limits` apply to decoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardMethodCodec {
    limits: Limits,
}

impl StandardMethodCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self { limits }
    }
}

impl MethodCodec for StandardMethodCodec {
    fn encode_method_call(&self, call: &MethodCall) -> Result<Bytes> {
        encode_method_call(call)
    }

    fn decode_method_call(&self, buf: &[u8]) -> Result<MethodCall> {
        decode_method_call_with_limits(buf, &self.limits)
    }

    fn encode_method_result(&self, result: &MethodResult) -> Result<Bytes> {
        encode_method_result(result)
    }

    fn decode_method_result(&self, buf: &[u8]) -> Result<MethodResult> {
        decode_method_result_with_limits(buf, &self.limits)
    }
}
