//! Whole-value decode and encode on top of `Reader` and `Writer`.

use crate::reader::Reader;
use crate::sink::Sink;
use crate::types::Error;
use crate::types::FormatError;
use crate::types::Kind;
use crate::types::Limits;
use crate::types::Result;
use crate::value::EncodableValue;
use crate::value::ValueMap;
use crate::writer::Writer;

/// Reads the next complete value, descending into lists and maps.
///
/// Fails with `InvalidFormat(NoValue)` if the reader is already exhausted.
pub fn read_value(reader: &mut Reader<'_>) -> Result<EncodableValue> {
    read_value_with_limits(reader, &Limits::default())
}

pub fn read_value_with_limits(reader: &mut Reader<'_>, limits: &Limits) -> Result<EncodableValue> {
    read_value_impl(reader, limits, 0)
}

/// `depth` counts the lists and maps enclosing the value being read.
fn read_value_impl(reader: &mut Reader<'_>, limits: &Limits, depth: usize) -> Result<EncodableValue> {
    if !reader.read()? {
        return Err(FormatError::NoValue.into());
    }
    let kind = reader.kind().ok_or(FormatError::NoValue)?;

    let value = match kind {
        Kind::Null => EncodableValue::Null,
        Kind::True | Kind::False => EncodableValue::Bool(reader.get_bool()?),
        Kind::Int32 => EncodableValue::Int32(reader.get_int32()?),
        Kind::Int64 => EncodableValue::Int64(reader.get_int64()?),
        Kind::Float64 => EncodableValue::Float64(reader.get_float64()?),
        Kind::String => EncodableValue::String(reader.get_str()?.to_owned()),
        Kind::ByteSequence => EncodableValue::ByteSequence(reader.get_byte_sequence()?),
        Kind::Int32Sequence => EncodableValue::Int32Sequence(reader.get_int32_sequence()?),
        Kind::Int64Sequence => EncodableValue::Int64Sequence(reader.get_int64_sequence()?),
        Kind::Float32Sequence => EncodableValue::Float32Sequence(reader.get_float32_sequence()?),
        Kind::Float64Sequence => EncodableValue::Float64Sequence(reader.get_float64_sequence()?),
        Kind::List => {
            let count = reader.size()?;
            check_depth(depth, limits)?;
            // every element takes at least one byte
            let mut items = Vec::with_capacity(count.min(reader.remaining()));
            for _ in 0..count {
                items.push(read_value_impl(reader, limits, depth + 1)?);
            }
            EncodableValue::List(items)
        }
        Kind::Map => {
            let count = reader.size()?;
            check_depth(depth, limits)?;
            let mut map = ValueMap::new();
            for _ in 0..count {
                let key = read_value_impl(reader, limits, depth + 1)?;
                let value = read_value_impl(reader, limits, depth + 1)?;
                map.insert(key, value);
            }
            EncodableValue::Map(map)
        }
    };
    Ok(value)
}

fn check_depth(depth: usize, limits: &Limits) -> Result<()> {
    if depth >= limits.max_depth {
        return Err(Error::RecursionLimitExceeded {
            limit: limits.max_depth,
        });
    }
    Ok(())
}

/// Writes `value` and, recursively, everything inside it.
///
/// Any value that can be built can be written; nesting is only limited when reading.
pub fn write_value<S: Sink>(writer: &mut Writer<S>, value: &EncodableValue) -> Result<()> {
    match value {
        EncodableValue::Null => writer.write_null(),
        EncodableValue::Bool(v) => writer.write_bool(*v),
        EncodableValue::Int32(v) => writer.write_int32(*v),
        EncodableValue::Int64(v) => writer.write_int64(*v),
        EncodableValue::Float64(v) => writer.write_float64(*v),
        EncodableValue::String(v) => writer.write_str(v),
        EncodableValue::ByteSequence(v) => writer.write_byte_sequence(v),
        EncodableValue::Int32Sequence(v) => writer.write_int32_sequence(v),
        EncodableValue::Int64Sequence(v) => writer.write_int64_sequence(v),
        EncodableValue::Float32Sequence(v) => writer.write_float32_sequence(v),
        EncodableValue::Float64Sequence(v) => writer.write_float64_sequence(v),
        EncodableValue::List(items) => {
            writer.write_list_start(items.len())?;
            for item in items {
                write_value(writer, item)?;
            }
            Ok(())
        }
        EncodableValue::Map(map) => {
            writer.write_map_start(map.len())?;
            for (key, value) in map {
                write_value(writer, key)?;
                write_value(writer, value)?;
            }
            Ok(())
        }
    }
}
