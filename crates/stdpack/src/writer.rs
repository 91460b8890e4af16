//! # Writer
//!
//! Appends encoded values to a `Sink`.
//!
//! ## Invariants
//! - Alignment padding is computed from `written`, the number of bytes in the
//!   sink including any it held before the writer was created. The sink has
//!   to start at offset 0 of the buffer the reader will later see.
//! - Size fields use the smallest of the 1, 3, or 5 byte forms.
//! - `write_list_start(n)` and `write_map_start(n)` must be followed by
//!   exactly `n` values (list) or `n` key/value pairs (map). Nothing checks this.

use bytes::Bytes;

use crate::cursor::SIZE_I32_MARKER;
use crate::cursor::SIZE_U16_MARKER;
use crate::cursor::padding;
use crate::cursor::size_field_len;
use crate::macros::LeScalar;
use crate::macros::encode_sequence;
use crate::macros::for_each_sequence;
use crate::sink::GrowableSink;
use crate::sink::Sink;
use crate::types::Error;
use crate::types::Kind;
use crate::types::Result;
use crate::types::Tag;

#[derive(Debug)]
pub struct Writer<S: Sink = GrowableSink> {
    sink: S,
    written: usize,
}

impl Writer<GrowableSink> {
    pub fn new() -> Self {
        Self::with_sink(GrowableSink::new())
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.sink.into_vec()
    }

    pub fn into_bytes(self) -> Bytes {
        self.sink.into_bytes()
    }
}

impl Default for Writer<GrowableSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Sink> Writer<S> {
    pub fn with_sink(sink: S) -> Self {
        let written = sink.len();
        Self { sink, written }
    }

    /// Bytes in the sink so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn put(&mut self, bytes: &[u8]) -> Result<()> {
        let dst = self.sink.reserve(bytes.len())?;
        dst.copy_from_slice(bytes);
        self.sink.commit(bytes.len());
        self.written += bytes.len();
        Ok(())
    }

    fn put_le<T: LeScalar>(&mut self, v: T) -> Result<()> {
        let dst = self.sink.reserve(T::WIDTH)?;
        v.write_le(dst);
        self.sink.commit(T::WIDTH);
        self.written += T::WIDTH;
        Ok(())
    }

    /// Zero-pads until `written` is a multiple of `width`.
    fn pad_to(&mut self, width: usize) -> Result<()> {
        let pad = padding(self.written, width);
        if pad > 0 {
            // reserved regions come back zeroed
            self.sink.reserve(pad)?;
            self.sink.commit(pad);
            self.written += pad;
        }
        Ok(())
    }

    fn write_tag(&mut self, tag: Tag) -> Result<()> {
        self.put(&[tag as u8])
    }

    /// Writes a variable-width size field.
    pub fn write_size(&mut self, size: usize) -> Result<()> {
        match size_field_len(size) {
            Some(1) => self.put(&[size as u8]),
            Some(3) => {
                self.put(&[SIZE_U16_MARKER])?;
                self.put_le(size as u16)
            }
            Some(_) => {
                self.put(&[SIZE_I32_MARKER])?;
                self.put_le(size as i32)
            }
            None => Err(Error::SizeTooLarge(size)),
        }
    }

    /// Writes one raw byte with no tag, as used by the method result envelope.
    pub fn write_raw_u8(&mut self, byte: u8) -> Result<()> {
        self.put(&[byte])
    }

    pub fn write_null(&mut self) -> Result<()> {
        self.write_tag(Tag::Null)
    }

    pub fn write_bool(&mut self, v: bool) -> Result<()> {
        self.write_tag(if v { Tag::True } else { Tag::False })
    }

    pub fn write_int32(&mut self, v: i32) -> Result<()> {
        self.write_tag(Tag::Int32)?;
        self.put_le(v)
    }

    pub fn write_int64(&mut self, v: i64) -> Result<()> {
        self.write_tag(Tag::Int64)?;
        self.put_le(v)
    }

    pub fn write_float64(&mut self, v: f64) -> Result<()> {
        self.write_tag(Tag::Float64)?;
        self.pad_to(8)?;
        self.put_le(v)
    }

    pub fn write_str(&mut self, v: &str) -> Result<()> {
        self.write_tag(Tag::String)?;
        self.write_size(v.len())?;
        self.put(v.as_bytes())
    }

    pub fn write_list_start(&mut self, len: usize) -> Result<()> {
        self.write_tag(Tag::List)?;
        self.write_size(len)
    }

    pub fn write_map_start(&mut self, len: usize) -> Result<()> {
        self.write_tag(Tag::Map)?;
        self.write_size(len)
    }

    /// Tag, element count, padding to the element width, payload.
    pub(crate) fn write_sequence<T: LeScalar>(&mut self, kind: Kind, v: &[T]) -> Result<()> {
        let len = v
            .len()
            .checked_mul(T::WIDTH)
            .ok_or(Error::SizeTooLarge(v.len()))?;
        self.write_tag(kind.tag())?;
        self.write_size(v.len())?;
        if T::WIDTH > 1 {
            self.pad_to(T::WIDTH)?;
        }
        let dst = self.sink.reserve(len)?;
        for (chunk, x) in dst.chunks_exact_mut(T::WIDTH).zip(v) {
            x.write_le(chunk);
        }
        self.sink.commit(len);
        self.written += len;
        Ok(())
    }

    for_each_sequence!(encode_sequence);
}
