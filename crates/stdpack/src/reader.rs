//! # Reader
//!
//! A forward-only decoder that yields one token per `read()` call.
//!
//! ## Invariants
//! - Every slice taken from the buffer is bounds-checked; truncated input is
//!   `InvalidFormat`, never a panic.
//! - `List` and `Map` tokens carry only their count. The caller reads the
//!   children with `count` (list) or `2 * count` (map) further `read()` calls.
//! - A failed `read()` fuses the reader: every later call returns `Ok(false)`.

use crate::cursor::Cursor;
use crate::macros::LeScalar;
use crate::macros::decode_sequence;
use crate::macros::for_each_sequence;
use crate::types::Error;
use crate::types::FormatError;
use crate::types::Kind;
use crate::types::Result;
use crate::types::Tag;

/// The token most recently decoded by a `Reader`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: Kind,
    /// Offset of the tag byte from the start of the buffer.
    pub offset: usize,
    /// Payload bytes for scalars, strings and sequences. Empty otherwise.
    pub payload: &'a [u8],
    /// Element count for sequences, lists and maps.
    pub size: Option<usize>,
}

/// Token-at-a-time decoder over an immutable buffer.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    cursor: Cursor<'a>,
    token: Option<Token<'a>>,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(buf),
            token: None,
        }
    }

    /// Current offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.cursor.pos()
    }

    /// Bytes left after the current position.
    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor.is_empty()
    }

    /// Advances to the next token.
    ///
    /// Returns `Ok(false)` at the end of the buffer, and keeps doing so.
    pub fn read(&mut self) -> Result<bool> {
        if self.cursor.is_empty() {
            self.token = None;
            return Ok(false);
        }
        match self.read_token() {
            Ok(token) => {
                tracing::trace!(kind = %token.kind, offset = token.offset, "decoded token");
                self.token = Some(token);
                Ok(true)
            }
            Err(err) => {
                self.token = None;
                self.cursor.exhaust();
                Err(err)
            }
        }
    }

    /// Reads one raw byte that is not a value tag (e.g. an envelope marker).
    pub fn read_raw_u8(&mut self) -> Result<u8> {
        self.token = None;
        self.cursor.read_u8()
    }

    fn read_token(&mut self) -> Result<Token<'a>> {
        let offset = self.cursor.pos();
        let byte = self.cursor.read_u8()?;
        let tag = Tag::from_u8(byte).ok_or(FormatError::InvalidTag { tag: byte, offset })?;

        let (payload, size): (&'a [u8], Option<usize>) = match tag {
            Tag::Null | Tag::True | Tag::False => (&[], None),
            Tag::Int32 => (self.cursor.read_bytes(4)?, None),
            Tag::Int64 => (self.cursor.read_bytes(8)?, None),
            Tag::Float64 => {
                self.cursor.align(8)?;
                (self.cursor.read_bytes(8)?, None)
            }
            Tag::String | Tag::LargeInt => {
                let len = self.cursor.read_size()?;
                (self.cursor.read_bytes(len)?, None)
            }
            Tag::ByteSequence => self.read_sequence(1)?,
            Tag::Int32Sequence | Tag::Float32Sequence => self.read_sequence(4)?,
            Tag::Int64Sequence | Tag::Float64Sequence => self.read_sequence(8)?,
            Tag::List | Tag::Map => (&[], Some(self.cursor.read_size()?)),
        };

        Ok(Token {
            kind: tag.kind(),
            offset,
            payload,
            size,
        })
    }

    fn read_sequence(&mut self, width: usize) -> Result<(&'a [u8], Option<usize>)> {
        let count = self.cursor.read_size()?;
        if width > 1 {
            self.cursor.align(width)?;
        }
        let len = count.checked_mul(width).ok_or(FormatError::UnexpectedEnd {
            offset: self.cursor.pos(),
            needed: usize::MAX,
            available: self.cursor.remaining(),
        })?;
        Ok((self.cursor.read_bytes(len)?, Some(count)))
    }

    /// The current token, if any.
    pub fn token(&self) -> Option<&Token<'a>> {
        self.token.as_ref()
    }

    /// Kind of the current token, if any.
    pub fn kind(&self) -> Option<Kind> {
        self.token.map(|t| t.kind)
    }

    fn token_of(&self, kind: Kind) -> Result<&Token<'a>> {
        match &self.token {
            Some(token) if token.kind == kind => Ok(token),
            _ => Err(Error::mismatch(kind.name(), self.kind())),
        }
    }

    pub(crate) fn payload_of(&self, kind: Kind) -> Result<&'a [u8]> {
        Ok(self.token_of(kind)?.payload)
    }

    /// Element count of a sequence, or entry count of a list or map.
    pub fn size(&self) -> Result<usize> {
        match self.token.and_then(|t| t.size) {
            Some(size) => Ok(size),
            None => Err(Error::mismatch("list, map, or sequence", self.kind())),
        }
    }

    pub fn get_bool(&self) -> Result<bool> {
        match self.kind() {
            Some(Kind::True) => Ok(true),
            Some(Kind::False) => Ok(false),
            found => Err(Error::mismatch("bool", found)),
        }
    }

    pub fn get_int32(&self) -> Result<i32> {
        Ok(i32::read_le(self.payload_of(Kind::Int32)?))
    }

    pub fn get_int64(&self) -> Result<i64> {
        Ok(i64::read_le(self.payload_of(Kind::Int64)?))
    }

    pub fn get_float64(&self) -> Result<f64> {
        Ok(f64::read_le(self.payload_of(Kind::Float64)?))
    }

    /// Borrows the string payload. Fails on invalid UTF-8.
    pub fn get_str(&self) -> Result<&'a str> {
        let token = self.token_of(Kind::String)?;
        std::str::from_utf8(token.payload)
            .map_err(|_| FormatError::InvalidUtf8 { offset: token.offset }.into())
    }

    /// Borrows a byte sequence payload without copying.
    pub fn get_bytes(&self) -> Result<&'a [u8]> {
        self.payload_of(Kind::ByteSequence)
    }

    for_each_sequence!(decode_sequence);
}

/// Decodes `payload` element by element.
pub(crate) fn collect_elements<T: LeScalar>(payload: &[u8]) -> Vec<T> {
    let mut out = Vec::with_capacity(payload.len() / T::WIDTH);
    for chunk in payload.chunks_exact(T::WIDTH) {
        out.push(T::read_le(chunk));
    }
    out
}
