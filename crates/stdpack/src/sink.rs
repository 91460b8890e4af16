//! Byte sinks the `Writer` appends into.

use bytes::Bytes;

use crate::types::Error;
use crate::types::Result;

/// A destination for encoded bytes.
///
/// Writing is two-phase: `reserve(n)` hands out a zeroed region of exactly
/// `n` bytes past the committed data, and `commit(n)` makes those bytes part
/// of the output. Reserved but uncommitted bytes are overwritten by the next
/// reservation.
pub trait Sink {
    fn reserve(&mut self, n: usize) -> Result<&mut [u8]>;

    /// Commits the first `n` bytes of the last reservation.
    fn commit(&mut self, n: usize);

    /// Number of committed bytes.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An in-memory sink backed by a `Vec<u8>`. Never full.
#[derive(Debug, Clone, Default)]
pub struct GrowableSink {
    buf: Vec<u8>,
    len: usize,
}

impl GrowableSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            len: 0,
        }
    }

    /// The committed bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn into_vec(mut self) -> Vec<u8> {
        self.buf.truncate(self.len);
        self.buf
    }

    pub fn into_bytes(self) -> Bytes {
        Bytes::from(self.into_vec())
    }
}

impl Sink for GrowableSink {
    fn reserve(&mut self, n: usize) -> Result<&mut [u8]> {
        let end = self.len.checked_add(n).ok_or(Error::SizeTooLarge(n))?;
        self.buf.truncate(self.len);
        self.buf.resize(end, 0);
        Ok(&mut self.buf[self.len..end])
    }

    fn commit(&mut self, n: usize) {
        debug_assert!(self.len + n <= self.buf.len(), "commit past reservation");
        self.len = (self.len + n).min(self.buf.len());
    }

    fn len(&self) -> usize {
        self.len
    }
}

/// A sink over a caller-provided, pre-sized arena.
///
/// Reservations that do not fit fail with `SinkFull`; the arena is never
/// reallocated.
#[derive(Debug)]
pub struct FixedSink<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl<'a> FixedSink<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, len: 0 }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl Sink for FixedSink<'_> {
    fn reserve(&mut self, n: usize) -> Result<&mut [u8]> {
        let available = self.buf.len() - self.len;
        if n > available {
            return Err(Error::SinkFull {
                requested: n,
                available,
            });
        }
        let region = &mut self.buf[self.len..self.len + n];
        region.fill(0);
        Ok(region)
    }

    fn commit(&mut self, n: usize) {
        debug_assert!(self.len + n <= self.buf.len(), "commit past reservation");
        self.len = (self.len + n).min(self.buf.len());
    }

    fn len(&self) -> usize {
        self.len
    }
}
