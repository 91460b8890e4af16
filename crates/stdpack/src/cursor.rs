use crate::macros::LeScalar;
use crate::types::FormatError;
use crate::types::Result;

/// Size fields whose first byte is below this value are the size itself.
pub const SIZE_U16_MARKER: u8 = 254;
/// First byte of a size field followed by a 4-byte signed count.
pub const SIZE_I32_MARKER: u8 = 255;

/// A forward-only, bounds-checked position within a borrowed buffer.
///
/// Offsets are always measured from the start of the buffer, which is what
/// alignment is computed against.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    slice: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(slice: &'a [u8]) -> Self {
        Self { slice, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.slice.len()
    }

    pub fn remaining(&self) -> usize {
        self.slice.len().saturating_sub(self.pos)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Moves to the end of the buffer. Subsequent reads see no data.
    pub fn exhaust(&mut self) {
        self.pos = self.slice.len();
    }

    #[inline]
    fn need(&self, n: usize) -> Result<()> {
        if n > self.remaining() {
            return Err(FormatError::UnexpectedEnd {
                offset: self.pos,
                needed: n,
                available: self.remaining(),
            }
            .into());
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.need(1)?;
        let byte = self.slice[self.pos];
        self.pos += 1;
        Ok(byte)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.need(len)?;
        let bytes = &self.slice[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    pub(crate) fn read_le<T: LeScalar>(&mut self) -> Result<T> {
        let bytes = self.read_bytes(T::WIDTH)?;
        Ok(T::read_le(bytes))
    }

    /// Skips padding until the position is a multiple of `width`.
    pub fn align(&mut self, width: usize) -> Result<()> {
        let pad = padding(self.pos, width);
        if pad > 0 {
            self.read_bytes(pad)?;
        }
        Ok(())
    }

    /// Reads a variable-width size field.
    ///
    /// The marker byte is followed immediately by the count: the field spans
    /// 1, 3, or 5 bytes in total.
    pub fn read_size(&mut self) -> Result<usize> {
        let offset = self.pos;
        match self.read_u8()? {
            SIZE_U16_MARKER => Ok(self.read_le::<u16>()? as usize),
            SIZE_I32_MARKER => {
                let size = self.read_le::<i32>()?;
                usize::try_from(size).map_err(|_| FormatError::NegativeSize { offset, size }.into())
            }
            b => Ok(b as usize),
        }
    }
}

/// Number of padding bytes that bring `offset` up to a multiple of `width`.
#[inline]
pub(crate) fn padding(offset: usize, width: usize) -> usize {
    match offset % width {
        0 => 0,
        rem => width - rem,
    }
}

/// Encoded length of a size field, or `None` if it cannot be represented.
pub fn size_field_len(size: usize) -> Option<usize> {
    if size < SIZE_U16_MARKER as usize {
        Some(1)
    } else if size <= u16::MAX as usize {
        Some(3)
    } else if size <= i32::MAX as usize {
        Some(5)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Error;

    #[test]
    fn cursor_basic() {
        let data = b"hello world";
        let mut cursor = Cursor::new(data);

        assert_eq!(cursor.pos(), 0);
        assert_eq!(cursor.remaining(), 11);

        let bytes = cursor.read_bytes(5).unwrap();
        assert_eq!(bytes, b"hello");
        assert_eq!(cursor.pos(), 5);
        assert_eq!(cursor.remaining(), 6);
    }

    #[test]
    fn cursor_reports_truncation() {
        let mut cursor = Cursor::new(b"short");
        cursor.read_u8().unwrap();

        match cursor.read_bytes(10) {
            Err(Error::InvalidFormat(FormatError::UnexpectedEnd { offset, needed, available })) => {
                assert_eq!((offset, needed, available), (1, 10, 4));
            }
            other => panic!("expected UnexpectedEnd, got {:?}", other),
        }
        // a failed read does not move the cursor
        assert_eq!(cursor.pos(), 1);
    }

    #[test]
    fn align_skips_to_multiple() {
        let data = [0u8; 16];
        let mut cursor = Cursor::new(&data);
        cursor.read_bytes(3).unwrap();
        cursor.align(8).unwrap();
        assert_eq!(cursor.pos(), 8);
        cursor.align(8).unwrap();
        assert_eq!(cursor.pos(), 8);
        cursor.read_u8().unwrap();
        cursor.align(4).unwrap();
        assert_eq!(cursor.pos(), 12);
    }

    #[test]
    fn align_past_end_fails() {
        let data = [0u8; 5];
        let mut cursor = Cursor::new(&data);
        cursor.read_bytes(3).unwrap();
        assert!(cursor.align(8).unwrap_err().is_invalid_format());
    }

    #[test]
    fn size_single_byte() {
        let mut cursor = Cursor::new(&[0, 1, 253]);
        assert_eq!(cursor.read_size().unwrap(), 0);
        assert_eq!(cursor.read_size().unwrap(), 1);
        assert_eq!(cursor.read_size().unwrap(), 253);
        assert!(cursor.is_empty());
    }

    #[test]
    fn size_u16_marker_spans_three_bytes() {
        let mut cursor = Cursor::new(&[254, 254, 0, 254, 0xff, 0xff]);
        assert_eq!(cursor.read_size().unwrap(), 254);
        assert_eq!(cursor.pos(), 3);
        assert_eq!(cursor.read_size().unwrap(), 65535);
        assert_eq!(cursor.pos(), 6);
    }

    #[test]
    fn size_i32_marker_spans_five_bytes() {
        let mut cursor = Cursor::new(&[255, 0x00, 0x00, 0x01, 0x00]);
        assert_eq!(cursor.read_size().unwrap(), 65536);
        assert_eq!(cursor.pos(), 5);
    }

    #[test]
    fn size_negative_rejected() {
        let mut cursor = Cursor::new(&[255, 0xff, 0xff, 0xff, 0xff]);
        match cursor.read_size() {
            Err(Error::InvalidFormat(FormatError::NegativeSize { offset: 0, size: -1 })) => {}
            other => panic!("expected NegativeSize, got {:?}", other),
        }
    }

    #[test]
    fn size_truncated_rejected() {
        assert!(Cursor::new(&[254, 1]).read_size().unwrap_err().is_invalid_format());
        assert!(Cursor::new(&[255, 1, 2, 3]).read_size().unwrap_err().is_invalid_format());
        assert!(Cursor::new(&[]).read_size().unwrap_err().is_invalid_format());
    }

    #[test]
    fn size_field_lengths() {
        assert_eq!(size_field_len(0), Some(1));
        assert_eq!(size_field_len(253), Some(1));
        assert_eq!(size_field_len(254), Some(3));
        assert_eq!(size_field_len(65535), Some(3));
        assert_eq!(size_field_len(65536), Some(5));
        assert_eq!(size_field_len(i32::MAX as usize), Some(5));
    }

    #[test]
    fn padding_arithmetic() {
        assert_eq!(padding(0, 8), 0);
        assert_eq!(padding(1, 8), 7);
        assert_eq!(padding(7, 8), 1);
        assert_eq!(padding(9, 4), 3);
        assert_eq!(padding(5, 1), 0);
    }
}
