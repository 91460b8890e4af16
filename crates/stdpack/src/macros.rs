//! Scalar widths and the typed sequence table.

/// A fixed-width number stored little-endian on the wire.
pub(crate) trait LeScalar: Copy {
    const WIDTH: usize;

    /// Reads from the first `WIDTH` bytes of `src`.
    fn read_le(src: &[u8]) -> Self;

    /// Writes into the first `WIDTH` bytes of `dst`.
    fn write_le(self, dst: &mut [u8]);
}

/// Generates `LeScalar` implementations.
macro_rules! impl_le_scalar {
    ($ty:ty, $width:expr) => {
        impl crate::macros::LeScalar for $ty {
            const WIDTH: usize = $width;

            #[inline(always)]
            fn read_le(src: &[u8]) -> Self {
                let mut raw = [0u8; $width];
                raw.copy_from_slice(&src[..$width]);
                <$ty>::from_le_bytes(raw)
            }

            #[inline(always)]
            fn write_le(self, dst: &mut [u8]) {
                dst[..$width].copy_from_slice(&self.to_le_bytes());
            }
        }
    };
}

impl_le_scalar!(u8, 1);
impl_le_scalar!(u16, 2);
impl_le_scalar!(i32, 4);
impl_le_scalar!(i64, 8);
impl_le_scalar!(f32, 4);
impl_le_scalar!(f64, 8);

/// Defines the typed numeric sequences supported by the format.
/// Arguments passed to callback:
/// 1. `Kind` / `EncodableValue` variant
/// 2. Element type
/// 3. `Reader` accessor name
/// 4. `Writer` method name
/// 5. `EncodableValue` accessor name
macro_rules! for_each_sequence {
    ($m:ident) => {
        $m!(ByteSequence,    u8,  get_byte_sequence,    write_byte_sequence,    as_byte_sequence);
        $m!(Int32Sequence,   i32, get_int32_sequence,   write_int32_sequence,   as_int32_sequence);
        $m!(Int64Sequence,   i64, get_int64_sequence,   write_int64_sequence,   as_int64_sequence);
        $m!(Float32Sequence, f32, get_float32_sequence, write_float32_sequence, as_float32_sequence);
        $m!(Float64Sequence, f64, get_float64_sequence, write_float64_sequence, as_float64_sequence);
    };
}

/// Generates a `Reader` method that copies out a whole typed sequence.
macro_rules! decode_sequence {
    ($var:ident, $ty:ty, $get:ident, $write:ident, $as:ident) => {
        pub fn $get(&self) -> crate::types::Result<Vec<$ty>> {
            let payload = self.payload_of(crate::types::Kind::$var)?;
            Ok(crate::reader::collect_elements::<$ty>(payload))
        }
    };
}

/// Generates a `Writer` method for a typed sequence.
macro_rules! encode_sequence {
    ($var:ident, $ty:ty, $get:ident, $write:ident, $as:ident) => {
        pub fn $write(&mut self, v: &[$ty]) -> crate::types::Result<()> {
            self.write_sequence(crate::types::Kind::$var, v)
        }
    };
}

/// Generates the `EncodableValue` accessor and `From` conversion for a typed sequence.
macro_rules! value_sequence {
    ($var:ident, $ty:ty, $get:ident, $write:ident, $as:ident) => {
        impl EncodableValue {
            pub fn $as(&self) -> crate::types::Result<&[$ty]> {
                match self {
                    EncodableValue::$var(v) => Ok(v),
                    other => Err(crate::types::Error::mismatch(
                        crate::types::Kind::$var.name(),
                        Some(other.kind()),
                    )),
                }
            }
        }

        impl From<Vec<$ty>> for EncodableValue {
            fn from(v: Vec<$ty>) -> Self {
                EncodableValue::$var(v)
            }
        }

        impl From<&[$ty]> for EncodableValue {
            fn from(v: &[$ty]) -> Self {
                EncodableValue::$var(v.to_vec())
            }
        }
    };
}

pub(crate) use for_each_sequence;
pub(crate) use decode_sequence;
pub(crate) use encode_sequence;
pub(crate) use value_sequence;
