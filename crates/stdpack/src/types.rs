//! Core types for the stdpack binary format

/// Default maximum nesting depth for lists and maps.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// The leading byte of every encoded value.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    Null = 0,
    True = 1,
    False = 2,
    Int32 = 3,
    Int64 = 4,
    /// Legacy tag, decoded exactly like `String`. Never written.
    LargeInt = 5,
    Float64 = 6,
    String = 7,
    ByteSequence = 8,
    Int32Sequence = 9,
    Int64Sequence = 10,
    Float64Sequence = 11,
    List = 12,
    Map = 13,
    Float32Sequence = 14,
}

impl Tag {
    pub const fn from_u8(b: u8) -> Option<Self> {
        match b {
            0 => Some(Tag::Null),
            1 => Some(Tag::True),
            2 => Some(Tag::False),
            3 => Some(Tag::Int32),
            4 => Some(Tag::Int64),
            5 => Some(Tag::LargeInt),
            6 => Some(Tag::Float64),
            7 => Some(Tag::String),
            8 => Some(Tag::ByteSequence),
            9 => Some(Tag::Int32Sequence),
            10 => Some(Tag::Int64Sequence),
            11 => Some(Tag::Float64Sequence),
            12 => Some(Tag::List),
            13 => Some(Tag::Map),
            14 => Some(Tag::Float32Sequence),
            _ => None,
        }
    }

    /// The value kind a token with this tag decodes to.
    pub const fn kind(self) -> Kind {
        match self {
            Tag::Null => Kind::Null,
            Tag::True => Kind::True,
            Tag::False => Kind::False,
            Tag::Int32 => Kind::Int32,
            Tag::Int64 => Kind::Int64,
            Tag::LargeInt | Tag::String => Kind::String,
            Tag::Float64 => Kind::Float64,
            Tag::ByteSequence => Kind::ByteSequence,
            Tag::Int32Sequence => Kind::Int32Sequence,
            Tag::Int64Sequence => Kind::Int64Sequence,
            Tag::Float64Sequence => Kind::Float64Sequence,
            Tag::List => Kind::List,
            Tag::Map => Kind::Map,
            Tag::Float32Sequence => Kind::Float32Sequence,
        }
    }
}

/// The kind of a decoded token or an `EncodableValue`.
///
/// Unlike `Tag`, there is no legacy large-integer kind: such tokens are strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Null,
    True,
    False,
    Int32,
    Int64,
    Float64,
    String,
    ByteSequence,
    Int32Sequence,
    Int64Sequence,
    Float32Sequence,
    Float64Sequence,
    List,
    Map,
}

impl Kind {
    /// The tag the writer emits for this kind.
    pub const fn tag(self) -> Tag {
        match self {
            Kind::Null => Tag::Null,
            Kind::True => Tag::True,
            Kind::False => Tag::False,
            Kind::Int32 => Tag::Int32,
            Kind::Int64 => Tag::Int64,
            Kind::Float64 => Tag::Float64,
            Kind::String => Tag::String,
            Kind::ByteSequence => Tag::ByteSequence,
            Kind::Int32Sequence => Tag::Int32Sequence,
            Kind::Int64Sequence => Tag::Int64Sequence,
            Kind::Float32Sequence => Tag::Float32Sequence,
            Kind::Float64Sequence => Tag::Float64Sequence,
            Kind::List => Tag::List,
            Kind::Map => Tag::Map,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::True => "true",
            Kind::False => "false",
            Kind::Int32 => "int32",
            Kind::Int64 => "int64",
            Kind::Float64 => "float64",
            Kind::String => "string",
            Kind::ByteSequence => "byte sequence",
            Kind::Int32Sequence => "int32 sequence",
            Kind::Int64Sequence => "int64 sequence",
            Kind::Float32Sequence => "float32 sequence",
            Kind::Float64Sequence => "float64 sequence",
            Kind::List => "list",
            Kind::Map => "map",
        }
    }

    /// Element width in bytes for typed numeric sequences.
    pub const fn element_width(self) -> Option<usize> {
        match self {
            Kind::ByteSequence => Some(1),
            Kind::Int32Sequence | Kind::Float32Sequence => Some(4),
            Kind::Int64Sequence | Kind::Float64Sequence => Some(8),
            _ => None,
        }
    }

    /// True for kinds that carry a size field.
    pub const fn is_sized(self) -> bool {
        matches!(self, Kind::List | Kind::Map) || self.element_width().is_some()
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a buffer was rejected as malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// Byte does not correspond to a known `Tag`.
    #[error("invalid tag byte {tag} at offset {offset}")]
    InvalidTag { tag: u8, offset: usize },
    /// A read would run past the end of the buffer.
    #[error("unexpected end of buffer at offset {offset}: needed {needed} bytes, {available} available")]
    UnexpectedEnd { offset: usize, needed: usize, available: usize },
    /// A 4-byte size field holds a negative count.
    #[error("negative size {size} at offset {offset}")]
    NegativeSize { offset: usize, size: i32 },
    /// String payload is not valid UTF-8.
    #[error("string at offset {offset} is not valid UTF-8")]
    InvalidUtf8 { offset: usize },
    /// A value was required but the buffer is exhausted.
    #[error("no value present")]
    NoValue,
    /// A value of a specific kind was mandated by the envelope.
    #[error("expected {context}, found {found}")]
    UnexpectedKind { context: &'static str, found: Kind },
    /// Method result envelope byte is neither success (0) nor error (1).
    #[error("invalid method result envelope byte {0}")]
    InvalidResultTag(u8),
}

/// stdpack encoding and decoding errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Malformed or truncated input.
    #[error("invalid format: {0}")]
    InvalidFormat(#[from] FormatError),
    /// An accessor requested a kind different from the actual one.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: &'static str, found: &'static str },
    /// The operation is not available for this input.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
    /// Lists and maps nest deeper than `Limits::max_depth`.
    #[error("nesting depth exceeds limit of {limit}")]
    RecursionLimitExceeded { limit: usize },
    /// A size does not fit the 4-byte signed size field.
    #[error("size {0} does not fit in a size field")]
    SizeTooLarge(usize),
    /// A fixed-capacity sink cannot hold the reservation.
    #[error("sink full: requested {requested} bytes, {available} available")]
    SinkFull { requested: usize, available: usize },
}

impl Error {
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, Error::InvalidFormat(_))
    }

    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Error::TypeMismatch { .. })
    }

    pub(crate) fn mismatch(expected: &'static str, found: Option<Kind>) -> Self {
        Error::TypeMismatch {
            expected,
            found: found.map_or("none", Kind::name),
        }
    }
}

/// Specialized `Result` for stdpack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Limits applied while decoding untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of lists and maps nested inside each other.
    pub max_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_bytes_match_wire_values() {
        for b in 0u8..=14 {
            let tag = Tag::from_u8(b).unwrap();
            assert_eq!(tag as u8, b);
        }
        assert_eq!(Tag::from_u8(15), None);
        assert_eq!(Tag::from_u8(255), None);
    }

    #[test]
    fn large_int_decodes_as_string() {
        assert_eq!(Tag::LargeInt.kind(), Kind::String);
        assert_eq!(Kind::String.tag(), Tag::String);
    }

    #[test]
    fn kind_tag_roundtrip() {
        for b in 0u8..=14 {
            let tag = Tag::from_u8(b).unwrap();
            if tag == Tag::LargeInt {
                continue;
            }
            assert_eq!(tag.kind().tag(), tag);
        }
    }

    #[test]
    fn element_widths() {
        assert_eq!(Kind::ByteSequence.element_width(), Some(1));
        assert_eq!(Kind::Int32Sequence.element_width(), Some(4));
        assert_eq!(Kind::Float32Sequence.element_width(), Some(4));
        assert_eq!(Kind::Int64Sequence.element_width(), Some(8));
        assert_eq!(Kind::Float64Sequence.element_width(), Some(8));
        assert_eq!(Kind::List.element_width(), None);
        assert!(Kind::Map.is_sized());
        assert!(!Kind::String.is_sized());
    }

    #[test]
    fn error_classification() {
        let err: Error = FormatError::NoValue.into();
        assert!(err.is_invalid_format());
        assert!(!err.is_type_mismatch());
        let err = Error::mismatch("int32", None);
        assert_eq!(err, Error::TypeMismatch { expected: "int32", found: "none" });
        assert!(err.is_type_mismatch());
    }
}
