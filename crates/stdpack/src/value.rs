//! # EncodableValue
//!
//! The closed set of values the format can carry.
//!
//! ## Invariants
//! - Equality, ordering and hashing are structural and agree with each other,
//!   so any value (including lists and maps) can be a map key.
//! - Floats compare by IEEE-754 bit pattern: `NaN == NaN` and `0.0 != -0.0`.
//! - Values of different kinds order by wire tag, then by content.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::hash::Hash;
use std::hash::Hasher;

use crate::macros::for_each_sequence;
use crate::macros::value_sequence;
use crate::types::Error;
use crate::types::Kind;
use crate::types::Result;

/// Map entries, ordered by key. Encoding walks keys in ascending order.
pub type ValueMap = BTreeMap<EncodableValue, EncodableValue>;

#[derive(Debug, Clone, Default)]
pub enum EncodableValue {
    #[default]
    Null,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float64(f64),
    String(String),
    ByteSequence(Vec<u8>),
    Int32Sequence(Vec<i32>),
    Int64Sequence(Vec<i64>),
    Float32Sequence(Vec<f32>),
    Float64Sequence(Vec<f64>),
    List(Vec<EncodableValue>),
    Map(ValueMap),
}

impl EncodableValue {
    pub const TRUE: Self = EncodableValue::Bool(true);
    pub const FALSE: Self = EncodableValue::Bool(false);

    pub fn kind(&self) -> Kind {
        match self {
            EncodableValue::Null => Kind::Null,
            EncodableValue::Bool(true) => Kind::True,
            EncodableValue::Bool(false) => Kind::False,
            EncodableValue::Int32(_) => Kind::Int32,
            EncodableValue::Int64(_) => Kind::Int64,
            EncodableValue::Float64(_) => Kind::Float64,
            EncodableValue::String(_) => Kind::String,
            EncodableValue::ByteSequence(_) => Kind::ByteSequence,
            EncodableValue::Int32Sequence(_) => Kind::Int32Sequence,
            EncodableValue::Int64Sequence(_) => Kind::Int64Sequence,
            EncodableValue::Float32Sequence(_) => Kind::Float32Sequence,
            EncodableValue::Float64Sequence(_) => Kind::Float64Sequence,
            EncodableValue::List(_) => Kind::List,
            EncodableValue::Map(_) => Kind::Map,
        }
    }

    /// Builds a list from anything convertible to values.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<EncodableValue>,
    {
        EncodableValue::List(items.into_iter().map(Into::into).collect())
    }

    /// Builds a map from key/value pairs. Later duplicates win.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<EncodableValue>,
        V: Into<EncodableValue>,
    {
        EncodableValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, EncodableValue::Null)
    }

    fn mismatch(&self, expected: Kind) -> Error {
        Error::mismatch(expected.name(), Some(self.kind()))
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self {
            EncodableValue::Bool(v) => Ok(*v),
            other => Err(Error::mismatch("bool", Some(other.kind()))),
        }
    }

    pub fn as_int32(&self) -> Result<i32> {
        match self {
            EncodableValue::Int32(v) => Ok(*v),
            other => Err(other.mismatch(Kind::Int32)),
        }
    }

    pub fn as_int64(&self) -> Result<i64> {
        match self {
            EncodableValue::Int64(v) => Ok(*v),
            other => Err(other.mismatch(Kind::Int64)),
        }
    }

    pub fn as_float64(&self) -> Result<f64> {
        match self {
            EncodableValue::Float64(v) => Ok(*v),
            other => Err(other.mismatch(Kind::Float64)),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            EncodableValue::String(v) => Ok(v),
            other => Err(other.mismatch(Kind::String)),
        }
    }

    pub fn as_list(&self) -> Result<&[EncodableValue]> {
        match self {
            EncodableValue::List(v) => Ok(v),
            other => Err(other.mismatch(Kind::List)),
        }
    }

    pub fn as_map(&self) -> Result<&ValueMap> {
        match self {
            EncodableValue::Map(v) => Ok(v),
            other => Err(other.mismatch(Kind::Map)),
        }
    }

    /// Looks up `key` in a map value.
    pub fn get(&self, key: &EncodableValue) -> Result<Option<&EncodableValue>> {
        Ok(self.as_map()?.get(key))
    }
}

for_each_sequence!(value_sequence);

/// Lexicographic comparison with a custom element order.
fn cmp_slices<T>(a: &[T], b: &[T], f: impl Fn(&T, &T) -> Ordering) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        match f(x, y) {
            Ordering::Equal => continue,
            ord => return ord,
        }
    }
    a.len().cmp(&b.len())
}

impl Ord for EncodableValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use EncodableValue::*;
        self.kind().cmp(&other.kind()).then_with(|| match (self, other) {
            (Int32(a), Int32(b)) => a.cmp(b),
            (Int64(a), Int64(b)) => a.cmp(b),
            (Float64(a), Float64(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            (ByteSequence(a), ByteSequence(b)) => a.cmp(b),
            (Int32Sequence(a), Int32Sequence(b)) => a.cmp(b),
            (Int64Sequence(a), Int64Sequence(b)) => a.cmp(b),
            (Float32Sequence(a), Float32Sequence(b)) => cmp_slices(a, b, f32::total_cmp),
            (Float64Sequence(a), Float64Sequence(b)) => cmp_slices(a, b, f64::total_cmp),
            (List(a), List(b)) => a.cmp(b),
            (Map(a), Map(b)) => a.cmp(b),
            // same kind with no payload: Null, or two equal bools
            _ => Ordering::Equal,
        })
    }
}

impl PartialOrd for EncodableValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for EncodableValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for EncodableValue {}

impl Hash for EncodableValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        match self {
            EncodableValue::Null | EncodableValue::Bool(_) => {}
            EncodableValue::Int32(v) => v.hash(state),
            EncodableValue::Int64(v) => v.hash(state),
            EncodableValue::Float64(v) => v.to_bits().hash(state),
            EncodableValue::String(v) => v.hash(state),
            EncodableValue::ByteSequence(v) => v.hash(state),
            EncodableValue::Int32Sequence(v) => v.hash(state),
            EncodableValue::Int64Sequence(v) => v.hash(state),
            EncodableValue::Float32Sequence(v) => {
                v.len().hash(state);
                v.iter().for_each(|x| x.to_bits().hash(state));
            }
            EncodableValue::Float64Sequence(v) => {
                v.len().hash(state);
                v.iter().for_each(|x| x.to_bits().hash(state));
            }
            EncodableValue::List(v) => v.hash(state),
            EncodableValue::Map(v) => v.hash(state),
        }
    }
}

impl From<bool> for EncodableValue {
    fn from(v: bool) -> Self {
        EncodableValue::Bool(v)
    }
}

impl From<i32> for EncodableValue {
    fn from(v: i32) -> Self {
        EncodableValue::Int32(v)
    }
}

impl From<i64> for EncodableValue {
    fn from(v: i64) -> Self {
        EncodableValue::Int64(v)
    }
}

impl From<f64> for EncodableValue {
    fn from(v: f64) -> Self {
        EncodableValue::Float64(v)
    }
}

impl From<String> for EncodableValue {
    fn from(v: String) -> Self {
        EncodableValue::String(v)
    }
}

impl From<&str> for EncodableValue {
    fn from(v: &str) -> Self {
        EncodableValue::String(v.to_owned())
    }
}

impl From<Vec<EncodableValue>> for EncodableValue {
    fn from(v: Vec<EncodableValue>) -> Self {
        EncodableValue::List(v)
    }
}

impl From<ValueMap> for EncodableValue {
    fn from(v: ValueMap) -> Self {
        EncodableValue::Map(v)
    }
}

impl From<()> for EncodableValue {
    fn from(_: ()) -> Self {
        EncodableValue::Null
    }
}

impl<T: Into<EncodableValue>> From<Option<T>> for EncodableValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(EncodableValue::Null, Into::into)
    }
}

impl FromIterator<EncodableValue> for EncodableValue {
    fn from_iter<I: IntoIterator<Item = EncodableValue>>(iter: I) -> Self {
        EncodableValue::List(iter.into_iter().collect())
    }
}

impl FromIterator<(EncodableValue, EncodableValue)> for EncodableValue {
    fn from_iter<I: IntoIterator<Item = (EncodableValue, EncodableValue)>>(iter: I) -> Self {
        EncodableValue::Map(iter.into_iter().collect())
    }
}
