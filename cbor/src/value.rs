/*!
The owned CBOR data model.

A [`Value`] is one CBOR data item. Containers own their children, so a tree can be built by
the bridge or the decoder and then handed to the encoder or read back without any shared state.

Equality is structural and never crosses cases: `UnsignedInteger(1)`, `Float(1.0)` and
`Double(1.0)` are three different values. Floating point cases compare by bit pattern, which keeps
[`Eq`], [`Ord`] and [`Hash`] lawful so that any `Value`, containers included, can be used as a map
key.
*/

use super::*;
use core::cmp::Ordering;
use core::fmt::{self, Write as _};
use core::hash::{Hash, Hasher};
use half::f16;

#[derive(Debug, Clone)]
pub enum Value {
    UnsignedInteger(u64),
    /// The integer `-(1 + m)`.
    NegativeInteger(u64),
    ByteString(Vec<u8>),
    TextString(String),
    Array(Vec<Value>),
    Map(Map),
    Tagged(u64, Box<Value>),
    /// A major type 7 simple value other than the ones with dedicated cases.
    Simple(u8),
    Boolean(bool),
    Null,
    Undefined,
    /// The indefinite-length stop code. Never produced as a decoded item.
    Break,
    Half(f16),
    Float(f32),
    Double(f64),
}

impl Value {
    /// The smallest integer a [`Value`] can carry, `-2^64`.
    pub const MIN_INTEGER: i128 = -(1i128 << 64);

    /// The largest integer a [`Value`] can carry, `2^64 - 1`.
    pub const MAX_INTEGER: i128 = u64::MAX as i128;

    /// Build an integer value, or `None` if `v` is outside `-2^64..=2^64-1`.
    pub fn from_i128(v: i128) -> Option<Self> {
        if v >= 0 {
            u64::try_from(v).ok().map(Value::UnsignedInteger)
        } else {
            u64::try_from(-1 - v).ok().map(Value::NegativeInteger)
        }
    }

    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Value::UnsignedInteger(u) => Some(*u as i128),
            Value::NegativeInteger(m) => Some(-1 - *m as i128),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::UnsignedInteger(u) => Some(*u),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_i128().and_then(|v| i64::try_from(v).ok())
    }

    /// The value of any floating point case, widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Half(v) => Some(v.to_f64()),
            Value::Float(v) => Some(*v as f64),
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::TextString(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::ByteString(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Strip one tag, returning the tag number and the wrapped item.
    pub fn as_tagged(&self) -> Option<(u64, &Value)> {
        match self {
            Value::Tagged(tag, item) => Some((*tag, item)),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::UnsignedInteger(_) => "unsigned integer",
            Value::NegativeInteger(_) => "negative integer",
            Value::ByteString(_) => "byte string",
            Value::TextString(_) => "text string",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Tagged(..) => "tagged item",
            Value::Simple(_) => "simple value",
            Value::Boolean(_) => "boolean",
            Value::Null => "null",
            Value::Undefined => "undefined",
            Value::Break => "break",
            Value::Half(_) => "half float",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
        }
    }

    // Ordering between cases
    fn rank(&self) -> u8 {
        match self {
            Value::NegativeInteger(_) => 0,
            Value::UnsignedInteger(_) => 1,
            Value::ByteString(_) => 2,
            Value::TextString(_) => 3,
            Value::Array(_) => 4,
            Value::Map(_) => 5,
            Value::Tagged(..) => 6,
            Value::Simple(_) => 7,
            Value::Boolean(_) => 8,
            Value::Null => 9,
            Value::Undefined => 10,
            Value::Break => 11,
            Value::Half(_) => 12,
            Value::Float(_) => 13,
            Value::Double(_) => 14,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::UnsignedInteger(a), Value::UnsignedInteger(b)) => a == b,
            (Value::NegativeInteger(a), Value::NegativeInteger(b)) => a == b,
            (Value::ByteString(a), Value::ByteString(b)) => a == b,
            (Value::TextString(a), Value::TextString(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Tagged(t1, a), Value::Tagged(t2, b)) => t1 == t2 && a == b,
            (Value::Simple(a), Value::Simple(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Null, Value::Null)
            | (Value::Undefined, Value::Undefined)
            | (Value::Break, Value::Break) => true,
            (Value::Half(a), Value::Half(b)) => a.to_bits() == b.to_bits(),
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::UnsignedInteger(a), Value::UnsignedInteger(b)) => a.cmp(b),
            // A larger magnitude is a smaller integer
            (Value::NegativeInteger(a), Value::NegativeInteger(b)) => b.cmp(a),
            (Value::ByteString(a), Value::ByteString(b)) => a.cmp(b),
            (Value::TextString(a), Value::TextString(b)) => a.cmp(b),
            (Value::Array(a), Value::Array(b)) => a.cmp(b),
            (Value::Map(a), Value::Map(b)) => a.cmp(b),
            (Value::Tagged(t1, a), Value::Tagged(t2, b)) => t1.cmp(t2).then_with(|| a.cmp(b)),
            (Value::Simple(a), Value::Simple(b)) => a.cmp(b),
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::Half(a), Value::Half(b)) => half_order_key(*a).cmp(&half_order_key(*b)),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Double(a), Value::Double(b)) => a.total_cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Value::UnsignedInteger(v) | Value::NegativeInteger(v) => v.hash(state),
            Value::ByteString(b) => b.hash(state),
            Value::TextString(s) => s.hash(state),
            Value::Array(a) => a.hash(state),
            Value::Map(m) => m.hash(state),
            Value::Tagged(tag, item) => {
                tag.hash(state);
                item.hash(state);
            }
            Value::Simple(v) => v.hash(state),
            Value::Boolean(b) => b.hash(state),
            Value::Null | Value::Undefined | Value::Break => {}
            Value::Half(v) => v.to_bits().hash(state),
            Value::Float(v) => v.to_bits().hash(state),
            Value::Double(v) => v.to_bits().hash(state),
        }
    }
}

// Same total order as `f32::total_cmp`, taken from the bits so distinct NaNs stay distinct
fn half_order_key(v: f16) -> i16 {
    let bits = v.to_bits() as i16;
    bits ^ ((((bits >> 15) as u16) >> 1) as i16)
}

fn fmt_float(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_nan() {
        f.write_str("NaN")
    } else if v.is_infinite() {
        f.write_str(if v > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        write!(f, "{v:?}")
    }
}

fn fmt_text(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\u{08}' => f.write_str("\\b")?,
            '\u{0c}' => f.write_str("\\f")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c.is_control() => write!(f, "\\u{:04x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

/// RFC 8949 section 8 diagnostic notation.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::UnsignedInteger(v) => write!(f, "{v}"),
            Value::NegativeInteger(m) => write!(f, "{}", -1 - *m as i128),
            Value::ByteString(b) => {
                f.write_str("h'")?;
                for byte in b {
                    write!(f, "{byte:02x}")?;
                }
                f.write_str("'")
            }
            Value::TextString(s) => fmt_text(f, s),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(m) => {
                f.write_str("{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Value::Tagged(tag, item) => write!(f, "{tag}({item})"),
            Value::Simple(v) => write!(f, "simple({v})"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Null => f.write_str("null"),
            Value::Undefined => f.write_str("undefined"),
            Value::Break => f.write_str("break"),
            Value::Half(v) => fmt_float(f, v.to_f64()),
            Value::Float(v) => fmt_float(f, *v as f64),
            Value::Double(v) => fmt_float(f, *v),
        }
    }
}

macro_rules! impl_from_unsigned {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::UnsignedInteger(v as u64)
                }
            }
        )*
    };
}

impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        if v >= 0 {
            Value::UnsignedInteger(v as u64)
        } else {
            // !v == -(1 + v), and cannot overflow even for i64::MIN
            Value::NegativeInteger((!v) as u64)
        }
    }
}

macro_rules! impl_from_signed {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::from(v as i64)
                }
            }
        )*
    };
}

impl_from_signed!(i8, i16, i32, isize);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<f16> for Value {
    fn from(v: f16) -> Self {
        Value::Half(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::TextString(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::TextString(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::ByteString(v.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::ByteString(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Value::Map(v)
    }
}

/// The pairs of a CBOR map, in insertion order.
///
/// Keys are unique under [`Value`] equality. Insertion order decides encoding order but plays
/// no part in equality, ordering or hashing.
#[derive(Debug, Clone, Default)]
pub struct Map {
    pairs: Vec<(Value, Value)>,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pairs: Vec::with_capacity(capacity),
        }
    }

    /// Build a map from pairs, returning the first repeated key on failure.
    pub fn try_from_pairs<I>(pairs: I) -> Result<Self, Value>
    where
        I: IntoIterator<Item = (Value, Value)>,
    {
        let pairs: Vec<(Value, Value)> = pairs.into_iter().collect();
        {
            let mut seen = alloc::collections::BTreeSet::new();
            if let Some((k, _)) = pairs.iter().find(|(k, _)| !seen.insert(k)) {
                return Err(k.clone());
            }
        }
        Ok(Self { pairs })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Insert a pair. An existing equal key keeps its position and has its value replaced.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => Some(core::mem::replace(v, value)),
            None => {
                self.pairs.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Look up a [`Value::TextString`] key without building a [`Value`].
    pub fn get_text(&self, key: &str) -> Option<&Value> {
        self.pairs
            .iter()
            .find(|(k, _)| matches!(k, Value::TextString(s) if s == key))
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        let idx = self.pairs.iter().position(|(k, _)| k == key)?;
        Some(self.pairs.remove(idx).1)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, (Value, Value)> {
        self.pairs.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.pairs.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.pairs.iter().map(|(_, v)| v)
    }

    fn sorted_pairs(&self) -> Vec<&(Value, Value)> {
        let mut pairs: Vec<_> = self.pairs.iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        pairs
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl Eq for Map {}

impl Ord for Map {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sorted_pairs().cmp(&other.sorted_pairs())
    }
}

impl PartialOrd for Map {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for Map {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Hash in key order so equal maps hash the same whatever their insertion order
        self.len().hash(state);
        for (k, v) in self.sorted_pairs() {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl FromIterator<(Value, Value)> for Map {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut map = Map::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for Map {
    type Item = (Value, Value);
    type IntoIter = alloc::vec::IntoIter<(Value, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = &'a (Value, Value);
    type IntoIter = core::slice::Iter<'a, (Value, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}
