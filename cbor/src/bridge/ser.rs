use super::*;
use half::f16;
use num_traits::FromPrimitive;

/// Handed to [`ToValue::to_value`]. Consumed by the first container request, so a type can only
/// ever produce one container per call.
#[derive(Debug, Default)]
pub struct Serializer {
    _private: (),
}

impl Serializer {
    pub fn new() -> Self {
        Self { _private: () }
    }

    pub fn single_value(self) -> SingleValue {
        SingleValue { _private: () }
    }

    pub fn sequence<F>(self, f: F) -> Result<Value, Error>
    where
        F: FnOnce(&mut Sequence) -> Result<(), Error>,
    {
        let mut s = Sequence::default();
        f(&mut s)?;
        Ok(Value::Array(s.items))
    }

    pub fn keyed<F>(self, f: F) -> Result<Value, Error>
    where
        F: FnOnce(&mut Keyed) -> Result<(), Error>,
    {
        let mut k = Keyed::default();
        f(&mut k)?;
        Ok(Value::Map(k.map))
    }
}

/// Reduce an integral float to an integer value, if that loses nothing.
fn integral_reduction(v: f64) -> Option<Value> {
    // -0.0 has no integer form
    if v == 0.0 && v.is_sign_negative() {
        return None;
    }
    match i128::from_f64(v) {
        Some(i) if i as f64 == v => Value::from_i128(i),
        _ => None,
    }
}

macro_rules! impl_encode_unsigned {
    ($($method:ident($ty:ty)),*) => {
        $(
            pub fn $method(self, value: $ty) -> Result<Value, Error> {
                Ok(Value::UnsignedInteger(value as u64))
            }
        )*
    };
}

macro_rules! impl_encode_signed {
    ($($method:ident($ty:ty)),*) => {
        $(
            pub fn $method(self, value: $ty) -> Result<Value, Error> {
                Ok(Value::from(value as i64))
            }
        )*
    };
}

/// A container that becomes exactly one value.
#[derive(Debug)]
pub struct SingleValue {
    _private: (),
}

impl SingleValue {
    impl_encode_unsigned!(
        encode_u8(u8),
        encode_u16(u16),
        encode_u32(u32),
        encode_u64(u64),
        encode_usize(usize)
    );

    impl_encode_signed!(
        encode_i8(i8),
        encode_i16(i16),
        encode_i32(i32),
        encode_i64(i64),
        encode_isize(isize)
    );

    pub fn encode_i128(self, value: i128) -> Result<Value, Error> {
        Value::from_i128(value).ok_or_else(|| Error::out_of_range(value, "CBOR integer"))
    }

    pub fn encode_bool(self, value: bool) -> Result<Value, Error> {
        Ok(Value::Boolean(value))
    }

    pub fn encode_f16(self, value: f16) -> Result<Value, Error> {
        Ok(Value::Half(value))
    }

    pub fn encode_f32(self, value: f32) -> Result<Value, Error> {
        Ok(Value::Float(value))
    }

    pub fn encode_f64(self, value: f64) -> Result<Value, Error> {
        Ok(Value::Double(value))
    }

    /// Encode an integral `value` as an integer, otherwise as a [`Value::Float`].
    pub fn encode_decimal_f32(self, value: f32) -> Result<Value, Error> {
        Ok(integral_reduction(value as f64).unwrap_or(Value::Float(value)))
    }

    /// Encode an integral `value` as an integer, otherwise as a [`Value::Double`].
    pub fn encode_decimal_f64(self, value: f64) -> Result<Value, Error> {
        Ok(integral_reduction(value).unwrap_or(Value::Double(value)))
    }

    pub fn encode_text(self, value: &str) -> Result<Value, Error> {
        Ok(Value::TextString(value.to_string()))
    }

    pub fn encode_bytes(self, value: &[u8]) -> Result<Value, Error> {
        Ok(Value::ByteString(value.to_vec()))
    }

    pub fn encode_nil(self) -> Result<Value, Error> {
        Ok(Value::Null)
    }

    pub fn encode_undefined(self) -> Result<Value, Error> {
        Ok(Value::Undefined)
    }

    /// Use an already built value as-is.
    pub fn encode_value(self, value: Value) -> Result<Value, Error> {
        Ok(value)
    }

    /// Encode a nested composite through a fresh [`Serializer`].
    pub fn encode<T>(self, value: &T) -> Result<Value, Error>
    where
        T: ToValue + ?Sized,
    {
        value.to_value(Serializer::new())
    }

    pub fn encode_tagged<T>(self, tag: u64, value: &T) -> Result<Value, Error>
    where
        T: ToValue + ?Sized,
    {
        Ok(Value::Tagged(tag, Box::new(self.encode(value)?)))
    }
}

macro_rules! forward_sequence_writes {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            pub fn $method(&mut self, value: $ty) -> Result<(), Error> {
                let index = self.items.len();
                let value = SingleValue { _private: () }
                    .$method(value)
                    .map_field_err(format_args!("[{index}]"))?;
                self.items.push(value);
                Ok(())
            }
        )*
    };
}

/// Accumulates an ordered run of writes into a [`Value::Array`].
#[derive(Debug, Default)]
pub struct Sequence {
    items: Vec<Value>,
}

impl Sequence {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    forward_sequence_writes!(
        encode_bool(bool),
        encode_u8(u8),
        encode_u16(u16),
        encode_u32(u32),
        encode_u64(u64),
        encode_usize(usize),
        encode_i8(i8),
        encode_i16(i16),
        encode_i32(i32),
        encode_i64(i64),
        encode_isize(isize),
        encode_i128(i128),
        encode_f16(f16),
        encode_f32(f32),
        encode_f64(f64),
        encode_decimal_f32(f32),
        encode_decimal_f64(f64),
        encode_text(&str),
        encode_bytes(&[u8]),
    );

    pub fn encode_nil(&mut self) -> Result<(), Error> {
        self.items.push(Value::Null);
        Ok(())
    }

    pub fn encode<T>(&mut self, value: &T) -> Result<(), Error>
    where
        T: ToValue + ?Sized,
    {
        let index = self.items.len();
        let value = value
            .to_value(Serializer::new())
            .map_field_err(format_args!("[{index}]"))?;
        self.items.push(value);
        Ok(())
    }

    pub fn nested_sequence<F>(&mut self, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Sequence) -> Result<(), Error>,
    {
        let index = self.items.len();
        let value = Serializer::new()
            .sequence(f)
            .map_field_err(format_args!("[{index}]"))?;
        self.items.push(value);
        Ok(())
    }

    pub fn nested_keyed<F>(&mut self, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Keyed) -> Result<(), Error>,
    {
        let index = self.items.len();
        let value = Serializer::new()
            .keyed(f)
            .map_field_err(format_args!("[{index}]"))?;
        self.items.push(value);
        Ok(())
    }
}

macro_rules! forward_keyed_writes {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            pub fn $method(&mut self, key: &str, value: $ty) -> Result<(), Error> {
                let value = SingleValue { _private: () }
                    .$method(value)
                    .map_field_err(key)?;
                self.insert(key, value);
                Ok(())
            }
        )*
    };
}

/// Accumulates writes addressed by string key into a [`Value::Map`].
///
/// Writing the same key twice replaces the earlier value.
#[derive(Debug, Default)]
pub struct Keyed {
    map: Map,
}

impl Keyed {
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn insert(&mut self, key: &str, value: Value) {
        self.map.insert(Value::TextString(key.to_string()), value);
    }

    forward_keyed_writes!(
        encode_bool(bool),
        encode_u8(u8),
        encode_u16(u16),
        encode_u32(u32),
        encode_u64(u64),
        encode_usize(usize),
        encode_i8(i8),
        encode_i16(i16),
        encode_i32(i32),
        encode_i64(i64),
        encode_isize(isize),
        encode_i128(i128),
        encode_f16(f16),
        encode_f32(f32),
        encode_f64(f64),
        encode_decimal_f32(f32),
        encode_decimal_f64(f64),
        encode_text(&str),
        encode_bytes(&[u8]),
    );

    pub fn encode_nil(&mut self, key: &str) -> Result<(), Error> {
        self.insert(key, Value::Null);
        Ok(())
    }

    pub fn encode<T>(&mut self, key: &str, value: &T) -> Result<(), Error>
    where
        T: ToValue + ?Sized,
    {
        let value = value.to_value(Serializer::new()).map_field_err(key)?;
        self.insert(key, value);
        Ok(())
    }

    /// Encode `value` under `key` if it is `Some`, otherwise write nothing.
    pub fn encode_if_present<T>(&mut self, key: &str, value: &Option<T>) -> Result<(), Error>
    where
        T: ToValue,
    {
        match value {
            Some(value) => self.encode(key, value),
            None => Ok(()),
        }
    }

    pub fn nested_sequence<F>(&mut self, key: &str, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Sequence) -> Result<(), Error>,
    {
        let value = Serializer::new().sequence(f).map_field_err(key)?;
        self.insert(key, value);
        Ok(())
    }

    pub fn nested_keyed<F>(&mut self, key: &str, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Keyed) -> Result<(), Error>,
    {
        let value = Serializer::new().keyed(f).map_field_err(key)?;
        self.insert(key, value);
        Ok(())
    }
}
