use super::*;
use half::f16;

/// A read-only view over one [`Value`], handed to [`FromValue::from_value`].
#[derive(Debug, Clone, Copy)]
pub struct Deserializer<'a> {
    value: &'a Value,
}

impl<'a> Deserializer<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }

    pub fn single_value(self) -> SingleValue<'a> {
        SingleValue { value: self.value }
    }

    pub fn sequence(self) -> Result<Sequence<'a>, Error> {
        match self.value {
            Value::Array(items) => Ok(Sequence { items, index: 0 }),
            value => Err(Error::incorrect_type("array", value)),
        }
    }

    pub fn keyed(self) -> Result<Keyed<'a>, Error> {
        match self.value {
            Value::Map(map) => Ok(Keyed { map }),
            value => Err(Error::incorrect_type("map", value)),
        }
    }
}

macro_rules! impl_decode_integer {
    ($($method:ident($ty:ty)),*) => {
        $(
            pub fn $method(&self) -> Result<$ty, Error> {
                let v = self.decode_i128()?;
                <$ty>::try_from(v).map_err(|_| Error::out_of_range(v, stringify!($ty)))
            }
        )*
    };
}

/// Typed reads over one value. Numeric reads fail rather than truncate.
#[derive(Debug, Clone, Copy)]
pub struct SingleValue<'a> {
    value: &'a Value,
}

impl<'a> SingleValue<'a> {
    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// True for [`Value::Null`] and [`Value::Undefined`].
    pub fn decode_nil(&self) -> bool {
        matches!(self.value, Value::Null | Value::Undefined)
    }

    pub fn decode_bool(&self) -> Result<bool, Error> {
        self.value
            .as_bool()
            .ok_or_else(|| Error::incorrect_type("boolean", self.value))
    }

    pub fn decode_text(&self) -> Result<&'a str, Error> {
        match self.value {
            Value::TextString(s) => Ok(s),
            value => Err(Error::incorrect_type("text string", value)),
        }
    }

    pub fn decode_bytes(&self) -> Result<&'a [u8], Error> {
        match self.value {
            Value::ByteString(b) => Ok(b),
            value => Err(Error::incorrect_type("byte string", value)),
        }
    }

    pub fn decode_i128(&self) -> Result<i128, Error> {
        self.value
            .as_i128()
            .ok_or_else(|| Error::incorrect_type("integer", self.value))
    }

    impl_decode_integer!(
        decode_u8(u8),
        decode_u16(u16),
        decode_u32(u32),
        decode_u64(u64),
        decode_usize(usize),
        decode_i8(i8),
        decode_i16(i16),
        decode_i32(i32),
        decode_i64(i64),
        decode_isize(isize)
    );

    /// Any floating point case, or an integer that converts exactly.
    pub fn decode_f64(&self) -> Result<f64, Error> {
        match self.value {
            Value::Half(v) => Ok(v.to_f64()),
            Value::Float(v) => Ok(*v as f64),
            Value::Double(v) => Ok(*v),
            Value::UnsignedInteger(_) | Value::NegativeInteger(_) => {
                let i = self.decode_i128()?;
                let f = i as f64;
                if f as i128 == i {
                    Ok(f)
                } else {
                    Err(Error::out_of_range(i, "f64"))
                }
            }
            value => Err(Error::incorrect_type("floating point", value)),
        }
    }

    /// As [`Self::decode_f64`], but doubles must survive the narrowing unchanged.
    pub fn decode_f32(&self) -> Result<f32, Error> {
        match self.value {
            Value::Half(v) => Ok(v.to_f32()),
            Value::Float(v) => Ok(*v),
            Value::Double(v) => {
                let f = *v as f32;
                if f as f64 == *v || v.is_nan() {
                    Ok(f)
                } else {
                    Err(Error::out_of_range(v, "f32"))
                }
            }
            Value::UnsignedInteger(_) | Value::NegativeInteger(_) => {
                let i = self.decode_i128()?;
                let f = i as f32;
                if f as i128 == i {
                    Ok(f)
                } else {
                    Err(Error::out_of_range(i, "f32"))
                }
            }
            value => Err(Error::incorrect_type("floating point", value)),
        }
    }

    pub fn decode_f16(&self) -> Result<f16, Error> {
        match self.value {
            Value::Half(v) => Ok(*v),
            _ => {
                let v = self.decode_f64()?;
                let f = f16::from_f64(v);
                if f.to_f64() == v || v.is_nan() {
                    Ok(f)
                } else {
                    Err(Error::out_of_range(v, "f16"))
                }
            }
        }
    }

    /// Strip one tag, returning the tag number and a view of the wrapped item.
    pub fn decode_tagged(&self) -> Result<(u64, Deserializer<'a>), Error> {
        match self.value {
            Value::Tagged(tag, item) => Ok((*tag, Deserializer::new(item))),
            value => Err(Error::incorrect_type("tagged item", value)),
        }
    }

    pub fn decode<T>(&self) -> Result<T, Error>
    where
        T: FromValue,
    {
        T::from_value(Deserializer::new(self.value))
    }
}

macro_rules! forward_sequence_reads {
    ($($method:ident -> $ty:ty),* $(,)?) => {
        $(
            pub fn $method(&mut self) -> Result<$ty, Error> {
                let (index, value) = self.peek()?;
                let v = SingleValue { value }
                    .$method()
                    .map_field_err(format_args!("[{index}]"))?;
                self.index += 1;
                Ok(v)
            }
        )*
    };
}

/// A cursor over the items of an array. Reads advance the cursor only when they succeed.
#[derive(Debug, Clone)]
pub struct Sequence<'a> {
    items: &'a [Value],
    index: usize,
}

impl<'a> Sequence<'a> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_at_end(&self) -> bool {
        self.index >= self.items.len()
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    fn peek(&self) -> Result<(usize, &'a Value), Error> {
        self.items
            .get(self.index)
            .map(|v| (self.index, v))
            .ok_or(Error::EndOfSequence)
    }

    /// Take the next item as a [`Deserializer`], whatever its shape.
    pub fn next_value(&mut self) -> Result<Deserializer<'a>, Error> {
        let (_, value) = self.peek()?;
        self.index += 1;
        Ok(Deserializer::new(value))
    }

    /// Consume the next item if it is null or undefined.
    pub fn decode_nil(&mut self) -> Result<bool, Error> {
        let (_, value) = self.peek()?;
        if matches!(value, Value::Null | Value::Undefined) {
            self.index += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    forward_sequence_reads!(
        decode_bool -> bool,
        decode_text -> &'a str,
        decode_bytes -> &'a [u8],
        decode_u8 -> u8,
        decode_u16 -> u16,
        decode_u32 -> u32,
        decode_u64 -> u64,
        decode_usize -> usize,
        decode_i8 -> i8,
        decode_i16 -> i16,
        decode_i32 -> i32,
        decode_i64 -> i64,
        decode_isize -> isize,
        decode_i128 -> i128,
        decode_f16 -> f16,
        decode_f32 -> f32,
        decode_f64 -> f64,
    );

    pub fn decode<T>(&mut self) -> Result<T, Error>
    where
        T: FromValue,
    {
        let (index, value) = self.peek()?;
        let v = T::from_value(Deserializer::new(value)).map_field_err(format_args!("[{index}]"))?;
        self.index += 1;
        Ok(v)
    }

    pub fn decode_if_present<T>(&mut self) -> Result<Option<T>, Error>
    where
        T: FromValue,
    {
        if self.decode_nil()? {
            Ok(None)
        } else {
            self.decode().map(Some)
        }
    }

    pub fn nested_sequence(&mut self) -> Result<Sequence<'a>, Error> {
        let (index, value) = self.peek()?;
        let s = Deserializer::new(value)
            .sequence()
            .map_field_err(format_args!("[{index}]"))?;
        self.index += 1;
        Ok(s)
    }

    pub fn nested_keyed(&mut self) -> Result<Keyed<'a>, Error> {
        let (index, value) = self.peek()?;
        let k = Deserializer::new(value)
            .keyed()
            .map_field_err(format_args!("[{index}]"))?;
        self.index += 1;
        Ok(k)
    }
}

macro_rules! forward_keyed_reads {
    ($($method:ident -> $ty:ty),* $(,)?) => {
        $(
            pub fn $method(&self, key: &str) -> Result<$ty, Error> {
                SingleValue { value: self.lookup(key)? }
                    .$method()
                    .map_field_err(key)
            }
        )*
    };
}

/// String-keyed reads over a map. Keys that are not text strings are invisible here.
#[derive(Debug, Clone, Copy)]
pub struct Keyed<'a> {
    map: &'a Map,
}

impl<'a> Keyed<'a> {
    /// Number of pairs in the map, including any with non-text keys.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// True if `key` is present, even with a null value.
    pub fn contains(&self, key: &str) -> bool {
        self.map.get_text(key).is_some()
    }

    /// The text string keys, in map order.
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + 'a {
        let map: &'a Map = self.map;
        map.keys().filter_map(Value::as_text)
    }

    fn lookup(&self, key: &str) -> Result<&'a Value, Error> {
        self.map
            .get_text(key)
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))
    }

    pub fn get(&self, key: &str) -> Result<Deserializer<'a>, Error> {
        self.lookup(key).map(Deserializer::new)
    }

    /// True if `key` is missing, null or undefined.
    pub fn decode_nil(&self, key: &str) -> bool {
        self.map
            .get_text(key)
            .is_none_or(|v| matches!(v, Value::Null | Value::Undefined))
    }

    forward_keyed_reads!(
        decode_bool -> bool,
        decode_text -> &'a str,
        decode_bytes -> &'a [u8],
        decode_u8 -> u8,
        decode_u16 -> u16,
        decode_u32 -> u32,
        decode_u64 -> u64,
        decode_usize -> usize,
        decode_i8 -> i8,
        decode_i16 -> i16,
        decode_i32 -> i32,
        decode_i64 -> i64,
        decode_isize -> isize,
        decode_i128 -> i128,
        decode_f16 -> f16,
        decode_f32 -> f32,
        decode_f64 -> f64,
    );

    pub fn decode<T>(&self, key: &str) -> Result<T, Error>
    where
        T: FromValue,
    {
        T::from_value(Deserializer::new(self.lookup(key)?)).map_field_err(key)
    }

    /// A missing key and an explicit null both decode as `None`.
    pub fn decode_if_present<T>(&self, key: &str) -> Result<Option<T>, Error>
    where
        T: FromValue,
    {
        if self.decode_nil(key) {
            Ok(None)
        } else {
            self.decode(key).map(Some)
        }
    }

    pub fn nested_sequence(&self, key: &str) -> Result<Sequence<'a>, Error> {
        Deserializer::new(self.lookup(key)?)
            .sequence()
            .map_field_err(key)
    }

    pub fn nested_keyed(&self, key: &str) -> Result<Keyed<'a>, Error> {
        Deserializer::new(self.lookup(key)?)
            .keyed()
            .map_field_err(key)
    }
}
