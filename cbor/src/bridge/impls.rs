use super::*;
use alloc::collections::BTreeMap;

macro_rules! impl_scalar {
    ($($ty:ty => $encode:ident, $decode:ident);* $(;)?) => {
        $(
            impl ToValue for $ty {
                fn to_value(&self, serializer: Serializer) -> Result<Value, Error> {
                    serializer.single_value().$encode(*self)
                }
            }

            impl FromValue for $ty {
                fn from_value(deserializer: Deserializer<'_>) -> Result<Self, Error> {
                    deserializer.single_value().$decode()
                }
            }
        )*
    };
}

impl_scalar!(
    bool => encode_bool, decode_bool;
    u8 => encode_u8, decode_u8;
    u16 => encode_u16, decode_u16;
    u32 => encode_u32, decode_u32;
    u64 => encode_u64, decode_u64;
    usize => encode_usize, decode_usize;
    i8 => encode_i8, decode_i8;
    i16 => encode_i16, decode_i16;
    i32 => encode_i32, decode_i32;
    i64 => encode_i64, decode_i64;
    isize => encode_isize, decode_isize;
    i128 => encode_i128, decode_i128;
    half::f16 => encode_f16, decode_f16;
    f32 => encode_f32, decode_f32;
    f64 => encode_f64, decode_f64;
);

impl ToValue for str {
    fn to_value(&self, serializer: Serializer) -> Result<Value, Error> {
        serializer.single_value().encode_text(self)
    }
}

impl ToValue for String {
    fn to_value(&self, serializer: Serializer) -> Result<Value, Error> {
        serializer.single_value().encode_text(self)
    }
}

impl FromValue for String {
    fn from_value(deserializer: Deserializer<'_>) -> Result<Self, Error> {
        deserializer
            .single_value()
            .decode_text()
            .map(ToString::to_string)
    }
}

/// A byte buffer that bridges as a [`Value::ByteString`] rather than an array of integers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteBuf(pub Vec<u8>);

impl ToValue for ByteBuf {
    fn to_value(&self, serializer: Serializer) -> Result<Value, Error> {
        serializer.single_value().encode_bytes(&self.0)
    }
}

impl FromValue for ByteBuf {
    fn from_value(deserializer: Deserializer<'_>) -> Result<Self, Error> {
        deserializer
            .single_value()
            .decode_bytes()
            .map(|b| ByteBuf(b.to_vec()))
    }
}

impl ToValue for Value {
    fn to_value(&self, serializer: Serializer) -> Result<Value, Error> {
        serializer.single_value().encode_value(self.clone())
    }
}

impl FromValue for Value {
    fn from_value(deserializer: Deserializer<'_>) -> Result<Self, Error> {
        Ok(deserializer.value().clone())
    }
}

impl<T> ToValue for &T
where
    T: ToValue + ?Sized,
{
    fn to_value(&self, serializer: Serializer) -> Result<Value, Error> {
        (**self).to_value(serializer)
    }
}

impl<T> ToValue for Box<T>
where
    T: ToValue + ?Sized,
{
    fn to_value(&self, serializer: Serializer) -> Result<Value, Error> {
        (**self).to_value(serializer)
    }
}

impl<T> FromValue for Box<T>
where
    T: FromValue,
{
    fn from_value(deserializer: Deserializer<'_>) -> Result<Self, Error> {
        T::from_value(deserializer).map(Box::new)
    }
}

/// `None` is written as null; null and undefined both read back as `None`.
impl<T> ToValue for Option<T>
where
    T: ToValue,
{
    fn to_value(&self, serializer: Serializer) -> Result<Value, Error> {
        match self {
            Some(value) => value.to_value(serializer),
            None => serializer.single_value().encode_nil(),
        }
    }
}

impl<T> FromValue for Option<T>
where
    T: FromValue,
{
    fn from_value(deserializer: Deserializer<'_>) -> Result<Self, Error> {
        if deserializer.single_value().decode_nil() {
            Ok(None)
        } else {
            T::from_value(deserializer).map(Some)
        }
    }
}

impl<T> ToValue for [T]
where
    T: ToValue,
{
    fn to_value(&self, serializer: Serializer) -> Result<Value, Error> {
        serializer.sequence(|s| self.iter().try_for_each(|item| s.encode(item)))
    }
}

impl<T> ToValue for Vec<T>
where
    T: ToValue,
{
    fn to_value(&self, serializer: Serializer) -> Result<Value, Error> {
        self.as_slice().to_value(serializer)
    }
}

impl<T> FromValue for Vec<T>
where
    T: FromValue,
{
    fn from_value(deserializer: Deserializer<'_>) -> Result<Self, Error> {
        let mut s = deserializer.sequence()?;
        let mut items = Vec::with_capacity(s.len());
        while !s.is_at_end() {
            items.push(s.decode()?);
        }
        Ok(items)
    }
}

fn text_keyed_pairs<'a>(
    deserializer: Deserializer<'a>,
) -> Result<impl Iterator<Item = Result<(&'a str, Deserializer<'a>), Error>>, Error> {
    let map = deserializer
        .value()
        .as_map()
        .ok_or_else(|| Error::incorrect_type("map", deserializer.value()))?;
    Ok(map.iter().map(|(k, v)| match k {
        Value::TextString(k) => Ok((k.as_str(), Deserializer::new(v))),
        k => Err(Error::incorrect_type("text string key", k)),
    }))
}

impl<T> ToValue for BTreeMap<String, T>
where
    T: ToValue,
{
    fn to_value(&self, serializer: Serializer) -> Result<Value, Error> {
        serializer.keyed(|k| self.iter().try_for_each(|(key, value)| k.encode(key, value)))
    }
}

impl<T> FromValue for BTreeMap<String, T>
where
    T: FromValue,
{
    fn from_value(deserializer: Deserializer<'_>) -> Result<Self, Error> {
        text_keyed_pairs(deserializer)?
            .map(|pair| {
                let (key, value) = pair?;
                let value = T::from_value(value).map_field_err(key)?;
                Ok::<_, Error>((key.to_string(), value))
            })
            .collect()
    }
}

#[cfg(feature = "std")]
impl<T, S> ToValue for std::collections::HashMap<String, T, S>
where
    T: ToValue,
{
    fn to_value(&self, serializer: Serializer) -> Result<Value, Error> {
        serializer.keyed(|k| self.iter().try_for_each(|(key, value)| k.encode(key, value)))
    }
}

#[cfg(feature = "std")]
impl<T, S> FromValue for std::collections::HashMap<String, T, S>
where
    T: FromValue,
    S: core::hash::BuildHasher + Default,
{
    fn from_value(deserializer: Deserializer<'_>) -> Result<Self, Error> {
        text_keyed_pairs(deserializer)?
            .map(|pair| {
                let (key, value) = pair?;
                let value = T::from_value(value).map_field_err(key)?;
                Ok::<_, Error>((key.to_string(), value))
            })
            .collect()
    }
}
