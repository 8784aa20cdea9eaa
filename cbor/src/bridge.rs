/*!
The structured bridge between application types and [`Value`].

A type implements [`ToValue`] by asking the [`Serializer`] it is given for exactly one
container, and [`FromValue`] by asking the [`Deserializer`] for the matching read-only view:

- a single value, for scalars and wrappers,
- a sequence, which becomes or reads an [`Value::Array`],
- a keyed container, which becomes or reads a [`Value::Map`] with text string keys.

Neither side knows anything about the concrete type on the other, and neither touches bytes;
[`crate::to_vec`] and [`crate::from_slice`] join the bridge to the codec.

```
use cbor_value::bridge::{Deserializer, Error, FromValue, Serializer, ToValue};
use cbor_value::Value;

#[derive(Debug, PartialEq)]
struct Point {
    x: i32,
    y: i32,
    label: Option<String>,
}

impl ToValue for Point {
    fn to_value(&self, serializer: Serializer) -> Result<Value, Error> {
        serializer.keyed(|k| {
            k.encode_i32("x", self.x)?;
            k.encode_i32("y", self.y)?;
            k.encode_if_present("label", &self.label)
        })
    }
}

impl FromValue for Point {
    fn from_value(deserializer: Deserializer<'_>) -> Result<Self, Error> {
        let k = deserializer.keyed()?;
        Ok(Point {
            x: k.decode_i32("x")?,
            y: k.decode_i32("y")?,
            label: k.decode_if_present("label")?,
        })
    }
}

let p = Point { x: 1, y: -2, label: None };
let bytes = cbor_value::to_vec(&p).unwrap();
assert_eq!(cbor_value::from_slice::<Point>(&bytes).unwrap(), p);
```
*/

use super::*;
use core::fmt;
use thiserror::Error;

pub mod de;
mod impls;
pub mod ser;

pub use de::Deserializer;
pub use impls::ByteBuf;
pub use ser::Serializer;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Incorrect type, expected {expected} but found {found}")]
    IncorrectType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Value {value} is out of range for {target}")]
    OutOfRange { value: String, target: &'static str },

    #[error("Key \"{0}\" not found")]
    KeyNotFound(String),

    #[error("Read past the end of the sequence")]
    EndOfSequence,

    #[error("Failed to convert {field}: {source}")]
    InvalidField { field: String, source: Box<Error> },

    #[error("{0}")]
    Custom(String),

    #[error(transparent)]
    Encode(#[from] encode::Error),

    #[error(transparent)]
    Decode(#[from] decode::Error),
}

impl Error {
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    fn incorrect_type(expected: &'static str, found: &Value) -> Self {
        Error::IncorrectType {
            expected,
            found: found.type_name(),
        }
    }

    fn out_of_range<T: fmt::Display>(value: T, target: &'static str) -> Self {
        Error::OutOfRange {
            value: value.to_string(),
            target,
        }
    }

    /// The error underneath any field context.
    pub fn innermost(&self) -> &Error {
        let mut e = self;
        while let Error::InvalidField { source, .. } = e {
            e = source;
        }
        e
    }

    /// The path of fields leading to the innermost error, outermost first.
    pub fn field_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut e = self;
        while let Error::InvalidField { field, source } = e {
            path.push(field.as_str());
            e = source;
        }
        path
    }
}

pub(crate) trait CaptureFieldErr<T> {
    fn map_field_err<F: fmt::Display>(self, field: F) -> Result<T, Error>;
}

impl<T> CaptureFieldErr<T> for Result<T, Error> {
    fn map_field_err<F: fmt::Display>(self, field: F) -> Result<T, Error> {
        self.map_err(|e| Error::InvalidField {
            field: field.to_string(),
            source: Box::new(e),
        })
    }
}

/// A type that can describe itself as a [`Value`].
pub trait ToValue {
    /// Build the value by requesting exactly one container from `serializer`.
    fn to_value(&self, serializer: Serializer) -> Result<Value, Error>;
}

/// A type that can be rebuilt from a [`Value`].
pub trait FromValue: Sized {
    fn from_value(deserializer: Deserializer<'_>) -> Result<Self, Error>;
}

pub fn to_value<T>(value: &T) -> Result<Value, Error>
where
    T: ToValue + ?Sized,
{
    value.to_value(Serializer::new())
}

pub fn from_value<T>(value: &Value) -> Result<T, Error>
where
    T: FromValue,
{
    T::from_value(Deserializer::new(value))
}
