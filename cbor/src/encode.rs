use super::*;
use thiserror::Error;
use tracing::trace;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Container with {0} items is too large to encode")]
    ContainerTooLarge(usize),

    #[error("Cannot encode {0}")]
    UnsupportedValue(&'static str),

    #[error("Simple value {0} is reserved")]
    InvalidSimpleValue(u8),
}

/// String, array and map lengths are limited to 32 bits.
pub const MAX_CONTAINER_LEN: u64 = u32::MAX as u64;

/// Appends encoded items to an owned buffer.
pub struct Encoder {
    data: Vec<u8>,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }

    pub fn offset(&self) -> usize {
        self.data.len()
    }

    fn emit_uint_minor(&mut self, major: u8, val: u64) {
        if val < 24 {
            self.data.push((major << 5) | (val as u8))
        } else if val <= u8::MAX as u64 {
            self.data.push((major << 5) | 24u8);
            self.data.push(val as u8)
        } else if val <= u16::MAX as u64 {
            self.data.push((major << 5) | 25u8);
            self.data.extend((val as u16).to_be_bytes())
        } else if val <= u32::MAX as u64 {
            self.data.push((major << 5) | 26u8);
            self.data.extend((val as u32).to_be_bytes())
        } else {
            self.data.push((major << 5) | 27u8);
            self.data.extend(val.to_be_bytes())
        }
    }

    fn emit_length(&mut self, major: u8, len: usize) -> Result<(), Error> {
        if len as u64 > MAX_CONTAINER_LEN {
            trace!("Refusing to encode major type {major} item with length {len}");
            return Err(Error::ContainerTooLarge(len));
        }
        self.emit_uint_minor(major, len as u64);
        Ok(())
    }

    fn emit_simple(&mut self, value: u8) -> Result<(), Error> {
        match value {
            0..=19 => self.data.push((7 << 5) | value),
            20..=31 => return Err(Error::InvalidSimpleValue(value)),
            _ => {
                self.data.push((7 << 5) | 24);
                self.data.push(value)
            }
        }
        Ok(())
    }

    pub fn emit_raw_slice(&mut self, data: &[u8]) {
        self.data.extend_from_slice(data)
    }

    /// Append the encoding of `value`.
    ///
    /// Arguments always use the shortest form, and map pairs are written in the map's
    /// insertion order.
    pub fn emit(&mut self, value: &Value) -> Result<(), Error> {
        match value {
            Value::UnsignedInteger(v) => self.emit_uint_minor(0, *v),
            Value::NegativeInteger(v) => self.emit_uint_minor(1, *v),
            Value::ByteString(b) => {
                self.emit_length(2, b.len())?;
                self.data.extend_from_slice(b)
            }
            Value::TextString(s) => {
                self.emit_length(3, s.len())?;
                self.data.extend_from_slice(s.as_bytes())
            }
            Value::Array(items) => {
                self.emit_length(4, items.len())?;
                for item in items {
                    self.emit(item)?;
                }
            }
            Value::Map(m) => {
                self.emit_length(5, m.len())?;
                for (k, v) in m {
                    self.emit(k)?;
                    self.emit(v)?;
                }
            }
            Value::Tagged(tag, item) => {
                self.emit_uint_minor(6, *tag);
                self.emit(item)?;
            }
            Value::Simple(v) => self.emit_simple(*v)?,
            Value::Boolean(b) => self.data.push((7 << 5) | if *b { 21 } else { 20 }),
            Value::Null => self.data.push((7 << 5) | 22),
            Value::Undefined => self.data.push((7 << 5) | 23),
            Value::Break => self.data.push(0xFF),
            Value::Half(v) => {
                self.data.push((7 << 5) | 25);
                self.data.extend(v.to_be_bytes())
            }
            Value::Float(v) => {
                self.data.push((7 << 5) | 26);
                self.data.extend(v.to_be_bytes())
            }
            Value::Double(v) => {
                self.data.push((7 << 5) | 27);
                self.data.extend(v.to_be_bytes())
            }
        }
        Ok(())
    }

    pub fn emit_byte_stream<F>(&mut self, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut ByteStream) -> Result<(), Error>,
    {
        let mut s = ByteStream::new(self);
        f(&mut s)?;
        s.end();
        Ok(())
    }

    pub fn emit_text_stream<F>(&mut self, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut TextStream) -> Result<(), Error>,
    {
        let mut s = TextStream::new(self);
        f(&mut s)?;
        s.end();
        Ok(())
    }

    pub fn emit_indefinite_array<F>(&mut self, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut ArrayStream) -> Result<(), Error>,
    {
        let mut s = ArrayStream::new(self);
        f(&mut s)?;
        s.end()
    }

    pub fn emit_indefinite_map<F>(&mut self, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut MapStream) -> Result<(), Error>,
    {
        let mut s = MapStream::new(self);
        f(&mut s)?;
        s.end()
    }
}

/// An indefinite-length byte string, written as a run of definite-length chunks.
pub struct ByteStream<'a> {
    encoder: &'a mut Encoder,
}

impl<'a> ByteStream<'a> {
    fn new(encoder: &'a mut Encoder) -> Self {
        encoder.data.push((2 << 5) | 31);
        Self { encoder }
    }

    pub fn emit(&mut self, chunk: &[u8]) -> Result<(), Error> {
        self.encoder.emit_length(2, chunk.len())?;
        self.encoder.data.extend_from_slice(chunk);
        Ok(())
    }

    fn end(self) {
        self.encoder.data.push(0xFF)
    }
}

/// An indefinite-length text string, written as a run of definite-length chunks.
pub struct TextStream<'a> {
    encoder: &'a mut Encoder,
}

impl<'a> TextStream<'a> {
    fn new(encoder: &'a mut Encoder) -> Self {
        encoder.data.push((3 << 5) | 31);
        Self { encoder }
    }

    pub fn emit(&mut self, chunk: &str) -> Result<(), Error> {
        self.encoder.emit_length(3, chunk.len())?;
        self.encoder.data.extend_from_slice(chunk.as_bytes());
        Ok(())
    }

    fn end(self) {
        self.encoder.data.push(0xFF)
    }
}

pub struct Sequence<'a, const D: usize> {
    encoder: &'a mut Encoder,
    idx: usize,
}

pub type ArrayStream<'a> = Sequence<'a, 1>;
pub type MapStream<'a> = Sequence<'a, 2>;

impl<'a, const D: usize> Sequence<'a, D> {
    fn new(encoder: &'a mut Encoder) -> Self {
        encoder.data.push(((if D == 1 { 4 } else { 5 }) << 5) | 31);
        Self { encoder, idx: 0 }
    }

    fn end(self) -> Result<(), Error> {
        if self.idx % D != 0 {
            return Err(Error::UnsupportedValue("map stream with a key but no value"));
        }
        self.encoder.data.push(0xFF);
        Ok(())
    }

    /// Number of items written so far. For maps, keys and values are counted separately.
    pub fn count(&self) -> usize {
        self.idx
    }

    /// Write the next item. For maps, items alternate between key and value.
    pub fn emit(&mut self, value: &Value) -> Result<(), Error> {
        self.idx += 1;
        self.encoder.emit(value)
    }
}

impl MapStream<'_> {
    pub fn emit_entry(&mut self, key: &Value, value: &Value) -> Result<(), Error> {
        self.emit(key)?;
        self.emit(value)
    }
}

/// Encode `value` into a new buffer.
pub fn to_vec(value: &Value) -> Result<Vec<u8>, Error> {
    let mut e = Encoder::new();
    e.emit(value)?;
    Ok(e.build())
}

macro_rules! impl_stream_emit_functions {
    ($(( $method:ident, $stream_type:ty)),*) => {
        $(
            pub fn $method<F>(f: F) -> Result<Vec<u8>, Error>
            where
                F: FnOnce(&mut $stream_type) -> Result<(), Error>,
            {
                let mut e = Encoder::new();
                e.$method(f)?;
                Ok(e.build())
            }
        )*
    };
}

impl_stream_emit_functions!(
    (emit_byte_stream, ByteStream),
    (emit_text_stream, TextStream),
    (emit_indefinite_array, ArrayStream),
    (emit_indefinite_map, MapStream)
);
