use super::*;
use half::f16;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Not enough data for encoded value")]
    NotEnoughData,

    #[error("Invalid minor-type value {0}")]
    InvalidMinorValue(u8),

    #[error("Invalid simple value {0}")]
    InvalidSimpleValue(u8),

    #[error("Break stop code outside an indefinite length item")]
    UnexpectedBreak,

    #[error("Chunked string contains an invalid chunk")]
    InvalidChunk,

    #[error("Indefinite length map has a key with no value")]
    PartialMap,

    #[error("Map contains duplicate key {0}")]
    DuplicateMapKey(String),

    #[error("Maximum recursion depth reached")]
    MaxRecursion,

    #[error("Additional data after the end of the encoded item")]
    AdditionalItems,

    #[error(transparent)]
    InvalidUtf8(#[from] core::str::Utf8Error),
}

/// Containers and tags nested deeper than this are rejected by default.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Decoder configuration.
///
/// ```
/// use cbor_value::decode::Decoder;
///
/// let decoder = Decoder::new().with_max_depth(4);
/// assert!(decoder.decode(&[0x81, 0x81, 0x81, 0x81, 0x00]).is_ok());
/// assert!(decoder.decode(&[0x81, 0x81, 0x81, 0x81, 0x81, 0x00]).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoder {
    max_depth: usize,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    pub const fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Decode one item from the front of `data`, returning it and the number of bytes consumed.
    pub fn decode_partial(&self, data: &[u8]) -> Result<(Value, usize), Error> {
        let mut reader = Reader::new(data);
        let value = reader.parse_item(self.max_depth)?;
        Ok((value, reader.offset))
    }

    /// Decode exactly one item; trailing bytes are an error.
    pub fn decode(&self, data: &[u8]) -> Result<Value, Error> {
        let (value, len) = self.decode_partial(data)?;
        if len != data.len() {
            return Err(Error::AdditionalItems);
        }
        Ok(value)
    }

    /// Decode a CBOR sequence (RFC 8742): zero or more items back to back.
    pub fn decode_sequence(&self, data: &[u8]) -> Result<Vec<Value>, Error> {
        let mut reader = Reader::new(data);
        let mut items = Vec::new();
        while reader.remaining() > 0 {
            items.push(reader.parse_item(self.max_depth)?);
        }
        Ok(items)
    }
}

/// Decode exactly one item with the default [`Decoder`].
pub fn from_slice(data: &[u8]) -> Result<Value, Error> {
    Decoder::new().decode(data)
}

/// Decode one item from the front of `data` with the default [`Decoder`].
pub fn from_slice_partial(data: &[u8]) -> Result<(Value, usize), Error> {
    Decoder::new().decode_partial(data)
}

struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

fn enter(depth: usize) -> Result<usize, Error> {
    depth.checked_sub(1).ok_or_else(|| {
        debug!("CBOR item exceeds maximum nesting depth");
        Error::MaxRecursion
    })
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn read_u8(&mut self) -> Result<u8, Error> {
        let b = *self.data.get(self.offset).ok_or(Error::NotEnoughData)?;
        self.offset += 1;
        Ok(b)
    }

    fn read_slice(&mut self, len: u64) -> Result<&'a [u8], Error> {
        let len = usize::try_from(len).map_err(|_| Error::NotEnoughData)?;
        if len > self.remaining() {
            return Err(Error::NotEnoughData);
        }
        let s = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(s)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        self.read_slice(N as u64)?
            .try_into()
            .map_err(|_| Error::NotEnoughData)
    }

    /// Returns the argument and whether it used the shortest form.
    fn read_uint_minor(&mut self, minor: u8) -> Result<(u64, bool), Error> {
        match minor {
            0..=23 => Ok((minor as u64, true)),
            24 => {
                let v = self.read_u8()? as u64;
                Ok((v, v >= 24))
            }
            25 => {
                let v = u16::from_be_bytes(self.read_array()?) as u64;
                Ok((v, v > u8::MAX as u64))
            }
            26 => {
                let v = u32::from_be_bytes(self.read_array()?) as u64;
                Ok((v, v > u16::MAX as u64))
            }
            27 => {
                let v = u64::from_be_bytes(self.read_array()?);
                Ok((v, v > u32::MAX as u64))
            }
            _ => Err(Error::InvalidMinorValue(minor)),
        }
    }

    /// Parse an item that must not be a break.
    fn parse_item(&mut self, depth: usize) -> Result<Value, Error> {
        match self.parse_value(depth)? {
            Value::Break => Err(Error::UnexpectedBreak),
            value => Ok(value),
        }
    }

    /// Parse the next item, returning [`Value::Break`] for a stop code.
    fn parse_value(&mut self, depth: usize) -> Result<Value, Error> {
        let initial = self.read_u8()?;
        let (major, minor) = (initial >> 5, initial & 0x1F);
        if major == 7 {
            return self.parse_simple(minor);
        }
        if minor == 31 {
            return self.parse_indefinite(major, depth);
        }

        let (arg, shortest) = self.read_uint_minor(minor)?;
        if !shortest {
            trace!("Accepting non-shortest argument encoding for major type {major}");
        }
        match major {
            0 => Ok(Value::UnsignedInteger(arg)),
            1 => Ok(Value::NegativeInteger(arg)),
            2 => Ok(Value::ByteString(self.read_slice(arg)?.to_vec())),
            3 => Ok(Value::TextString(
                core::str::from_utf8(self.read_slice(arg)?)?.to_string(),
            )),
            4 => {
                let depth = enter(depth)?;
                // Every item needs at least one byte
                if arg > self.remaining() as u64 {
                    return Err(Error::NotEnoughData);
                }
                let mut items = Vec::with_capacity(arg as usize);
                for _ in 0..arg {
                    items.push(self.parse_item(depth)?);
                }
                Ok(Value::Array(items))
            }
            5 => {
                let depth = enter(depth)?;
                if arg > (self.remaining() / 2) as u64 {
                    return Err(Error::NotEnoughData);
                }
                let mut pairs = Vec::with_capacity(arg as usize);
                for _ in 0..arg {
                    let key = self.parse_item(depth)?;
                    let value = self.parse_item(depth)?;
                    pairs.push((key, value));
                }
                build_map(pairs)
            }
            _ => {
                // Major type 6: one tag and exactly one item
                let depth = enter(depth)?;
                let item = self.parse_item(depth)?;
                Ok(Value::Tagged(arg, Box::new(item)))
            }
        }
    }

    fn parse_indefinite(&mut self, major: u8, depth: usize) -> Result<Value, Error> {
        trace!("Parsing indefinite length item of major type {major}");
        match major {
            2 => self.parse_chunks(2).map(Value::ByteString),
            3 => {
                let data = self.parse_chunks(3)?;
                // Every chunk has already been validated
                String::from_utf8(data)
                    .map(Value::TextString)
                    .map_err(|e| e.utf8_error().into())
            }
            4 => {
                let depth = enter(depth)?;
                let mut items = Vec::new();
                loop {
                    match self.parse_value(depth)? {
                        Value::Break => break Ok(Value::Array(items)),
                        item => items.push(item),
                    }
                }
            }
            5 => {
                let depth = enter(depth)?;
                let mut pairs = Vec::new();
                loop {
                    let key = match self.parse_value(depth)? {
                        Value::Break => break build_map(pairs),
                        key => key,
                    };
                    match self.parse_value(depth)? {
                        Value::Break => break Err(Error::PartialMap),
                        value => pairs.push((key, value)),
                    }
                }
            }
            _ => Err(Error::InvalidMinorValue(31)),
        }
    }

    fn parse_chunks(&mut self, major: u8) -> Result<Vec<u8>, Error> {
        let mut data = Vec::new();
        loop {
            let initial = self.read_u8()?;
            if initial == 0xFF {
                break Ok(data);
            }
            if initial >> 5 != major || initial & 0x1F == 31 {
                break Err(Error::InvalidChunk);
            }
            let (len, _) = self.read_uint_minor(initial & 0x1F)?;
            let chunk = self.read_slice(len)?;
            if major == 3 {
                core::str::from_utf8(chunk)?;
            }
            data.extend_from_slice(chunk);
        }
    }

    fn parse_simple(&mut self, minor: u8) -> Result<Value, Error> {
        match minor {
            0..=19 => Ok(Value::Simple(minor)),
            20 => Ok(Value::Boolean(false)),
            21 => Ok(Value::Boolean(true)),
            22 => Ok(Value::Null),
            23 => Ok(Value::Undefined),
            24 => match self.read_u8()? {
                v if v < 32 => Err(Error::InvalidSimpleValue(v)),
                v => Ok(Value::Simple(v)),
            },
            25 => Ok(Value::Half(f16::from_be_bytes(self.read_array()?))),
            26 => Ok(Value::Float(f32::from_be_bytes(self.read_array()?))),
            27 => Ok(Value::Double(f64::from_be_bytes(self.read_array()?))),
            31 => Ok(Value::Break),
            _ => Err(Error::InvalidSimpleValue(minor)),
        }
    }
}

fn build_map(pairs: Vec<(Value, Value)>) -> Result<Value, Error> {
    Map::try_from_pairs(pairs)
        .map(Value::Map)
        .map_err(|key| Error::DuplicateMapKey(key.to_string()))
}
