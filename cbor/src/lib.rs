/*!
RFC 8949 CBOR codec built around an owned [`Value`] tree.

The crate has three layers:

- [`value`]: the [`Value`] model shared by everything else.
- [`encode`] / [`decode`]: byte-exact conversion between [`Value`] and the wire format.
- [`bridge`]: the [`ToValue`] / [`FromValue`] traits, which let application types describe
  themselves through single-value, sequence and keyed containers without touching bytes.

```
use cbor_value::{Value, decode, encode};

let bytes = encode::to_vec(&Value::Array(vec![1u8.into(), 2u8.into(), 3u8.into()])).unwrap();
assert_eq!(bytes, [0x83, 0x01, 0x02, 0x03]);
assert_eq!(decode::from_slice(&bytes).unwrap(), Value::Array(vec![1u8.into(), 2u8.into(), 3u8.into()]));
```
*/
#![no_std]
extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

use alloc::{
    boxed::Box,
    string::{String, ToString},
    vec::Vec,
};

pub mod bridge;
pub mod decode;
pub mod encode;
pub mod value;

#[cfg(feature = "time")]
pub mod datetime;

pub use bridge::{FromValue, ToValue};
pub use value::{Map, Value};

/// Convert `value` through the bridge and encode the result.
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>, bridge::Error>
where
    T: ToValue + ?Sized,
{
    Ok(encode::to_vec(&bridge::to_value(value)?)?)
}

/// Decode a single item from `data` and convert it through the bridge.
///
/// Trailing bytes after the item are an error.
pub fn from_slice<T>(data: &[u8]) -> Result<T, bridge::Error>
where
    T: FromValue,
{
    bridge::from_value(&decode::from_slice(data)?)
}



#[cfg(test)]
mod encode_tests;
