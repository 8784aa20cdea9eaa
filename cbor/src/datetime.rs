/*!
Date/time items (RFC 8949 section 3.4.1 and 3.4.2), layered on the tag mechanism.

[`DateTime`] writes tag 0 with an RFC 3339 text string. [`EpochTime`] writes tag 1 with an
integer number of seconds, or a double when there is a fractional part. Both read either tag.
*/

use super::*;
use alloc::format;
use crate::bridge::{Deserializer, Error, FromValue, Serializer, ToValue};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub const TAG_DATE_TIME_STRING: u64 = 0;
pub const TAG_EPOCH_DATE_TIME: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTime(pub OffsetDateTime);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpochTime(pub OffsetDateTime);

fn from_tagged(deserializer: Deserializer<'_>) -> Result<OffsetDateTime, Error> {
    let (tag, item) = deserializer.single_value().decode_tagged()?;
    let item = item.single_value();
    match tag {
        TAG_DATE_TIME_STRING => {
            OffsetDateTime::parse(item.decode_text()?, &Rfc3339).map_err(Error::custom)
        }
        TAG_EPOCH_DATE_TIME => match item.value() {
            Value::UnsignedInteger(_) | Value::NegativeInteger(_) => {
                OffsetDateTime::from_unix_timestamp(item.decode_i64()?).map_err(Error::custom)
            }
            _ => {
                let secs = item.decode_f64()?;
                if !secs.is_finite() {
                    return Err(Error::OutOfRange {
                        value: secs.to_string(),
                        target: "epoch time",
                    });
                }
                OffsetDateTime::from_unix_timestamp_nanos((secs * 1e9) as i128)
                    .map_err(Error::custom)
            }
        },
        _ => Err(Error::custom(format!("Unexpected tag {tag} for date/time"))),
    }
}

impl ToValue for DateTime {
    fn to_value(&self, serializer: Serializer) -> Result<Value, Error> {
        let text = self.0.format(&Rfc3339).map_err(Error::custom)?;
        serializer
            .single_value()
            .encode_tagged(TAG_DATE_TIME_STRING, text.as_str())
    }
}

impl FromValue for DateTime {
    fn from_value(deserializer: Deserializer<'_>) -> Result<Self, Error> {
        from_tagged(deserializer).map(DateTime)
    }
}

impl ToValue for EpochTime {
    fn to_value(&self, serializer: Serializer) -> Result<Value, Error> {
        let single = serializer.single_value();
        if self.0.nanosecond() == 0 {
            single.encode_tagged(TAG_EPOCH_DATE_TIME, &self.0.unix_timestamp())
        } else {
            let secs = self.0.unix_timestamp_nanos() as f64 / 1e9;
            single.encode_tagged(TAG_EPOCH_DATE_TIME, &secs)
        }
    }
}

impl FromValue for EpochTime {
    fn from_value(deserializer: Deserializer<'_>) -> Result<Self, Error> {
        from_tagged(deserializer).map(EpochTime)
    }
}
