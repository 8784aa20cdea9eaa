#![no_main]

use cbor_value::{decode, encode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Anything that decodes must re-encode, and decode again to the same value
    if let Ok(value) = decode::from_slice(data) {
        let bytes = encode::to_vec(&value).expect("Failed to re-encode decoded value");
        assert_eq!(
            decode::from_slice(&bytes).expect("Failed to decode re-encoded value"),
            value
        );
    }
});
