#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(items) = cbor_value::decode::Decoder::new().decode_sequence(data) {
        for item in items {
            _ = format!("{item}");
        }
    }
});
