use super::encode::*;
use super::*;
use alloc::vec;
use half::f16;
use hex_literal::hex;

fn emit(value: impl Into<Value>) -> Vec<u8> {
    encode::to_vec(&value.into()).unwrap()
}

fn text_map(pairs: &[(&str, Value)]) -> Value {
    Value::Map(
        pairs
            .iter()
            .map(|(k, v)| (Value::from(*k), v.clone()))
            .collect(),
    )
}

#[test]
fn rfc_tests() {
    // RFC 8949, Appendix A:
    // https://www.rfc-editor.org/rfc/rfc8949.html#section-appendix.a

    assert_eq!(emit(0u8), hex!("00"));
    assert_eq!(emit(1u8), hex!("01"));
    assert_eq!(emit(10u8), hex!("0a"));
    assert_eq!(emit(23u8), hex!("17"));
    assert_eq!(emit(24u8), hex!("1818"));
    assert_eq!(emit(25u8), hex!("1819"));
    assert_eq!(emit(100u8), hex!("1864"));
    assert_eq!(emit(1000u16), hex!("1903e8"));
    assert_eq!(emit(1000000u32), hex!("1a000f4240"));
    assert_eq!(emit(1000000000000u64), hex!("1b000000e8d4a51000"));
    assert_eq!(emit(18446744073709551615u64), hex!("1bffffffffffffffff"));
    assert_eq!(
        emit(Value::NegativeInteger(u64::MAX)),
        hex!("3bffffffffffffffff")
    );
    assert_eq!(
        emit(Value::Tagged(
            2,
            Box::new(Value::from(hex!("010000000000000000").to_vec()))
        )),
        hex!("c249010000000000000000")
    );

    assert_eq!(emit(-1i8), hex!("20"));
    assert_eq!(emit(-10i8), hex!("29"));
    assert_eq!(emit(-100i8), hex!("3863"));
    assert_eq!(emit(-1000i16), hex!("3903e7"));

    assert_eq!(emit(f16::from_f32(0.0)), hex!("f90000"));
    assert_eq!(emit(f16::from_f32(-0.0)), hex!("f98000"));
    assert_eq!(emit(f16::from_f32(1.0)), hex!("f93c00"));
    assert_eq!(emit(1.1f64), hex!("fb3ff199999999999a"));
    assert_eq!(emit(f16::from_f32(1.5)), hex!("f93e00"));
    assert_eq!(emit(f16::from_f32(65504.0)), hex!("f97bff"));
    assert_eq!(emit(100000.0f32), hex!("fa47c35000"));
    assert_eq!(emit(3.4028234663852886e+38f32), hex!("fa7f7fffff"));
    assert_eq!(emit(1.0e+300f64), hex!("fb7e37e43c8800759c"));
    assert_eq!(emit(f16::from_f64(5.960464477539063e-8)), hex!("f90001"));
    assert_eq!(emit(f16::from_f64(0.00006103515625)), hex!("f90400"));
    assert_eq!(emit(f16::from_f32(-4.0)), hex!("f9c400"));
    assert_eq!(emit(-4.1f64), hex!("fbc010666666666666"));
    assert_eq!(emit(f16::INFINITY), hex!("f97c00"));
    assert_eq!(emit(f16::NAN), hex!("f97e00"));
    assert_eq!(emit(f16::NEG_INFINITY), hex!("f9fc00"));
    assert_eq!(emit(f32::INFINITY), hex!("fa7f800000"));
    assert_eq!(emit(f32::NAN), hex!("fa7fc00000"));
    assert_eq!(emit(f32::NEG_INFINITY), hex!("faff800000"));
    assert_eq!(emit(f64::INFINITY), hex!("fb7ff0000000000000"));
    assert_eq!(emit(f64::NAN), hex!("fb7ff8000000000000"));
    assert_eq!(emit(f64::NEG_INFINITY), hex!("fbfff0000000000000"));

    assert_eq!(emit(false), hex!("f4"));
    assert_eq!(emit(true), hex!("f5"));
    assert_eq!(emit(Value::Null), hex!("f6"));
    assert_eq!(emit(Value::Undefined), hex!("f7"));
    assert_eq!(emit(Value::Simple(16)), hex!("f0"));
    assert_eq!(emit(Value::Simple(255)), hex!("f8ff"));

    assert_eq!(
        emit(Value::Tagged(0, Box::new("2013-03-21T20:04:00Z".into()))),
        hex!("c074323031332d30332d32315432303a30343a30305a")
    );
    assert_eq!(
        emit(Value::Tagged(1, Box::new(1363896240u32.into()))),
        hex!("c11a514b67b0")
    );
    assert_eq!(
        emit(Value::Tagged(1, Box::new(1363896240.5f64.into()))),
        hex!("c1fb41d452d9ec200000")
    );
    assert_eq!(
        emit(Value::Tagged(23, Box::new(hex!("01020304").to_vec().into()))),
        hex!("d74401020304")
    );
    assert_eq!(
        emit(Value::Tagged(24, Box::new(hex!("6449455446").to_vec().into()))),
        hex!("d818456449455446")
    );
    assert_eq!(
        emit(Value::Tagged(32, Box::new("http://www.example.com".into()))),
        hex!("d82076687474703a2f2f7777772e6578616d706c652e636f6d")
    );

    assert_eq!(emit(Vec::<u8>::new()), hex!("40"));
    assert_eq!(emit(hex!("01020304").to_vec()), hex!("4401020304"));
    assert_eq!(emit(""), hex!("60"));
    assert_eq!(emit("a"), hex!("6161"));
    assert_eq!(emit("IETF"), hex!("6449455446"));
    assert_eq!(emit("\"\\"), hex!("62225c"));
    assert_eq!(emit("\u{00fc}"), hex!("62c3bc"));
    assert_eq!(emit("\u{6c34}"), hex!("63e6b0b4"));
    assert_eq!(
        emit("\u{10151}" /* surrogate pair: \u{d800}\u{dd51} */),
        hex!("64f0908591")
    );

    assert_eq!(emit(Vec::<Value>::new()), hex!("80"));
    assert_eq!(
        emit(vec![Value::from(1u8), 2u8.into(), 3u8.into()]),
        hex!("83010203")
    );
    assert_eq!(
        emit(vec![
            Value::from(1u8),
            vec![Value::from(2u8), 3u8.into()].into(),
            vec![Value::from(4u8), 5u8.into()].into(),
        ]),
        hex!("8301820203820405")
    );
    assert_eq!(
        emit((1..=25u8).map(Value::from).collect::<Vec<_>>()),
        hex!("98190102030405060708090a0b0c0d0e0f101112131415161718181819")
    );

    assert_eq!(emit(Map::new()), hex!("a0"));
    assert_eq!(
        emit(
            [(1u8, 2u8), (3, 4)]
                .into_iter()
                .map(|(k, v)| (Value::from(k), Value::from(v)))
                .collect::<Map>()
        ),
        hex!("a201020304")
    );
    assert_eq!(
        emit(text_map(&[
            ("a", 1u8.into()),
            ("b", vec![Value::from(2u8), 3u8.into()].into())
        ])),
        hex!("a26161016162820203")
    );
    assert_eq!(
        emit(vec![Value::from("a"), text_map(&[("b", "c".into())])]),
        hex!("826161a161626163")
    );
    assert_eq!(
        emit(text_map(&[
            ("a", "A".into()),
            ("b", "B".into()),
            ("c", "C".into()),
            ("d", "D".into()),
            ("e", "E".into())
        ])),
        hex!("a56161614161626142616361436164614461656145")
    );
}

#[test]
fn rfc_stream_tests() {
    assert_eq!(
        emit_byte_stream(|s| {
            s.emit(&hex!("0102"))?;
            s.emit(&hex!("030405"))
        })
        .unwrap(),
        hex!("5f42010243030405ff")
    );
    assert_eq!(
        emit_text_stream(|s| {
            s.emit("strea")?;
            s.emit("ming")
        })
        .unwrap(),
        hex!("7f657374726561646d696e67ff")
    );
    assert_eq!(emit_indefinite_array(|_| Ok(())).unwrap(), hex!("9fff"));
    assert_eq!(
        emit_indefinite_array(|a| {
            a.emit(&1u8.into())?;
            a.emit(&vec![Value::from(2u8), 3u8.into()].into())?;
            a.emit(&vec![Value::from(4u8), 5u8.into()].into())
        })
        .unwrap(),
        hex!("9f01820203820405ff")
    );
    assert_eq!(
        emit_indefinite_map(|m| {
            m.emit_entry(&"Fun".into(), &true.into())?;
            m.emit_entry(&"Amt".into(), &(-2i8).into())
        })
        .unwrap(),
        hex!("bf6346756ef563416d7421ff")
    );
    assert_eq!(
        emit_indefinite_map(|m| m.emit(&"a".into())),
        Err(Error::UnsupportedValue("map stream with a key but no value"))
    );
}

#[test]
fn basic_scenarios() {
    assert_eq!(emit(Value::UnsignedInteger(0)), [0x00]);
    assert_eq!(emit(Value::UnsignedInteger(23)), [0x17]);
    assert_eq!(emit(Value::UnsignedInteger(24)), [0x18, 0x18]);
    assert_eq!(emit(Value::TextString("a".into())), [0x61, 0x61]);
    assert_eq!(
        emit(Value::Array(vec![
            Value::UnsignedInteger(1),
            Value::UnsignedInteger(2),
            Value::UnsignedInteger(3)
        ])),
        [0x83, 0x01, 0x02, 0x03]
    );
    assert_eq!(emit(Value::NegativeInteger(0)), [0x20]);
}

#[test]
fn shortest_arguments() {
    assert_eq!(emit(255u8), hex!("18ff"));
    assert_eq!(emit(256u16), hex!("190100"));
    assert_eq!(emit(65535u16), hex!("19ffff"));
    assert_eq!(emit(65536u32), hex!("1a00010000"));
    assert_eq!(emit(u32::MAX), hex!("1affffffff"));
    assert_eq!(emit(1u64 << 32), hex!("1b0000000100000000"));
    assert_eq!(emit(i64::MIN), hex!("3b7fffffffffffffff"));
    assert_eq!(emit(vec![0u8; 24]), [&hex!("5818")[..], &[0u8; 24]].concat());
    assert_eq!(
        emit(Value::Tagged(256, Box::new(Value::Null))),
        hex!("d90100f6")
    );
}

#[test]
fn simple_values() {
    assert_eq!(emit(Value::Simple(0)), hex!("e0"));
    assert_eq!(emit(Value::Simple(19)), hex!("f3"));
    assert_eq!(emit(Value::Simple(32)), hex!("f820"));
    for reserved in 20..=31 {
        assert_eq!(
            encode::to_vec(&Value::Simple(reserved)),
            Err(Error::InvalidSimpleValue(reserved))
        );
    }
    assert_eq!(emit(Value::Break), hex!("ff"));
}

#[test]
fn map_insertion_order() {
    let mut m = Map::new();
    m.insert("b".into(), 2u8.into());
    m.insert("a".into(), 1u8.into());
    assert_eq!(emit(m.clone()), hex!("a2616202616101"));

    // Replacing a value keeps the original position
    m.insert("b".into(), 3u8.into());
    assert_eq!(emit(m), hex!("a2616203616101"));
}

#[test]
fn deterministic() {
    let v = text_map(&[
        ("x", vec![Value::from(1.5f64), Value::Null].into()),
        ("y", Value::Tagged(42, Box::new("z".into()))),
    ]);
    assert_eq!(encode::to_vec(&v).unwrap(), encode::to_vec(&v).unwrap());
}

#[test]
fn encoder_appends() {
    let mut e = Encoder::new();
    e.emit(&1u8.into()).unwrap();
    e.emit(&"a".into()).unwrap();
    assert_eq!(e.offset(), 3);
    e.emit_raw_slice(&hex!("f6"));
    assert_eq!(e.build(), hex!("016161f6"));
}
