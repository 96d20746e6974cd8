use ber_codec_core::tag::Tag;
use ber_codec_core::types::{Component, ObjectIdentifier, Structure};
use ber_codec_core::value::{BitString, StringKind};
use ber_codec_core::{decode, encode, DecodeOptions, EncodeOptions, Kind, Value};
use num_bigint::BigInt;

#[test]
fn round_trips_every_primitive_kind_without_a_spec() {
    let values = vec![
        Value::new(Kind::Boolean(true)),
        Value::new(Kind::Integer(BigInt::from(-70000))),
        Value::new(Kind::OctetString(bytes::Bytes::from_static(b"payload"))),
        Value::new(Kind::Null),
        Value::new(Kind::BitString(BitString::new(bytes::Bytes::from_static(&[0xF0]), 4))),
        Value::new(Kind::ObjectIdentifier(ObjectIdentifier::new(&[1, 2, 840, 113549, 1]).unwrap())),
        Value::new(Kind::CharacterString(StringKind::Utf8, "hello, world".to_string())),
    ];

    for v in values {
        let encoded = encode(&v, &EncodeOptions::default()).unwrap();
        let mut opts = DecodeOptions::default();
        let (decoded, residual) = decode(&encoded, &mut opts).unwrap();
        assert!(residual.is_empty());
        assert!(decoded.content_eq(&v), "round trip changed {:?}", v.kind());
    }
}

#[test]
fn decodes_a_guided_sequence_with_an_explicit_tagged_field() {
    let components = vec![
        Component::required("version", Value::new(Kind::Integer(BigInt::from(0))).tagged_explicitly(Tag::context(true, 0))),
        Component::required("serial", Value::new(Kind::Integer(BigInt::from(0)))),
    ];
    let spec = Value::new(Kind::Sequence(Structure::new(components.clone())));

    let mut filled = components;
    filled[0].value = Some(Value::new(Kind::Integer(BigInt::from(2))).tagged_explicitly(Tag::context(true, 0)));
    filled[1].value = Some(Value::new(Kind::Integer(BigInt::from(12345))));
    let value = Value::new(Kind::Sequence(Structure::new(filled)));

    let encoded = encode(&value, &EncodeOptions::default()).unwrap();
    let mut opts = DecodeOptions { asn1_spec: Some(&spec), ..Default::default() };
    let (decoded, residual) = decode(&encoded, &mut opts).unwrap();
    assert!(residual.is_empty());
    assert!(decoded.content_eq(&value));
}

#[test]
fn leaves_trailing_bytes_untouched() {
    let v = Value::new(Kind::Integer(BigInt::from(1)));
    let mut encoded = encode(&v, &EncodeOptions::default()).unwrap().to_vec();
    encoded.extend_from_slice(&[0x05, 0x00]); // a trailing NULL the caller didn't ask to decode
    let mut opts = DecodeOptions::default();
    let (_, residual) = decode(&encoded, &mut opts).unwrap();
    assert_eq!(&residual[..], &[0x05, 0x00]);
}
