use ber_codec_core::{decode, encode, DecodeOptions, EncodeOptions, ErrorKind, Kind, Value};
use num_bigint::BigInt;

#[test]
fn truncated_content_is_rejected() {
    let mut opts = DecodeOptions::default();
    let err = decode(&[0x02, 0x04, 0x01, 0x02], &mut opts).unwrap_err();
    assert_eq!(err.kind, ErrorKind::TruncatedInput);
}

#[test]
fn reserved_length_octet_is_rejected() {
    let mut opts = DecodeOptions::default();
    let err = decode(&[0x02, 0xFF], &mut opts).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidLength);
}

#[test]
fn top_level_end_of_contents_is_rejected_by_default() {
    let mut opts = DecodeOptions::default();
    let err = decode(&[0x00, 0x00], &mut opts).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnexpectedEndOfContents);
}

#[test]
fn spec_tag_mismatch_is_reported() {
    let spec = Value::new(Kind::Null);
    let encoded = encode(&Value::new(Kind::Integer(BigInt::from(1))), &EncodeOptions::default()).unwrap();
    let mut opts = DecodeOptions { asn1_spec: Some(&spec), ..Default::default() };
    let err = decode(&encoded, &mut opts).unwrap_err();
    assert_eq!(err.kind, ErrorKind::SpecMismatch);
}

#[test]
fn unknown_tag_with_no_spec_is_reported() {
    let mut opts = DecodeOptions::default();
    // Private class, tag 5, primitive, empty content: matches nothing in the
    // tag map and no asn1_spec was supplied to resolve it.
    let err = decode(&[0xC5, 0x00], &mut opts).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownType);
}
