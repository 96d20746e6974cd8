use ber_codec_core::{decode, DecodeOptions, ErrorKind};

#[test]
fn excessively_nested_constructed_values_are_rejected() {
    let depth = 60;
    let mut data = Vec::new();
    for _ in 0..depth {
        data.push(0x30); // SEQUENCE, constructed
        data.push(0x80); // indefinite length
    }
    data.extend(std::iter::repeat(0x00).take(2 * depth));

    let mut opts = DecodeOptions::default();
    let err = decode(&data, &mut opts).unwrap_err();
    assert_eq!(err.kind, ErrorKind::TruncatedInput);
}

#[test]
fn depth_within_the_limit_decodes_fine() {
    let depth = 10;
    let mut data = Vec::new();
    for _ in 0..depth {
        data.push(0x30);
        data.push(0x80);
    }
    data.extend(std::iter::repeat(0x00).take(2 * depth));

    let mut opts = DecodeOptions::default();
    let (_, residual) = decode(&data, &mut opts).unwrap();
    assert!(residual.is_empty());
}
