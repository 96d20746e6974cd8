//! BOOLEAN: §4.4.
//!
//! Encoded identically to INTEGER over a single content octet. BER permits
//! any nonzero octet to mean true on decode; the encoder always emits 0x01
//! for true, 0x00 for false.

use super::Codec;
use crate::dispatch::{DecodeOptions, EncodeOptions};
use crate::error::{asn1_err, Asn1Error, ErrorKind};
use crate::node::Node;
use crate::value::{Kind, Value};
use bytes::Bytes;

pub struct BooleanCodec;

impl Codec for BooleanCodec {
    fn supports_indefinite(&self) -> bool {
        false
    }

    fn encode_value(&self, value: &Value, _opts: &EncodeOptions) -> Result<(Bytes, bool), Asn1Error> {
        let Kind::Boolean(b) = value.kind() else {
            return Err(asn1_err!(ErrorKind::MalformedPrimitive, "BooleanCodec given a non-boolean value"));
        };
        let octet = if *b { 0x01u8 } else { 0x00u8 };
        Ok((Bytes::copy_from_slice(&[octet]), false))
    }

    fn decode_value(&self, node: &Node, _opts: &DecodeOptions, _spec: Option<&Value>) -> Result<Value, Asn1Error> {
        let content = node.primitive_bytes()?;
        if content.len() != 1 {
            return Err(asn1_err!(ErrorKind::InvalidLength, "BOOLEAN content must be exactly one octet, found {}", content.len()));
        }
        Ok(Value::new(Kind::Boolean(content[0] != 0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{decode, encode};

    #[test]
    fn encodes_canonical_octets() {
        let t = encode(&Value::new(Kind::Boolean(true)), &EncodeOptions::default()).unwrap();
        assert_eq!(&t[..], &[0x01, 0x01, 0x01]);
        let f = encode(&Value::new(Kind::Boolean(false)), &EncodeOptions::default()).unwrap();
        assert_eq!(&f[..], &[0x01, 0x01, 0x00]);
    }

    #[test]
    fn decode_accepts_any_nonzero_octet() {
        let mut opts = DecodeOptions::default();
        let (value, residual) = decode(&[0x01, 0x01, 0x7F], &mut opts).unwrap();
        assert!(residual.is_empty());
        assert!(matches!(value.kind(), Kind::Boolean(true)));
    }

    #[test]
    fn decode_rejects_wrong_length() {
        let mut opts = DecodeOptions::default();
        assert!(decode(&[0x01, 0x02, 0x00, 0x00], &mut opts).is_err());
    }
}
