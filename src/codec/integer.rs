//! INTEGER and ENUMERATED: §4.4. Both are two's-complement big-endian
//! content; ENUMERATED differs only in tag number and in that its values
//! name members of an enumeration rather than arbitrary integers.

use super::Codec;
use crate::dispatch::{DecodeOptions, EncodeOptions};
use crate::error::{asn1_err, Asn1Error, ErrorKind};
use crate::node::Node;
use crate::value::{Kind, Value};
use bytes::Bytes;
use num_bigint::BigInt;

pub struct IntegerCodec {
    pub enumerated: bool,
}

impl IntegerCodec {
    fn wrap(&self, n: BigInt) -> Kind {
        if self.enumerated {
            Kind::Enumerated(n)
        } else {
            Kind::Integer(n)
        }
    }

    fn unwrap<'a>(&self, value: &'a Value) -> Result<&'a BigInt, Asn1Error> {
        match value.kind() {
            Kind::Integer(n) if !self.enumerated => Ok(n),
            Kind::Enumerated(n) if self.enumerated => Ok(n),
            _ => Err(asn1_err!(ErrorKind::MalformedPrimitive, "IntegerCodec given a value of the wrong kind")),
        }
    }
}

impl Codec for IntegerCodec {
    fn supports_indefinite(&self) -> bool {
        false
    }

    fn encode_value(&self, value: &Value, _opts: &EncodeOptions) -> Result<(Bytes, bool), Asn1Error> {
        let n = self.unwrap(value)?;
        Ok((Bytes::from(n.to_signed_bytes_be()), false))
    }

    fn decode_value(&self, node: &Node, opts: &DecodeOptions, _spec: Option<&Value>) -> Result<Value, Asn1Error> {
        let content = node.primitive_bytes()?;
        if content.is_empty() {
            return Err(asn1_err!(ErrorKind::InvalidLength, "INTEGER content must not be empty"));
        }
        if opts.strict_integer && !is_minimal(content) {
            return Err(asn1_err!(ErrorKind::MalformedPrimitive, "non-minimal INTEGER encoding rejected under strict_integer"));
        }
        let n = BigInt::from_signed_bytes_be(content);
        Ok(Value::new(self.wrap(n)))
    }
}

/// Whether `content` is the shortest possible two's-complement encoding —
/// i.e. not preceded by a redundant 0x00 or 0xFF sign-extension octet.
fn is_minimal(content: &[u8]) -> bool {
    if content.len() < 2 {
        return true;
    }
    let lead = content[0];
    let next_sign_bit = content[1] & 0x80;
    !((lead == 0x00 && next_sign_bit == 0x00) || (lead == 0xFF && next_sign_bit == 0x80))
}
