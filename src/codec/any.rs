//! ANY: §4.5. Carries an undecoded element's full encoded octets (identifier
//! through content) verbatim — no tag of its own, no interpretation of what
//! it contains.

use super::Codec;
use crate::dispatch::{DecodeOptions, EncodeOptions};
use crate::error::{asn1_err, Asn1Error, ErrorKind};
use crate::node::Node;
use crate::value::{Kind, Value};
use bytes::Bytes;

pub fn encode(value: &Value) -> Result<Bytes, Asn1Error> {
    match value.kind() {
        Kind::Any(bytes) => Ok(bytes.clone()),
        _ => Err(asn1_err!(ErrorKind::MalformedPrimitive, "any encoder given a non-ANY value")),
    }
}

pub fn decode(node: &Node) -> Result<Value, Asn1Error> {
    Ok(Value::new(Kind::Any(node.encoded_bytes.clone())))
}

/// Registered in the type map for completeness; unreachable through normal
/// dispatch, which special-cases ANY before consulting it (its content is
/// never framed by a codec — it already includes its own framing).
pub struct AnyCodec;

impl Codec for AnyCodec {
    fn supports_indefinite(&self) -> bool {
        false
    }

    fn encode_value(&self, _value: &Value, _opts: &EncodeOptions) -> Result<(Bytes, bool), Asn1Error> {
        Err(asn1_err!(ErrorKind::UnknownType, "ANY must be encoded via codec::any::encode, not through the Codec trait"))
    }

    fn decode_value(&self, _node: &Node, _opts: &DecodeOptions, _spec: Option<&Value>) -> Result<Value, Asn1Error> {
        Err(asn1_err!(ErrorKind::UnknownType, "ANY must be decoded via codec::any::decode, not through the Codec trait"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{decode as top_decode, encode as top_encode, DecodeOptions};

    #[test]
    fn round_trips_through_an_any_spec() {
        let spec = Value::new(Kind::Any(Bytes::new()));
        let mut opts = DecodeOptions { asn1_spec: Some(&spec), ..Default::default() };
        let (value, residual) = top_decode(&[0x02, 0x01, 0x2A], &mut opts).unwrap();
        assert!(residual.is_empty());
        assert_eq!(&top_encode(&value, &EncodeOptions::default()).unwrap()[..], &[0x02, 0x01, 0x2A]);
    }
}
