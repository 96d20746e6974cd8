//! CHOICE: §4.5. CHOICE has no tag of its own — the tag of whichever
//! alternative is selected carries straight through, so encoding and
//! decoding bypass the usual identifier/length framing entirely and defer
//! to the chosen alternative's own codec.

use super::Codec;
use crate::dispatch::{DecodeOptions, EncodeOptions};
use crate::error::{asn1_err, Asn1Error, ErrorKind};
use crate::node::Node;
use crate::registry::{decode_recursive, encode_recursive};
use crate::types::Structure;
use crate::value::{Kind, Value};
use bytes::Bytes;

pub fn encode(value: &Value, opts: &EncodeOptions) -> Result<Bytes, Asn1Error> {
    let Kind::Choice(structure) = value.kind() else {
        return Err(asn1_err!(ErrorKind::MalformedPrimitive, "choice encoder given a non-CHOICE value"));
    };
    let chosen = structure
        .components()
        .iter()
        .find_map(|c| c.value.as_ref())
        .ok_or_else(|| asn1_err!(ErrorKind::MalformedPrimitive, "CHOICE value has no alternative selected"))?;
    encode_recursive(chosen, opts)
}

pub fn decode(node: &Node, opts: &DecodeOptions, spec: &Value) -> Result<Value, Asn1Error> {
    let Kind::Choice(template) = spec.kind() else {
        return Err(asn1_err!(ErrorKind::MalformedPrimitive, "choice decoder given a non-CHOICE asn1_spec"));
    };
    let mut components = template.components().to_vec();
    let position = components
        .iter()
        .position(|c| c.tag_set().outermost() == node.tag)
        .ok_or_else(|| asn1_err!(ErrorKind::SpecMismatch, "tag {:?} matches no CHOICE alternative", node.tag))?;
    let decoded = decode_recursive(node, opts, Some(&components[position].spec))?;
    components[position].value = Some(decoded);
    Ok(Value::new(Kind::Choice(Structure::new(components))))
}

/// Registered in the type map for completeness; unreachable through normal
/// dispatch, which special-cases CHOICE before consulting it (CHOICE has no
/// tag of its own to frame against).
pub struct ChoiceCodec;

impl Codec for ChoiceCodec {
    fn supports_indefinite(&self) -> bool {
        false
    }

    fn encode_value(&self, _value: &Value, _opts: &EncodeOptions) -> Result<(Bytes, bool), Asn1Error> {
        Err(asn1_err!(ErrorKind::UnknownType, "CHOICE must be encoded via codec::choice::encode, not through the Codec trait"))
    }

    fn decode_value(&self, _node: &Node, _opts: &DecodeOptions, _spec: Option<&Value>) -> Result<Value, Asn1Error> {
        Err(asn1_err!(ErrorKind::UnknownType, "CHOICE must be decoded via codec::choice::decode, not through the Codec trait"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{decode as top_decode, encode as top_encode};
    use crate::tag::Tag;
    use crate::types::structure::Component;
    use num_bigint::BigInt;

    fn spec() -> Value {
        let components = vec![
            Component::required("asNumber", Value::new(Kind::Integer(BigInt::from(0)))),
            Component::required("asString", Value::new(Kind::CharacterString(crate::value::StringKind::Utf8, String::new()))),
        ];
        Value::new(Kind::Choice(Structure::new(components)))
    }

    #[test]
    fn encodes_and_decodes_the_selected_alternative() {
        let mut components = vec![
            Component::required("asNumber", Value::new(Kind::Integer(BigInt::from(0)))),
            Component::required("asString", Value::new(Kind::CharacterString(crate::value::StringKind::Utf8, String::new()))),
        ];
        components[0].value = Some(Value::new(Kind::Integer(BigInt::from(42))));
        let v = Value::new(Kind::Choice(Structure::new(components)));

        let encoded = top_encode(&v, &EncodeOptions::default()).unwrap();
        assert_eq!(&encoded[..], &[0x02, 0x01, 0x2A]);

        let spec = spec();
        let mut opts = DecodeOptions { asn1_spec: Some(&spec), ..Default::default() };
        let (decoded, residual) = top_decode(&encoded, &mut opts).unwrap();
        assert!(residual.is_empty());
        assert!(decoded.content_eq(&v));
    }

    #[test]
    fn unmatched_tag_is_rejected() {
        let spec = spec();
        let node = Node {
            tag: Tag::universal(false, crate::value::well_known::NULL),
            length: crate::length::Length::Definite(0),
            content: crate::node::Content::Primitive(Bytes::new()),
            encoded_bytes: Bytes::new(),
        };
        let opts = DecodeOptions::default();
        assert!(decode(&node, &opts, &spec).is_err());
    }
}
