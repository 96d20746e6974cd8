//! SEQUENCE OF and SET OF: §4.5. A homogeneous, arbitrary-length list of
//! values all sharing one element type.

use super::Codec;
use crate::dispatch::{DecodeOptions, EncodeOptions};
use crate::error::{asn1_err, Asn1Error, ErrorKind};
use crate::node::Node;
use crate::registry::{decode_recursive, encode_recursive};
use crate::value::{Kind, Value};
use bytes::{Bytes, BytesMut};

pub struct SequenceOfCodec {
    pub is_set_of: bool,
}

impl SequenceOfCodec {
    fn elements<'a>(&self, value: &'a Value) -> Result<&'a [Value], Asn1Error> {
        match value.kind() {
            Kind::SequenceOf(v) if !self.is_set_of => Ok(v),
            Kind::SetOf(v) if self.is_set_of => Ok(v),
            _ => Err(asn1_err!(ErrorKind::MalformedPrimitive, "SequenceOfCodec given a value of the wrong kind")),
        }
    }

    fn wrap(&self, elements: Vec<Value>) -> Kind {
        if self.is_set_of {
            Kind::SetOf(elements)
        } else {
            Kind::SequenceOf(elements)
        }
    }
}

impl Codec for SequenceOfCodec {
    fn supports_indefinite(&self) -> bool {
        true
    }

    fn encode_value(&self, value: &Value, opts: &EncodeOptions) -> Result<(Bytes, bool), Asn1Error> {
        let elements = self.elements(value)?;
        let mut out = BytesMut::new();
        for element in elements {
            out.extend_from_slice(&encode_recursive(element, opts)?);
        }
        Ok((out.freeze(), true))
    }

    fn decode_value(&self, node: &Node, opts: &DecodeOptions, spec: Option<&Value>) -> Result<Value, Asn1Error> {
        let element_spec = match spec {
            Some(spec) => Some(self.elements(spec)?.first().ok_or_else(|| {
                asn1_err!(ErrorKind::SpecMismatch, "asn1_spec for a -OF type must carry one template element")
            })?),
            None => None,
        };
        let children = node.children()?;
        let mut elements = Vec::with_capacity(children.len());
        for child in children {
            elements.push(decode_recursive(child, opts, element_spec)?);
        }
        Ok(Value::new(self.wrap(elements)))
    }
}
