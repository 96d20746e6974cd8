//! OBJECT IDENTIFIER: §4.4. The wire framing here is trivial; all of the
//! substance lives in [`crate::types::ObjectIdentifier`].

use super::Codec;
use crate::dispatch::{DecodeOptions, EncodeOptions};
use crate::error::{asn1_err, Asn1Error, ErrorKind};
use crate::node::Node;
use crate::types::ObjectIdentifier;
use crate::value::{Kind, Value};
use bytes::Bytes;

pub struct ObjectIdentifierCodec;

impl Codec for ObjectIdentifierCodec {
    fn supports_indefinite(&self) -> bool {
        false
    }

    fn encode_value(&self, value: &Value, _opts: &EncodeOptions) -> Result<(Bytes, bool), Asn1Error> {
        let Kind::ObjectIdentifier(oid) = value.kind() else {
            return Err(asn1_err!(ErrorKind::MalformedPrimitive, "ObjectIdentifierCodec given a non-OID value"));
        };
        Ok((oid.encode_content()?, false))
    }

    fn decode_value(&self, node: &Node, _opts: &DecodeOptions, _spec: Option<&Value>) -> Result<Value, Asn1Error> {
        let content = node.primitive_bytes()?;
        if content.is_empty() {
            return Err(asn1_err!(ErrorKind::InvalidLength, "OBJECT IDENTIFIER content must not be empty"));
        }
        Ok(Value::new(Kind::ObjectIdentifier(ObjectIdentifier::decode_content(content)?)))
    }
}
