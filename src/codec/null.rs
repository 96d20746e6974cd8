//! NULL: §4.4. Always zero-length content.

use super::Codec;
use crate::dispatch::{DecodeOptions, EncodeOptions};
use crate::error::{asn1_err, Asn1Error, ErrorKind};
use crate::node::Node;
use crate::value::{Kind, Value};
use bytes::Bytes;

pub struct NullCodec;

impl Codec for NullCodec {
    fn supports_indefinite(&self) -> bool {
        false
    }

    fn encode_value(&self, value: &Value, _opts: &EncodeOptions) -> Result<(Bytes, bool), Asn1Error> {
        match value.kind() {
            Kind::Null => Ok((Bytes::new(), false)),
            _ => Err(asn1_err!(ErrorKind::MalformedPrimitive, "NullCodec given a non-null value")),
        }
    }

    fn decode_value(&self, node: &Node, _opts: &DecodeOptions, _spec: Option<&Value>) -> Result<Value, Asn1Error> {
        let content = node.primitive_bytes()?;
        if !content.is_empty() {
            return Err(asn1_err!(ErrorKind::InvalidLength, "NULL content must be empty, found {} octets", content.len()));
        }
        Ok(Value::new(Kind::Null))
    }
}
