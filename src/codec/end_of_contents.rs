//! The synthetic End-of-Contents codec: §4.6. Registered purely so the
//! reserved tag resolves to something in `tag_map`; its actual recognition
//! and strict-form validation happens earlier, in [`crate::dispatch::decode`]
//! and [`crate::node`], before a codec would ever be consulted for it.

use super::Codec;
use crate::dispatch::{DecodeOptions, EncodeOptions};
use crate::error::{asn1_err, Asn1Error, ErrorKind};
use crate::node::Node;
use crate::value::{Kind, Value};
use bytes::Bytes;

pub struct EndOfContentsCodec;

impl Codec for EndOfContentsCodec {
    fn supports_indefinite(&self) -> bool {
        false
    }

    fn encode_value(&self, value: &Value, _opts: &EncodeOptions) -> Result<(Bytes, bool), Asn1Error> {
        match value.kind() {
            Kind::EndOfContents => Ok((Bytes::new(), false)),
            _ => Err(asn1_err!(ErrorKind::MalformedPrimitive, "EndOfContentsCodec given a non-EOC value")),
        }
    }

    fn decode_value(&self, node: &Node, _opts: &DecodeOptions, _spec: Option<&Value>) -> Result<Value, Asn1Error> {
        if !node.primitive_bytes()?.is_empty() {
            return Err(asn1_err!(ErrorKind::UnexpectedEndOfContents, "end-of-contents marker must have zero-length content"));
        }
        Ok(Value::new(Kind::EndOfContents))
    }
}
