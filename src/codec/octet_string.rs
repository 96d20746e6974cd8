//! OCTET STRING: §4.4, §4.9. Primitive form is the raw octets; constructed
//! form concatenates the content of each child OCTET STRING element.

use super::Codec;
use crate::dispatch::{DecodeOptions, EncodeOptions};
use crate::error::{asn1_err, Asn1Error, ErrorKind};
use crate::node::{Content, Node};
use crate::registry::encode_recursive;
use crate::value::{well_known::OCTET_STRING, Kind, Value};
use bytes::{Bytes, BytesMut};

pub struct OctetStringCodec;

impl Codec for OctetStringCodec {
    fn supports_indefinite(&self) -> bool {
        true
    }

    fn encode_value(&self, value: &Value, opts: &EncodeOptions) -> Result<(Bytes, bool), Asn1Error> {
        let Kind::OctetString(bytes) = value.kind() else {
            return Err(asn1_err!(ErrorKind::MalformedPrimitive, "OctetStringCodec given a non-octet-string value"));
        };

        if opts.max_chunk_size == 0 || bytes.len() <= opts.max_chunk_size {
            return Ok((bytes.clone(), false));
        }

        let mut out = BytesMut::new();
        for chunk in bytes.chunks(opts.max_chunk_size) {
            let chunk_value = Value::new(Kind::OctetString(Bytes::copy_from_slice(chunk)));
            out.extend_from_slice(&encode_recursive(&chunk_value, opts)?);
        }
        Ok((out.freeze(), true))
    }

    fn decode_value(&self, node: &Node, _opts: &DecodeOptions, _spec: Option<&Value>) -> Result<Value, Asn1Error> {
        Ok(Value::new(Kind::OctetString(decode_octets(node)?)))
    }
}

fn decode_octets(node: &Node) -> Result<Bytes, Asn1Error> {
    match &node.content {
        Content::Primitive(content) => Ok(content.clone()),
        Content::Constructed(children) => {
            let mut out = BytesMut::new();
            for child in children {
                if child.tag.number != OCTET_STRING {
                    return Err(asn1_err!(ErrorKind::MalformedPrimitive, "constructed OCTET STRING child has tag {:?}, expected OCTET STRING", child.tag));
                }
                out.extend_from_slice(&decode_octets(child)?);
            }
            Ok(out.freeze())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{decode, encode};
    use crate::tag::Tag;

    #[test]
    fn primitive_round_trip() {
        let v = Value::new(Kind::OctetString(Bytes::from_static(b"hello")));
        let encoded = encode(&v, &EncodeOptions::default()).unwrap();
        assert_eq!(&encoded[..], &[0x04, 0x05, b'h', b'e', b'l', b'l', b'o']);
        let mut opts = DecodeOptions::default();
        let (decoded, _) = decode(&encoded, &mut opts).unwrap();
        assert!(decoded.content_eq(&v));
    }

    #[test]
    fn constructed_chunks_concatenate() {
        let node = Node {
            tag: Tag::universal(true, OCTET_STRING),
            length: crate::length::Length::Definite(4),
            content: Content::Constructed(vec![
                Node {
                    tag: Tag::universal(false, OCTET_STRING),
                    length: crate::length::Length::Definite(2),
                    content: Content::Primitive(Bytes::from_static(b"ab")),
                    encoded_bytes: Bytes::new(),
                },
                Node {
                    tag: Tag::universal(false, OCTET_STRING),
                    length: crate::length::Length::Definite(2),
                    content: Content::Primitive(Bytes::from_static(b"cd")),
                    encoded_bytes: Bytes::new(),
                },
            ]),
            encoded_bytes: Bytes::new(),
        };
        assert_eq!(&decode_octets(&node).unwrap()[..], b"abcd");
    }
}
