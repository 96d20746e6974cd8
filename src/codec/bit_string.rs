//! BIT STRING: §4.4, §4.9 ("Constructed BIT STRING").
//!
//! Primitive form is a single unused-bits count octet followed by the packed
//! bits. Constructed form chunks the bits across child BIT STRING elements;
//! only the final chunk may report unused bits, every other chunk's count
//! must be zero.

use super::Codec;
use crate::dispatch::{DecodeOptions, EncodeOptions};
use crate::error::{asn1_err, Asn1Error, ErrorKind};
use crate::node::{Content, Node};
use crate::registry::encode_recursive;
use crate::value::{well_known::BIT_STRING, BitString, Kind, Value};
use bytes::{Bytes, BytesMut};

pub struct BitStringCodec;

impl Codec for BitStringCodec {
    fn supports_indefinite(&self) -> bool {
        true
    }

    fn encode_value(&self, value: &Value, opts: &EncodeOptions) -> Result<(Bytes, bool), Asn1Error> {
        let Kind::BitString(bits) = value.kind() else {
            return Err(asn1_err!(ErrorKind::MalformedPrimitive, "BitStringCodec given a non-bit-string value"));
        };
        if bits.unused_bits > 7 {
            return Err(asn1_err!(ErrorKind::ValueOutOfRange, "unused_bits must be 0-7, found {}", bits.unused_bits));
        }

        if opts.max_chunk_size == 0 || bits.bytes.len() <= opts.max_chunk_size {
            let mut out = BytesMut::with_capacity(1 + bits.bytes.len());
            out.extend_from_slice(&[bits.unused_bits]);
            out.extend_from_slice(&bits.bytes);
            return Ok((out.freeze(), false));
        }

        let mut out = BytesMut::new();
        let chunks: Vec<&[u8]> = bits.bytes.chunks(opts.max_chunk_size).collect();
        for (i, chunk) in chunks.iter().enumerate() {
            let chunk_unused = if i + 1 == chunks.len() { bits.unused_bits } else { 0 };
            let chunk_value = Value::new(Kind::BitString(BitString::new(Bytes::copy_from_slice(chunk), chunk_unused)));
            out.extend_from_slice(&encode_recursive(&chunk_value, opts)?);
        }
        Ok((out.freeze(), true))
    }

    fn decode_value(&self, node: &Node, opts: &DecodeOptions, _spec: Option<&Value>) -> Result<Value, Asn1Error> {
        let (bytes, unused_bits) = decode_bits(node, opts)?;
        Ok(Value::new(Kind::BitString(BitString::new(bytes, unused_bits))))
    }
}

fn decode_bits(node: &Node, opts: &DecodeOptions) -> Result<(Bytes, u8), Asn1Error> {
    match &node.content {
        Content::Primitive(content) => {
            if content.is_empty() {
                return Err(asn1_err!(ErrorKind::InvalidLength, "BIT STRING content must contain at least the unused-bits octet"));
            }
            let unused_bits = content[0];
            if unused_bits > 7 {
                return Err(asn1_err!(ErrorKind::MalformedPrimitive, "unused_bits octet must be 0-7, found {}", unused_bits));
            }
            if unused_bits > 0 && content.len() == 1 {
                return Err(asn1_err!(ErrorKind::MalformedPrimitive, "empty BIT STRING cannot report unused bits"));
            }
            Ok((content.slice(1..), unused_bits))
        }
        Content::Constructed(children) => {
            let mut out = BytesMut::new();
            let mut trailing_unused = 0u8;
            for (i, child) in children.iter().enumerate() {
                if child.tag.number != BIT_STRING {
                    return Err(asn1_err!(ErrorKind::MalformedPrimitive, "constructed BIT STRING child has tag {:?}, expected BIT STRING", child.tag));
                }
                let (chunk, chunk_unused) = decode_bits(child, opts)?;
                if i + 1 < children.len() && chunk_unused != 0 {
                    return Err(asn1_err!(ErrorKind::MalformedPrimitive, "only the final chunk of a constructed BIT STRING may report unused bits"));
                }
                out.extend_from_slice(&chunk);
                trailing_unused = chunk_unused;
            }
            Ok((out.freeze(), trailing_unused))
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
        let v = Value::new(Kind::BitString(BitString::new(Bytes::from_static(&[0b1010_1000]), 3)));
        let encoded = encode(&v, &EncodeOptions::default()).unwrap();
        assert_eq!(&encoded[..], &[0x03, 0x02, 0x03, 0b1010_1000]);
        let mut opts = DecodeOptions::default();
        let (decoded, _) = decode(&encoded, &mut opts).unwrap();
        assert!(decoded.content_eq(&v));
    }

    #[test]
    fn constructed_chunks_concatenate() {
        let node = Node {
            tag: Tag::universal(true, BIT_STRING),
            length: crate::length::Length::Definite(6),
            content: Content::Constructed(vec![
                Node {
                    tag: Tag::universal(false, BIT_STRING),
                    length: crate::length::Length::Definite(2),
                    content: Content::Primitive(Bytes::from_static(&[0x00, 0xAA])),
                    encoded_bytes: Bytes::new(),
                },
                Node {
                    tag: Tag::universal(false, BIT_STRING),
                    length: crate::length::Length::Definite(2),
                    content: Content::Primitive(Bytes::from_static(&[0x04, 0xF0])),
                    encoded_bytes: Bytes::new(),
                },
            ]),
            encoded_bytes: Bytes::new(),
        };
        let opts = DecodeOptions::default();
        let (bytes, unused) = decode_bits(&node, &opts).unwrap();
        assert_eq!(&bytes[..], &[0xAA, 0xF0]);
        assert_eq!(unused, 4);
    }

    #[test]
    fn rejects_unused_bits_on_empty_content() {
        let node = Node {
            tag: Tag::universal(false, BIT_STRING),
            length: crate::length::Length::Definite(1),
            content: Content::Primitive(Bytes::from_static(&[0x01])),
            encoded_bytes: Bytes::new(),
        };
        let opts = DecodeOptions::default();
        assert!(decode_bits(&node, &opts).is_err());
    }
}
