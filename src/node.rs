//! The single-element TLV parser.
//!
//! Unlike a whole-buffer parser, [`decode_one`] consumes exactly one
//! outermost element — identifier, length, content, and (if indefinite) its
//! terminating end-of-contents marker — and hands back whatever octets
//! follow untouched. This is what lets the dispatcher's `decode` stop after
//! one value without knowing in advance how many more might follow in the
//! caller's buffer.

use crate::error::{asn1_err, Asn1Error, ErrorKind};
use crate::length::Length;
use crate::tag::Tag;
use bytes::Bytes;

/// Constructed content nests at most this deep. Matches the ceiling the
/// reference parser in this codebase has always enforced; it exists to turn
/// a maliciously deep input into a clean error instead of a stack overflow.
const MAXIMUM_NODE_DEPTH: usize = 50;

#[derive(Debug, Clone)]
pub struct Node {
    pub tag: Tag,
    pub length: Length,
    pub content: Content,
    /// The full span of octets this node occupies, identifier through the
    /// trailing EOC (if any).
    pub encoded_bytes: Bytes,
}

#[derive(Debug, Clone)]
pub enum Content {
    Primitive(Bytes),
    Constructed(Vec<Node>),
}

impl Node {
    pub fn is_constructed(&self) -> bool {
        matches!(self.content, Content::Constructed(_))
    }

    pub fn primitive_bytes(&self) -> Result<&Bytes, Asn1Error> {
        match &self.content {
            Content::Primitive(b) => Ok(b),
            Content::Constructed(_) => Err(asn1_err!(ErrorKind::InvalidTagForm, "expected primitive content")),
        }
    }

    pub fn children(&self) -> Result<&[Node], Asn1Error> {
        match &self.content {
            Content::Constructed(c) => Ok(c),
            Content::Primitive(_) => Err(asn1_err!(ErrorKind::InvalidTagForm, "expected constructed content")),
        }
    }

    /// The declared content length, or `-1` for indefinite — the shape the
    /// substrate pass-through hook reports to its caller.
    pub fn reported_length(&self) -> i64 {
        match self.length {
            Length::Definite(n) => n as i64,
            Length::Indefinite => -1,
        }
    }
}

/// Reads exactly one TLV element from the front of `data`.
///
/// Returns the parsed node and the residual octets following it. Fails if
/// `data` does not begin with a complete, well-formed element.
pub fn decode_one(data: &Bytes) -> Result<(Node, Bytes), Asn1Error> {
    let (node, consumed) = parse_element(data, 0)?;
    Ok((node, data.slice(consumed..)))
}

fn parse_element(data: &Bytes, depth: usize) -> Result<(Node, usize), Asn1Error> {
    if depth > MAXIMUM_NODE_DEPTH {
        return Err(asn1_err!(ErrorKind::TruncatedInput, "constructed nesting exceeds depth limit {}", MAXIMUM_NODE_DEPTH));
    }

    let (tag, tag_len) = Tag::read_identifier(data)?;
    let (length, length_len) = Length::read(&data[tag_len..])?;
    let header_len = tag_len + length_len;

    if tag.is_eoc_candidate() {
        return Err(asn1_err!(
            ErrorKind::UnexpectedEndOfContents,
            "reserved end-of-contents tag encountered outside of indefinite-length scanning"
        ));
    }

    match length {
        Length::Definite(len) => {
            let len = len as usize;
            let content_start = header_len;
            let content_end = content_start
                .checked_add(len)
                .ok_or_else(|| asn1_err!(ErrorKind::TruncatedInput, "declared length overflows"))?;
            if data.len() < content_end {
                return Err(asn1_err!(ErrorKind::TruncatedInput, "content region shorter than declared length"));
            }
            let content_bytes = data.slice(content_start..content_end);
            let content = if tag.constructed {
                Content::Constructed(parse_definite_children(&content_bytes, depth + 1)?)
            } else {
                Content::Primitive(content_bytes)
            };
            Ok((
                Node { tag, length, content, encoded_bytes: data.slice(0..content_end) },
                content_end,
            ))
        }
        Length::Indefinite => {
            if !tag.constructed {
                return Err(asn1_err!(ErrorKind::InvalidLength, "indefinite length on a primitive element"));
            }
            let (children, body_len) = parse_indefinite_children(&data.slice(header_len..), depth + 1)?;
            let total = header_len + body_len;
            Ok((
                Node { tag, length, content: Content::Constructed(children), encoded_bytes: data.slice(0..total) },
                total,
            ))
        }
    }
}

fn parse_definite_children(content: &Bytes, depth: usize) -> Result<Vec<Node>, Asn1Error> {
    let mut children = Vec::new();
    let mut offset = 0usize;
    while offset < content.len() {
        let remaining = content.slice(offset..);
        let (tag, tag_len) = Tag::read_identifier(&remaining)?;
        if tag.is_eoc_candidate() {
            return Err(asn1_err!(
                ErrorKind::UnexpectedEndOfContents,
                "end-of-contents marker found inside definite-length content"
            ));
        }
        let _ = tag_len;
        let (node, consumed) = parse_element(&remaining, depth)?;
        offset += consumed;
        children.push(node);
    }
    Ok(children)
}

fn parse_indefinite_children(content: &Bytes, depth: usize) -> Result<(Vec<Node>, usize), Asn1Error> {
    let mut children = Vec::new();
    let mut offset = 0usize;
    loop {
        if offset >= content.len() {
            return Err(asn1_err!(ErrorKind::TruncatedInput, "unterminated indefinite-length constructed value"));
        }
        let remaining = content.slice(offset..);
        let (tag, tag_len) = Tag::read_identifier(&remaining)?;
        if tag.is_eoc_candidate() {
            let (length, length_len) = Length::read(&remaining[tag_len..])?;
            if tag.constructed {
                return Err(asn1_err!(ErrorKind::UnexpectedEndOfContents, "end-of-contents marker has the constructed bit set"));
            }
            match length {
                Length::Indefinite => {
                    return Err(asn1_err!(ErrorKind::UnexpectedEndOfContents, "end-of-contents marker has an indefinite length"))
                }
                Length::Definite(0) if length_len == 1 => {
                    offset += tag_len + length_len;
                    return Ok((children, offset));
                }
                Length::Definite(0) => {
                    return Err(asn1_err!(ErrorKind::UnexpectedEndOfContents, "end-of-contents marker used a long-form length"))
                }
                Length::Definite(_) => {
                    return Err(asn1_err!(ErrorKind::UnexpectedEndOfContents, "end-of-contents marker declared nonzero length"))
                }
            }
        }
        let (node, consumed) = parse_element(&remaining, depth)?;
        offset += consumed;
        children.push(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(v: &[u8]) -> Bytes {
        Bytes::copy_from_slice(v)
    }

    #[test]
    fn primitive_with_residual() {
        let data = bytes(&[0x02, 0x01, 0x2A, 0xFF, 0xFF]);
        let (node, residual) = decode_one(&data).unwrap();
        assert!(!node.is_constructed());
        assert_eq!(node.primitive_bytes().unwrap().as_ref(), &[0x2A]);
        assert_eq!(residual.as_ref(), &[0xFF, 0xFF]);
    }

    #[test]
    fn indefinite_bit_string_chunks_then_eoc() {
        let data = bytes(&[0x23, 0x80, 0x03, 0x02, 0x00, 0xA9, 0x03, 0x02, 0x01, 0x8A, 0x00, 0x00]);
        let (node, residual) = decode_one(&data).unwrap();
        assert!(node.is_constructed());
        assert_eq!(node.children().unwrap().len(), 2);
        assert!(residual.is_empty());
    }

    #[test]
    fn malformed_eoc_long_form_length_rejected() {
        let data = bytes(&[0x23, 0x80, 0x00, 0x81, 0x00]);
        let err = decode_one(&data).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedEndOfContents);
    }

    #[test]
    fn malformed_eoc_constructed_bit_rejected() {
        let data = bytes(&[0x23, 0x80, 0x20, 0x00]);
        let err = decode_one(&data).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedEndOfContents);
    }

    #[test]
    fn malformed_eoc_nonzero_length_rejected() {
        let data = bytes(&[0x23, 0x80, 0x00, 0x01, 0x00]);
        let err = decode_one(&data).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedEndOfContents);
    }

    #[test]
    fn eoc_inside_definite_length_rejected() {
        let data = bytes(&[0x23, 0x02, 0x00, 0x00]);
        let err = decode_one(&data).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedEndOfContents);
    }

    #[test]
    fn empty_indefinite_value_round_trips() {
        let data = bytes(&[0x23, 0x80, 0x00, 0x00]);
        let (node, residual) = decode_one(&data).unwrap();
        assert!(node.children().unwrap().is_empty());
        assert!(residual.is_empty());
    }

    #[test]
    fn depth_limit_enforced() {
        let mut data = Vec::new();
        for _ in 0..(MAXIMUM_NODE_DEPTH + 5) {
            data.push(0x30);
            data.push(0x80);
        }
        data.extend(std::iter::repeat(0x00).take(2 * (MAXIMUM_NODE_DEPTH + 5)));
        let err = decode_one(&bytes(&data)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TruncatedInput);
    }
}
