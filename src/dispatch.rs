//! The top-level `encode`/`decode` entry points: §4.8.

use crate::codec;
use crate::error::{asn1_err, Asn1Error, ErrorKind};
use crate::length::{Length, EOC_OCTETS};
use crate::node::{self, Node};
use crate::registry::Registry;
use crate::tag::{Tag, TypeId};
use crate::value::{HasTagSet, Value};
use bytes::{Bytes, BytesMut};

#[derive(Debug, Clone)]
pub struct EncodeOptions {
    pub definite_mode: bool,
    pub max_chunk_size: usize,
    /// SEQUENCE/SET components equal to their declared default are omitted
    /// on encode when true (DER behavior observed in the BER encoder this
    /// core is modeled on; see Design Notes' first open question).
    pub omit_defaulted: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions { definite_mode: true, max_chunk_size: 0, omit_defaulted: true }
    }
}

/// A callback that receives a content region verbatim instead of letting
/// the dispatcher parse it — §4.8 "Substrate pass-through". `length` is the
/// declared content length, or `-1` if it was indefinite.
pub type SubstrateFun<'a> = dyn FnMut(Option<&Value>, Bytes, i64) -> Result<Value, Asn1Error> + 'a;

pub struct DecodeOptions<'a> {
    pub asn1_spec: Option<&'a Value>,
    pub allow_eoo: bool,
    /// BER tolerates non-minimal INTEGER/ENUMERATED encodings; set this to
    /// reject them the way a DER-conformant decoder would (Design Notes'
    /// second open question).
    pub strict_integer: bool,
    pub substrate_fun: Option<&'a mut SubstrateFun<'a>>,
}

impl<'a> Default for DecodeOptions<'a> {
    fn default() -> Self {
        DecodeOptions { asn1_spec: None, allow_eoo: false, strict_integer: false, substrate_fun: None }
    }
}

/// Encodes `value` to its BER octets.
pub fn encode(value: &Value, opts: &EncodeOptions) -> Result<Bytes, Asn1Error> {
    let tag_set = value.tag_set();
    log::trace!("encoding value with tag set {:?}", tag_set);

    if tag_set.len() > 1 {
        return codec::explicit::encode(value, opts);
    }

    if let Some(type_id) = value.type_id() {
        if type_id == TypeId::Choice {
            return codec::choice::encode(value, opts);
        }
        if type_id == TypeId::Any {
            return codec::any::encode(value);
        }
        if let Some(codec) = Registry::standard().lookup_type(type_id) {
            return frame(codec, value, tag_set.outermost(), opts);
        }
    }

    if let Some(codec) = Registry::standard().lookup_tag(&tag_set) {
        return frame(codec, value, tag_set.outermost(), opts);
    }

    let base_tag_set = value.base_tag_set();
    if let Some(codec) = Registry::standard().lookup_tag(&base_tag_set) {
        return frame(codec, value, tag_set.outermost(), opts);
    }

    log::warn!("no encoder registered for tag set {:?}", tag_set);
    Err(asn1_err!(ErrorKind::UnknownType, "no encoder for tag set {:?}", tag_set))
}

fn frame(codec: &dyn crate::codec::Codec, value: &Value, tag: Tag, opts: &EncodeOptions) -> Result<Bytes, Asn1Error> {
    let (content, constructed) = codec.encode_value(value, opts)?;
    let mut out = BytesMut::new();
    let final_tag = tag.with_constructed(constructed);
    final_tag.write_identifier(&mut out);
    let indefinite = !opts.definite_mode && constructed && codec.supports_indefinite();
    Length::write(content.len() as u64, indefinite, &mut out)?;
    out.extend_from_slice(&content);
    if indefinite {
        out.extend_from_slice(&EOC_OCTETS);
    }
    Ok(out.freeze())
}

/// Decodes one outermost value from `data`, returning it and the residual
/// octets that followed it.
pub fn decode<'a>(data: &[u8], opts: &mut DecodeOptions<'a>) -> Result<(Value, Bytes), Asn1Error> {
    let bytes = Bytes::copy_from_slice(data);
    let (tag, tag_len) = Tag::read_identifier(&bytes)?;
    let (length, length_len) = Length::read(&bytes[tag_len..])?;

    if tag.is_eoc_candidate() {
        let header_len = tag_len + length_len;
        let canonical = length == Length::Definite(0) && length_len == 1 && !tag.constructed;
        if !canonical {
            return Err(asn1_err!(ErrorKind::UnexpectedEndOfContents, "malformed end-of-contents marker"));
        }
        if !opts.allow_eoo {
            return Err(asn1_err!(ErrorKind::UnexpectedEndOfContents, "end-of-contents not permitted at top level"));
        }
        return Ok((Value::new(crate::value::Kind::EndOfContents), bytes.slice(header_len..)));
    }

    let (node, residual) = node::decode_one(&bytes)?;
    log::trace!("decoded node with tag {:?}, {} bytes residual", node.tag, residual.len());

    if let Some(callback) = opts.substrate_fun.as_deref_mut() {
        let content = match &node.content {
            crate::node::Content::Primitive(b) => b.clone(),
            crate::node::Content::Constructed(_) => node.encoded_bytes.slice(tag_len + length_len..),
        };
        let value = callback(opts.asn1_spec, content, node.reported_length())?;
        return Ok((value, residual));
    }

    let spec = opts.asn1_spec;
    let value = decode_node(&node, opts, spec)?;
    Ok((value, residual))
}

/// Decodes a single already-parsed node, optionally validated/guided by
/// `spec`. Used both by [`decode`] and recursively by composite codecs
/// decoding their children.
pub fn decode_node(node: &Node, opts: &DecodeOptions, spec: Option<&Value>) -> Result<Value, Asn1Error> {
    match spec {
        Some(spec) => decode_with_spec(node, opts, spec),
        None => decode_without_spec(node, opts),
    }
}

fn decode_without_spec(node: &Node, opts: &DecodeOptions) -> Result<Value, Asn1Error> {
    let tag_set = crate::tag::TagSet::single(node.tag);
    let codec = Registry::standard()
        .lookup_tag(&tag_set)
        .ok_or_else(|| asn1_err!(ErrorKind::UnknownType, "tag {:?} matches no codec and no asn1_spec was supplied", node.tag))?;
    codec.decode_value(node, opts, None)
}

fn decode_with_spec(node: &Node, opts: &DecodeOptions, spec: &Value) -> Result<Value, Asn1Error> {
    let spec_tag_set = spec.tag_set();

    if spec_tag_set.len() > 1 {
        if node.tag != spec_tag_set.outermost() {
            return Err(asn1_err!(ErrorKind::SpecMismatch, "expected outer tag {:?}, found {:?}", spec_tag_set.outermost(), node.tag));
        }
        let children = node.children()?;
        if children.len() != 1 {
            return Err(asn1_err!(ErrorKind::MalformedPrimitive, "explicit tag wrapper must contain exactly one element"));
        }
        let (_, reduced) = spec_tag_set.strip_outermost();
        let reduced_tag_set = reduced.expect("checked spec_tag_set.len() > 1 above");
        let reduced_spec = Value::with_tag_set(spec.kind().clone(), reduced_tag_set);
        let inner = decode_with_spec(&children[0], opts, &reduced_spec)?;
        return Ok(Value::with_tag_set(inner.into_kind(), spec.tag_set()));
    }

    match spec.type_id() {
        Some(TypeId::Choice) => codec::choice::decode(node, opts, spec),
        Some(TypeId::Any) => codec::any::decode(node),
        Some(type_id) => {
            if node.tag != spec.tag_set().outermost() {
                return Err(asn1_err!(ErrorKind::SpecMismatch, "expected tag {:?}, found {:?}", spec.tag_set().outermost(), node.tag));
            }
            let codec = Registry::standard()
                .lookup_type(type_id)
                .ok_or_else(|| asn1_err!(ErrorKind::UnknownType, "no codec registered for type id {:?}", type_id))?;
            let value = codec.decode_value(node, opts, Some(spec))?;
            crate::value::verify_size_spec(spec, &value)?;
            Ok(value)
        }
        None => {
            if node.tag != spec.tag_set().outermost() {
                return Err(asn1_err!(ErrorKind::SpecMismatch, "expected tag {:?}, found {:?}", spec.tag_set().outermost(), node.tag));
            }
            let codec = Registry::standard()
                .lookup_tag(&spec.base_tag_set())
                .ok_or_else(|| asn1_err!(ErrorKind::UnknownType, "no codec for tag set {:?}", spec.base_tag_set()))?;
            let value = codec.decode_value(node, opts, Some(spec))?;
            crate::value::verify_size_spec(spec, &value)?;
            Ok(value)
        }
    }
}
