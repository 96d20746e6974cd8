//! The value model: §3 and Design Notes §9.
//!
//! The abstract ASN.1 value class hierarchy is, per the codec's own scope,
//! an external collaborator — the dispatcher only needs a tag set, a base
//! tag set, an optional type id, and a type-specific payload. Rather than
//! model that as a trait hierarchy with one implementing struct per ASN.1
//! type (deep trait-object inheritance the design notes warn against), this
//! core represents every value as one tagged enum, [`Kind`], wrapped in a
//! [`Value`] that layers on any tagging the caller applied. Dispatch reads
//! the tag straight off the enum discriminant.

use crate::error::{asn1_err, Asn1Error, ErrorKind};
use crate::tag::{Tag, TagSet, TypeId};
use crate::types::{ObjectIdentifier, Real, Structure};
use bytes::Bytes;
use chrono::{DateTime, Utc};

pub mod well_known {
    pub const BOOLEAN: u64 = 1;
    pub const INTEGER: u64 = 2;
    pub const BIT_STRING: u64 = 3;
    pub const OCTET_STRING: u64 = 4;
    pub const NULL: u64 = 5;
    pub const OBJECT_IDENTIFIER: u64 = 6;
    pub const REAL: u64 = 9;
    pub const ENUMERATED: u64 = 10;
    pub const UTF8_STRING: u64 = 12;
    pub const SEQUENCE: u64 = 16;
    pub const SET: u64 = 17;
    pub const NUMERIC_STRING: u64 = 18;
    pub const PRINTABLE_STRING: u64 = 19;
    pub const TELETEX_STRING: u64 = 20;
    pub const VIDEOTEX_STRING: u64 = 21;
    pub const IA5_STRING: u64 = 22;
    pub const UTC_TIME: u64 = 23;
    pub const GENERALIZED_TIME: u64 = 24;
    pub const GRAPHIC_STRING: u64 = 25;
    pub const VISIBLE_STRING: u64 = 26;
    pub const GENERAL_STRING: u64 = 27;
    pub const UNIVERSAL_STRING: u64 = 28;
    pub const BMP_STRING: u64 = 30;
}

/// A BIT STRING's payload: packed bits plus the count of unused trailing
/// bits in the final octet (0-7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitString {
    pub bytes: Bytes,
    pub unused_bits: u8,
}

impl BitString {
    pub fn new(bytes: Bytes, unused_bits: u8) -> Self {
        BitString { bytes, unused_bits }
    }
}

/// Which character-string type a [`Kind::CharacterString`] carries — they
/// share a representation and chunking rule, differing only in tag number
/// and (for the ones this core enforces) permitted character repertoire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringKind {
    Utf8,
    Numeric,
    Printable,
    Teletex,
    Videotex,
    IA5,
    Graphic,
    Visible,
    General,
    Universal,
    Bmp,
}

impl StringKind {
    pub fn tag_number(self) -> u64 {
        use well_known::*;
        match self {
            StringKind::Utf8 => UTF8_STRING,
            StringKind::Numeric => NUMERIC_STRING,
            StringKind::Printable => PRINTABLE_STRING,
            StringKind::Teletex => TELETEX_STRING,
            StringKind::Videotex => VIDEOTEX_STRING,
            StringKind::IA5 => IA5_STRING,
            StringKind::Graphic => GRAPHIC_STRING,
            StringKind::Visible => VISIBLE_STRING,
            StringKind::General => GENERAL_STRING,
            StringKind::Universal => UNIVERSAL_STRING,
            StringKind::Bmp => BMP_STRING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeKind {
    Generalized,
    Utc,
}

impl TimeKind {
    pub fn tag_number(self) -> u64 {
        match self {
            TimeKind::Generalized => well_known::GENERALIZED_TIME,
            TimeKind::Utc => well_known::UTC_TIME,
        }
    }
}

/// The payload of a value, independent of any tagging layered on top.
#[derive(Debug, Clone)]
pub enum Kind {
    Boolean(bool),
    Integer(num_bigint::BigInt),
    Enumerated(num_bigint::BigInt),
    BitString(BitString),
    OctetString(Bytes),
    Null,
    ObjectIdentifier(ObjectIdentifier),
    Real(Real),
    CharacterString(StringKind, String),
    Time(TimeKind, DateTime<Utc>),
    Sequence(Structure),
    Set(Structure),
    SequenceOf(Vec<Value>),
    SetOf(Vec<Value>),
    /// CHOICE has no tag of its own; it reuses the Structure/Component
    /// machinery SEQUENCE and SET share, with alternatives modeled as
    /// components of which exactly one is ever populated.
    Choice(Structure),
    Any(Bytes),
    EndOfContents,
}

impl Kind {
    fn base_tag(&self) -> Tag {
        use well_known::*;
        match self {
            Kind::Boolean(_) => Tag::universal(false, BOOLEAN),
            Kind::Integer(_) => Tag::universal(false, INTEGER),
            Kind::Enumerated(_) => Tag::universal(false, ENUMERATED),
            Kind::BitString(_) => Tag::universal(false, BIT_STRING),
            Kind::OctetString(_) => Tag::universal(false, OCTET_STRING),
            Kind::Null => Tag::universal(false, NULL),
            Kind::ObjectIdentifier(_) => Tag::universal(false, OBJECT_IDENTIFIER),
            Kind::Real(_) => Tag::universal(false, REAL),
            Kind::CharacterString(sk, _) => Tag::universal(false, sk.tag_number()),
            Kind::Time(tk, _) => Tag::universal(false, tk.tag_number()),
            Kind::Sequence(_) => Tag::universal(true, SEQUENCE),
            Kind::Set(_) => Tag::universal(true, SET),
            Kind::SequenceOf(_) => Tag::universal(true, SEQUENCE),
            Kind::SetOf(_) => Tag::universal(true, SET),
            // The tag of whichever alternative is currently populated carries
            // through as the CHOICE value's own tag; an empty CHOICE has no
            // observable wire form, so the EOC tag stands in as a sentinel.
            Kind::Choice(alternatives) => alternatives
                .components()
                .iter()
                .find_map(|c| c.value.as_ref())
                .map(|v| v.tag_set().outermost())
                .unwrap_or(Tag::EOC),
            Kind::Any(_) => Tag::universal(false, 0), // tagless; never consulted for dispatch
            Kind::EndOfContents => Tag::EOC,
        }
    }

    pub fn type_id(&self) -> Option<TypeId> {
        match self {
            Kind::Sequence(_) => Some(TypeId::Sequence),
            Kind::SequenceOf(_) => Some(TypeId::SequenceOf),
            Kind::Set(_) => Some(TypeId::Set),
            Kind::SetOf(_) => Some(TypeId::SetOf),
            Kind::Choice(_) => Some(TypeId::Choice),
            Kind::Any(_) => Some(TypeId::Any),
            _ => None,
        }
    }
}

/// A `SIZE` constraint an `asn1_spec` may carry: the component count of a
/// SEQUENCE/SET, the element count of a SEQUENCE OF/SET OF, or the
/// byte/character length of a string type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeConstraint {
    pub min: u64,
    pub max: Option<u64>,
}

impl SizeConstraint {
    pub fn new(min: u64, max: Option<u64>) -> Self {
        SizeConstraint { min, max }
    }
}

/// An ASN.1 value: its payload plus whatever tagging the caller applied on
/// top of the payload's intrinsic tag.
#[derive(Debug, Clone)]
pub struct Value {
    kind: Kind,
    tag_override: Option<TagSet>,
    size_constraint: Option<SizeConstraint>,
}

/// The minimum surface the codec requires from a value: its full and base
/// tag sets and, for the handful of tag-ambiguous families, a type id.
pub trait HasTagSet {
    fn tag_set(&self) -> TagSet;
    fn base_tag_set(&self) -> TagSet;
    fn type_id(&self) -> Option<TypeId>;
}

impl Value {
    pub fn new(kind: Kind) -> Self {
        Value { kind, tag_override: None, size_constraint: None }
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn into_kind(self) -> Kind {
        self.kind
    }

    /// Explicit tagging: push a new outer tag onto the current tag set.
    pub fn tagged_explicitly(&self, tag: Tag) -> Value {
        Value { kind: self.kind.clone(), tag_override: Some(self.tag_set().tagged_explicitly(tag)), size_constraint: self.size_constraint }
    }

    /// Implicit tagging: replace the current outermost tag in place.
    pub fn tagged_implicitly(&self, tag: Tag) -> Value {
        Value { kind: self.kind.clone(), tag_override: Some(self.tag_set().tagged_implicitly(tag)), size_constraint: self.size_constraint }
    }

    /// A fresh value with `kind` but the same tagging as `self` — used by
    /// the explicit-tag wrapper codec, which strips the outer tag, decodes
    /// the inner element on its own terms, then needs to hand back a value
    /// under the original (context-class) tag set.
    pub fn with_tag_set(kind: Kind, tag_set: TagSet) -> Value {
        Value { kind, tag_override: Some(tag_set), size_constraint: None }
    }

    /// Attaches a `SIZE` constraint — meaningful only on an `asn1_spec`,
    /// checked against the decoded value's measured size by
    /// [`verify_size_spec`] once decoding completes.
    pub fn sized(mut self, constraint: SizeConstraint) -> Value {
        self.size_constraint = Some(constraint);
        self
    }

    pub fn size_constraint(&self) -> Option<SizeConstraint> {
        self.size_constraint
    }

    /// The measured size a `SIZE` constraint is checked against: component
    /// count for SEQUENCE/SET, element count for the `-OF` families, byte or
    /// character count for string types. `None` for types with no notion of
    /// size.
    pub fn measured_size(&self) -> Option<u64> {
        match &self.kind {
            Kind::Sequence(s) | Kind::Set(s) => Some(s.len() as u64),
            Kind::SequenceOf(v) | Kind::SetOf(v) => Some(v.len() as u64),
            Kind::OctetString(b) => Some(b.len() as u64),
            Kind::BitString(b) => Some(b.bytes.len() as u64),
            Kind::CharacterString(_, s) => Some(s.chars().count() as u64),
            _ => None,
        }
    }

    /// Structural equality of payload only, ignoring tag overrides — what
    /// the SEQUENCE/SET encoder needs to decide whether a component equals
    /// its declared default.
    pub fn content_eq(&self, other: &Value) -> bool {
        kind_eq(&self.kind, &other.kind)
    }
}

impl HasTagSet for Value {
    fn tag_set(&self) -> TagSet {
        self.tag_override.clone().unwrap_or_else(|| TagSet::single(self.kind.base_tag()))
    }

    fn base_tag_set(&self) -> TagSet {
        TagSet::single(self.kind.base_tag())
    }

    fn type_id(&self) -> Option<TypeId> {
        self.kind.type_id()
    }
}

/// Checks a decoded `value` against the `SIZE` constraint, if any, carried
/// by the `asn1_spec` that guided its decode — §4.5/§6's `verify_size_spec`
/// hook. A spec with no constraint, or a value with no notion of size,
/// passes trivially.
pub fn verify_size_spec(spec: &Value, value: &Value) -> Result<(), Asn1Error> {
    let Some(constraint) = spec.size_constraint else {
        return Ok(());
    };
    let Some(measured) = value.measured_size() else {
        return Ok(());
    };
    if measured < constraint.min || constraint.max.is_some_and(|max| measured > max) {
        return Err(asn1_err!(
            ErrorKind::SizeConstraintViolation,
            "size {} outside constraint {}..{:?}",
            measured,
            constraint.min,
            constraint.max
        ));
    }
    Ok(())
}

fn kind_eq(a: &Kind, b: &Kind) -> bool {
    match (a, b) {
        (Kind::Boolean(x), Kind::Boolean(y)) => x == y,
        (Kind::Integer(x), Kind::Integer(y)) => x == y,
        (Kind::Enumerated(x), Kind::Enumerated(y)) => x == y,
        (Kind::BitString(x), Kind::BitString(y)) => x == y,
        (Kind::OctetString(x), Kind::OctetString(y)) => x == y,
        (Kind::Null, Kind::Null) => true,
        (Kind::ObjectIdentifier(x), Kind::ObjectIdentifier(y)) => x == y,
        (Kind::Real(x), Kind::Real(y)) => x == y,
        (Kind::CharacterString(ka, x), Kind::CharacterString(kb, y)) => ka == kb && x == y,
        (Kind::Time(ka, x), Kind::Time(kb, y)) => ka == kb && x == y,
        (Kind::Choice(x), Kind::Choice(y)) => {
            let xv = x.components().iter().find_map(|c| c.value.as_ref());
            let yv = y.components().iter().find_map(|c| c.value.as_ref());
            match (xv, yv) {
                (Some(xv), Some(yv)) => xv.content_eq(yv),
                (None, None) => true,
                _ => false,
            }
        }
        (Kind::Any(x), Kind::Any(y)) => x == y,
        (Kind::EndOfContents, Kind::EndOfContents) => true,
        _ => false,
    }
}
