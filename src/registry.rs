//! Codec registries: §6, §9 ("Codec registry mutability").
//!
//! Both maps are assembled once, lazily, into an immutable table — runtime
//! registration is not a requirement any call site in this core needs.

use crate::codec::{self, Codec};
use crate::dispatch::{DecodeOptions, EncodeOptions};
use crate::error::Asn1Error;
use crate::node::Node;
use crate::tag::{Tag, TagSet, TypeId};
use crate::value::{well_known::*, StringKind, TimeKind, Value};
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::OnceLock;

pub struct Registry {
    tag_map: HashMap<TagSet, &'static dyn Codec>,
    type_map: HashMap<TypeId, &'static dyn Codec>,
}

impl Registry {
    pub fn standard() -> &'static Registry {
        static REGISTRY: OnceLock<Registry> = OnceLock::new();
        REGISTRY.get_or_init(Registry::build)
    }

    pub fn lookup_tag(&self, tag_set: &TagSet) -> Option<&'static dyn Codec> {
        self.tag_map.get(tag_set).copied()
    }

    pub fn lookup_type(&self, type_id: TypeId) -> Option<&'static dyn Codec> {
        self.type_map.get(&type_id).copied()
    }

    fn build() -> Registry {
        static BOOLEAN_CODEC: codec::boolean::BooleanCodec = codec::boolean::BooleanCodec;
        static INTEGER_CODEC: codec::integer::IntegerCodec = codec::integer::IntegerCodec { enumerated: false };
        static ENUMERATED_CODEC: codec::integer::IntegerCodec = codec::integer::IntegerCodec { enumerated: true };
        static BIT_STRING_CODEC: codec::bit_string::BitStringCodec = codec::bit_string::BitStringCodec;
        static OCTET_STRING_CODEC: codec::octet_string::OctetStringCodec = codec::octet_string::OctetStringCodec;
        static NULL_CODEC: codec::null::NullCodec = codec::null::NullCodec;
        static OID_CODEC: codec::object_identifier::ObjectIdentifierCodec = codec::object_identifier::ObjectIdentifierCodec;
        static REAL_CODEC: codec::real::RealCodec = codec::real::RealCodec;
        static SEQUENCE_CODEC: codec::sequence::SequenceCodec = codec::sequence::SequenceCodec { is_set: false };
        static SET_CODEC: codec::sequence::SequenceCodec = codec::sequence::SequenceCodec { is_set: true };
        static SEQUENCE_OF_CODEC: codec::sequence_of::SequenceOfCodec = codec::sequence_of::SequenceOfCodec { is_set_of: false };
        static SET_OF_CODEC: codec::sequence_of::SequenceOfCodec = codec::sequence_of::SequenceOfCodec { is_set_of: true };
        static CHOICE_CODEC: codec::choice::ChoiceCodec = codec::choice::ChoiceCodec;
        static ANY_CODEC: codec::any::AnyCodec = codec::any::AnyCodec;
        static EOC_CODEC: codec::end_of_contents::EndOfContentsCodec = codec::end_of_contents::EndOfContentsCodec;

        static STRING_CODECS: [codec::character_string::CharacterStringCodec; 11] = [
            codec::character_string::CharacterStringCodec { kind: StringKind::Utf8 },
            codec::character_string::CharacterStringCodec { kind: StringKind::Numeric },
            codec::character_string::CharacterStringCodec { kind: StringKind::Printable },
            codec::character_string::CharacterStringCodec { kind: StringKind::Teletex },
            codec::character_string::CharacterStringCodec { kind: StringKind::Videotex },
            codec::character_string::CharacterStringCodec { kind: StringKind::IA5 },
            codec::character_string::CharacterStringCodec { kind: StringKind::Graphic },
            codec::character_string::CharacterStringCodec { kind: StringKind::Visible },
            codec::character_string::CharacterStringCodec { kind: StringKind::General },
            codec::character_string::CharacterStringCodec { kind: StringKind::Universal },
            codec::character_string::CharacterStringCodec { kind: StringKind::Bmp },
        ];

        static TIME_CODECS: [codec::character_string::TimeCodec; 2] = [
            codec::character_string::TimeCodec { kind: TimeKind::Generalized },
            codec::character_string::TimeCodec { kind: TimeKind::Utc },
        ];

        let mut tag_map: HashMap<TagSet, &'static dyn Codec> = HashMap::new();
        tag_map.insert(TagSet::single(Tag::universal(false, BOOLEAN)), &BOOLEAN_CODEC);
        tag_map.insert(TagSet::single(Tag::universal(false, INTEGER)), &INTEGER_CODEC);
        tag_map.insert(TagSet::single(Tag::universal(false, ENUMERATED)), &ENUMERATED_CODEC);
        tag_map.insert(TagSet::single(Tag::universal(false, BIT_STRING)), &BIT_STRING_CODEC);
        tag_map.insert(TagSet::single(Tag::universal(false, OCTET_STRING)), &OCTET_STRING_CODEC);
        tag_map.insert(TagSet::single(Tag::universal(false, NULL)), &NULL_CODEC);
        tag_map.insert(TagSet::single(Tag::universal(false, OBJECT_IDENTIFIER)), &OID_CODEC);
        tag_map.insert(TagSet::single(Tag::universal(false, REAL)), &REAL_CODEC);
        // Absent an asn1_spec, tag 16/17 decode as the homogeneous -OF
        // family; the type_map below is how a caller opts into the
        // named-field SEQUENCE/SET interpretation instead.
        tag_map.insert(TagSet::single(Tag::universal(true, SEQUENCE)), &SEQUENCE_OF_CODEC);
        tag_map.insert(TagSet::single(Tag::universal(true, SET)), &SET_OF_CODEC);
        for string_codec in &STRING_CODECS {
            tag_map.insert(TagSet::single(Tag::universal(false, string_codec.kind.tag_number())), string_codec);
        }
        for time_codec in &TIME_CODECS {
            tag_map.insert(TagSet::single(Tag::universal(false, time_codec.kind.tag_number())), time_codec);
        }
        tag_map.insert(TagSet::single(Tag::EOC), &EOC_CODEC);

        let mut type_map: HashMap<TypeId, &'static dyn Codec> = HashMap::new();
        type_map.insert(TypeId::Sequence, &SEQUENCE_CODEC);
        type_map.insert(TypeId::Set, &SET_CODEC);
        type_map.insert(TypeId::SequenceOf, &SEQUENCE_OF_CODEC);
        type_map.insert(TypeId::SetOf, &SET_OF_CODEC);
        type_map.insert(TypeId::Choice, &CHOICE_CODEC);
        type_map.insert(TypeId::Any, &ANY_CODEC);

        Registry { tag_map, type_map }
    }
}

/// Recursive entry points codec implementations call back into the
/// dispatcher through — exposed here rather than in `dispatch` to keep the
/// `Codec` trait's recursive dependency on the dispatcher one-directional
/// from the codecs' point of view.
pub fn encode_recursive(value: &Value, opts: &EncodeOptions) -> Result<Bytes, Asn1Error> {
    crate::dispatch::encode(value, opts)
}

pub fn decode_recursive(node: &Node, opts: &DecodeOptions, spec: Option<&Value>) -> Result<Value, Asn1Error> {
    crate::dispatch::decode_node(node, opts, spec)
}
