//! SEQUENCE and SET: §4.5.
//!
//! Both are a named, ordered list of components (shared as [`Structure`]);
//! they differ only in how a decoder matches children against components.
//! SEQUENCE requires its children in declared order; SET accepts them in any
//! order and matches each one against whichever undecoded component's tag it
//! fits.

use super::Codec;
use crate::dispatch::{DecodeOptions, EncodeOptions};
use crate::error::{asn1_err, Asn1Error, ErrorKind};
use crate::node::Node;
use crate::registry::{decode_recursive, encode_recursive};
use crate::tag::TagSet;
use crate::types::Structure;
use crate::value::{Kind, Value};
use bytes::{Bytes, BytesMut};

pub struct SequenceCodec {
    pub is_set: bool,
}

impl SequenceCodec {
    fn structure<'a>(&self, value: &'a Value) -> Result<&'a Structure, Asn1Error> {
        match value.kind() {
            Kind::Sequence(s) if !self.is_set => Ok(s),
            Kind::Set(s) if self.is_set => Ok(s),
            _ => Err(asn1_err!(ErrorKind::MalformedPrimitive, "SequenceCodec given a value of the wrong kind")),
        }
    }

    fn wrap(&self, structure: Structure) -> Kind {
        if self.is_set {
            Kind::Set(structure)
        } else {
            Kind::Sequence(structure)
        }
    }
}

impl Codec for SequenceCodec {
    fn supports_indefinite(&self) -> bool {
        true
    }

    fn encode_value(&self, value: &Value, opts: &EncodeOptions) -> Result<(Bytes, bool), Asn1Error> {
        let structure = self.structure(value)?;
        let mut out = BytesMut::new();
        for component in structure.components() {
            let effective = match (&component.value, &component.default) {
                (Some(v), _) => v,
                (None, Some(default)) => default,
                (None, None) => {
                    if component.optional {
                        continue;
                    }
                    return Err(asn1_err!(ErrorKind::MalformedPrimitive, "required component {:?} is absent", component.name));
                }
            };
            if opts.omit_defaulted {
                if let Some(default) = &component.default {
                    if effective.content_eq(default) {
                        continue;
                    }
                }
            }
            out.extend_from_slice(&encode_recursive(effective, opts)?);
        }
        Ok((out.freeze(), true))
    }

    fn decode_value(&self, node: &Node, opts: &DecodeOptions, spec: Option<&Value>) -> Result<Value, Asn1Error> {
        let spec = spec.ok_or_else(|| asn1_err!(ErrorKind::SpecMismatch, "SEQUENCE/SET decode requires an asn1_spec"))?;
        let template = self.structure(spec)?;
        let mut components = template.components().to_vec();
        let children = node.children()?;

        if self.is_set {
            decode_set_children(&mut components, children, opts)?;
        } else {
            decode_sequence_children(&mut components, children, opts)?;
        }

        let mut structure = Structure::new(components);
        structure.set_default_components();
        for component in structure.components() {
            if component.is_absent() && !component.optional {
                return Err(asn1_err!(ErrorKind::MalformedPrimitive, "required component {:?} missing from input", component.name));
            }
        }
        Ok(Value::new(self.wrap(structure)))
    }
}

fn decode_sequence_children(components: &mut [crate::types::structure::Component], children: &[Node], opts: &DecodeOptions) -> Result<(), Asn1Error> {
    let mut child_iter = children.iter().peekable();
    for component in components.iter_mut() {
        let Some(child) = child_iter.peek() else {
            if component.optional {
                continue;
            }
            return Err(asn1_err!(ErrorKind::MalformedPrimitive, "required component {:?} missing", component.name));
        };
        if child.tag != component.tag_set().outermost() {
            if component.optional {
                continue;
            }
            return Err(asn1_err!(ErrorKind::SpecMismatch, "expected component {:?} with tag {:?}, found {:?}", component.name, component.tag_set().outermost(), child.tag));
        }
        let child = child_iter.next().unwrap();
        component.value = Some(decode_recursive(child, opts, Some(&component.spec))?);
    }
    if child_iter.peek().is_some() {
        return Err(asn1_err!(ErrorKind::MalformedPrimitive, "SEQUENCE has more elements than its declared components"));
    }
    Ok(())
}

fn decode_set_children(components: &mut [crate::types::structure::Component], children: &[Node], opts: &DecodeOptions) -> Result<(), Asn1Error> {
    let mut filled = vec![false; components.len()];
    for child in children {
        let tag_set = TagSet::single(child.tag);
        let position = components
            .iter()
            .enumerate()
            .find(|(i, c)| !filled[*i] && c.tag_set() == tag_set)
            .map(|(i, _)| i)
            .ok_or_else(|| asn1_err!(ErrorKind::SpecMismatch, "no SET component matches tag {:?}", child.tag))?;
        components[position].value = Some(decode_recursive(child, opts, Some(&components[position].spec))?);
        filled[position] = true;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{decode, encode};
    use crate::types::structure::Component;
    use num_bigint::BigInt;

    fn name_field() -> Value {
        Value::new(Kind::CharacterString(crate::value::StringKind::Utf8, String::new()))
    }

    fn spec() -> Value {
        let components = vec![
            Component::required("id", Value::new(Kind::Integer(BigInt::from(0)))),
            Component::optional("name", name_field()),
        ];
        Value::new(Kind::Sequence(Structure::new(components)))
    }

    #[test]
    fn round_trips_a_sequence_with_optional_trailing_field() {
        let mut components = vec![
            Component::required("id", Value::new(Kind::Integer(BigInt::from(0)))),
            Component::optional("name", name_field()),
        ];
        components[0].value = Some(Value::new(Kind::Integer(BigInt::from(7))));
        components[1].value = Some(Value::new(Kind::CharacterString(crate::value::StringKind::Utf8, "abc".to_string())));
        let v = Value::new(Kind::Sequence(Structure::new(components)));

        let encoded = encode(&v, &EncodeOptions::default()).unwrap();
        let spec = spec();
        let mut opts = DecodeOptions { asn1_spec: Some(&spec), ..Default::default() };
        let (decoded, residual) = decode(&encoded, &mut opts).unwrap();
        assert!(residual.is_empty());
        assert!(decoded.content_eq(&v));
    }

    #[test]
    fn missing_optional_trailing_field_decodes_fine() {
        let mut components = vec![Component::required("id", Value::new(Kind::Integer(BigInt::from(0)))), Component::optional("name", name_field())];
        components[0].value = Some(Value::new(Kind::Integer(BigInt::from(9))));
        let v = Value::new(Kind::Sequence(Structure::new(components)));
        let encoded = encode(&v, &EncodeOptions::default()).unwrap();

        let spec = spec();
        let mut opts = DecodeOptions { asn1_spec: Some(&spec), ..Default::default() };
        let (decoded, _) = decode(&encoded, &mut opts).unwrap();
        if let Kind::Sequence(s) = decoded.kind() {
            assert!(s.get(1).is_none());
        } else {
            panic!("expected Sequence");
        }
    }
}
