//! The named-field component list shared by SEQUENCE and SET: §4.5, §6.

use crate::tag::TagSet;
use crate::value::{HasTagSet, Value};

/// One named field of a SEQUENCE or SET.
///
/// `spec` is the field's prototype value: a decoder matches an incoming
/// element against `spec.tag_set()` and, once matched, decodes it guided by
/// `spec` itself (so a component's own tagging, type id, and nested
/// Structure all come along for free via the same dispatch a top-level
/// `asn1_spec` goes through).
#[derive(Debug, Clone)]
pub struct Component {
    pub name: String,
    pub spec: Value,
    pub optional: bool,
    pub default: Option<Value>,
    pub value: Option<Value>,
}

impl Component {
    pub fn required(name: impl Into<String>, spec: Value) -> Self {
        Component { name: name.into(), spec, optional: false, default: None, value: None }
    }

    pub fn optional(name: impl Into<String>, spec: Value) -> Self {
        Component { name: name.into(), spec, optional: true, default: None, value: None }
    }

    pub fn defaulted(name: impl Into<String>, spec: Value, default: Value) -> Self {
        Component { name: name.into(), spec, optional: true, default: Some(default), value: None }
    }

    pub fn is_absent(&self) -> bool {
        self.value.is_none()
    }

    pub fn tag_set(&self) -> TagSet {
        self.spec.tag_set()
    }
}

/// An ordered list of [`Component`]s, positional like the ASN.1 type it
/// backs. SEQUENCE and SET share this representation; only their decode
/// field-ordering rule differs (enforced by the respective codec, not here).
#[derive(Debug, Clone, Default)]
pub struct Structure {
    components: Vec<Component>,
}

impl Structure {
    pub fn new(components: Vec<Component>) -> Self {
        Structure { components }
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut [Component] {
        &mut self.components
    }

    pub fn get(&self, position: usize) -> Option<&Value> {
        self.components.get(position).and_then(|c| c.value.as_ref())
    }

    pub fn set(&mut self, position: usize, value: Value) {
        if let Some(component) = self.components.get_mut(position) {
            component.value = Some(value);
        }
    }

    pub fn get_default_component_by_position(&self, position: usize) -> Option<&Value> {
        self.components.get(position).and_then(|c| c.default.as_ref())
    }

    /// Fills every absent component that has a declared default with that
    /// default value — mirrors the `set_default_components` hook the value
    /// contract requires before SEQUENCE/SET encoding and after decoding.
    pub fn set_default_components(&mut self) {
        for component in &mut self.components {
            if component.value.is_none() {
                if let Some(default) = component.default.clone() {
                    component.value = Some(default);
                }
            }
        }
    }

    pub fn clear(&mut self) {
        for component in &mut self.components {
            component.value = None;
        }
    }

    pub fn find_by_tag_set(&self, tag_set: &TagSet, skip: &[bool]) -> Option<usize> {
        self.components
            .iter()
            .enumerate()
            .find(|(i, c)| !skip[*i] && c.tag_set() == *tag_set)
            .map(|(i, _)| i)
    }
}
