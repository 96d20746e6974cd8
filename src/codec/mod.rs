//! Per-type codecs: §4.4 (primitive), §4.5 (constructed), §4.6-4.7 (the two
//! synthetic codecs the dispatcher itself relies on).
//!
//! Every codec implements the same narrow interface regardless of what it
//! backs: turn a [`Value`] into content octets plus a constructed flag, or
//! turn a parsed [`Node`] back into a `Value`.

pub mod any;
pub mod bit_string;
pub mod boolean;
pub mod character_string;
pub mod choice;
pub mod end_of_contents;
pub mod explicit;
pub mod integer;
pub mod null;
pub mod object_identifier;
pub mod octet_string;
pub mod real;
pub mod sequence;
pub mod sequence_of;

use crate::dispatch::{DecodeOptions, EncodeOptions};
use crate::error::Asn1Error;
use crate::node::Node;
use crate::value::Value;
use bytes::Bytes;

pub trait Codec: Sync {
    /// Whether this codec may be asked to produce an indefinite-length
    /// encoding (only ever true for constructed forms).
    fn supports_indefinite(&self) -> bool;

    fn encode_value(&self, value: &Value, opts: &EncodeOptions) -> Result<(Bytes, bool), Asn1Error>;

    fn decode_value(&self, node: &Node, opts: &DecodeOptions, spec: Option<&Value>) -> Result<Value, Asn1Error>;
}
