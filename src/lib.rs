//! Tag/length framing, a tagged-enum value model, and a tag-set/type-id
//! registry driven dispatcher for BER-encoded ASN.1 values.
//!
//! The pieces compose roughly bottom-up: [`tag`] and [`length`] implement
//! the identifier/length octets, [`node`] parses one TLV element at a time
//! off of them, [`value`] and [`types`] model what a decoded value looks
//! like in memory, [`codec`] implements each ASN.1 type's encode/decode
//! rule, and [`registry`]/[`dispatch`] tie a value's tag set to the right
//! codec at runtime.

pub mod codec;
pub mod dispatch;
pub mod error;
pub mod length;
pub mod node;
pub mod registry;
pub mod tag;
pub mod types;
pub mod value;

pub use dispatch::{decode, encode, DecodeOptions, EncodeOptions};
pub use error::{Asn1Error, ErrorKind};
pub use value::{Kind, Value};
