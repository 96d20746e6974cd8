//! REAL: §4.4. The wire framing here is trivial; all of the substance lives
//! in [`crate::types::Real`].

use super::Codec;
use crate::dispatch::{DecodeOptions, EncodeOptions};
use crate::error::{asn1_err, Asn1Error, ErrorKind};
use crate::node::Node;
use crate::types::Real;
use crate::value::{Kind, Value};
use bytes::Bytes;

pub struct RealCodec;

impl Codec for RealCodec {
    fn supports_indefinite(&self) -> bool {
        false
    }

    fn encode_value(&self, value: &Value, _opts: &EncodeOptions) -> Result<(Bytes, bool), Asn1Error> {
        let Kind::Real(real) = value.kind() else {
            return Err(asn1_err!(ErrorKind::MalformedPrimitive, "RealCodec given a non-REAL value"));
        };
        Ok((real.encode_content()?, false))
    }

    fn decode_value(&self, node: &Node, _opts: &DecodeOptions, _spec: Option<&Value>) -> Result<Value, Asn1Error> {
        let content = node.primitive_bytes()?;
        Ok(Value::new(Kind::Real(Real::decode_content(content)?)))
    }
}
