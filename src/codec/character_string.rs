//! Character string types and the two time types: §4.4.
//!
//! All eleven character-string kinds share one content representation
//! (UTF-8 text in memory, re-encoded to the type's own repertoire on the
//! wire); they differ only in tag number and, where this core enforces it,
//! permitted characters. GeneralizedTime/UTCTime share a codec for the same
//! reason the teacher's own time types pair them up.

use super::Codec;
use crate::dispatch::{DecodeOptions, EncodeOptions};
use crate::error::{asn1_err, Asn1Error, ErrorKind};
use crate::node::Node;
use crate::value::{Kind, StringKind, TimeKind, Value};
use bytes::Bytes;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

pub struct CharacterStringCodec {
    pub kind: StringKind,
}

impl CharacterStringCodec {
    fn validate_repertoire(&self, text: &str) -> Result<(), Asn1Error> {
        let ok = match self.kind {
            StringKind::Numeric => text.chars().all(|c| c.is_ascii_digit() || c == ' '),
            StringKind::Printable => text.chars().all(is_printable_char),
            StringKind::IA5 | StringKind::Visible => text.is_ascii(),
            StringKind::Utf8 | StringKind::Teletex | StringKind::Videotex | StringKind::Graphic | StringKind::General | StringKind::Universal | StringKind::Bmp => true,
        };
        if !ok {
            return Err(asn1_err!(ErrorKind::MalformedPrimitive, "{:?} value outside its permitted character repertoire", self.kind));
        }
        Ok(())
    }
}

fn is_printable_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || " '()+,-./:=?".contains(c)
}

impl Codec for CharacterStringCodec {
    fn supports_indefinite(&self) -> bool {
        true
    }

    fn encode_value(&self, value: &Value, _opts: &EncodeOptions) -> Result<(Bytes, bool), Asn1Error> {
        let Kind::CharacterString(kind, text) = value.kind() else {
            return Err(asn1_err!(ErrorKind::MalformedPrimitive, "CharacterStringCodec given a non-string value"));
        };
        if *kind != self.kind {
            return Err(asn1_err!(ErrorKind::MalformedPrimitive, "string kind mismatch: codec is {:?}, value is {:?}", self.kind, kind));
        }
        self.validate_repertoire(text)?;
        Ok((Bytes::copy_from_slice(text.as_bytes()), false))
    }

    fn decode_value(&self, node: &Node, _opts: &DecodeOptions, _spec: Option<&Value>) -> Result<Value, Asn1Error> {
        let content = collect_primitive_octets(node, self.kind.tag_number())?;
        let text = String::from_utf8(content.to_vec())
            .map_err(|_| asn1_err!(ErrorKind::MalformedPrimitive, "{:?} content is not valid UTF-8", self.kind))?;
        self.validate_repertoire(&text)?;
        Ok(Value::new(Kind::CharacterString(self.kind, text)))
    }
}

fn collect_primitive_octets(node: &Node, expected_tag: u64) -> Result<Bytes, Asn1Error> {
    match &node.content {
        crate::node::Content::Primitive(b) => Ok(b.clone()),
        crate::node::Content::Constructed(children) => {
            let mut out = bytes::BytesMut::new();
            for child in children {
                if child.tag.number != expected_tag {
                    return Err(asn1_err!(ErrorKind::MalformedPrimitive, "constructed string child has tag {:?}, expected base tag {}", child.tag, expected_tag));
                }
                out.extend_from_slice(&collect_primitive_octets(child, expected_tag)?);
            }
            Ok(out.freeze())
        }
    }
}

pub struct TimeCodec {
    pub kind: TimeKind,
}

impl Codec for TimeCodec {
    fn supports_indefinite(&self) -> bool {
        false
    }

    fn encode_value(&self, value: &Value, _opts: &EncodeOptions) -> Result<(Bytes, bool), Asn1Error> {
        let Kind::Time(kind, dt) = value.kind() else {
            return Err(asn1_err!(ErrorKind::MalformedPrimitive, "TimeCodec given a non-time value"));
        };
        if *kind != self.kind {
            return Err(asn1_err!(ErrorKind::MalformedPrimitive, "time kind mismatch: codec is {:?}, value is {:?}", self.kind, kind));
        }
        let text = match self.kind {
            TimeKind::Generalized => dt.format("%Y%m%d%H%M%SZ").to_string(),
            TimeKind::Utc => dt.format("%y%m%d%H%M%SZ").to_string(),
        };
        Ok((Bytes::copy_from_slice(text.as_bytes()), false))
    }

    fn decode_value(&self, node: &Node, _opts: &DecodeOptions, _spec: Option<&Value>) -> Result<Value, Asn1Error> {
        let content = node.primitive_bytes()?;
        let text = std::str::from_utf8(content)
            .map_err(|_| asn1_err!(ErrorKind::MalformedPrimitive, "time content is not ASCII"))?;
        if !text.ends_with('Z') {
            return Err(asn1_err!(ErrorKind::MalformedPrimitive, "time value must end with Z"));
        }
        let dt = match self.kind {
            TimeKind::Generalized => {
                let naive = NaiveDateTime::parse_from_str(text, "%Y%m%d%H%M%SZ")
                    .map_err(|_| asn1_err!(ErrorKind::MalformedPrimitive, "malformed GeneralizedTime {:?}", text))?;
                Utc.from_utc_datetime(&naive)
            }
            TimeKind::Utc => parse_utc_time(text)?,
        };
        Ok(Value::new(Kind::Time(self.kind, dt)))
    }
}

/// ASN.1 UTCTime's two-digit year splits 1950-2049, unlike chrono's own
/// `%y` rule (which splits at 69) — correct the parsed year after the fact.
fn parse_utc_time(text: &str) -> Result<DateTime<Utc>, Asn1Error> {
    if text.len() < 2 {
        return Err(asn1_err!(ErrorKind::MalformedPrimitive, "UTCTime content too short"));
    }
    let naive = NaiveDateTime::parse_from_str(text, "%y%m%d%H%M%SZ")
        .map_err(|_| asn1_err!(ErrorKind::MalformedPrimitive, "malformed UTCTime {:?}", text))?;
    let year_val: i32 = text[0..2].parse().map_err(|_| asn1_err!(ErrorKind::MalformedPrimitive, "malformed UTCTime year"))?;
    let century = if year_val >= 50 { 1900 } else { 2000 };
    use chrono::Datelike;
    let corrected = naive
        .with_year(century + year_val)
        .ok_or_else(|| asn1_err!(ErrorKind::MalformedPrimitive, "invalid UTCTime year"))?;
    Ok(Utc.from_utc_datetime(&corrected))
}
