//! The explicit-tag wrapper: §4.7. Not a codec over any particular ASN.1
//! type — it wraps whatever value carries more than one tag, emitting the
//! value fully encoded under its reduced tag set as the content of an outer
//! constructed element. Decoding the wrapper is simple enough (verify the
//! outer tag, recurse on the single child) that [`crate::dispatch`] does it
//! inline rather than routing back through here.

use crate::dispatch::EncodeOptions;
use crate::error::Asn1Error;
use crate::length::{Length, EOC_OCTETS};
use crate::registry::encode_recursive;
use crate::value::{HasTagSet, Value};
use bytes::{Bytes, BytesMut};

pub fn encode(value: &Value, opts: &EncodeOptions) -> Result<Bytes, Asn1Error> {
    let tag_set = value.tag_set();
    let (outer_tag, reduced) = tag_set.strip_outermost();
    let reduced_tag_set = reduced.expect("caller only invokes this with a tag set of length > 1");
    let reduced_value = Value::with_tag_set(value.kind().clone(), reduced_tag_set);
    let inner = encode_recursive(&reduced_value, opts)?;

    let mut out = BytesMut::new();
    outer_tag.with_constructed(true).write_identifier(&mut out);
    let indefinite = !opts.definite_mode;
    Length::write(inner.len() as u64, indefinite, &mut out)?;
    out.extend_from_slice(&inner);
    if indefinite {
        out.extend_from_slice(&EOC_OCTETS);
    }
    Ok(out.freeze())
}
