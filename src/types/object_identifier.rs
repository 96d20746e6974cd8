//! OBJECT IDENTIFIER component encoding: §4.4.
//!
//! Sub-identifiers decode to arbitrary precision — the wire format places
//! no ceiling on them, and real-world OID arcs (notably in PKI policy OIDs)
//! do exceed 64 bits. Encoding, by contrast, only accepts arcs that fit the
//! `u64` range this library's callers actually construct OIDs from; larger
//! values would need a `BigUint`-based constructor this core does not
//! expose.

use crate::error::{asn1_err, Asn1Error, ErrorKind};
use bytes::{BufMut, Bytes, BytesMut};
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectIdentifier {
    arcs: Vec<BigUint>,
}

impl ObjectIdentifier {
    /// Builds an OID from its dotted arc sequence. Requires at least two
    /// arcs, the first at most 2, and — when the first arc is 0 or 1 — the
    /// second at most 39 (so the combined first sub-identifier fits one
    /// octet's worth of the `40*X+Y` encoding).
    pub fn new(arcs: &[u64]) -> Result<Self, Asn1Error> {
        if arcs.len() < 2 {
            return Err(asn1_err!(ErrorKind::MalformedPrimitive, "object identifier needs at least two arcs"));
        }
        let first = arcs[0];
        let second = arcs[1];
        if first > 2 {
            return Err(asn1_err!(ErrorKind::ValueOutOfRange, "object identifier's first arc must be 0, 1 or 2"));
        }
        if first < 2 && second > 39 {
            return Err(asn1_err!(ErrorKind::ValueOutOfRange, "second arc must be <= 39 when the first arc is 0 or 1"));
        }
        for &arc in arcs {
            if arc > u32::MAX as u64 {
                return Err(asn1_err!(ErrorKind::ValueOutOfRange, "object identifier arc exceeds 2^32-1"));
            }
        }
        Ok(ObjectIdentifier { arcs: arcs.iter().map(|&a| BigUint::from(a)).collect() })
    }

    pub fn arcs(&self) -> &[BigUint] {
        &self.arcs
    }

    /// Arcs as `u64`, when every one of them fits — decode may produce arcs
    /// that don't (see the module docs).
    pub fn arcs_u64(&self) -> Option<Vec<u64>> {
        self.arcs.iter().map(|a| a.to_u64()).collect()
    }

    pub fn encode_content(&self) -> Result<Bytes, Asn1Error> {
        let mut out = BytesMut::new();
        let first = &self.arcs[0];
        let second = &self.arcs[1];
        let combined = if first < &BigUint::from(2u8) {
            first * 40u32 + second
        } else {
            second + 80u32
        };
        write_subidentifier(&combined, &mut out);
        for arc in &self.arcs[2..] {
            write_subidentifier(arc, &mut out);
        }
        Ok(out.freeze())
    }

    pub fn decode_content(content: &[u8]) -> Result<Self, Asn1Error> {
        if content.is_empty() {
            return Err(asn1_err!(ErrorKind::MalformedPrimitive, "object identifier has zero-length content"));
        }
        let groups = split_subidentifier_groups(content)?;
        let mut values = Vec::with_capacity(groups.len());
        for group in groups {
            values.push(decode_subidentifier_group(group)?);
        }
        let combined = &values[0];
        let (first, second) = if combined < &BigUint::from(80u8) {
            let eighty = BigUint::from(40u8);
            (combined / &eighty, combined % &eighty)
        } else {
            (BigUint::from(2u8), combined - 80u32)
        };
        let mut arcs = vec![first, second];
        arcs.extend(values.into_iter().skip(1));
        Ok(ObjectIdentifier { arcs })
    }
}

fn write_subidentifier(value: &BigUint, out: &mut BytesMut) {
    if value.is_zero() {
        out.put_u8(0);
        return;
    }
    let mask = BigUint::from(0x7Fu8);
    let mut digits = Vec::new();
    let mut remaining = value.clone();
    while !remaining.is_zero() {
        digits.push((&remaining & &mask).to_u8().unwrap());
        remaining >>= 7u32;
    }
    digits.reverse();
    let last = digits.len() - 1;
    for (i, digit) in digits.into_iter().enumerate() {
        if i == last {
            out.put_u8(digit);
        } else {
            out.put_u8(digit | 0x80);
        }
    }
}

fn split_subidentifier_groups(content: &[u8]) -> Result<Vec<&[u8]>, Asn1Error> {
    let mut groups = Vec::new();
    let mut start = 0usize;
    for i in 0..content.len() {
        if content[i] & 0x80 == 0 {
            groups.push(&content[start..=i]);
            start = i + 1;
        }
    }
    if start != content.len() {
        return Err(asn1_err!(ErrorKind::TruncatedInput, "object identifier sub-identifier truncated"));
    }
    Ok(groups)
}

fn decode_subidentifier_group(group: &[u8]) -> Result<BigUint, Asn1Error> {
    if group.first() == Some(&0x80) {
        return Err(asn1_err!(ErrorKind::MalformedPrimitive, "object identifier sub-identifier has a non-minimal leading 0x80 octet"));
    }
    let mut value = BigUint::zero();
    for &byte in group {
        value = (value << 7u32) + BigUint::from(byte & 0x7F);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> ObjectIdentifier {
        ObjectIdentifier::decode_content(bytes).unwrap()
    }

    #[test]
    fn edge_cases_match_the_reference_decoder() {
        assert_eq!(decode(&[39]).arcs_u64().unwrap(), vec![0, 39]);
        assert_eq!(decode(&[79]).arcs_u64().unwrap(), vec![1, 39]);
        assert_eq!(decode(&[120]).arcs_u64().unwrap(), vec![2, 40]);
        assert_eq!(decode(&[0x81, 0x00]).arcs_u64().unwrap(), vec![2, 48]);
        assert_eq!(decode(&[0x81, 0x34, 0x03]).arcs_u64().unwrap(), vec![2, 100, 3]);
        assert_eq!(decode(&[133, 0]).arcs_u64().unwrap(), vec![2, 560]);
    }

    #[test]
    fn leading_0x80_rejected() {
        assert!(ObjectIdentifier::decode_content(&[0x80, 0x01]).is_err());
        assert!(ObjectIdentifier::decode_content(&[0x55, 0x04, 0x80, 0x81, 0x00]).is_err());
    }

    #[test]
    fn zero_length_rejected() {
        assert!(ObjectIdentifier::decode_content(&[]).is_err());
    }

    #[test]
    fn encode_decode_round_trip() {
        let oid = ObjectIdentifier::new(&[1, 2, 840, 113549, 1, 1, 11]).unwrap();
        let encoded = oid.encode_content().unwrap();
        let decoded = ObjectIdentifier::decode_content(&encoded).unwrap();
        assert_eq!(decoded.arcs_u64().unwrap(), vec![1, 2, 840, 113549, 1, 1, 11]);
    }

    #[test]
    fn arbitrarily_large_arcs_decode() {
        let bytes = [
            0x83, 0xC6, 0xDF, 0xD4, 0xCC, 0xB3, 0xFF, 0xFF, 0xFE, 0xF0, 0xB8, 0xD6, 0xB8, 0xCB, 0xE2, 0xB7, 0x17,
        ];
        let oid = decode(&bytes);
        assert_eq!(oid.arcs()[0], BigUint::from(2u8));
        assert!(oid.arcs()[1] > BigUint::from(u64::MAX));
    }

    #[test]
    fn constructor_validates_first_two_arcs() {
        assert!(ObjectIdentifier::new(&[3, 0]).is_err());
        assert!(ObjectIdentifier::new(&[1, 40]).is_err());
        assert!(ObjectIdentifier::new(&[2, 999999]).is_ok());
    }
}
