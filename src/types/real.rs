//! REAL encoding: §4.4.
//!
//! A decoded REAL always carries base 2 or base 10 — binary wire values
//! using base 8 or base 16 are normalized into base-2 form during decode (the
//! exponent is scaled by 3 or 4 respectively and the mantissa shifted by the
//! scale-factor bits) so callers never have to special-case the wire base.
//! Encoding only ever emits base 2 (binary) or base 10 (decimal, NR3 form).

use crate::error::{asn1_err, Asn1Error, ErrorKind};
use bytes::{BufMut, Bytes, BytesMut};
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{Signed, ToPrimitive, Zero};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Real {
    Zero,
    PlusInfinity,
    MinusInfinity,
    Value { mantissa: BigInt, base: u8, exponent: i64 },
}

impl Real {
    /// Builds a canonical base-2 REAL from an `f64`, decomposing it via its
    /// IEEE-754 bit pattern and stripping trailing zero mantissa bits the
    /// same way the encoder's own normalization loop would.
    pub fn from_f64(v: f64) -> Real {
        if v == 0.0 {
            return Real::Zero;
        }
        if v.is_infinite() {
            return if v > 0.0 { Real::PlusInfinity } else { Real::MinusInfinity };
        }
        let bits = v.to_bits();
        let sign = bits >> 63 != 0;
        let biased_exp = ((bits >> 52) & 0x7FF) as i64;
        let frac = bits & 0xF_FFFF_FFFF_FFFF;
        let (mut mantissa, mut exponent) = if biased_exp == 0 {
            (frac, -1074)
        } else {
            (frac | (1u64 << 52), biased_exp - 1075)
        };
        while mantissa & 1 == 0 {
            mantissa >>= 1;
            exponent += 1;
        }
        let magnitude = BigInt::from(mantissa);
        let mantissa = if sign { -magnitude } else { magnitude };
        Real::Value { mantissa, base: 2, exponent }
    }

    pub fn decimal(mantissa: BigInt, exponent: i64) -> Real {
        if mantissa.is_zero() {
            return Real::Zero;
        }
        Real::Value { mantissa, base: 10, exponent }
    }

    pub fn encode_content(&self) -> Result<Bytes, Asn1Error> {
        match self {
            Real::Zero => Ok(Bytes::new()),
            Real::PlusInfinity => Ok(Bytes::from_static(&[0x40])),
            Real::MinusInfinity => Ok(Bytes::from_static(&[0x41])),
            Real::Value { mantissa, base, exponent } => match base {
                10 => Ok(encode_decimal(mantissa, *exponent)),
                2 => encode_binary(mantissa, *exponent),
                other => Err(asn1_err!(ErrorKind::MalformedPrimitive, "prohibited REAL base {} for encoding", other)),
            },
        }
    }

    pub fn decode_content(content: &[u8]) -> Result<Real, Asn1Error> {
        let Some(&lead) = content.first() else {
            return Ok(Real::Zero);
        };
        match lead & 0xC0 {
            0x40 => match lead {
                0x40 => Ok(Real::PlusInfinity),
                0x41 => Ok(Real::MinusInfinity),
                other => Err(asn1_err!(ErrorKind::MalformedPrimitive, "reserved REAL special value 0x{:02x}", other)),
            },
            0x00 => decode_decimal(content),
            _ => decode_binary(content),
        }
    }
}

fn encode_decimal(mantissa: &BigInt, exponent: i64) -> Bytes {
    let mut out = BytesMut::new();
    out.put_u8(0x03); // NR3 form, base 10, no scale factor
    let body = if exponent == 0 {
        format!("{}E+0", mantissa)
    } else {
        format!("{}E{}", mantissa, exponent)
    };
    out.extend_from_slice(body.as_bytes());
    out.freeze()
}

fn decode_decimal(content: &[u8]) -> Result<Real, Asn1Error> {
    let text = std::str::from_utf8(&content[1..])
        .map_err(|_| asn1_err!(ErrorKind::MalformedPrimitive, "decimal REAL content is not ASCII"))?;
    let (mantissa_part, exponent_part) = match text.find(['E', 'e']) {
        Some(idx) => (&text[..idx], &text[idx + 1..]),
        None => (text, "0"),
    };
    let exponent_base: i64 = exponent_part
        .parse()
        .map_err(|_| asn1_err!(ErrorKind::MalformedPrimitive, "malformed REAL exponent {:?}", exponent_part))?;
    let (int_part, exponent) = match mantissa_part.find('.') {
        Some(dot) => {
            let digits_after = mantissa_part.len() - dot - 1;
            let merged = format!("{}{}", &mantissa_part[..dot], &mantissa_part[dot + 1..]);
            (merged, exponent_base - digits_after as i64)
        }
        None => (mantissa_part.to_string(), exponent_base),
    };
    let mantissa: BigInt = int_part
        .parse()
        .map_err(|_| asn1_err!(ErrorKind::MalformedPrimitive, "malformed REAL mantissa {:?}", int_part))?;
    Ok(Real::decimal(mantissa, exponent))
}

fn encode_binary(mantissa: &BigInt, exponent: i64) -> Result<Bytes, Asn1Error> {
    let mut out = BytesMut::new();
    let negative = mantissa.is_negative();
    let magnitude = mantissa.abs().to_biguint().unwrap();
    let mantissa_octets = minimal_be_octets(&magnitude);

    let exponent_octets = BigInt::from(exponent).to_signed_bytes_be();
    if exponent_octets.len() > 0xFF {
        return Err(asn1_err!(ErrorKind::ValueOutOfRange, "REAL exponent requires more than 255 octets"));
    }

    let mut lead = 0x80u8;
    if negative {
        lead |= 0x40;
    }
    match exponent_octets.len() {
        1 => {}
        2 => lead |= 0x01,
        3 => lead |= 0x02,
        _ => lead |= 0x03,
    }
    out.put_u8(lead);
    if exponent_octets.len() > 3 {
        out.put_u8(exponent_octets.len() as u8);
    }
    out.extend_from_slice(&exponent_octets);
    out.extend_from_slice(&mantissa_octets);
    Ok(out.freeze())
}

fn minimal_be_octets(value: &BigUint) -> Vec<u8> {
    if value.is_zero() {
        return vec![0];
    }
    value.to_bytes_be()
}

fn decode_binary(content: &[u8]) -> Result<Real, Asn1Error> {
    let lead = content[0];
    let negative = lead & 0x40 != 0;
    let base_bits = (lead >> 4) & 0x03;
    let base: u64 = match base_bits {
        0 => 2,
        1 => 8,
        2 => 16,
        _ => return Err(asn1_err!(ErrorKind::MalformedPrimitive, "reserved REAL base selector")),
    };
    let scale_factor = (lead >> 2) & 0x03;
    let exp_len_selector = lead & 0x03;

    let mut offset = 1usize;
    let exponent_len = match exp_len_selector {
        0 => 1,
        1 => 2,
        2 => 3,
        _ => {
            let n = *content.get(offset).ok_or_else(|| asn1_err!(ErrorKind::TruncatedInput, "missing REAL exponent-length octet"))? as usize;
            offset += 1;
            n
        }
    };
    let exponent_bytes = content
        .get(offset..offset + exponent_len)
        .ok_or_else(|| asn1_err!(ErrorKind::TruncatedInput, "truncated REAL exponent"))?;
    offset += exponent_len;
    let raw_exponent = BigInt::from_signed_bytes_be(exponent_bytes)
        .to_i64()
        .ok_or_else(|| asn1_err!(ErrorKind::ValueOutOfRange, "REAL exponent out of range"))?;

    let mantissa_bytes = &content[offset..];
    let raw_mantissa = BigUint::from_bytes_be(mantissa_bytes) << scale_factor as u32;

    let base_scale: i64 = match base {
        2 => 1,
        8 => 3,
        16 => 4,
        _ => unreachable!(),
    };
    let exponent = raw_exponent * base_scale;

    let magnitude = BigInt::from_biguint(Sign::Plus, raw_mantissa);
    let mantissa = if negative { -magnitude } else { magnitude };
    if mantissa.is_zero() {
        return Ok(Real::Zero);
    }
    Ok(Real::Value { mantissa, base: 2, exponent })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn special_values() {
        assert_eq!(Real::decode_content(&[0x40]).unwrap(), Real::PlusInfinity);
        assert_eq!(Real::decode_content(&[0x41]).unwrap(), Real::MinusInfinity);
        assert_eq!(Real::decode_content(&[]).unwrap(), Real::Zero);
    }

    #[test]
    fn binary_base2_single_octet_exponent() {
        let real = Real::decode_content(&[0x80, 0xFF, 0x01]).unwrap();
        assert_eq!(real, Real::Value { mantissa: BigInt::from(1), base: 2, exponent: -1 });
    }

    #[test]
    fn binary_base8_scale_factor() {
        let real = Real::decode_content(&[0x94, 0xFF, 13]).unwrap();
        assert_eq!(real, Real::Value { mantissa: BigInt::from(26), base: 2, exponent: -3 });
    }

    #[test]
    fn binary_base16() {
        let real = Real::decode_content(&[0xA0, 0xFE, 1]).unwrap();
        assert_eq!(real, Real::Value { mantissa: BigInt::from(1), base: 2, exponent: -8 });
    }

    #[test]
    fn binary_multi_octet_exponent() {
        let real = Real::decode_content(&[0xA1, 0xFF, 0x01, 0x03]).unwrap();
        assert_eq!(real, Real::Value { mantissa: BigInt::from(3), base: 2, exponent: -1020 });
    }

    #[test]
    fn decimal_nr3() {
        let real = Real::decode_content(&[0x03, b'1', b'2', b'3', b'E', b'1', b'1']).unwrap();
        assert_eq!(real, Real::Value { mantissa: BigInt::from(123), base: 10, exponent: 11 });
    }

    #[test]
    fn from_f64_canonicalizes_mantissa() {
        let real = Real::from_f64(0.5);
        match real {
            Real::Value { mantissa, base, exponent } => {
                assert_eq!(base, 2);
                assert_eq!(mantissa, BigInt::from(1));
                assert_eq!(exponent, -1);
            }
            _ => panic!("expected Value"),
        }
    }

    #[test]
    fn rejects_base8_on_encode() {
        let real = Real::Value { mantissa: BigInt::from(1), base: 8, exponent: 0 };
        assert!(real.encode_content().is_err());
    }
}
