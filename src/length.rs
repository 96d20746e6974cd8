//! Length framing: §4.2 of the codec design.

use crate::error::{asn1_err, Asn1Error, ErrorKind};
use bytes::{BufMut, BytesMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    Definite(u64),
    Indefinite,
}

impl Length {
    /// Appends the length octets to `out`. `indefinite` requests the `0x80`
    /// form; the caller is responsible for only setting it when the codec's
    /// `supports_indefinite` flag allows it.
    pub fn write(len: u64, indefinite: bool, out: &mut BytesMut) -> Result<(), Asn1Error> {
        if indefinite {
            out.put_u8(0x80);
            return Ok(());
        }
        if len < 128 {
            out.put_u8(len as u8);
            return Ok(());
        }
        let octets = minimal_be_octets(len);
        if octets.len() > 126 {
            return Err(asn1_err!(ErrorKind::InvalidLength, "length requires more than 126 octets"));
        }
        out.put_u8(0x80 | octets.len() as u8);
        out.extend_from_slice(&octets);
        Ok(())
    }

    /// Reads a length from the front of `data`, returning it and the number
    /// of octets consumed.
    pub fn read(data: &[u8]) -> Result<(Length, usize), Asn1Error> {
        let lead = *data.first().ok_or_else(|| asn1_err!(ErrorKind::TruncatedInput, "length octet missing"))?;
        if lead < 0x80 {
            return Ok((Length::Definite(lead as u64), 1));
        }
        if lead == 0x80 {
            return Ok((Length::Indefinite, 1));
        }
        if lead == 0xFF {
            return Err(asn1_err!(ErrorKind::InvalidLength, "reserved long-form length 0xFF"));
        }
        let k = (lead & 0x7F) as usize;
        let rest = data.get(1..1 + k).ok_or_else(|| {
            asn1_err!(ErrorKind::TruncatedInput, "truncated long-form length ({} octets)", k)
        })?;
        let mut value: u64 = 0;
        for &byte in rest {
            if value.leading_zeros() < 8 {
                return Err(asn1_err!(ErrorKind::ValueOutOfRange, "length exceeds representable range"));
            }
            value = (value << 8) | byte as u64;
        }
        Ok((Length::Definite(value), 1 + k))
    }
}

fn minimal_be_octets(mut value: u64) -> Vec<u8> {
    if value == 0 {
        return vec![0];
    }
    let mut bytes = Vec::new();
    while value > 0 {
        bytes.push((value & 0xFF) as u8);
        value >>= 8;
    }
    bytes.reverse();
    bytes
}

/// The two-octet End-of-Contents marker.
pub const EOC_OCTETS: [u8; 2] = [0x00, 0x00];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_form() {
        let mut buf = BytesMut::new();
        Length::write(5, false, &mut buf).unwrap();
        assert_eq!(&buf[..], &[0x05]);
        let (len, consumed) = Length::read(&buf).unwrap();
        assert_eq!(len, Length::Definite(5));
        assert_eq!(consumed, 1);
    }

    #[test]
    fn long_form_round_trip() {
        for len in [128u64, 255, 256, 65536, u32::MAX as u64] {
            let mut buf = BytesMut::new();
            Length::write(len, false, &mut buf).unwrap();
            let (decoded, consumed) = Length::read(&buf).unwrap();
            assert_eq!(consumed, buf.len());
            assert_eq!(decoded, Length::Definite(len));
        }
    }

    #[test]
    fn reserved_0xff_rejected() {
        assert!(Length::read(&[0xFF]).is_err());
    }

    #[test]
    fn indefinite_round_trip() {
        let mut buf = BytesMut::new();
        Length::write(0, true, &mut buf).unwrap();
        assert_eq!(&buf[..], &[0x80]);
        let (len, _) = Length::read(&buf).unwrap();
        assert_eq!(len, Length::Indefinite);
    }
}
