//! Error types for the BER codec core.
//!
//! One error family with named kinds, mirroring the fault lines of the
//! codec itself: framing, dispatch, and per-type content validation.

use thiserror::Error;

/// The kind of failure, independent of where it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Content region shorter than its declared length, or identifier/length
    /// octets ran out mid-parse.
    TruncatedInput,
    /// A length octet is malformed: `0xFF`, an octet count over 126, or an
    /// indefinite length on a type that forbids it.
    InvalidLength,
    /// The constructed bit disagrees with what the type allows.
    InvalidTagForm,
    /// End-of-contents appeared somewhere it cannot: inside definite-length
    /// content, with nonzero length, with the constructed bit set, or at the
    /// top level without explicit permission.
    UnexpectedEndOfContents,
    /// No codec matches the tag set and no `asn1_spec` was supplied to
    /// disambiguate.
    UnknownType,
    /// The decoded tag disagrees with the caller-supplied `asn1_spec`.
    SpecMismatch,
    /// A type-specific content rule was violated (bad OID subidentifier,
    /// reserved REAL base, non-minimal INTEGER under strict decode, BIT
    /// STRING with over 7 unused bits, ...).
    MalformedPrimitive,
    /// A value's magnitude exceeds what the wire format or this
    /// implementation can represent.
    ValueOutOfRange,
    /// A constructed value's post-decode size check failed (cardinality,
    /// component count).
    SizeConstraintViolation,
}

/// An error raised by the codec, carrying the failing element's source
/// location for diagnostics.
#[derive(Debug, Error, Clone, PartialEq, Eq, Hash)]
#[error("{kind:?}: {reason} ({file}:{line})")]
pub struct Asn1Error {
    pub kind: ErrorKind,
    pub reason: String,
    file: &'static str,
    line: u32,
}

impl Asn1Error {
    pub fn new(kind: ErrorKind, reason: impl Into<String>, file: &'static str, line: u32) -> Self {
        Asn1Error { kind, reason: reason.into(), file, line }
    }
}

/// Builds an [`Asn1Error`] at the call site, stamping `file!()`/`line!()`.
macro_rules! asn1_err {
    ($kind:expr, $($arg:tt)*) => {
        $crate::error::Asn1Error::new($kind, format!($($arg)*), file!(), line!())
    };
}

pub(crate) use asn1_err;

pub type Result<T> = std::result::Result<T, Asn1Error>;
