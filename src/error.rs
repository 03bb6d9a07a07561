#![allow(unknown_lints)]
#![allow(non_local_definitions)] // false positive for displaydoc::Display: https://github.com/yaahc/displaydoc/issues/46

use displaydoc::Display;
use thiserror::Error;

/// The error type for all builder, matcher and codec operations of this
/// crate.
///
/// Variants are the error codes of the public contract; each carries the
/// structured context needed to understand the failure (declared sizes,
/// offending values, cursor positions).
#[derive(Clone, Debug, Display, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// Segment is missing or not usable in this context
    InvalidSegment,
    /// Segment type is not valid for this operation
    InvalidType,
    /// Unit {unit} is out of the accepted range [1, 256]
    InvalidUnit {
        /// The rejected unit
        unit: u32,
    },
    /// Invalid size for segment: {msg} (size={size})
    InvalidSize {
        /// The offending size (bits unless `msg` states otherwise)
        size: usize,
        /// What made the size invalid
        msg: &'static str,
    },
    /// Endianness specifier is not one of big, little, native
    InvalidEndianness,
    /// Float segments must have an effective size of 16, 32 or 64 bits (got {bits})
    InvalidFloatSize {
        /// The rejected effective size in bits
        bits: usize,
    },
    /// UTF segments must not carry a size
    UtfSizeSpecified,
    /// UTF segments must not override the default unit
    UtfUnitModified,
    /// Value {value:#x} is not a Unicode code point, or the encoding is malformed
    InvalidUnicodeCodepoint {
        /// The rejected scalar value (or the offending code unit, widened)
        value: u32,
    },
    /// Segment value does not have the expected shape (expected {expected}, got {actual})
    TypeMismatch {
        /// Shape the segment type requires
        expected: &'static str,
        /// Shape that was actually supplied
        actual: &'static str,
    },
    /// Value does not fit: {msg}
    Overflow {
        /// What overflowed
        msg: &'static str,
    },
    /// Decoded value does not fit the signed destination width {bits}
    SignedOverflow {
        /// Destination width in bits
        bits: u32,
    },
    /// Binary data is not byte-aligned or not a byte sequence
    InvalidBinaryData,
    /// Binary segments require an explicit size
    BinarySizeRequired,
    /// Declared binary size {declared} exceeds the {actual} bytes available
    BinarySizeMismatch {
        /// Declared size in bytes
        declared: usize,
        /// Bytes actually present in the value
        actual: usize,
    },
    /// Bitstring segment value is not a bit string
    InvalidBitstringData,
    /// Requested {requested} bits but only {available} remain
    InsufficientBits {
        /// Bits requested by the decoder
        requested: usize,
        /// Bits left in the input
        available: usize,
    },
    /// A bit length of {bit_len} does not fit in {byte_len} bytes
    InsufficientData {
        /// Declared bit length
        bit_len: usize,
        /// Bytes provided
        byte_len: usize,
    },
}

/// A specialized `Result` type for all operations from this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;
