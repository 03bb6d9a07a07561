use bitvec::order::Msb0;
use bitvec::slice::BitSlice;
use bitvec::vec::BitVec;

use crate::{Error, Result};

/// An immutable sequence of bits with an exact bit length.
///
/// This object owns its data. Internally, it relies on [`BitVec`] with
/// MSB-first bit order: bit 0 is the most significant bit of byte 0.
///
/// A `BitString` whose length is a multiple of 8 is called a *binary*.
/// When serialized with [`BitString::to_bytes`], bits past the logical
/// length in the last byte are always zero.
///
/// Use [`BitString::as_bitslice`] to access content.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BitString {
    bitvec: BitVec<u8, Msb0>,
}

impl BitString {
    /// Build a new, empty `BitString`.
    pub fn new() -> Self {
        BitString {
            bitvec: BitVec::new(),
        }
    }

    /// Build a `BitString` from whole bytes (length = 8 × `bytes.len()`).
    pub fn from_bytes(bytes: &[u8]) -> Self {
        BitString {
            bitvec: BitVec::from_slice(bytes),
        }
    }

    /// Build a `BitString` holding the first `bit_len` bits of `bytes`.
    ///
    /// Fails with [`Error::InsufficientData`] if `bytes` is too short to
    /// hold `bit_len` bits. Extra bits in the last byte are dropped.
    pub fn from_bytes_with_bit_len(bytes: &[u8], bit_len: usize) -> Result<Self> {
        if (bit_len + 7) / 8 > bytes.len() {
            return Err(Error::InsufficientData {
                bit_len,
                byte_len: bytes.len(),
            });
        }
        let mut bitvec = BitVec::from_slice(bytes);
        bitvec.truncate(bit_len);
        Ok(BitString { bitvec })
    }

    /// Gets the length of the `BitString` (number of bits).
    pub fn bit_len(&self) -> usize {
        self.bitvec.len()
    }

    /// Tests if the `BitString` is empty.
    pub fn is_empty(&self) -> bool {
        self.bitvec.is_empty()
    }

    /// True if the length is a whole number of bytes.
    pub fn is_binary(&self) -> bool {
        self.bitvec.len() % 8 == 0
    }

    /// Serialize to bytes, ⌈len/8⌉ of them.
    ///
    /// Bits past the logical length in the final byte are zero.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; (self.bitvec.len() + 7) / 8];
        let dst = BitSlice::<u8, Msb0>::from_slice_mut(&mut out);
        dst[..self.bitvec.len()].copy_from_bitslice(&self.bitvec);
        out
    }

    /// Test if bit `bitnum` is set.
    ///
    /// Return false if bit is not set, or if index is outside range.
    pub fn is_set(&self, bitnum: usize) -> bool {
        self.as_bitslice()
            .get(bitnum)
            .map(|bitref| bitref == true)
            .unwrap_or(false)
    }

    /// Return a shared `BitSlice` over the object data.
    pub fn as_bitslice(&self) -> &BitSlice<u8, Msb0> {
        self.bitvec.as_bitslice()
    }

    pub(crate) fn from_bitvec(bitvec: BitVec<u8, Msb0>) -> Self {
        BitString { bitvec }
    }
}

impl From<&BitSlice<u8, Msb0>> for BitString {
    fn from(slice: &BitSlice<u8, Msb0>) -> Self {
        let bitvec = BitVec::from_bitslice(slice);
        Self { bitvec }
    }
}

/// Erlang shell notation: `<<1,2,3>>`, with a trailing `value:bits`
/// pair when the length is not a whole number of bytes (`<<1,5:3>>`).
impl core::fmt::Display for BitString {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "<<")?;
        let bytes = self.to_bytes();
        let full = self.bitvec.len() / 8;
        let tail = self.bitvec.len() % 8;
        for (i, b) in bytes[..full].iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", b)?;
        }
        if tail > 0 {
            if full > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}:{}", bytes[full] >> (8 - tail), tail)?;
        }
        write!(f, ">>")
    }
}
