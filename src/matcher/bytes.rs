use super::Dest;
use crate::{BitReader, BitString, Error, Result, Segment};

/// Decode a binary segment: `size × unit / 8` whole bytes, read without
/// realignment so packing mirrors the builder. Without a declared size,
/// the rest of the input is taken (and must be byte-aligned).
pub(super) fn decode_binary(
    segment: &Segment,
    dest: &mut Dest<'_>,
    reader: &mut BitReader<'_>,
) -> Result<()> {
    let data = if segment.size_specified {
        let nbytes = segment.effective_bits() / 8;
        if nbytes == 0 {
            return Err(Error::InvalidSize {
                size: 0,
                msg: "binary segments need a positive size",
            });
        }
        let available = reader.remaining_bits();
        if nbytes * 8 > available {
            return Err(Error::InsufficientBits {
                requested: nbytes * 8,
                available,
            });
        }
        let mut out = Vec::with_capacity(nbytes);
        for _ in 0..nbytes {
            out.push(reader.read_bits(8)? as u8);
        }
        out
    } else {
        if reader.remaining_bits() % 8 != 0 {
            return Err(Error::InvalidBinaryData);
        }
        reader.read_rest().to_bytes()
    };
    store_bytes(dest, data)
}

/// Decode a bitstring segment: `size × unit` bits, or everything left
/// when no size was declared.
pub(super) fn decode_bitstring(
    segment: &Segment,
    dest: &mut Dest<'_>,
    reader: &mut BitReader<'_>,
) -> Result<()> {
    let value = if segment.size_specified {
        let bits = segment.effective_bits();
        let available = reader.remaining_bits();
        if bits > available {
            return Err(Error::InsufficientBits {
                requested: bits,
                available,
            });
        }
        let mut bv = bitvec::vec::BitVec::<u8, bitvec::order::Msb0>::with_capacity(bits);
        for _ in 0..bits {
            bv.push(reader.read_bit()?);
        }
        BitString::from_bitvec(bv)
    } else {
        reader.read_rest()
    };
    store_bits(dest, value)
}

/// Bind the remaining input as bytes; fails unless it is byte-aligned.
pub(super) fn decode_rest_binary(dest: &mut Dest<'_>, reader: &mut BitReader<'_>) -> Result<()> {
    if reader.remaining_bits() % 8 != 0 {
        return Err(Error::InvalidBinaryData);
    }
    let data = reader.read_rest().to_bytes();
    store_bytes(dest, data)
}

/// Bind the remaining input as a bitstring.
pub(super) fn decode_rest_bitstring(dest: &mut Dest<'_>, reader: &mut BitReader<'_>) -> Result<()> {
    let rest = reader.read_rest();
    store_bits(dest, rest)
}

fn store_bytes(dest: &mut Dest<'_>, data: Vec<u8>) -> Result<()> {
    match dest {
        Dest::Bytes(slot) => **slot = data,
        Dest::Skip => {}
        other => {
            return Err(Error::TypeMismatch {
                expected: "byte destination",
                actual: other.kind(),
            })
        }
    }
    Ok(())
}

fn store_bits(dest: &mut Dest<'_>, value: BitString) -> Result<()> {
    match dest {
        Dest::Bits(slot) => **slot = value,
        Dest::Skip => {}
        other => {
            return Err(Error::TypeMismatch {
                expected: "bitstring destination",
                actual: other.kind(),
            })
        }
    }
    Ok(())
}
