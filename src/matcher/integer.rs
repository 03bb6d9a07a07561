use num_traits::cast::cast;

use super::Dest;
use crate::{BitReader, Error, Result, Segment};

/// A decoded integer, before coercion into the destination type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Decoded {
    Unsigned(u128),
    Signed(i128),
}

const WIDE: Error = Error::Overflow {
    msg: "decoded value exceeds 128 bits",
};

/// Decode an integer segment: read `size × unit` bits, undo the byte
/// swap for little-endian byte-multiple widths, and sign-extend when
/// the segment is signed and its top bit is set.
pub(super) fn decode(segment: &Segment, reader: &mut BitReader<'_>) -> Result<Decoded> {
    let bits = segment.effective_bits();
    if bits == 0 {
        return Ok(Decoded::Unsigned(0));
    }
    let be = read_raw(segment, bits, reader)?;
    if segment.signed && sign_bit_set(&be, bits) {
        assemble_signed(&be, bits).map(Decoded::Signed)
    } else {
        assemble_unsigned(&be).map(Decoded::Unsigned)
    }
}

/// Big-endian, right-justified bytes of the raw segment bits.
///
/// Byte-multiple widths are read byte-wise and reversed for little
/// endian; ragged widths are read MSB-first with endianness ignored,
/// the partial leading byte holding the top bits.
fn read_raw(segment: &Segment, bits: usize, reader: &mut BitReader<'_>) -> Result<Vec<u8>> {
    let available = reader.remaining_bits();
    if bits > available {
        return Err(Error::InsufficientBits {
            requested: bits,
            available,
        });
    }
    let n = (bits + 7) / 8;
    let mut be = vec![0u8; n];
    if bits % 8 == 0 {
        for slot in be.iter_mut() {
            *slot = reader.read_bits(8)? as u8;
        }
        if segment.resolved_endianness().is_little() {
            be.reverse();
        }
    } else {
        be[0] = reader.read_bits((bits % 8) as u32)? as u8;
        for slot in be.iter_mut().skip(1) {
            *slot = reader.read_bits(8)? as u8;
        }
    }
    Ok(be)
}

fn sign_bit_set(be: &[u8], bits: usize) -> bool {
    // number of valid bits in the leading byte
    let lead = bits - 8 * (be.len() - 1);
    (be[0] >> (lead - 1)) & 1 == 1
}

fn assemble_unsigned(be: &[u8]) -> Result<u128> {
    let split = be.len().saturating_sub(16);
    if be[..split].iter().any(|&b| b != 0) {
        return Err(WIDE);
    }
    let mut value = 0u128;
    for &b in &be[split..] {
        value = (value << 8) | u128::from(b);
    }
    Ok(value)
}

fn assemble_signed(be: &[u8], bits: usize) -> Result<i128> {
    let split = be.len().saturating_sub(16);
    let mut low = 0u128;
    for &b in &be[split..] {
        low = (low << 8) | u128::from(b);
    }
    if bits < 128 {
        low |= u128::MAX << bits;
    } else if bits > 128 {
        // every truncated bit must repeat the sign
        let lead = bits - 8 * (be.len() - 1);
        let lead_ones = ((1u16 << lead) - 1) as u8;
        let extension_ok = be[..split]
            .iter()
            .enumerate()
            .all(|(i, &b)| b == if i == 0 { lead_ones } else { 0xff })
            && low >> 127 == 1;
        if !extension_ok {
            return Err(WIDE);
        }
    }
    Ok(low as i128)
}

/// Coerce a decoded integer into the destination slot.
pub(super) fn store(dest: &mut Dest<'_>, decoded: &Decoded) -> Result<()> {
    macro_rules! coerced {
        ($ty:ty, $err:expr) => {{
            let v: $ty = match *decoded {
                Decoded::Unsigned(v) => cast(v),
                Decoded::Signed(v) => cast(v),
            }
            .ok_or($err)?;
            v
        }};
    }
    macro_rules! unsigned_slot {
        ($slot:expr, $ty:ty) => {
            *$slot = coerced!(
                $ty,
                Error::Overflow {
                    msg: "decoded value exceeds the destination's range",
                }
            )
        };
    }
    macro_rules! signed_slot {
        ($slot:expr, $ty:ty) => {
            *$slot = coerced!($ty, Error::SignedOverflow { bits: <$ty>::BITS })
        };
    }
    match dest {
        Dest::U8(slot) => unsigned_slot!(*slot, u8),
        Dest::U16(slot) => unsigned_slot!(*slot, u16),
        Dest::U32(slot) => unsigned_slot!(*slot, u32),
        Dest::U64(slot) => unsigned_slot!(*slot, u64),
        Dest::U128(slot) => unsigned_slot!(*slot, u128),
        Dest::I8(slot) => signed_slot!(*slot, i8),
        Dest::I16(slot) => signed_slot!(*slot, i16),
        Dest::I32(slot) => signed_slot!(*slot, i32),
        Dest::I64(slot) => signed_slot!(*slot, i64),
        Dest::I128(slot) => signed_slot!(*slot, i128),
        Dest::Skip => {}
        other => {
            return Err(Error::TypeMismatch {
                expected: "integer destination",
                actual: other.kind(),
            })
        }
    }
    Ok(())
}
