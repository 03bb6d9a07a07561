use crate::{BitWriter, Endianness, Error, Result, Segment, Value};

/// Encode an integer segment: the low `size × unit` bits of the value's
/// infinite two's-complement representation.
///
/// Byte-multiple widths honor the declared endianness; other widths are
/// written MSB-first regardless of it. Truncation at the declared width
/// is the defined behavior, not an error; only a negative value in an
/// unsigned segment is rejected.
pub(super) fn encode(segment: &Segment, writer: &mut BitWriter) -> Result<()> {
    let bits = segment.effective_bits();
    if bits == 0 {
        return Ok(());
    }
    let (low, negative) = match &segment.value {
        Value::Unsigned(v) => (*v, false),
        Value::Signed(v) => {
            if *v < 0 && !segment.signed {
                return Err(Error::Overflow {
                    msg: "negative value in unsigned integer segment",
                });
            }
            (*v as u128, *v < 0)
        }
        #[cfg(feature = "bigint")]
        Value::Big(big) => {
            use num_bigint::Sign;
            if big.sign() == Sign::Minus && !segment.signed {
                return Err(Error::Overflow {
                    msg: "negative value in unsigned integer segment",
                });
            }
            emit(&twos_complement_le(big, (bits + 7) / 8), bits, segment, writer);
            return Ok(());
        }
        Value::Null => return Err(Error::InvalidSegment),
        other => {
            return Err(Error::TypeMismatch {
                expected: "integer",
                actual: other.kind(),
            })
        }
    };
    emit(&le_bytes(low, negative, (bits + 7) / 8), bits, segment, writer);
    Ok(())
}

/// Little-endian two's-complement bytes of the value, `len` of them,
/// sign-filled past bit 127.
fn le_bytes(low: u128, negative: bool, len: usize) -> Vec<u8> {
    let fill = if negative { 0xff } else { 0x00 };
    (0..len)
        .map(|j| {
            if 8 * j >= 128 {
                fill
            } else {
                (low >> (8 * j)) as u8
            }
        })
        .collect()
}

#[cfg(feature = "bigint")]
fn twos_complement_le(big: &num_bigint::BigInt, len: usize) -> Vec<u8> {
    use num_bigint::Sign;
    let fill = if big.sign() == Sign::Minus { 0xff } else { 0x00 };
    let mut bytes = big.to_signed_bytes_le();
    bytes.resize(len, fill);
    bytes
}

/// Write the low `bits` bits of the little-endian byte vector `le`.
fn emit(le: &[u8], bits: usize, segment: &Segment, writer: &mut BitWriter) {
    if bits % 8 == 0 {
        let n = bits / 8;
        match segment.resolved_endianness() {
            Endianness::Little => {
                for j in 0..n {
                    writer.write_bits(u64::from(le[j]), 8);
                }
            }
            _ => {
                for j in (0..n).rev() {
                    writer.write_bits(u64::from(le[j]), 8);
                }
            }
        }
    } else {
        // sub-byte or ragged width: endianness does not apply
        for i in (0..bits).rev() {
            writer.write_bit((le[i / 8] >> (i % 8)) & 1 == 1);
        }
    }
}
