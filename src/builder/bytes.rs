use crate::{BitWriter, Error, Result, Segment, Value};

/// Encode a binary segment: `size × unit / 8` whole bytes of the value.
///
/// The declared size is mandatory. A size smaller than the value
/// truncates; a larger one is a mismatch. Bytes go through the bit
/// accumulator one at a time so packing continues across a non-aligned
/// prior segment.
pub(super) fn encode_binary(segment: &Segment, writer: &mut BitWriter) -> Result<()> {
    let data = match &segment.value {
        Value::Bytes(b) => b,
        Value::Null => return Err(Error::InvalidSegment),
        other => {
            return Err(Error::TypeMismatch {
                expected: "byte sequence",
                actual: other.kind(),
            })
        }
    };
    if !segment.size_specified {
        return Err(Error::BinarySizeRequired);
    }
    // whole-byte coverage was checked by the validator
    let nbytes = segment.effective_bits() / 8;
    if nbytes == 0 {
        return Err(Error::InvalidSize {
            size: 0,
            msg: "binary segments need a positive size",
        });
    }
    if nbytes > data.len() {
        return Err(Error::BinarySizeMismatch {
            declared: nbytes,
            actual: data.len(),
        });
    }
    for b in &data[..nbytes] {
        writer.write_bits(u64::from(*b), 8);
    }
    Ok(())
}

/// Encode a bitstring segment: the first `size × unit` bits of the
/// value (all of it when no size is given).
pub(super) fn encode_bitstring(segment: &Segment, writer: &mut BitWriter) -> Result<()> {
    let value = match &segment.value {
        Value::Bits(b) => b,
        Value::Null => return Err(Error::InvalidSegment),
        other => {
            return Err(Error::TypeMismatch {
                expected: "bit string",
                actual: other.kind(),
            })
        }
    };
    let bits = if segment.size_specified {
        segment.effective_bits()
    } else {
        value.bit_len()
    };
    if bits == 0 {
        return Err(Error::InvalidSize {
            size: 0,
            msg: "bitstring segments cannot be empty",
        });
    }
    if bits > value.bit_len() {
        return Err(Error::InvalidSize {
            size: bits,
            msg: "bitstring size exceeds the value's length",
        });
    }
    let slice = value.as_bitslice();
    for i in 0..bits {
        writer.write_bit(slice[i]);
    }
    Ok(())
}
