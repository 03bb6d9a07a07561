use super::Dest;
use crate::float16::f16_bits_to_f32;
use crate::{BitReader, Error, Result, Segment};

/// Decode a float segment: 16, 32 or 64 bits, reconstructed from the
/// declared byte order.
pub(super) fn decode_into(
    segment: &Segment,
    dest: &mut Dest<'_>,
    reader: &mut BitReader<'_>,
) -> Result<()> {
    let bits = segment.effective_bits();
    let available = reader.remaining_bits();
    if bits > available {
        return Err(Error::InsufficientBits {
            requested: bits,
            available,
        });
    }
    let mut bytes = [0u8; 8];
    let n = bits / 8;
    for slot in bytes.iter_mut().take(n) {
        *slot = reader.read_bits(8)? as u8;
    }
    if segment.resolved_endianness().is_little() {
        bytes[..n].reverse();
    }
    let value = match bits {
        16 => f64::from(f16_bits_to_f32(u16::from_be_bytes([bytes[0], bytes[1]]))),
        32 => f64::from(f32::from_bits(u32::from_be_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3],
        ]))),
        64 => f64::from_bits(u64::from_be_bytes(bytes)),
        // unreachable after validation; kept as a defensive contract
        bits => return Err(Error::InvalidFloatSize { bits }),
    };
    match dest {
        Dest::F32(slot) => **slot = value as f32,
        Dest::F64(slot) => **slot = value,
        Dest::Skip => {}
        other => {
            return Err(Error::TypeMismatch {
                expected: "float destination",
                actual: other.kind(),
            })
        }
    }
    Ok(())
}
