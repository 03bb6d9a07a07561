use crate::float16::f32_to_f16_bits;
use crate::{BitWriter, Endianness, Error, Result, Segment, Value};

/// Encode a float segment at 16, 32 or 64 bits.
///
/// The value is taken as a double and narrowed to the target width; the
/// resulting bytes go through the bit accumulator, so floats pack
/// without padding after a non-aligned segment just like any other
/// segment type.
pub(super) fn encode(segment: &Segment, writer: &mut BitWriter) -> Result<()> {
    let value = match &segment.value {
        Value::Float(f) => *f,
        // integers are accepted in float segments and converted
        Value::Signed(i) => *i as f64,
        Value::Unsigned(u) => *u as f64,
        #[cfg(feature = "bigint")]
        Value::Big(big) => {
            use num_traits::ToPrimitive;
            big.to_f64().ok_or(Error::TypeMismatch {
                expected: "float",
                actual: "big integer",
            })?
        }
        Value::Null => return Err(Error::InvalidSegment),
        other => {
            return Err(Error::TypeMismatch {
                expected: "float",
                actual: other.kind(),
            })
        }
    };

    let little = matches!(segment.resolved_endianness(), Endianness::Little);
    match segment.effective_bits() {
        16 => {
            let h = f32_to_f16_bits(value as f32);
            write_all(writer, &if little { h.to_le_bytes() } else { h.to_be_bytes() })
        }
        32 => {
            let b = (value as f32).to_bits();
            write_all(writer, &if little { b.to_le_bytes() } else { b.to_be_bytes() })
        }
        64 => {
            let b = value.to_bits();
            write_all(writer, &if little { b.to_le_bytes() } else { b.to_be_bytes() })
        }
        // unreachable after validation; kept as a defensive contract
        bits => return Err(Error::InvalidFloatSize { bits }),
    }
    Ok(())
}

fn write_all(writer: &mut BitWriter, bytes: &[u8]) {
    for b in bytes {
        writer.write_bits(u64::from(*b), 8);
    }
}

#[cfg(test)]
mod tests {
    use crate::{Builder, Endianness, SegmentOpt};
    use hex_literal::hex;

    #[test]
    fn known_encodings() {
        let bits = Builder::new()
            .add_float(1.0f32, &[SegmentOpt::Size(32)])
            .build()
            .expect("build failed");
        assert_eq!(bits.to_bytes(), hex!("3f 80 00 00"));

        let bits = Builder::new()
            .add_float(1.0f64, &[SegmentOpt::Size(16)])
            .build()
            .expect("build failed");
        assert_eq!(bits.to_bytes(), hex!("3c 00"));

        let bits = Builder::new()
            .add_float(1.0f64, &[])
            .build()
            .expect("build failed");
        assert_eq!(bits.to_bytes(), hex!("3f f0 00 00 00 00 00 00"));
    }

    #[test]
    fn little_endian_floats() {
        let bits = Builder::new()
            .add_float(
                1.0f32,
                &[
                    SegmentOpt::Size(32),
                    SegmentOpt::Endianness(Endianness::Little),
                ],
            )
            .build()
            .expect("build failed");
        assert_eq!(bits.to_bytes(), hex!("00 00 80 3f"));
    }

    #[test]
    fn integer_values_are_converted() {
        let bits = Builder::new()
            .add_float(1u8, &[SegmentOpt::Size(32)])
            .build()
            .expect("build failed");
        assert_eq!(bits.to_bytes(), hex!("3f 80 00 00"));
    }

    #[test]
    fn floats_pack_unaligned() {
        // one leading bit, then a 32-bit float: 33 bits, no padding
        let bits = Builder::new()
            .add_integer(1u8, &[SegmentOpt::Size(1)])
            .add_float(1.0f32, &[SegmentOpt::Size(32)])
            .build()
            .expect("build failed");
        assert_eq!(bits.bit_len(), 33);
        // 1 | 00111111 10000000 ... shifted right one bit
        assert_eq!(bits.to_bytes(), hex!("9f c0 00 00 00"));
    }
}
