use crate::{Endianness, Error, Result, Segment, SegmentType, Value};

/// Largest accepted unit, in bits per size step.
pub const MAX_UNIT: u32 = 256;

/// Check a segment's cross-field constraints and fill its defaults.
///
/// Runs the checks in a fixed order: type defaulting, unit range,
/// endianness defaulting, float width, UTF constraints, value shape.
/// A size of 0 is explicitly allowed (the segment occupies zero bits).
///
/// The only mutation is default-filling (type, endianness, size, unit),
/// so validating twice is a no-op the second time.
pub fn validate(segment: &mut Segment) -> Result<()> {
    if segment.ty.is_none() {
        segment.ty = Some(SegmentType::Integer);
    }
    segment.apply_type_defaults();
    // safety: assigned just above
    let ty = segment.ty.unwrap_or(SegmentType::Integer);

    if segment.unit_specified && !(1..=MAX_UNIT).contains(&segment.unit) {
        return Err(Error::InvalidUnit { unit: segment.unit });
    }

    if segment.endianness.is_none() {
        segment.endianness = Some(Endianness::Big);
    }

    match ty {
        SegmentType::Float => {
            if segment.size_specified {
                let bits = segment.effective_bits();
                if !matches!(bits, 16 | 32 | 64) {
                    return Err(Error::InvalidFloatSize { bits });
                }
            }
        }
        SegmentType::Utf8 | SegmentType::Utf16 | SegmentType::Utf32 => {
            if segment.size_specified {
                return Err(Error::UtfSizeSpecified);
            }
            if segment.unit_specified && segment.unit != 1 {
                return Err(Error::UtfUnitModified);
            }
            match segment.value {
                Value::Unsigned(v) => {
                    if v > 0x10_ffff {
                        return Err(Error::InvalidUnicodeCodepoint {
                            value: v.min(u128::from(u32::MAX)) as u32,
                        });
                    }
                }
                Value::Signed(v) => {
                    if !(0..=0x10_ffff).contains(&v) {
                        return Err(Error::InvalidUnicodeCodepoint {
                            value: v.clamp(0, i128::from(u32::MAX)) as u32,
                        });
                    }
                }
                _ => {}
            }
        }
        SegmentType::Binary | SegmentType::RestBinary => {
            match &segment.value {
                Value::Bytes(_) | Value::Null => {}
                _ => return Err(Error::InvalidBinaryData),
            }
            if segment.size_specified && segment.effective_bits() % 8 != 0 {
                return Err(Error::InvalidSize {
                    size: segment.effective_bits(),
                    msg: "binary segments must cover whole bytes",
                });
            }
        }
        SegmentType::Bitstring | SegmentType::RestBitstring => match &segment.value {
            Value::Bits(_) | Value::Null => {}
            _ => return Err(Error::InvalidBitstringData),
        },
        SegmentType::Integer => {}
    }

    Ok(())
}
