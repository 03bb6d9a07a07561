use crate::utf::{encode_utf16, encode_utf32, encode_utf8};
use crate::{BitWriter, Endianness, Error, Result, Segment, SegmentType, Value};

/// Encode a UTF segment: one code point, or a string encoded as the
/// concatenation of its characters' encodings.
pub(super) fn encode(ty: SegmentType, segment: &Segment, writer: &mut BitWriter) -> Result<()> {
    let endianness = segment.resolved_endianness();
    match &segment.value {
        Value::Unsigned(v) => {
            // the validator capped the range at 0x10FFFF
            encode_code_point(ty, *v as u32, endianness, writer)
        }
        Value::Signed(v) => encode_code_point(ty, *v as u32, endianness, writer),
        Value::Str(s) => {
            for c in s.chars() {
                encode_code_point(ty, u32::from(c), endianness, writer)?;
            }
            Ok(())
        }
        Value::Null => Err(Error::InvalidSegment),
        other => Err(Error::TypeMismatch {
            expected: "code point or string",
            actual: other.kind(),
        }),
    }
}

fn encode_code_point(
    ty: SegmentType,
    cp: u32,
    endianness: Endianness,
    writer: &mut BitWriter,
) -> Result<()> {
    match ty {
        SegmentType::Utf8 => {
            let (buf, n) = encode_utf8(cp)?;
            write_all(writer, &buf[..n]);
        }
        SegmentType::Utf16 => {
            let (buf, n) = encode_utf16(cp, endianness)?;
            write_all(writer, &buf[..n]);
        }
        SegmentType::Utf32 => {
            let buf = encode_utf32(cp, endianness)?;
            write_all(writer, &buf);
        }
        _ => return Err(Error::InvalidType),
    }
    Ok(())
}

fn write_all(writer: &mut BitWriter, bytes: &[u8]) {
    for b in bytes {
        writer.write_bits(u64::from(*b), 8);
    }
}
