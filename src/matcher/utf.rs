use super::Dest;
use crate::utf::{decode_utf16, decode_utf32, decode_utf8};
use crate::{BitReader, Error, Result, Segment, SegmentType};

/// Decode one code point in the segment's UTF variant and bind it.
pub(super) fn decode_into(
    ty: SegmentType,
    segment: &Segment,
    dest: &mut Dest<'_>,
    reader: &mut BitReader<'_>,
) -> Result<()> {
    let endianness = segment.resolved_endianness();
    let c = match ty {
        SegmentType::Utf8 => decode_utf8(reader)?,
        SegmentType::Utf16 => decode_utf16(reader, endianness)?,
        SegmentType::Utf32 => decode_utf32(reader, endianness)?,
        _ => return Err(Error::InvalidType),
    };
    match dest {
        Dest::Char(slot) => **slot = c,
        Dest::Skip => {}
        other => {
            return Err(Error::TypeMismatch {
                expected: "char destination",
                actual: other.kind(),
            })
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{BitString, Builder, Endianness, Error, Matcher, SegmentOpt};
    use hex_literal::hex;

    #[test]
    fn utf8_sequence_lengths() {
        let input = BitString::from_bytes("a€😀".as_bytes());
        let (mut a, mut b, mut c) = ('\0', '\0', '\0');
        let rest = Matcher::new()
            .utf8(&mut a, &[])
            .utf8(&mut b, &[])
            .utf8(&mut c, &[])
            .match_bits(&input)
            .expect("match failed");
        assert_eq!((a, b, c), ('a', '€', '😀'));
        assert!(rest.is_empty());
    }

    #[test]
    fn utf16_surrogate_pair() {
        let input = BitString::from_bytes(&hex!("d8 3d de 00 00 41"));
        let (mut emoji, mut letter) = ('\0', '\0');
        Matcher::new()
            .utf16(&mut emoji, &[])
            .utf16(&mut letter, &[])
            .match_bits(&input)
            .expect("match failed");
        assert_eq!(emoji, '😀');
        assert_eq!(letter, 'A');
    }

    #[test]
    fn utf32_little_endian() {
        let built = Builder::new()
            .add_utf32('😀', &[SegmentOpt::Endianness(Endianness::Little)])
            .build()
            .expect("build failed");
        let mut c = '\0';
        Matcher::new()
            .utf32(&mut c, &[SegmentOpt::Endianness(Endianness::Little)])
            .match_bits(&built)
            .expect("match failed");
        assert_eq!(c, '😀');
    }

    #[test]
    fn malformed_input_reports_code_point_error() {
        let input = BitString::from_bytes(&hex!("ed a0 80"));
        let mut c = '\0';
        let err = Matcher::new()
            .utf8(&mut c, &[])
            .match_bits(&input)
            .expect_err("must fail");
        assert_eq!(err, Error::InvalidUnicodeCodepoint { value: 0xd800 });
    }

    #[test]
    fn truncated_input_is_insufficient() {
        let input = BitString::from_bytes(&hex!("d8 3d"));
        let mut c = '\0';
        let err = Matcher::new()
            .utf16(&mut c, &[])
            .match_bits(&input)
            .expect_err("must fail");
        assert_eq!(
            err,
            Error::InsufficientBits {
                requested: 16,
                available: 0
            }
        );
    }
}
