//! Unicode code-point transport: UTF-8, UTF-16 (surrogate pairs) and
//! UTF-32, with byte order applied per 16/32-bit code unit.
//!
//! Decoding is strict: continuation-byte errors, overlong encodings,
//! lone surrogates and out-of-range values are all rejected.

use crate::{BitReader, Endianness, Error, Result};

fn scalar(value: u32) -> Result<char> {
    char::from_u32(value).ok_or(Error::InvalidUnicodeCodepoint { value })
}

/// Encode a code point as UTF-8. Returns the byte buffer and the number
/// of bytes used (1–4).
pub fn encode_utf8(cp: u32) -> Result<([u8; 4], usize)> {
    let c = scalar(cp)?;
    let mut buf = [0u8; 4];
    let n = c.encode_utf8(&mut buf).len();
    Ok((buf, n))
}

/// Encode a code point as UTF-16 in the given byte order. Returns the
/// byte buffer and the number of bytes used (2 or 4).
pub fn encode_utf16(cp: u32, endianness: Endianness) -> Result<([u8; 4], usize)> {
    let c = scalar(cp)?;
    let mut units = [0u16; 2];
    let n = c.encode_utf16(&mut units).len();
    let mut buf = [0u8; 4];
    for (i, unit) in units[..n].iter().enumerate() {
        let bytes = match endianness.resolve() {
            Endianness::Little => unit.to_le_bytes(),
            _ => unit.to_be_bytes(),
        };
        buf[2 * i..2 * i + 2].copy_from_slice(&bytes);
    }
    Ok((buf, 2 * n))
}

/// Encode a code point as UTF-32 in the given byte order (always 4 bytes).
pub fn encode_utf32(cp: u32, endianness: Endianness) -> Result<[u8; 4]> {
    let c = scalar(cp)?;
    let bytes = match endianness.resolve() {
        Endianness::Little => u32::from(c).to_le_bytes(),
        _ => u32::from(c).to_be_bytes(),
    };
    Ok(bytes)
}

/// Decode one UTF-8 sequence (1–4 bytes) from the reader.
pub fn decode_utf8(reader: &mut BitReader<'_>) -> Result<char> {
    let b0 = reader.read_bits(8)? as u32;
    let (len, mut cp, min) = match b0 {
        0x00..=0x7f => return scalar(b0),
        0xc0..=0xdf => (2u32, b0 & 0x1f, 0x80),
        0xe0..=0xef => (3, b0 & 0x0f, 0x800),
        0xf0..=0xf7 => (4, b0 & 0x07, 0x1_0000),
        // continuation byte in lead position, or 0xf8..0xff
        _ => return Err(Error::InvalidUnicodeCodepoint { value: b0 }),
    };
    for _ in 1..len {
        let b = reader.read_bits(8)? as u32;
        if b & 0xc0 != 0x80 {
            return Err(Error::InvalidUnicodeCodepoint { value: b });
        }
        cp = (cp << 6) | (b & 0x3f);
    }
    if cp < min {
        // overlong encoding
        return Err(Error::InvalidUnicodeCodepoint { value: cp });
    }
    scalar(cp)
}

fn read_utf16_unit(reader: &mut BitReader<'_>, endianness: Endianness) -> Result<u16> {
    let raw = reader.read_bits(16)? as u16;
    match endianness.resolve() {
        Endianness::Little => Ok(raw.swap_bytes()),
        _ => Ok(raw),
    }
}

/// Decode one UTF-16 value (one unit, or a surrogate pair) from the reader.
pub fn decode_utf16(reader: &mut BitReader<'_>, endianness: Endianness) -> Result<char> {
    let first = read_utf16_unit(reader, endianness)?;
    match first {
        0xd800..=0xdbff => {
            let second = read_utf16_unit(reader, endianness)?;
            if !(0xdc00..=0xdfff).contains(&second) {
                return Err(Error::InvalidUnicodeCodepoint {
                    value: u32::from(second),
                });
            }
            let cp = 0x1_0000
                + ((u32::from(first) - 0xd800) << 10)
                + (u32::from(second) - 0xdc00);
            scalar(cp)
        }
        // lone low surrogate
        0xdc00..=0xdfff => Err(Error::InvalidUnicodeCodepoint {
            value: u32::from(first),
        }),
        _ => scalar(u32::from(first)),
    }
}

/// Decode one UTF-32 value (4 bytes) from the reader.
pub fn decode_utf32(reader: &mut BitReader<'_>, endianness: Endianness) -> Result<char> {
    let raw = reader.read_bits(32)? as u32;
    let value = match endianness.resolve() {
        Endianness::Little => raw.swap_bytes(),
        _ => raw,
    };
    scalar(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BitString;
    use hex_literal::hex;

    fn reader_over(bytes: &[u8]) -> BitString {
        BitString::from_bytes(bytes)
    }

    #[test]
    fn encode_grinning_face() {
        let (buf, n) = encode_utf8(0x1f600).expect("encoding failed");
        assert_eq!(&buf[..n], hex!("f0 9f 98 80"));

        let (buf, n) = encode_utf16(0x1f600, Endianness::Big).expect("encoding failed");
        assert_eq!(&buf[..n], hex!("d8 3d de 00"));

        let (buf, n) = encode_utf16(0x1f600, Endianness::Little).expect("encoding failed");
        assert_eq!(&buf[..n], hex!("3d d8 00 de"));

        let buf = encode_utf32(0x1f600, Endianness::Big).expect("encoding failed");
        assert_eq!(buf, hex!("00 01 f6 00"));

        let buf = encode_utf32(0x1f600, Endianness::Little).expect("encoding failed");
        assert_eq!(buf, hex!("00 f6 01 00"));
    }

    #[test]
    fn encode_width_classes() {
        let (_, n) = encode_utf8(0x24).expect("encoding failed");
        assert_eq!(n, 1);
        let (_, n) = encode_utf8(0xa2).expect("encoding failed");
        assert_eq!(n, 2);
        let (_, n) = encode_utf8(0x20ac).expect("encoding failed");
        assert_eq!(n, 3);
        let (_, n) = encode_utf16(0x20ac, Endianness::Big).expect("encoding failed");
        assert_eq!(n, 2);
    }

    #[test]
    fn encode_rejects_invalid_scalars() {
        assert_eq!(
            encode_utf8(0x11_0000),
            Err(Error::InvalidUnicodeCodepoint { value: 0x11_0000 })
        );
        // surrogate halves are not scalar values
        assert_eq!(
            encode_utf16(0xd800, Endianness::Big),
            Err(Error::InvalidUnicodeCodepoint { value: 0xd800 })
        );
        assert_eq!(
            encode_utf32(0xdfff, Endianness::Big),
            Err(Error::InvalidUnicodeCodepoint { value: 0xdfff })
        );
    }

    #[test]
    fn decode_utf8_sequences() {
        let input = reader_over(&hex!("f0 9f 98 80"));
        let mut r = BitReader::new(&input);
        assert_eq!(decode_utf8(&mut r).expect("decoding failed"), '😀');

        let input = reader_over(b"A");
        let mut r = BitReader::new(&input);
        assert_eq!(decode_utf8(&mut r).expect("decoding failed"), 'A');

        let input = reader_over(&hex!("e2 82 ac"));
        let mut r = BitReader::new(&input);
        assert_eq!(decode_utf8(&mut r).expect("decoding failed"), '€');
    }

    #[test]
    fn decode_utf8_rejects_malformed() {
        // bare continuation byte
        let input = reader_over(&hex!("80"));
        let mut r = BitReader::new(&input);
        assert!(decode_utf8(&mut r).is_err());

        // truncated sequence
        let input = reader_over(&hex!("e2 82"));
        let mut r = BitReader::new(&input);
        assert!(decode_utf8(&mut r).is_err());

        // overlong encoding of '/'
        let input = reader_over(&hex!("c0 af"));
        let mut r = BitReader::new(&input);
        assert_eq!(
            decode_utf8(&mut r),
            Err(Error::InvalidUnicodeCodepoint { value: 0x2f })
        );

        // encoded surrogate (CESU-8 style)
        let input = reader_over(&hex!("ed a0 80"));
        let mut r = BitReader::new(&input);
        assert_eq!(
            decode_utf8(&mut r),
            Err(Error::InvalidUnicodeCodepoint { value: 0xd800 })
        );

        // lead byte beyond U+10FFFF range
        let input = reader_over(&hex!("f8 88 80 80 80"));
        let mut r = BitReader::new(&input);
        assert!(decode_utf8(&mut r).is_err());
    }

    #[test]
    fn decode_utf16_pairs_and_lone_surrogates() {
        let input = reader_over(&hex!("d8 3d de 00"));
        let mut r = BitReader::new(&input);
        assert_eq!(
            decode_utf16(&mut r, Endianness::Big).expect("decoding failed"),
            '😀'
        );

        let input = reader_over(&hex!("3d d8 00 de"));
        let mut r = BitReader::new(&input);
        assert_eq!(
            decode_utf16(&mut r, Endianness::Little).expect("decoding failed"),
            '😀'
        );

        // lone high surrogate followed by a non-surrogate
        let input = reader_over(&hex!("d8 3d 00 41"));
        let mut r = BitReader::new(&input);
        assert_eq!(
            decode_utf16(&mut r, Endianness::Big),
            Err(Error::InvalidUnicodeCodepoint { value: 0x41 })
        );

        // lone low surrogate
        let input = reader_over(&hex!("dc 00"));
        let mut r = BitReader::new(&input);
        assert_eq!(
            decode_utf16(&mut r, Endianness::Big),
            Err(Error::InvalidUnicodeCodepoint { value: 0xdc00 })
        );
    }

    #[test]
    fn decode_utf32_endianness_and_range() {
        let input = reader_over(&hex!("00 01 f6 00"));
        let mut r = BitReader::new(&input);
        assert_eq!(
            decode_utf32(&mut r, Endianness::Big).expect("decoding failed"),
            '😀'
        );

        let input = reader_over(&hex!("00 f6 01 00"));
        let mut r = BitReader::new(&input);
        assert_eq!(
            decode_utf32(&mut r, Endianness::Little).expect("decoding failed"),
            '😀'
        );

        let input = reader_over(&hex!("00 11 00 00"));
        let mut r = BitReader::new(&input);
        assert_eq!(
            decode_utf32(&mut r, Endianness::Big),
            Err(Error::InvalidUnicodeCodepoint { value: 0x11_0000 })
        );
    }
}
