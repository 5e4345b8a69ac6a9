//! ECI designator parsing and character-set decoding for BYTE segments.
//!
//! Big5, GB18030, EUC-KR, Shift JIS and the ISO-8859-2..16/windows-125x
//! single-byte codepages are all WHATWG encodings, so they go through
//! `encoding_rs` rather than a hand-rolled table per codepage. Cp437 sits
//! outside the WHATWG Encoding Standard and keeps a small hand-authored
//! high-half table instead.

use encoding_rs::{Encoding, BIG5, EUC_KR, GB18030, SHIFT_JIS};
use encoding_rs::{WINDOWS_1250, WINDOWS_1251, WINDOWS_1252, WINDOWS_1256};
use encoding_rs::{ISO_8859_2, ISO_8859_3, ISO_8859_4, ISO_8859_5, ISO_8859_6, ISO_8859_7, ISO_8859_8};
use encoding_rs::{ISO_8859_10, ISO_8859_13, ISO_8859_14, ISO_8859_15, ISO_8859_16};

use crate::bitstream::BitStream;
use crate::error::{QrError, Result};

/// Codepage 437's upper half (0x80..0xFF); the lower half is plain ASCII.
/// Outside the WHATWG Encoding Standard, so `encoding_rs` has no decoder
/// for it.
const CP437_HIGH_HALF: [char; 128] = [
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å', 'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û',
    'ù', 'ÿ', 'Ö', 'Ü', '¢', '£', '¥', '₧', 'ƒ', 'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '⌐', '¬', '½', '¼', '¡',
    '«', '»', '░', '▒', '▓', '│', '┤', '╡', '╢', '╖', '╕', '╣', '║', '╗', '╝', '╜', '╛', '┐', '└', '┴', '┬', '├',
    '─', '┼', '╞', '╟', '╚', '╔', '╩', '╦', '╠', '═', '╬', '╧', '╨', '╤', '╥', '╙', '╘', '╒', '╓', '╫', '╪', '┘',
    '┌', '█', '▄', '▌', '▐', '▀', 'α', 'ß', 'Γ', 'π', 'Σ', 'σ', 'µ', 'τ', 'Φ', 'Θ', 'Ω', 'δ', '∞', 'φ', 'ε', '∩',
    '≡', '±', '≥', '≤', '⌠', '⌡', '÷', '≈', '°', '∙', '·', '√', 'ⁿ', '²', '■', '\u{00A0}',
];

/// A character set a BYTE segment's bytes may be interpreted under, as
/// selected by the active ECI designator (ISO-8859-1 is the default until
/// an ECI segment changes it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterSet {
    Ascii,
    Cp437,
    Iso8859(u8),
    ShiftJis,
    Cp1250,
    Cp1251,
    Cp1252,
    Cp1256,
    Utf16Be,
    Utf8,
    Big5,
    Gb18030,
    EucKr,
}

/// Maps an ECI designator value to the character set it selects, following
/// the assignment table in ISO/IEC 18004 Annex F.
pub fn from_eci(value: u32) -> Result<CharacterSet> {
    use CharacterSet::*;
    Ok(match value {
        0 | 2 => Cp437,
        1 | 3 => Iso8859(1),
        4 => Iso8859(2),
        5 => Iso8859(3),
        6 => Iso8859(4),
        7 => Iso8859(5),
        8 => Iso8859(6),
        9 => Iso8859(7),
        10 => Iso8859(8),
        11 => Iso8859(9),
        12 => Iso8859(10),
        13 => Iso8859(11),
        15 => Iso8859(13),
        16 => Iso8859(14),
        17 => Iso8859(15),
        18 => Iso8859(16),
        20 => ShiftJis,
        21 => Cp1250,
        22 => Cp1251,
        23 => Cp1252,
        24 => Cp1256,
        25 => Utf16Be,
        26 => Utf8,
        27 | 170 => Ascii,
        28 => Big5,
        29 => Gb18030,
        30 => EucKr,
        _ => return Err(QrError::decode(format!("unsupported ECI designator {}", value))),
    })
}

/// Reads a 1-, 2- or 3-byte ECI designator off `bits` (ISO/IEC 18004
/// §6.4.2.2) and returns the raw designator value.
pub fn read_eci_designator(bits: &mut BitStream) -> Result<u32> {
    let first = bits.read_bits(8)?;
    if first & 0x80 == 0 {
        Ok(first & 0x7F)
    } else if first & 0xC0 == 0x80 {
        let second = bits.read_bits(8)?;
        Ok(((first & 0x3F) << 8) | second)
    } else if first & 0xE0 == 0xC0 {
        let rest = bits.read_bits(16)?;
        Ok(((first & 0x1F) << 16) | rest)
    } else {
        Err(QrError::decode("invalid ECI designator lead byte"))
    }
}

fn encoding_rs_decode(encoding: &'static Encoding, bytes: &[u8]) -> Vec<u8> {
    let (cow, _, _) = encoding.decode(bytes);
    cow.into_owned().into_bytes()
}

fn decode_cp437(bytes: &[u8]) -> Vec<u8> {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        if b < 0x80 {
            out.push(b as char);
        } else {
            out.push(CP437_HIGH_HALF[(b - 0x80) as usize]);
        }
    }
    out.into_bytes()
}

/// ISO-8859-9 (Latin-5, Turkish): identical to Latin-1 except six letters
/// swapped for their Turkish counterparts. `encoding_rs` has no decoder for
/// this codepage (it predates the WHATWG Encoding Standard's single-byte
/// roster), so it gets a small hand override instead.
fn decode_iso8859_9(bytes: &[u8]) -> Vec<u8> {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        let c = match b {
            0xD0 => 'Ğ',
            0xDD => 'İ',
            0xDE => 'Ş',
            0xF0 => 'ğ',
            0xFD => 'ı',
            0xFE => 'ş',
            other => other as char,
        };
        out.push(c);
    }
    out.into_bytes()
}

/// ISO-8859-11 (TIS-620, Thai). Like Cp437, outside `encoding_rs`'s
/// WHATWG-only roster.
fn decode_iso8859_11(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        let c = match b {
            0x00..=0x7F => b as char,
            0xA1..=0xDA => char::from_u32(0x0E01 + (b - 0xA1) as u32).unwrap(),
            0xDF => '\u{0E3F}',
            0xE0..=0xFB => char::from_u32(0x0E40 + (b - 0xE0) as u32).unwrap(),
            _ => return Err(QrError::decode(format!("byte 0x{:02x} is undefined in ISO-8859-11", b))),
        };
        out.push(c);
    }
    Ok(out.into_bytes())
}

/// Decodes a BYTE segment's raw bytes under `charset`, returning UTF-8.
/// `Utf8` and `Utf16Be` are verbatim passthroughs: those bytes aren't
/// re-encoded, they are copied straight into the output buffer (which may
/// then contain non-UTF-8 binary payload bytes, same as the source format
/// allows).
pub fn decode_bytes(bytes: &[u8], charset: CharacterSet) -> Result<Vec<u8>> {
    use CharacterSet::*;
    Ok(match charset {
        Utf8 | Utf16Be => bytes.to_vec(),
        Ascii => {
            if bytes.iter().any(|&b| b >= 0x80) {
                return Err(QrError::decode("non-ASCII byte under an ASCII ECI designator"));
            }
            bytes.to_vec()
        }
        Cp437 => decode_cp437(bytes),
        Iso8859(1) => bytes.iter().map(|&b| b as char).collect::<String>().into_bytes(),
        Iso8859(2) => encoding_rs_decode(ISO_8859_2, bytes),
        Iso8859(3) => encoding_rs_decode(ISO_8859_3, bytes),
        Iso8859(4) => encoding_rs_decode(ISO_8859_4, bytes),
        Iso8859(5) => encoding_rs_decode(ISO_8859_5, bytes),
        Iso8859(6) => encoding_rs_decode(ISO_8859_6, bytes),
        Iso8859(7) => encoding_rs_decode(ISO_8859_7, bytes),
        Iso8859(8) => encoding_rs_decode(ISO_8859_8, bytes),
        Iso8859(9) => decode_iso8859_9(bytes),
        Iso8859(10) => encoding_rs_decode(ISO_8859_10, bytes),
        Iso8859(11) => decode_iso8859_11(bytes)?,
        Iso8859(13) => encoding_rs_decode(ISO_8859_13, bytes),
        Iso8859(14) => encoding_rs_decode(ISO_8859_14, bytes),
        Iso8859(15) => encoding_rs_decode(ISO_8859_15, bytes),
        Iso8859(16) => encoding_rs_decode(ISO_8859_16, bytes),
        Iso8859(n) => return Err(QrError::decode(format!("unsupported ISO-8859 part {}", n))),
        ShiftJis => encoding_rs_decode(SHIFT_JIS, bytes),
        Cp1250 => encoding_rs_decode(WINDOWS_1250, bytes),
        Cp1251 => encoding_rs_decode(WINDOWS_1251, bytes),
        Cp1252 => encoding_rs_decode(WINDOWS_1252, bytes),
        Cp1256 => encoding_rs_decode(WINDOWS_1256, bytes),
        Big5 => encoding_rs_decode(BIG5, bytes),
        Gb18030 => encoding_rs_decode(GB18030, bytes),
        EucKr => encoding_rs_decode(EUC_KR, bytes),
    })
}

/// Maps a single Shift JIS 16-bit code unit to its UTF-8 encoding, for
/// KANJI segments (where codes are reconstructed from 13-bit values
/// rather than read as a byte stream).
pub fn decode_shift_jis_unit(code: u16) -> Result<Vec<u8>> {
    let bytes = [(code >> 8) as u8, (code & 0xFF) as u8];
    let (cow, _, had_errors) = SHIFT_JIS.decode(&bytes);
    if had_errors {
        return Err(QrError::decode(format!("invalid Shift JIS code unit 0x{:04x}", code)));
    }
    Ok(cow.into_owned().into_bytes())
}

/// Appends the UTF-8 encoding of a Unicode scalar value to `out`, per the
/// standard's length-prefixed encoding (1 byte for <0x80, up to 4 bytes
/// for <0x110000).
pub fn push_utf8_scalar(out: &mut Vec<u8>, scalar: u32) -> Result<()> {
    let c = char::from_u32(scalar).ok_or_else(|| QrError::decode(format!("invalid Unicode scalar value {}", scalar)))?;
    let mut buf = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eci_single_byte_designator() {
        let bytes = [0x21u8];
        let mut bits = BitStream::new(&bytes);
        assert_eq!(read_eci_designator(&mut bits).unwrap(), 33);
    }

    #[test]
    fn eci_two_byte_designator() {
        let bytes = [0x81u8, 0x01];
        let mut bits = BitStream::new(&bytes);
        assert_eq!(read_eci_designator(&mut bits).unwrap(), 257);
    }

    #[test]
    fn eci_three_byte_designator() {
        let bytes = [0xC1u8, 0x00, 0x01];
        let mut bits = BitStream::new(&bytes);
        assert_eq!(read_eci_designator(&mut bits).unwrap(), 65537);
    }

    #[test]
    fn eci_invalid_lead_byte_is_rejected() {
        let bytes = [0xE0u8, 0x00, 0x00];
        let mut bits = BitStream::new(&bytes);
        assert!(read_eci_designator(&mut bits).is_err());
    }

    #[test]
    fn utf8_charset_is_a_verbatim_passthrough() {
        let bytes = [0xFFu8, 0x00, 0x41];
        assert_eq!(decode_bytes(&bytes, CharacterSet::Utf8).unwrap(), bytes.to_vec());
    }

    #[test]
    fn ascii_charset_rejects_high_bytes() {
        assert!(decode_bytes(&[0x80], CharacterSet::Ascii).is_err());
        assert_eq!(decode_bytes(&[b'A'], CharacterSet::Ascii).unwrap(), vec![b'A']);
    }

    #[test]
    fn cp437_high_half_maps_to_latin_accents() {
        // 0x87 is Ç in Cp437.
        let decoded = decode_bytes(&[0x87], CharacterSet::Cp437).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), "Ç");
    }

    #[test]
    fn eci_value_maps_to_expected_charset() {
        assert_eq!(from_eci(26).unwrap(), CharacterSet::Utf8);
        assert_eq!(from_eci(0).unwrap(), CharacterSet::Cp437);
        assert!(from_eci(14).is_err());
    }
}
