//! Recovers format information (error-correction level, mask pattern) and
//! version information from a sampled module matrix, tolerating a bounded
//! number of bit errors via nearest-codeword (Hamming distance) lookup
//! against the BCH tables in `tables.rs`.

use crate::bitmatrix::BitMatrix;
use crate::codeword_mask::resolve;
use crate::config::ECCLevel;
use crate::error::{QrError, Result};
use crate::tables::{FORMAT_INFOS_QR, FORMAT_INFO_COORDS_QR_MAIN, FORMAT_INFO_COORDS_QR_SIDE, VERSION_INFOS, VERSION_INFO_COORDS_BL, VERSION_INFO_COORDS_TR};

const FORMAT_HAMMING_THRESHOLD: u32 = 3;
const VERSION_HAMMING_THRESHOLD: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    pub ec_level: ECCLevel,
    pub mask_pattern: u8,
}

fn read_bits(bm: &BitMatrix, coords: &[(i16, i16)]) -> u32 {
    let dim = bm.width() as i32;
    let mut value = 0u32;
    for &(xo, yo) in coords {
        let x = resolve(xo, dim);
        let y = resolve(yo, dim);
        value = (value << 1) | (bm.is_black(x as usize, y as usize) as u32);
    }
    value
}

/// Finds the table entry closest to `bits` in Hamming distance. Returns
/// `(index, distance)` of the best match, if the table is non-empty.
fn nearest(table: &[u32], bits: u32) -> Option<(usize, u32)> {
    table
        .iter()
        .enumerate()
        .map(|(i, &candidate)| (i, (bits ^ candidate).count_ones()))
        .min_by_key(|&(_, dist)| dist)
}

fn ec_level_from_bits(bits: u32) -> ECCLevel {
    match bits {
        1 => ECCLevel::L,
        0 => ECCLevel::M,
        3 => ECCLevel::Q,
        2 => ECCLevel::H,
        _ => unreachable!("a 2-bit field only ever holds 0..=3"),
    }
}

/// Decodes the format information (EC level + mask pattern) from a sampled
/// module matrix, trying both redundant copies and keeping whichever is
/// closer to a valid codeword.
pub fn decode_format(modules: &BitMatrix) -> Result<FormatInfo> {
    let main = read_bits(modules, &FORMAT_INFO_COORDS_QR_MAIN);
    let side = read_bits(modules, &FORMAT_INFO_COORDS_QR_SIDE);

    let format_table: Vec<u32> = FORMAT_INFOS_QR.iter().map(|&w| w as u32).collect();
    let main_match = nearest(&format_table, main);
    let side_match = nearest(&format_table, side);

    let best = match (main_match, side_match) {
        (Some(m), Some(s)) => {
            if s.1 < m.1 {
                s
            } else {
                m
            }
        }
        (Some(m), None) => m,
        (None, Some(s)) => s,
        (None, None) => return Err(QrError::decode("no format information table entries")),
    };

    if best.1 > FORMAT_HAMMING_THRESHOLD {
        return Err(QrError::decode(format!(
            "format information Hamming distance {} exceeds threshold",
            best.1
        )));
    }

    // FORMAT_INFOS_QR[i] is the masked codeword for 5-bit data value i.
    let payload = best.0 as u32;
    let ec_level = ec_level_from_bits(payload >> 3);
    let mask_pattern = (payload & 0b111) as u8;

    Ok(FormatInfo { ec_level, mask_pattern })
}

/// Decodes the version from a sampled module matrix. For dimensions below
/// 45 (version < 7) there is no dedicated version information area, and
/// the version follows directly from the dimension.
pub fn decode_version(modules: &BitMatrix) -> Result<u32> {
    let dim = modules.width();
    let dimension_version = ((dim - 17) / 4) as u32;

    if dim < 45 {
        return Ok(dimension_version);
    }

    let bl = read_bits(modules, &VERSION_INFO_COORDS_BL);
    let tr = read_bits(modules, &VERSION_INFO_COORDS_TR);

    let bl_match = nearest(&VERSION_INFOS, bl);
    let tr_match = nearest(&VERSION_INFOS, tr);

    let best = match (bl_match, tr_match) {
        (Some(a), Some(b)) => {
            if b.1 < a.1 {
                b
            } else {
                a
            }
        }
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => return Err(QrError::decode("no version information table entries")),
    };

    if best.1 > VERSION_HAMMING_THRESHOLD {
        return Err(QrError::decode(format!(
            "version information Hamming distance {} exceeds threshold",
            best.1
        )));
    }

    // VERSION_INFOS is indexed by version - 7.
    Ok(best.0 as u32 + 7)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{get_alignment_pattern_points, FORMAT_INFOS_QR as FI, VERSION_INFO_COORDS_BL as VBL, VERSION_INFO_COORDS_TR as VTR};

    fn write_bits(bm: &mut BitMatrix, coords: &[(i16, i16)], value: u32) {
        let dim = bm.width() as i32;
        let n = coords.len();
        for (k, &(xo, yo)) in coords.iter().enumerate() {
            let bit = (value >> (n - 1 - k)) & 1 == 1;
            let x = resolve(xo, dim);
            let y = resolve(yo, dim);
            bm.set_color(x as usize, y as usize, bit);
        }
    }

    #[test]
    fn decodes_a_clean_format_word() {
        let mut bm = BitMatrix::new(21, 21);
        // payload value 0b01_010 = ec bits 01 (L), mask 010 (2).
        let payload = 0b01_010u32;
        let word = FI[payload as usize] as u32;
        write_bits(&mut bm, &FORMAT_INFO_COORDS_QR_MAIN, word);
        write_bits(&mut bm, &FORMAT_INFO_COORDS_QR_SIDE, word);
        let info = decode_format(&bm).unwrap();
        assert_eq!(info.ec_level, ECCLevel::L);
        assert_eq!(info.mask_pattern, 2);
    }

    #[test]
    fn tolerates_a_couple_of_bit_flips() {
        let mut bm = BitMatrix::new(21, 21);
        let payload = 0b11_101u32; // ec bits 11 (Q), mask 101 (5)
        let word = (FI[payload as usize] as u32) ^ 0b11; // flip 2 bits
        write_bits(&mut bm, &FORMAT_INFO_COORDS_QR_MAIN, word);
        write_bits(&mut bm, &FORMAT_INFO_COORDS_QR_SIDE, word);
        let info = decode_format(&bm).unwrap();
        assert_eq!(info.ec_level, ECCLevel::Q);
        assert_eq!(info.mask_pattern, 5);
    }

    #[test]
    fn rejects_garbage_format_information() {
        let mut bm = BitMatrix::new(21, 21);
        write_bits(&mut bm, &FORMAT_INFO_COORDS_QR_MAIN, 0b101010101010101);
        write_bits(&mut bm, &FORMAT_INFO_COORDS_QR_SIDE, 0b010101010101010);
        assert!(decode_format(&bm).is_err());
    }

    #[test]
    fn small_dimension_version_comes_straight_from_the_symbol_size() {
        let bm = BitMatrix::new(21, 21);
        assert_eq!(decode_version(&bm).unwrap(), 1);
        let bm = BitMatrix::new(41, 41);
        assert_eq!(decode_version(&bm).unwrap(), 6);
    }

    #[test]
    fn decodes_a_clean_version_word_for_large_symbols() {
        // version 7, dimension 45.
        let dim = 45usize;
        let mut bm = BitMatrix::new(dim, dim);
        let word = VERSION_INFOS[0];
        write_bits(&mut bm, &VBL, word);
        write_bits(&mut bm, &VTR, word);
        assert_eq!(decode_version(&bm).unwrap(), 7);
        // alignment coordinates aren't used here, just confirming the table exists.
        assert!(!get_alignment_pattern_points(7).is_empty());
    }
}
