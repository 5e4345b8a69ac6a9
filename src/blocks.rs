//! De-interleaves the codewords read off a QR code symbol into per-block
//! data and error-correction codeword arrays, following ISO/IEC 18004
//! Annex I. Data codewords are written to the "codewords" array first, then
//! the error correction codewords, each written round-robin across blocks.

use crate::config::ECCLevel;
use crate::error::{QrError, Result};

/// One (n_blocks, total_codewords_per_block, n_data_codewords_per_block,
/// error_correction_capacity) group for a given version/ec_level, terminated
/// by a zero entry. Most rows have a single group; versions with mixed
/// block sizes (e.g. version 5-H) have two.
#[rustfmt::skip]
const BLOCK_DESCRIPTIONS: [[[u32; 9]; 4]; 40] = [
    [ /* Version 1 */
        [1, 26, 19, 3, 0, 0, 0, 0, 0],
        [1, 26, 16, 5, 0, 0, 0, 0, 0],
        [1, 26, 13, 6, 0, 0, 0, 0, 0],
        [1, 26,  9, 8, 0, 0, 0, 0, 0],
    ],
    [ /* Version 2 */
        [1, 44, 34,  5, 0, 0, 0, 0, 0],
        [1, 44, 28,  8, 0, 0, 0, 0, 0],
        [1, 44, 22, 11, 0, 0, 0, 0, 0],
        [1, 44, 16, 14, 0, 0, 0, 0, 0],
    ],
    [ /* Version 3 */
        [1, 70, 55,  7, 0, 0, 0, 0, 0],
        [1, 70, 44, 13, 0, 0, 0, 0, 0],
        [2, 35, 17,  9, 0, 0, 0, 0, 0],
        [2, 35, 13, 11, 0, 0, 0, 0, 0],
    ],
    [ /* Version 4 */
        [1, 100, 80, 10, 0, 0, 0, 0, 0],
        [2,  50, 32,  9, 0, 0, 0, 0, 0],
        [2,  50, 24, 13, 0, 0, 0, 0, 0],
        [4,  25,  9,  8, 0, 0, 0, 0, 0],
    ],
    [ /* Version 5 */
        [1, 134, 108, 13, 0,  0,   0,  0, 0],
        [2,  67,  43, 12, 0,  0,   0,  0, 0],
        [2,  33,  15,  9, 2, 34,  16,  9, 0],
        [2,  33,  11, 11, 2, 34,  12, 11, 0],
    ],
    [ /* Version 6 */
        [2, 86, 68,  9, 0, 0, 0, 0, 0],
        [4, 43, 27,  8, 0, 0, 0, 0, 0],
        [4, 43, 19, 12, 0, 0, 0, 0, 0],
        [4, 43, 15, 14, 0, 0, 0, 0, 0],
    ],
    [ /* Version 7 */
        [2, 98, 78, 10, 0,  0,  0,  0, 0],
        [4, 49, 31,  9, 0,  0,  0,  0, 0],
        [2, 32, 14,  9, 4, 33, 15,  9, 0],
        [4, 39, 13, 13, 1, 40, 14, 13, 0],
    ],
    [ /* Version 8 */
        [2, 121, 97, 12, 0,  0,  0,  0, 0],
        [2,  60, 38, 11, 2, 61, 39, 11, 0],
        [4,  40, 18, 11, 2, 41, 19, 11, 0],
        [4,  40, 14, 13, 2, 41, 15, 13, 0],
    ],
    [ /* Version 9 */
        [2, 146, 116, 15, 0,  0,   0,  0, 0],
        [3,  58,  36, 11, 2, 59,  37, 11, 0],
        [4,  36,  16, 10, 4, 37,  17, 10, 0],
        [4,  36,  12, 12, 4, 37,  13, 12, 0],
    ],
    [ /* Version 10 */
        [2, 86, 68,  9, 2, 87, 69,  9, 0],
        [4, 69, 43, 13, 1, 70, 44, 13, 0],
        [6, 43, 19, 12, 2, 44, 20, 12, 0],
        [6, 43, 15, 14, 2, 44, 16, 14, 0],
    ],
    [ /* Version 11 */
        [4, 101, 81, 10, 0,  0,  0,  0, 0],
        [1,  80, 50, 15, 4, 81, 51, 15, 0],
        [4,  50, 22, 14, 4, 51, 23, 14, 0],
        [3,  36, 12, 12, 8, 37, 13, 12, 0],
    ],
    [ /* Version 12 */
        [2, 116, 92, 12, 2, 117, 93, 12, 0],
        [6,  58, 36, 11, 2,  59, 37, 11, 0],
        [4,  46, 20, 13, 6,  47, 21, 13, 0],
        [7,  42, 14, 14, 4,  43, 15, 14, 0],
    ],
    [ /* Version 13 */
        [4, 133, 107, 13, 0,  0,   0,  0, 0],
        [8,  59,  37, 11, 1, 60,  38, 11, 0],
        [8,  44,  20, 12, 4, 45,  21, 12, 0],
        [12, 33,  11, 11, 4, 34,  12, 11, 0],
    ],
    [ /* Version 14 */
        [3, 145, 115, 15, 1, 146, 116, 15, 0],
        [4,  64,  40, 12, 5,  65,  41, 12, 0],
        [11, 36,  16, 10, 5,  37,  17, 10, 0],
        [11, 36,  12, 12, 5,  37,  13, 12, 0],
    ],
    [ /* Version 15 */
        [5, 109, 87, 11, 1, 110, 88, 11, 0],
        [5,  65, 41, 12, 5,  66, 42, 12, 0],
        [5,  54, 24, 15, 7,  55, 25, 15, 0],
        [11, 36, 12, 12, 7,  37, 13, 12, 0],
    ],
    [ /* Version 16 */
        [5, 122, 98, 12,  1, 123, 99, 12, 0],
        [7,  73, 45, 14,  3,  74, 46, 14, 0],
        [15, 43, 19, 12,  2,  44, 20, 12, 0],
        [3,  45, 15, 15, 13,  46, 16, 15, 0],
    ],
    [ /* Version 17 */
        [1, 135, 107, 14,  5, 136, 108, 14, 0],
        [10, 74,  46, 14,  1,  75,  47, 14, 0],
        [1,  50,  22, 14, 15,  51,  23, 14, 0],
        [2,  42,  14, 14, 17,  43,  15, 14, 0],
    ],
    [ /* Version 18 */
        [5, 150, 120, 15,  1, 151, 121, 15, 0],
        [9,  69,  43, 13,  4,  70,  44, 13, 0],
        [17, 50,  22, 14,  1,  51,  23, 14, 0],
        [2,  42,  14, 14, 19,  43,  15, 14, 0],
    ],
    [ /* Version 19 */
        [3, 141, 113, 14,  4, 142, 114, 14, 0],
        [3,  70,  44, 13, 11,  71,  45, 13, 0],
        [17, 47,  21, 13,  4,  48,  22, 13, 0],
        [9,  39,  13, 13, 16,  40,  14, 13, 0],
    ],
    [ /* Version 20 */
        [3, 135, 107, 14,  5, 136, 108, 14, 0],
        [3,  67,  41, 13, 13,  68,  42, 13, 0],
        [15, 54,  24, 15,  5,  55,  25, 15, 0],
        [15, 43,  15, 14, 10,  44,  16, 14, 0],
    ],
    [ /* Version 21 */
        [4, 144, 116, 14, 4, 145, 117, 14, 0],
        [17, 68,  42, 13, 0,   0,   0,  0, 0],
        [17, 50,  22, 14, 6,  51,  23, 14, 0],
        [19, 46,  16, 15, 6,  47,  17, 15, 0],
    ],
    [ /* Version 22 */
        [2, 139, 111, 14,  7, 140, 112, 14, 0],
        [17, 74,  46, 14,  0,   0,   0,  0, 0],
        [7,  54,  24, 15, 16,  55,  25, 15, 0],
        [34, 37,  13, 12,  0,   0,   0,  0, 0],
    ],
    [ /* Version 23 */
        [4, 151, 121, 15,  5, 152, 122, 15, 0],
        [4,  75,  47, 14, 14,  76,  48, 14, 0],
        [11, 54,  24, 15, 14,  55,  25, 15, 0],
        [16, 45,  15, 15, 14,  46,  16, 15, 0],
    ],
    [ /* Version 24 */
        [6, 147, 117, 15,  4, 148, 118, 15, 0],
        [6,  73,  45, 14, 14,  74,  46, 14, 0],
        [11, 54,  24, 15, 16,  55,  25, 15, 0],
        [30, 46,  16, 15,  2,  47,  17, 15, 0],
    ],
    [ /* Version 25 */
        [8, 132, 106, 13,  4, 133, 107, 13, 0],
        [8,  75,  47, 14, 13,  76,  48, 14, 0],
        [7,  54,  24, 15, 22,  55,  25, 15, 0],
        [22, 45,  15, 15, 13,  46,  16, 15, 0],
    ],
    [ /* Version 26 */
        [10, 142, 114, 14, 2, 143, 115, 14, 0],
        [19,  74,  46, 14, 4,  75,  47, 14, 0],
        [28,  50,  22, 14, 6,  51,  23, 14, 0],
        [33,  46,  16, 15, 4,  47,  17, 15, 0],
    ],
    [ /* Version 27 */
        [8, 152, 122, 15,  4, 153, 123, 15, 0],
        [22, 73,  45, 14,  3,  74,  46, 14, 0],
        [8,  53,  23, 15, 26,  54,  24, 15, 0],
        [12, 45,  15, 15, 28,  46,  16, 15, 0],
    ],
    [ /* Version 28 */
        [3, 147, 117, 15, 10, 148, 118, 15, 0],
        [3,  73,  45, 14, 23,  74,  46, 14, 0],
        [4,  54,  24, 15, 31,  55,  25, 15, 0],
        [11, 45,  15, 15, 31,  46,  16, 15, 0],
    ],
    [ /* Version 29 */
        [7, 146, 116, 15,  7, 147, 117, 15, 0],
        [21, 73,  45, 14,  7,  74,  46, 14, 0],
        [1,  53,  23, 15, 37,  54,  24, 15, 0],
        [19, 45,  15, 15, 26,  46,  16, 15, 0],
    ],
    [ /* Version 30 */
        [5, 145, 115, 15, 10, 146, 116, 15, 0],
        [19, 75,  47, 14, 10,  76,  48, 14, 0],
        [15, 54,  24, 15, 25,  55,  25, 15, 0],
        [23, 45,  15, 15, 25,  46,  16, 15, 0],
    ],
    [ /* Version 31 */
        [13, 145, 115, 15,  3, 146, 116, 15, 0],
        [2,   74,  46, 14, 29,  75,  47, 14, 0],
        [42,  54,  24, 15,  1,  55,  25, 15, 0],
        [23,  45,  15, 15, 28,  46,  16, 15, 0],
    ],
    [ /* Version 32 */
        [17, 145, 115, 15, 0,  0,  0,  0, 0],
        [10,  74,  46, 14, 23, 75, 47, 14, 0],
        [10,  54,  24, 15, 35, 55, 25, 15, 0],
        [19,  45,  15, 15, 35, 46, 16, 15, 0],
    ],
    [ /* Version 33 */
        [17, 145, 115, 15,  1, 146, 116, 15, 0],
        [14,  74,  46, 14, 21,  75,  47, 14, 0],
        [29,  54,  24, 15, 19,  55,  25, 15, 0],
        [11,  45,  15, 15, 46,  46,  16, 15, 0],
    ],
    [ /* Version 34 */
        [13, 145, 115, 15,  6, 146, 116, 15, 0],
        [14,  74,  46, 14, 23,  75,  47, 14, 0],
        [44,  54,  24, 15,  7,  55,  25, 15, 0],
        [59,  46,  16, 15,  1,  47,  17, 15, 0],
    ],
    [ /* Version 35 */
        [12, 151, 121, 15,  7, 152, 122, 15, 0],
        [12,  75,  47, 14, 26,  76,  48, 14, 0],
        [39,  54,  24, 15, 14,  55,  25, 15, 0],
        [22,  45,  15, 15, 41,  46,  16, 15, 0],
    ],
    [ /* Version 36 */
        [6, 151, 121, 15, 14, 152, 122, 15, 0],
        [6,  75,  47, 14, 34,  76,  48, 14, 0],
        [46, 54,  24, 15, 10,  55,  25, 15, 0],
        [2,  45,  15, 15, 64,  46,  16, 15, 0],
    ],
    [ /* Version 37 */
        [17, 152, 122, 15,  4, 153, 123, 15, 0],
        [29,  74,  46, 14, 14,  75,  47, 14, 0],
        [49,  54,  24, 15, 10,  55,  25, 15, 0],
        [24,  45,  15, 15, 46,  46,  16, 15, 0],
    ],
    [ /* Version 38 */
        [4, 152, 122, 15, 18, 153, 123, 15, 0],
        [13, 74,  46, 14, 32,  75,  47, 14, 0],
        [48, 54,  24, 15, 14,  55,  25, 15, 0],
        [42, 45,  15, 15, 32,  46,  16, 15, 0],
    ],
    [ /* Version 39 */
        [20, 147, 117, 15,  4, 148, 118, 15, 0],
        [40,  75,  47, 14,  7,  76,  48, 14, 0],
        [43,  54,  24, 15, 22,  55,  25, 15, 0],
        [10,  45,  15, 15, 67,  46,  16, 15, 0],
    ],
    [ /* Version 40 */
        [19, 148, 118, 15,  6, 149, 119, 15, 0],
        [18,  75,  47, 14, 31,  76,  48, 14, 0],
        [34,  54,  24, 15, 34,  55,  25, 15, 0],
        [20,  45,  15, 15, 61,  46,  16, 15, 0],
    ],
];

/// The miscorrection-protection codeword count p, per the QR spec's rare
/// low-version cases: for very short blocks, a handful of the error
/// correction codewords are reserved for detection only (not correction)
/// to avoid misdecoding garbage as valid data.
fn get_p(version: u32, ec_level: ECCLevel) -> u32 {
    if version == 1 {
        return match ec_level {
            ECCLevel::L => 3,
            ECCLevel::M => 2,
            _ => 1,
        };
    }
    if version == 2 && ec_level == ECCLevel::L {
        return 2;
    }
    if version == 3 && ec_level == ECCLevel::L {
        return 1;
    }
    0
}

fn ec_index(ec_level: ECCLevel) -> usize {
    match ec_level {
        ECCLevel::L => 0,
        ECCLevel::M => 1,
        ECCLevel::Q => 2,
        ECCLevel::H => 3,
    }
}

/// A single de-interleaved block: its data codewords, its error correction
/// codewords, and `p`, the number of those error codewords reserved purely
/// for misdecode detection rather than correction.
#[derive(Debug, Clone)]
pub struct Block {
    pub data_codewords: Vec<u8>,
    pub error_correction_codewords: Vec<u8>,
    pub error_correction_capacity: u32,
    pub p: u32,
}

/// Splits a flat, interleaved codeword stream into its constituent blocks
/// for the given version and error correction level, per ISO/IEC 18004
/// Annex I.
pub fn get_blocks(codewords: &[u8], version: u32, ec_level: ECCLevel) -> Result<Vec<Block>> {
    if version < 1 || version > 40 {
        return Err(QrError::decode(format!("invalid version {}", version)));
    }
    let description = &BLOCK_DESCRIPTIONS[(version - 1) as usize][ec_index(ec_level)];

    struct Group {
        n_blocks: u32,
        n_data_codewords: u32,
        n_error_codewords: u32,
        error_correction_capacity: u32,
    }
    let mut groups = Vec::new();
    let mut i = 0;
    while description[i] != 0 {
        let n_blocks = description[i];
        let n_data_codewords = description[i + 2];
        let n_error_codewords = description[i + 1] - n_data_codewords;
        groups.push(Group {
            n_blocks,
            n_data_codewords,
            n_error_codewords,
            error_correction_capacity: description[i + 3],
        });
        i += 4;
    }

    let total_blocks: u32 = groups.iter().map(|g| g.n_blocks).sum();
    let total_data_codewords: u32 = groups.iter().map(|g| g.n_blocks * g.n_data_codewords).sum();
    let total_error_codewords: u32 = groups.iter().map(|g| g.n_blocks * g.n_error_codewords).sum();
    let total_codewords = total_data_codewords + total_error_codewords;

    if codewords.len() < total_codewords as usize {
        return Err(QrError::decode(format!(
            "expected {} codewords, got {}",
            total_codewords,
            codewords.len()
        )));
    }

    let p = get_p(version, ec_level);
    let mut blocks: Vec<Block> = Vec::with_capacity(total_blocks as usize);
    for g in &groups {
        for _ in 0..g.n_blocks {
            blocks.push(Block {
                data_codewords: Vec::with_capacity(g.n_data_codewords as usize),
                error_correction_codewords: Vec::with_capacity(g.n_error_codewords as usize),
                error_correction_capacity: g.error_correction_capacity,
                p,
            });
        }
    }

    let n_blocks = blocks.len();
    let mut pos = 0usize;
    let mut current = 0usize;
    while pos < total_data_codewords as usize {
        while blocks[current].data_codewords.len() == blocks[current].data_codewords.capacity() {
            current = (current + 1) % n_blocks;
        }
        blocks[current].data_codewords.push(codewords[pos]);
        pos += 1;
        current = (current + 1) % n_blocks;
    }

    current = 0;
    while pos < total_codewords as usize {
        while blocks[current].error_correction_codewords.len()
            == blocks[current].error_correction_codewords.capacity()
        {
            current = (current + 1) % n_blocks;
        }
        blocks[current].error_correction_codewords.push(codewords[pos]);
        pos += 1;
        current = (current + 1) % n_blocks;
    }

    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_1_l_is_a_single_block() {
        let codewords: Vec<u8> = (0..26).collect();
        let blocks = get_blocks(&codewords, 1, ECCLevel::L).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].data_codewords.len(), 19);
        assert_eq!(blocks[0].error_correction_codewords.len(), 7);
        assert_eq!(blocks[0].p, 3);
    }

    #[test]
    fn version_5_h_interleaves_two_groups_of_two_blocks() {
        let codewords: Vec<u8> = (0..134).collect();
        let blocks = get_blocks(&codewords, 5, ECCLevel::H).unwrap();
        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[0].data_codewords.len(), 11);
        assert_eq!(blocks[1].data_codewords.len(), 11);
        assert_eq!(blocks[2].data_codewords.len(), 12);
        assert_eq!(blocks[3].data_codewords.len(), 12);
        // Interleaving: data codewords read round robin, so block 0's first
        // data codeword is codewords[0], block 1's is codewords[1], etc.
        assert_eq!(blocks[0].data_codewords[0], 0);
        assert_eq!(blocks[1].data_codewords[0], 1);
        assert_eq!(blocks[2].data_codewords[0], 2);
        assert_eq!(blocks[3].data_codewords[0], 3);
        assert_eq!(blocks[0].error_correction_codewords.len(), 22);
    }

    #[test]
    fn rejects_out_of_range_version() {
        assert!(get_blocks(&[], 0, ECCLevel::L).is_err());
        assert!(get_blocks(&[], 41, ECCLevel::L).is_err());
    }

    #[test]
    fn rejects_too_few_codewords() {
        assert!(get_blocks(&[0u8; 10], 1, ECCLevel::L).is_err());
    }
}
