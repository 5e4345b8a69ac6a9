//! Lookup tables shared by the locator, format/version decoders and the
//! codeword-mask builder: alignment pattern centre coordinates (Annex E,
//! table E.1), the format/version information bit tables and their
//! positions in the symbol (Annex C/D), all ported from the values used
//! to build QR symbols in the encoder direction of this crate.

/// Row of Annex E table E.1: the coordinates (both horizontally and
/// vertically) at which alignment pattern centres may fall for a given
/// version.
pub fn create_alignment_pattern_coord_list(version: u8) -> Vec<i32> {
    let mut row = Vec::new();
    row.push(6);
    if version >= 2 && version < 7 {
        row.push((version as i32 - 2) * 4 + 18);
    } else if version >= 7 && version < 14 {
        row.push((version as i32 - 7) * 2 + 22);
        row.push((version as i32 - 7) * 4 + 38);
    } else if version >= 14 && version < 21 {
        let a = ((version as i32 - 14) / 3) * 4 + 26;
        let b = (version as i32 - 14) * 4 + 66;
        row.push(a);
        row.push((a + b) / 2);
        row.push(b);
    } else if version >= 21 && version < 28 {
        let b = ((version as i32 - 21) / 2) * 4 + 50;
        let d = (version as i32 - 21) * 4 + 94;
        row.push(match version {
            21 => 28,
            22 => 26,
            23 => 30,
            24 => 28,
            25 => 32,
            26 => 30,
            27 => 34,
            _ => unreachable!(),
        });
        row.push(b);
        row.push((b + d) / 2);
        row.push(d);
    } else if version >= 28 && version < 35 {
        row.extend_from_slice(match version {
            28 => &[26, 50, 74, 98, 122][..],
            29 => &[30, 54, 78, 102, 126],
            30 => &[26, 52, 78, 104, 130],
            31 => &[30, 56, 82, 108, 134],
            32 => &[34, 60, 86, 112, 138],
            33 => &[30, 58, 86, 114, 142],
            34 => &[34, 62, 90, 118, 146],
            _ => unreachable!(),
        });
    } else if version >= 35 && version <= 40 {
        row.extend_from_slice(match version {
            35 => &[30, 54, 78, 102, 126, 150][..],
            36 => &[24, 50, 76, 102, 128, 154],
            37 => &[28, 54, 80, 106, 132, 158],
            38 => &[32, 58, 84, 110, 136, 162],
            39 => &[26, 54, 82, 110, 138, 166],
            40 => &[30, 58, 86, 114, 142, 170],
            _ => unreachable!(),
        });
    }
    row
}

/// All alignment pattern centre points for a version, excluding the three
/// that would overlap a finder pattern.
pub fn get_alignment_pattern_points(version: u8) -> Vec<(i32, i32)> {
    let coords = create_alignment_pattern_coord_list(version);
    let last = coords.len() - 1;
    let mut points = Vec::new();
    for (i, &s) in coords.iter().enumerate() {
        for (j, &t) in coords.iter().enumerate() {
            if (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0) {
                continue;
            }
            points.push((s, t));
        }
    }
    points
}

/// Table C.1: the 32 possible 15-bit format information words, indexed by
/// the 5-bit (ecc-level, mask-pattern) data value.
pub const FORMAT_INFOS_QR: [u16; 32] = [
    0x5412, 0x5125, 0x5e7c, 0x5b4b, 0x45f9, 0x40ce, 0x4f97, 0x4aa0, 0x77c4, 0x72f3, 0x7daa, 0x789d, 0x662f, 0x6318,
    0x6c41, 0x6976, 0x1689, 0x13be, 0x1ce7, 0x19d0, 0x0762, 0x0255, 0x0d0c, 0x083b, 0x355f, 0x3068, 0x3f31, 0x3a06,
    0x24b4, 0x2183, 0x2eda, 0x2bed,
];

/// Table D.1: the 34 possible 18-bit version information words, indexed by
/// version - 7 (only versions 7-40 carry version information).
pub const VERSION_INFOS: [u32; 34] = [
    0x07c94, 0x085bc, 0x09a99, 0x0a4d3, 0x0bbf6, 0x0c762, 0x0d847, 0x0e60d, 0x0f928, 0x10b78, 0x1145d, 0x12a17,
    0x13532, 0x149a6, 0x15683, 0x168c9, 0x177ec, 0x18ec4, 0x191e1, 0x1afab, 0x1b08e, 0x1cc1a, 0x1d33f, 0x1ed75,
    0x1f250, 0x209d5, 0x216f0, 0x228ba, 0x2379f, 0x24b0b, 0x2542e, 0x26a64, 0x27541, 0x28c69,
];

// Coordinates (module-relative, negative meaning "from the far edge") at
// which format/version bits are written or read. Unlike the encode-side
// canvas these are never offset by a quiet zone: a sampled module matrix
// spans exactly [0, dimension) with no border.
pub const VERSION_INFO_COORDS_BL: [(i16, i16); 18] = [
    (5, -9), (5, -10), (5, -11),
    (4, -9), (4, -10), (4, -11),
    (3, -9), (3, -10), (3, -11),
    (2, -9), (2, -10), (2, -11),
    (1, -9), (1, -10), (1, -11),
    (0, -9), (0, -10), (0, -11),
];

pub const VERSION_INFO_COORDS_TR: [(i16, i16); 18] = [
    (-9, 5), (-10, 5), (-11, 5),
    (-9, 4), (-10, 4), (-11, 4),
    (-9, 3), (-10, 3), (-11, 3),
    (-9, 2), (-10, 2), (-11, 2),
    (-9, 1), (-10, 1), (-11, 1),
    (-9, 0), (-10, 0), (-11, 0),
];

pub const FORMAT_INFO_COORDS_QR_MAIN: [(i16, i16); 15] = [
    (0, 8), (1, 8), (2, 8), (3, 8), (4, 8), (5, 8), (7, 8), (8, 8),
    (8, 7), (8, 5), (8, 4), (8, 3), (8, 2), (8, 1), (8, 0),
];

pub const FORMAT_INFO_COORDS_QR_SIDE: [(i16, i16); 15] = [
    (8, -1), (8, -2), (8, -3), (8, -4), (8, -5), (8, -6), (8, -7), (-8, 8),
    (-7, 8), (-6, 8), (-5, 8), (-4, 8), (-3, 8), (-2, 8), (-1, 8),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_e1_matches_the_standard() {
        assert_eq!(create_alignment_pattern_coord_list(3), [6, 22]);
        assert_eq!(create_alignment_pattern_coord_list(10), [6, 28, 50]);
        assert_eq!(create_alignment_pattern_coord_list(15), [6, 26, 48, 70]);
        assert_eq!(create_alignment_pattern_coord_list(20), [6, 34, 62, 90]);
        assert_eq!(create_alignment_pattern_coord_list(27), [6, 34, 62, 90, 118]);
        assert_eq!(create_alignment_pattern_coord_list(33), [6, 30, 58, 86, 114, 142]);
        assert_eq!(create_alignment_pattern_coord_list(40), [6, 30, 58, 86, 114, 142, 170]);
    }

    #[test]
    fn version_2_has_a_single_alignment_point() {
        assert_eq!(get_alignment_pattern_points(2), vec![(18, 18)]);
    }
}
