//! Builds the set of "function modules" for a given QR version: finder
//! patterns and their separators, timing patterns, alignment patterns,
//! the format/version information areas and the fixed dark module. Every
//! other module position carries codeword/mask data and is visited during
//! the canonical snake traversal in `codewords.rs`.

use crate::tables::{get_alignment_pattern_points, FORMAT_INFO_COORDS_QR_MAIN, FORMAT_INFO_COORDS_QR_SIDE, VERSION_INFO_COORDS_BL, VERSION_INFO_COORDS_TR};

/// The module dimension (width == height) of a standard QR symbol of the
/// given version, not including any quiet zone.
pub fn dimension(version: u32) -> usize {
    (17 + 4 * version) as usize
}

pub struct FunctionModuleMask {
    dimension: usize,
    reserved: Vec<bool>,
}

impl FunctionModuleMask {
    pub fn is_function_module(&self, x: usize, y: usize) -> bool {
        self.reserved[y * self.dimension + x]
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn mark(&mut self, x: i32, y: i32) {
        if x >= 0 && y >= 0 && (x as usize) < self.dimension && (y as usize) < self.dimension {
            self.reserved[y as usize * self.dimension + x as usize] = true;
        }
    }

    fn mark_block(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        for y in y0..y1 {
            for x in x0..x1 {
                self.mark(x, y);
            }
        }
    }
}

/// Resolves a table-relative coordinate offset (negative meaning "from the
/// far edge") into an absolute module index for a symbol of side `dim`.
pub fn resolve(off: i16, dim: i32) -> i32 {
    if off < 0 {
        off as i32 + dim
    } else {
        off as i32
    }
}

/// Builds the function-module mask for the given QR version.
pub fn build(version: u32) -> FunctionModuleMask {
    let dim = dimension(version);
    let mut m = FunctionModuleMask { dimension: dim, reserved: vec![false; dim * dim] };
    let d = dim as i32;

    // Finder patterns + separators, each occupying an 8x8 corner block.
    m.mark_block(0, 0, 8, 8);
    m.mark_block(d - 8, 0, d, 8);
    m.mark_block(0, d - 8, 8, d);

    // Timing patterns, between the finder pattern separators.
    for i in 8..(d - 8) {
        m.mark(6, i);
        m.mark(i, 6);
    }

    // Alignment patterns.
    if version >= 2 {
        for (cx, cy) in get_alignment_pattern_points(version as u8) {
            m.mark_block(cx - 2, cy - 2, cx + 3, cy + 3);
        }
    }

    // Format information strips (main + side copies) and the fixed dark
    // module, which sits right next to them.
    for &(xoff, yoff) in FORMAT_INFO_COORDS_QR_MAIN.iter() {
        m.mark(resolve(xoff, d), resolve(yoff, d));
    }
    for &(xoff, yoff) in FORMAT_INFO_COORDS_QR_SIDE.iter() {
        m.mark(resolve(xoff, d), resolve(yoff, d));
    }
    m.mark(8, 9 + 4 * d_version(version));

    // Version information blocks, only present from version 7 onward.
    if version >= 7 {
        for &(xoff, yoff) in VERSION_INFO_COORDS_BL.iter() {
            m.mark(resolve(xoff, d), resolve(yoff, d));
        }
        for &(xoff, yoff) in VERSION_INFO_COORDS_TR.iter() {
            m.mark(resolve(xoff, d), resolve(yoff, d));
        }
    }

    m
}

fn d_version(version: u32) -> i32 {
    version as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_1_has_the_expected_dimension() {
        assert_eq!(dimension(1), 21);
        assert_eq!(dimension(40), 177);
    }

    #[test]
    fn finder_pattern_corners_are_function_modules() {
        let mask = build(1);
        assert!(mask.is_function_module(0, 0));
        assert!(mask.is_function_module(7, 7));
        assert!(mask.is_function_module(20, 0));
        assert!(mask.is_function_module(0, 20));
    }

    #[test]
    fn center_of_small_symbol_is_data() {
        let mask = build(1);
        assert!(!mask.is_function_module(10, 10));
    }

    #[test]
    fn version_2_alignment_pattern_is_marked() {
        let mask = build(2);
        // version 2's single alignment pattern is centred at (18, 18).
        assert!(mask.is_function_module(18, 18));
    }

    #[test]
    fn version_7_has_version_info_blocks() {
        let mask = build(7);
        assert!(mask.is_function_module(5, 0));
        assert!(mask.is_function_module(0, 5));
    }
}
