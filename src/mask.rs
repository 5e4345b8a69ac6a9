//! The eight data-masking predicates (ISO/IEC 18004 table 10). `i` is the
//! module row, `j` the module column, both 0-indexed from the top-left of
//! the symbol (no quiet zone offset, unlike the encode-direction canvas).

/// Evaluates mask pattern `pattern` at module (i, j). Panics on an invalid
/// pattern id (0..=7): a bad mask id only ever comes from the format
/// decoder, which has already validated it against the 3-bit field, so an
/// out-of-range value here is a caller bug.
pub fn applies(pattern: u8, i: usize, j: usize) -> bool {
    match pattern {
        0 => (i + j) % 2 == 0,
        1 => i % 2 == 0,
        2 => j % 3 == 0,
        3 => (i + j) % 3 == 0,
        4 => (i / 2 + j / 3) % 2 == 0,
        5 => (i * j) % 2 + (i * j) % 3 == 0,
        6 => ((i * j) % 2 + (i * j) % 3) % 2 == 0,
        7 => ((i * j) % 3 + i + j) % 2 == 0,
        _ => panic!("invalid mask pattern id {}", pattern),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_0_is_the_checkerboard() {
        assert!(applies(0, 0, 0));
        assert!(!applies(0, 0, 1));
        assert!(applies(0, 1, 1));
    }

    #[test]
    fn pattern_1_depends_only_on_row() {
        assert!(applies(1, 0, 5));
        assert!(!applies(1, 1, 5));
    }

    #[test]
    #[should_panic]
    fn invalid_pattern_panics() {
        applies(8, 0, 0);
    }
}
