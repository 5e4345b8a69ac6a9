//! The small set of enums shared across the decode pipeline and exported
//! as part of this crate's public API.

/// Error-correction level, as recovered from a symbol's format information.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Debug)]
pub enum ECCLevel {
    L, // allows recovery of ~7% of the data
    M, // allows recovery of ~15% of the data
    Q, // allows recovery of ~25% of the data
    H, // allows recovery of ~30% of the data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ecc_levels_are_distinct() {
        assert_ne!(ECCLevel::L, ECCLevel::M);
        assert_ne!(ECCLevel::Q, ECCLevel::H);
    }
}
