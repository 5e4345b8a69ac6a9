//! Composes every stage into the two entry points callers actually use:
//! `find_qr_codes`, which walks from a decoded RGB image all the way to
//! decoded messages, and `find_qr_code`, which starts from an
//! already-sampled module grid for callers (and tests) that don't need the
//! image-analysis half of the pipeline.

use image::RgbImage;
use log::{debug, warn};

use crate::binarizer;
use crate::blocks;
use crate::codeword_mask;
use crate::codewords;
use crate::config::ECCLevel;
use crate::error::Result;
use crate::locator::{self, LocatedSymbol};
use crate::rscoding;
use crate::segments;

/// One successfully decoded QR symbol: its payload and the geometry it was
/// read from, for a caller that wants to draw an overlay back onto the
/// source image.
#[derive(Debug, Clone)]
pub struct Match {
    pub message: Vec<u8>,
    pub ec_level: ECCLevel,
    pub version: u32,
    pub corrections: usize,
    pub top_left: (f32, f32),
    pub top_right: (f32, f32),
    pub bottom_left: (f32, f32),
    pub bottom_right: (f32, f32),
}

/// Runs §4.5 onward (locate, sample, correct, decode) against an
/// already-binarized module grid that was located as `symbol`.
fn decode_symbol(symbol: LocatedSymbol) -> Result<Match> {
    let function_mask = codeword_mask::build(symbol.version);
    let raw_codewords = codewords::extract(&symbol.modules, &function_mask, symbol.format.mask_pattern);

    let mut blocks = blocks::get_blocks(&raw_codewords, symbol.version, symbol.format.ec_level)?;
    let mut corrections = 0;
    for block in &mut blocks {
        corrections += rscoding::correct_block(block)?;
    }
    let message_codewords: Vec<u8> = blocks.iter().flat_map(|b| b.data_codewords.iter().copied()).collect();

    let message = segments::decode(&message_codewords, symbol.version)?;

    debug!(
        "decoded version {} symbol, ec_level {:?}, {} corrections, {} bytes",
        symbol.version,
        symbol.format.ec_level,
        corrections,
        message.len()
    );

    Ok(Match {
        message,
        ec_level: symbol.format.ec_level,
        version: symbol.version,
        corrections,
        top_left: symbol.top_left,
        top_right: symbol.top_right,
        bottom_left: symbol.bottom_left,
        bottom_right: symbol.bottom_right,
    })
}

/// Locates and decodes every QR symbol reachable from an already-sampled
/// bit matrix (binarized image, or a directly-constructed module grid via
/// `bitmatrix::BitMatrix`). Candidates that fail geometry, correction or
/// segment decoding are skipped rather than aborting the whole scan.
pub fn find_qr_code(bm: &crate::bitmatrix::BitMatrix) -> Vec<Match> {
    locator::locate_symbols(bm)
        .into_iter()
        .filter_map(|symbol| match decode_symbol(symbol) {
            Ok(m) => Some(m),
            Err(e) => {
                warn!("skipping candidate: {}", e);
                None
            }
        })
        .collect()
}

/// Binarizes `img` and runs the full pipeline over it.
pub fn find_qr_codes(img: &RgbImage) -> Vec<Match> {
    let bm = binarizer::binarize(img);
    find_qr_code(&bm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmatrix::BitMatrix;

    #[test]
    fn empty_image_yields_no_matches() {
        let img = RgbImage::from_pixel(32, 32, image::Rgb([255, 255, 255]));
        assert!(find_qr_codes(&img).is_empty());
    }

    #[test]
    fn all_white_matrix_yields_no_matches() {
        let bm = BitMatrix::new(8, 8);
        assert!(find_qr_code(&bm).is_empty());
    }
}
