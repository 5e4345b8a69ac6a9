//! Adaptive binarisation: turns an RGB image into a `BitMatrix` using
//! block-local luminance thresholds, following the same scheme as zxing's
//! `HybridBinarizer`.

use image::RgbImage;
use log::trace;

use crate::bitmatrix::BitMatrix;

const BLOCK_SIZE: u32 = 8;
const MIN_DYNAMIC_RANGE: i32 = 24;

fn luminance(r: u8, g: u8, b: u8) -> u8 {
    // The human eye perceives green roughly twice as strongly as red/blue
    // when it comes to brightness.
    (((r as u32) + 2 * (g as u32) + (b as u32)) >> 2) as u8
}

fn calculate_luminances(img: &RgbImage) -> Vec<u8> {
    img.pixels().map(|p| luminance(p[0], p[1], p[2])).collect()
}

fn cap(value: i32, max: i32) -> i32 {
    if value < 2 {
        2
    } else if value < max {
        value
    } else {
        max
    }
}

fn calculate_black_points(luminances: &[u8], sub_width: u32, sub_height: u32, width: u32, height: u32) -> Vec<u8> {
    let mut black_points = vec![0u8; (sub_width * sub_height) as usize];

    for y in 0..sub_height {
        for x in 0..sub_width {
            let max_x = ((x + 1) * BLOCK_SIZE).min(width);
            let max_y = ((y + 1) * BLOCK_SIZE).min(height);

            let mut sum: u32 = 0;
            let mut min: i32 = 0xFF;
            let mut max: i32 = 0;
            let mut n: u32 = 0;

            for yy in (y * BLOCK_SIZE)..max_y {
                for xx in (x * BLOCK_SIZE)..max_x {
                    let pixel = luminances[(yy * width + xx) as usize] as i32;
                    sum += pixel as u32;
                    n += 1;
                    if pixel < min {
                        min = pixel;
                    }
                    if pixel > max {
                        max = pixel;
                    }
                }
            }

            let mut average = (sum / n) as i32;
            if (max - min) <= MIN_DYNAMIC_RANGE {
                average = min / 2;
                if y > 0 && x > 0 {
                    let n_above = black_points[((y - 1) * sub_width + x) as usize] as i32;
                    let w_left = black_points[(y * sub_width + x - 1) as usize] as i32;
                    let nw = black_points[((y - 1) * sub_width + x - 1) as usize] as i32;
                    let average_neighbor_black_point = (n_above + 2 * w_left + nw) / 4;
                    if min < average_neighbor_black_point {
                        average = average_neighbor_black_point;
                    }
                }
            }

            black_points[(y * sub_width + x) as usize] = average as u8;
        }
    }

    black_points
}

fn threshold_block(luminances: &[u8], x: u32, y: u32, threshold: u8, width: u32, height: u32, bm: &mut BitMatrix) {
    let max_x = (x + BLOCK_SIZE).min(width);
    let max_y = (y + BLOCK_SIZE).min(height);
    for yy in y..max_y {
        for xx in x..max_x {
            if luminances[(yy * width + xx) as usize] <= threshold {
                bm.set_black(xx as usize, yy as usize);
            }
        }
    }
}

fn calculate_threshold_for_blocks(
    luminances: &[u8],
    sub_width: u32,
    sub_height: u32,
    width: u32,
    height: u32,
    black_points: &[u8],
    bm: &mut BitMatrix,
) {
    let max_y_offset = height.saturating_sub(BLOCK_SIZE);
    let max_x_offset = width.saturating_sub(BLOCK_SIZE);

    for y in 0..sub_height {
        let yoffset = (y * BLOCK_SIZE).min(max_y_offset);
        let top = cap(y as i32, sub_height as i32 - 3) as u32;
        for x in 0..sub_width {
            let xoffset = (x * BLOCK_SIZE).min(max_x_offset);
            let left = cap(x as i32, sub_width as i32 - 3) as u32;

            let mut sum: u32 = 0;
            for z in -2i32..=2 {
                let row_index = (top as i32 + z) as u32;
                let black_row = &black_points[(row_index * sub_width) as usize..];
                for dx in -2i32..=2 {
                    sum += black_row[(left as i32 + dx) as usize] as u32;
                }
            }
            let average = (sum / 25) as u8;
            threshold_block(luminances, xoffset, yoffset, average, width, height, bm);
        }
    }
}

/// Binarises an RGB image the way zxing's HybridBinarizer does: block-local
/// thresholds smoothed over a 5x5 window of neighbouring blocks.
pub fn binarize(img: &RgbImage) -> BitMatrix {
    let (width, height) = img.dimensions();
    let luminances = calculate_luminances(img);

    let mut sub_width = width / BLOCK_SIZE;
    if width % BLOCK_SIZE != 0 {
        sub_width += 1;
    }
    let mut sub_height = height / BLOCK_SIZE;
    if height % BLOCK_SIZE != 0 {
        sub_height += 1;
    }

    let black_points = calculate_black_points(&luminances, sub_width, sub_height, width, height);

    let mut bm = BitMatrix::new(width as usize, height as usize);
    calculate_threshold_for_blocks(&luminances, sub_width, sub_height, width, height, &black_points, &mut bm);
    trace!("binarized {}x{} image into {}x{} blocks", width, height, sub_width, sub_height);
    bm
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn all_white_image_binarizes_to_all_white_matrix() {
        let img = RgbImage::from_pixel(16, 16, Rgb([255, 255, 255]));
        let bm = binarize(&img);
        for y in 0..16 {
            for x in 0..16 {
                assert!(!bm.is_black(x, y));
            }
        }
    }

    #[test]
    fn all_black_image_binarizes_to_all_black_matrix() {
        let img = RgbImage::from_pixel(16, 16, Rgb([0, 0, 0]));
        let bm = binarize(&img);
        for y in 0..16 {
            for x in 0..16 {
                assert!(bm.is_black(x, y));
            }
        }
    }

    #[test]
    fn high_contrast_half_splits_into_black_and_white() {
        let mut img = RgbImage::from_pixel(16, 16, Rgb([255, 255, 255]));
        for y in 0..16 {
            for x in 0..8 {
                img.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }
        let bm = binarize(&img);
        assert!(bm.is_black(0, 0));
        assert!(!bm.is_black(15, 0));
    }
}
