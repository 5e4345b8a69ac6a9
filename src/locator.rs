//! Locates QR symbols in a binarized image: groups finder-pattern triples
//! into candidate symbols, refines the fourth corner against the alignment
//! pattern when one exists, and samples the module grid with a projective
//! transform (the same square-to-quadrilateral construction zxing's
//! `PerspectiveTransform` uses).

use crate::bitmatrix::BitMatrix;
use crate::codeword_mask;
use crate::error::{QrError, Result};
use crate::finder::{self, Candidate, PatternKind, Region};
use crate::format::{self, FormatInfo};
use crate::grouper::{self, Group};

/// A located, sampled QR symbol: its module grid plus the geometry it was
/// read from, for callers that want to report back to the original image.
#[derive(Debug, Clone)]
pub struct LocatedSymbol {
    pub version: u32,
    pub format: FormatInfo,
    pub modules: BitMatrix,
    pub top_left: (f32, f32),
    pub top_right: (f32, f32),
    pub bottom_left: (f32, f32),
    pub bottom_right: (f32, f32),
}

/// A 2-D projective mapping from the rectangle `[0, 1] x [0, 1]` onto an
/// arbitrary image-space quadrilateral, built from its four corners in
/// (top-left, top-right, bottom-right, bottom-left) order.
struct PerspectiveTransform {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    g: f32,
    h: f32,
}

impl PerspectiveTransform {
    fn new(p0: (f32, f32), p1: (f32, f32), p2: (f32, f32), p3: (f32, f32)) -> PerspectiveTransform {
        let dx3 = p0.0 - p1.0 + p2.0 - p3.0;
        let dy3 = p0.1 - p1.1 + p2.1 - p3.1;

        if dx3 == 0.0 && dy3 == 0.0 {
            PerspectiveTransform {
                a: p1.0 - p0.0,
                b: p2.0 - p1.0,
                c: p0.0,
                d: p1.1 - p0.1,
                e: p2.1 - p1.1,
                f: p0.1,
                g: 0.0,
                h: 0.0,
            }
        } else {
            let dx1 = p1.0 - p2.0;
            let dx2 = p3.0 - p2.0;
            let dy1 = p1.1 - p2.1;
            let dy2 = p3.1 - p2.1;
            let denom = dx1 * dy2 - dx2 * dy1;
            let g = (dx3 * dy2 - dx2 * dy3) / denom;
            let h = (dx1 * dy3 - dx3 * dy1) / denom;
            PerspectiveTransform {
                a: p1.0 - p0.0 + g * p1.0,
                b: p3.0 - p0.0 + h * p3.0,
                c: p0.0,
                d: p1.1 - p0.1 + g * p1.1,
                e: p3.1 - p0.1 + h * p3.1,
                f: p0.1,
                g,
                h,
            }
        }
    }

    fn transform(&self, u: f32, v: f32) -> (f32, f32) {
        let denom = self.g * u + self.h * v + 1.0;
        let x = (self.a * u + self.b * v + self.c) / denom;
        let y = (self.d * u + self.e * v + self.f) / denom;
        (x, y)
    }
}

fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

/// Snaps a raw module-count estimate to the nearest valid QR dimension
/// (17 + 4*version, version 1..=40), accepting it only if it is within one
/// module of that dimension. A raw estimate exactly 2 modules off (equally
/// close to the dimension above and below) is ambiguous and rejected.
fn round_dimension(raw: i32) -> Option<i32> {
    let rem = (raw - 17).rem_euclid(4);
    let snapped = match rem {
        0 => raw,
        1 => raw - 1,
        3 => raw + 1,
        _ => return None,
    };
    if snapped < 21 || snapped > 177 {
        return None;
    }
    Some(snapped)
}

/// Looks for an alignment-pattern candidate near `estimate`, within a
/// window scaled to the module size, and returns the best match (largest
/// aggregated hit count) if any.
fn refine_bottom_right(bm: &BitMatrix, estimate: (f32, f32), module_size: f32) -> Option<Candidate> {
    let radius = (module_size * 4.0).max(8.0);
    let x0 = (estimate.0 - radius).floor().max(0.0) as i32;
    let y0 = (estimate.1 - radius).floor().max(0.0) as i32;
    let x1 = (estimate.0 + radius).ceil().min(bm.width() as f32) as i32;
    let y1 = (estimate.1 + radius).ceil().min(bm.height() as f32) as i32;
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    let region = Region { x0, y0, x1, y1 };
    let candidates = finder::find_potential_centers(bm, PatternKind::Alignment, region);
    candidates
        .into_iter()
        .min_by(|a, b| {
            distance((a.x, a.y), estimate)
                .partial_cmp(&distance((b.x, b.y), estimate))
                .unwrap()
        })
}

/// Samples the `dimension` x `dimension` module grid for one located group,
/// then decodes its format/version information.
fn sample_symbol(bm: &BitMatrix, group: &Group) -> Result<LocatedSymbol> {
    let top_left = (group.top_left.x, group.top_left.y);
    let top_right = (group.top_right.x, group.top_right.y);
    let bottom_left = (group.bottom_left.x, group.bottom_left.y);

    let module_size = (group.top_left.module_size + group.top_right.module_size + group.bottom_left.module_size) / 3.0;
    if module_size <= 0.0 {
        return Err(QrError::decode("degenerate module size while sampling symbol"));
    }

    let modules_tl_tr = (distance(top_left, top_right) / module_size).round() as i32;
    let modules_tl_bl = (distance(top_left, bottom_left) / module_size).round() as i32;
    let dimension = round_dimension((modules_tl_tr + modules_tl_bl) / 2 + 7)
        .ok_or_else(|| QrError::decode("estimated dimension is ambiguous or out of range"))?;

    let estimate = (top_right.0 + bottom_left.0 - top_left.0, top_right.1 + bottom_left.1 - top_left.1);
    let bottom_right = if dimension >= 25 {
        refine_bottom_right(bm, estimate, module_size).map(|c| (c.x, c.y)).unwrap_or(estimate)
    } else {
        estimate
    };

    let transform = PerspectiveTransform::new(top_left, top_right, bottom_right, bottom_left);

    let mut modules = BitMatrix::new(dimension as usize, dimension as usize);
    let span = (dimension - 7) as f32;
    for i in 0..dimension {
        for j in 0..dimension {
            // Module index 3 is the finder centre itself (u,v = 0); there
            // is no half-module offset, unlike a quiet-zone-relative pixel
            // coordinate.
            let u = (j as f32 - 3.0) / span;
            let v = (i as f32 - 3.0) / span;
            let (px, py) = transform.transform(u, v);
            let x = px.round();
            let y = py.round();
            // Modules sampled off the edge of the source image (a QR code
            // photographed flush against the frame border) read as white
            // rather than aborting the whole symbol.
            if x < 0.0 || y < 0.0 || x >= bm.width() as f32 || y >= bm.height() as f32 {
                continue;
            }
            if bm.is_black(x as usize, y as usize) {
                modules.set_black(j as usize, i as usize);
            }
        }
    }

    let detected_version = format::decode_version(&modules)?;
    if codeword_mask::dimension(detected_version) != dimension as usize {
        return Err(QrError::decode("version information disagrees with the sampled dimension"));
    }
    let info = format::decode_format(&modules)?;

    // The reported geometry is the symbol's physical grid corners (module
    // (0,0)..(dim-1,dim-1)), not the finder-pattern centres used to build
    // the transform: those sit three modules further out, at u/v = -3/span
    // and (dim-4)/span.
    let near = -3.0 / span;
    let far = (dimension - 4) as f32 / span;
    let grid_top_left = transform.transform(near, near);
    let grid_top_right = transform.transform(far, near);
    let grid_bottom_left = transform.transform(near, far);
    let grid_bottom_right = transform.transform(far, far);

    Ok(LocatedSymbol {
        version: detected_version,
        format: info,
        modules,
        top_left: grid_top_left,
        top_right: grid_top_right,
        bottom_left: grid_bottom_left,
        bottom_right: grid_bottom_right,
    })
}

/// Finds and samples every plausible QR symbol in a binarized image.
/// Groups that fail geometry validation, out-of-bounds sampling, or
/// format/version decoding are silently skipped rather than aborting the
/// whole scan: one bad candidate shouldn't hide the others.
pub fn locate_symbols(bm: &BitMatrix) -> Vec<LocatedSymbol> {
    let region = Region::whole(bm);
    let candidates = finder::find_potential_centers(bm, PatternKind::Finder, region);
    let groups = grouper::find_groups(&candidates);

    groups.iter().filter_map(|g| sample_symbol(bm, g).ok()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finder::Candidate;

    fn candidate(x: f32, y: f32, module_size: f32) -> Candidate {
        Candidate { x, y, module_size, count: 3 }
    }

    #[test]
    fn perspective_transform_is_identity_for_axis_aligned_unit_square() {
        let t = PerspectiveTransform::new((0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0));
        let (x, y) = t.transform(0.5, 0.5);
        assert!((x - 5.0).abs() < 1e-3);
        assert!((y - 5.0).abs() < 1e-3);
    }

    #[test]
    fn round_dimension_snaps_to_valid_sizes() {
        assert_eq!(round_dimension(21), Some(21));
        assert_eq!(round_dimension(22), Some(21));
        assert_eq!(round_dimension(24), Some(25));
    }

    #[test]
    fn round_dimension_rejects_the_ambiguous_midpoint() {
        assert_eq!(round_dimension(23), None);
    }

    #[test]
    fn no_finder_candidates_yields_no_symbols() {
        let bm = BitMatrix::new(32, 32);
        assert!(locate_symbols(&bm).is_empty());
    }

    #[test]
    fn degenerate_module_size_is_rejected_rather_than_panicking() {
        let bm = BitMatrix::new(64, 64);
        let group = Group {
            bottom_left: candidate(10.0, 50.0, 0.0),
            top_left: candidate(10.0, 10.0, 0.0),
            top_right: candidate(50.0, 10.0, 0.0),
        };
        assert!(sample_symbol(&bm, &group).is_err());
    }
}
