//! Locates finder-pattern (1:1:3:1:1) or alignment-pattern (1:1:1:1:1)
//! candidate centres in a `BitMatrix` by scanning runs of black/white
//! pixels and cross-checking perpendicular to the scan direction.

use crate::bitmatrix::BitMatrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    Finder,
    Alignment,
}

#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub x: f32,
    pub y: f32,
    pub module_size: f32,
    pub count: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct Region {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Region {
    pub fn whole(bm: &BitMatrix) -> Region {
        Region { x0: 0, y0: 0, x1: bm.width() as i32, y1: bm.height() as i32 }
    }

    fn contains_x(&self, x: i32) -> bool {
        x >= self.x0 && x < self.x1
    }

    fn contains_y(&self, y: i32) -> bool {
        y >= self.y0 && y < self.y1
    }
}

/// A sliding run-length scan over a 1-D line of `len` pixels. Returns, for
/// every time the fifth black run closes (at a white pixel, or at the end
/// of the line), the five run counts and the position that closed them.
fn scan_runs(len: i32, is_black: impl Fn(i32) -> bool) -> Vec<([u32; 5], i32)> {
    let mut results = Vec::new();
    let mut counts = [0u32; 5];
    let mut state: usize = 0;

    for pos in 0..len {
        let black = is_black(pos);
        if state % 2 == 0 {
            if black {
                counts[state] += 1;
            } else if state == 4 {
                results.push((counts, pos));
                counts[0] = counts[2];
                counts[1] = counts[3];
                counts[2] = counts[4];
                counts[3] = 1;
                counts[4] = 0;
                state = 3;
            } else {
                state += 1;
                counts[state] = 1;
            }
        } else if !black {
            counts[state] += 1;
        } else {
            state += 1;
            counts[state] = 1;
        }
    }
    if state == 4 {
        results.push((counts, len));
    }
    results
}

fn ratio_ok(count: u32, total: u32, numer: u32, denom: u32) -> bool {
    let target = (numer as f32 * total as f32) / denom as f32;
    (count as f32 - target).abs() <= 0.5 * target
}

fn proper_ratios(counts: &[u32; 5], kind: PatternKind) -> Option<u32> {
    let total: u32 = counts.iter().sum();
    if counts.iter().any(|&c| c == 0) || total < 7 {
        return None;
    }
    for &c in &[counts[0], counts[1], counts[3], counts[4]] {
        if !ratio_ok(c, total, 1, 7) {
            return None;
        }
    }
    let central_ok = match kind {
        PatternKind::Finder => ratio_ok(counts[2], total, 3, 7),
        PatternKind::Alignment => ratio_ok(counts[2], total, 1, 5),
    };
    if !central_ok {
        return None;
    }
    Some(total)
}

fn get_center(counts: &[u32; 5], end: i32) -> f32 {
    end as f32 - counts[4] as f32 - counts[3] as f32 - counts[2] as f32 / 2.0
}

/// Scans outward from `center` (assumed black) along a 1-D accessor, in
/// both directions, building the five run counts centred there. Aborts
/// (returns `None`) as soon as a non-central run exceeds `max_count`,
/// mirroring the fast-reject used while cross-checking a candidate.
fn cross_check(is_black: impl Fn(i32) -> Option<bool>, center: i32, max_count: u32) -> Option<([u32; 5], i32)> {
    let mut counts = [0u32; 5];
    counts[2] = 1;

    let mut i = center - 1;
    while let Some(true) = is_black(i) {
        counts[2] += 1;
        i -= 1;
    }
    while let Some(false) = is_black(i) {
        counts[1] += 1;
        i -= 1;
        if counts[1] > max_count {
            return None;
        }
    }
    while let Some(true) = is_black(i) {
        counts[0] += 1;
        i -= 1;
        if counts[0] > max_count {
            return None;
        }
    }

    let mut j = center + 1;
    while let Some(true) = is_black(j) {
        counts[2] += 1;
        j += 1;
    }
    while let Some(false) = is_black(j) {
        counts[3] += 1;
        j += 1;
        if counts[3] > max_count {
            return None;
        }
    }
    while let Some(true) = is_black(j) {
        counts[4] += 1;
        j += 1;
        if counts[4] > max_count {
            return None;
        }
    }

    if counts.iter().any(|&c| c == 0) {
        return None;
    }
    Some((counts, j))
}

fn check_vertically(bm: &BitMatrix, region: Region, x: i32, y: i32, max_per_module: u32, kind: PatternKind) -> Option<(f32, u32)> {
    if !region.contains_x(x) {
        return None;
    }
    let is_black = |yy: i32| -> Option<bool> {
        if region.contains_y(yy) {
            Some(bm.is_black(x as usize, yy as usize))
        } else {
            None
        }
    };
    let (counts, end) = cross_check(is_black, y, max_per_module)?;
    let total = proper_ratios(&counts, kind)?;
    Some((get_center(&counts, end), total))
}

fn check_horizontally(bm: &BitMatrix, region: Region, y: i32, x: i32, max_per_module: u32, kind: PatternKind) -> Option<(f32, u32)> {
    if !region.contains_y(y) {
        return None;
    }
    let is_black = |xx: i32| -> Option<bool> {
        if region.contains_x(xx) {
            Some(bm.is_black(xx as usize, y as usize))
        } else {
            None
        }
    };
    let (counts, end) = cross_check(is_black, x, max_per_module)?;
    let total = proper_ratios(&counts, kind)?;
    Some((get_center(&counts, end), total))
}

fn handle_potential_center(candidates: &mut Vec<Candidate>, x: f32, y: f32, module_size: f32) {
    for c in candidates.iter_mut() {
        if (c.x - x).abs() <= c.module_size && (c.y - y).abs() <= c.module_size {
            let size_diff = (c.module_size - module_size).abs();
            if size_diff <= 1.0 || size_diff <= c.module_size {
                let n = c.count + 1;
                c.x = (c.x * c.count as f32 + x) / n as f32;
                c.y = (c.y * c.count as f32 + y) / n as f32;
                c.module_size = (c.module_size * c.count as f32 + module_size) / n as f32;
                c.count = n;
                return;
            }
        }
    }
    candidates.push(Candidate { x, y, module_size, count: 1 });
}

/// Finds all finder- or alignment-pattern candidate centres within `region`
/// of the given bit matrix.
pub fn find_potential_centers(bm: &BitMatrix, kind: PatternKind, region: Region) -> Vec<Candidate> {
    let divisor = match kind {
        PatternKind::Finder => 7.0,
        PatternKind::Alignment => 5.0,
    };

    let mut candidates = Vec::new();
    let width = (region.x1 - region.x0).max(0);

    for y in region.y0..region.y1 {
        let runs = scan_runs(width, |rel_x| bm.is_black((region.x0 + rel_x) as usize, y as usize));
        for (counts, end_rel) in runs {
            let total_h = match proper_ratios(&counts, kind) {
                Some(t) => t,
                None => continue,
            };
            let center_x = region.x0 as f32 + get_center(&counts, end_rel);
            let max_per_module = counts[2];

            let (center_y, total_v) = match check_vertically(bm, region, center_x.round() as i32, y, max_per_module, kind) {
                Some(v) => v,
                None => continue,
            };
            if (total_v as f32 - total_h as f32).abs() > 0.4 * total_h as f32 {
                continue;
            }

            let (refined_x, total_h2) =
                match check_horizontally(bm, region, center_y.round() as i32, center_x.round() as i32, max_per_module, kind) {
                    Some(v) => v,
                    None => continue,
                };

            let module_size = (total_h2 as f32 / divisor + total_v as f32 / divisor) / 2.0;
            handle_potential_center(&mut candidates, refined_x, center_y, module_size);
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finder_pattern_matrix(size: usize) -> BitMatrix {
        // A 7-module finder pattern scaled by `module` pixels per module,
        // centred in a `size`x`size` white field.
        let module = 3usize;
        let dim = 7 * module;
        let mut bm = BitMatrix::new(size, size);
        let offset = (size - dim) / 2;
        for y in 0..dim {
            for x in 0..dim {
                let mx = x / module;
                let my = y / module;
                let ring = mx.min(6 - mx).min(my).min(6 - my);
                let black = ring == 0 || ring == 2;
                if black {
                    bm.set_black(offset + x, offset + y);
                }
            }
        }
        bm
    }

    #[test]
    fn finds_a_single_synthetic_finder_pattern() {
        let bm = finder_pattern_matrix(63);
        let region = Region::whole(&bm);
        let candidates = find_potential_centers(&bm, PatternKind::Finder, region);
        assert!(!candidates.is_empty(), "expected at least one candidate");
        let best = candidates.iter().max_by_key(|c| c.count).unwrap();
        assert!((best.x - 31.5).abs() < 3.0, "x = {}", best.x);
        assert!((best.y - 31.5).abs() < 3.0, "y = {}", best.y);
    }

    #[test]
    fn all_white_region_has_no_candidates() {
        let bm = BitMatrix::new(8, 8);
        let region = Region::whole(&bm);
        assert!(find_potential_centers(&bm, PatternKind::Finder, region).is_empty());
    }
}
