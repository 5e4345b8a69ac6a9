//! Groups finder-pattern candidates into triples that could be the three
//! corners of a QR code: an isoceles right triangle with the right angle at
//! the top-left finder, oriented so that bottom-left is below top-left and
//! top-right is to the right of top-left.

use crate::finder::Candidate;

const MIN_MODULES_PER_EDGE: f32 = 9.0;
const MAX_MODULES_PER_EDGE: f32 = 180.0;
const MAX_MODULE_SIZE_DIFF: f32 = 0.5;
const RATIO_TOLERANCE: f32 = 0.1;

#[derive(Debug, Clone, Copy)]
pub struct Group {
    pub bottom_left: Candidate,
    pub top_left: Candidate,
    pub top_right: Candidate,
}

fn distance(a: &Candidate, b: &Candidate) -> f32 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Given three unordered candidates, decides which is the right-angle
/// vertex (B) and which of the remaining two is "below" (A) versus "to the
/// right" (C), then validates the isoceles-right-triangle geometry.
fn check_points(p0: &Candidate, p1: &Candidate, p2: &Candidate) -> Option<Group> {
    let d01 = distance(p0, p1);
    let d12 = distance(p1, p2);
    let d02 = distance(p0, p2);

    // The right angle sits opposite the longest side.
    let (mut a, b, mut c) = if d02 >= d01 && d02 >= d12 {
        (p0, p1, p2)
    } else if d01 >= d12 {
        (p0, p2, p1)
    } else {
        (p1, p0, p2)
    };

    let z = (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x);
    if z <= 0.0 {
        std::mem::swap(&mut a, &mut c);
    }

    let ab = distance(a, b);
    let bc = distance(b, c);
    let ac = distance(a, c);
    let shorter = ab.min(bc);

    if (ab - bc).abs() / shorter > RATIO_TOLERANCE {
        return None;
    }
    let pythagorean = (ab * ab + bc * bc).sqrt();
    if (ac - pythagorean).abs() / shorter > RATIO_TOLERANCE {
        return None;
    }

    let module_count = (ab + bc) / (2.0 * b.module_size);
    if module_count < MIN_MODULES_PER_EDGE || module_count > MAX_MODULES_PER_EDGE {
        return None;
    }

    Some(Group { bottom_left: *a, top_left: *b, top_right: *c })
}

/// Finds every triple of candidates that forms a plausible QR corner
/// arrangement, sorted by module size to bound the search: the inner loops
/// stop as soon as a candidate's module size diverges from the smallest in
/// the triple by more than `MAX_MODULE_SIZE_DIFF`.
pub fn find_groups(candidates: &[Candidate]) -> Vec<Group> {
    let mut sorted: Vec<&Candidate> = candidates.iter().collect();
    sorted.sort_by(|a, b| a.module_size.partial_cmp(&b.module_size).unwrap());

    let n = sorted.len();
    let mut groups = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if sorted[j].module_size - sorted[i].module_size > MAX_MODULE_SIZE_DIFF {
                break;
            }
            for k in (j + 1)..n {
                if sorted[k].module_size - sorted[i].module_size > MAX_MODULE_SIZE_DIFF {
                    break;
                }
                if let Some(g) = check_points(sorted[i], sorted[j], sorted[k]) {
                    groups.push(g);
                }
            }
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(x: f32, y: f32, module_size: f32) -> Candidate {
        Candidate { x, y, module_size, count: 1 }
    }

    #[test]
    fn finds_a_well_formed_right_triangle() {
        // B at (100,100), A below B, C to the right of B, 20 modules apart.
        let module_size = 2.0;
        let a = candidate(100.0, 140.0, module_size);
        let b = candidate(100.0, 100.0, module_size);
        let c = candidate(140.0, 100.0, module_size);
        let groups = find_groups(&[a, b, c]);
        assert_eq!(groups.len(), 1);
        assert!((groups[0].top_left.x - 100.0).abs() < 0.01);
        assert!((groups[0].bottom_left.y - 140.0).abs() < 0.01);
        assert!((groups[0].top_right.x - 140.0).abs() < 0.01);
    }

    #[test]
    fn rejects_collinear_points() {
        let module_size = 2.0;
        let a = candidate(100.0, 100.0, module_size);
        let b = candidate(120.0, 100.0, module_size);
        let c = candidate(140.0, 100.0, module_size);
        assert!(find_groups(&[a, b, c]).is_empty());
    }

    #[test]
    fn rejects_triples_with_divergent_module_sizes() {
        let a = candidate(100.0, 140.0, 1.0);
        let b = candidate(100.0, 100.0, 1.0);
        let c = candidate(140.0, 100.0, 5.0);
        assert!(find_groups(&[a, b, c]).is_empty());
    }
}
