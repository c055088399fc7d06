//! Polygon simplification and corner/curve fitting.
//!
//! A traced ring is first thinned with Douglas-Peucker, then every remaining
//! vertex becomes one segment running between the midpoints of its two
//! edges: a corner when the turn is sharp (alpha at or above `alpha_max`),
//! otherwise a cubic whose handles pull toward the vertex by alpha.

use super::contour::Ring;
use super::outline::{Contour, TracedSegment};
use kurbo::Point;

/// Simplify a closed ring, keeping vertices farther than `epsilon` from the
/// chords that replace them.
pub fn simplify_closed(points: &[Point], epsilon: f64) -> Vec<Point> {
    let n = points.len();
    if n < 4 || epsilon <= 0.0 {
        return points.to_vec();
    }

    // split at the vertex farthest from the first so both halves are open
    let far = (1..n)
        .max_by(|&a, &b| {
            points[0]
                .distance_squared(points[a])
                .total_cmp(&points[0].distance_squared(points[b]))
        })
        .unwrap_or(n / 2);

    let mut keep = vec![false; n + 1];
    keep[0] = true;
    keep[far] = true;
    keep[n] = true;
    let closed: Vec<Point> = points.iter().copied().chain(std::iter::once(points[0])).collect();
    mark_kept(&closed, 0, far, epsilon, &mut keep);
    mark_kept(&closed, far, n, epsilon, &mut keep);

    (0..n).filter(|&i| keep[i]).map(|i| points[i]).collect()
}

fn mark_kept(points: &[Point], first: usize, last: usize, epsilon: f64, keep: &mut [bool]) {
    if last <= first + 1 {
        return;
    }
    let (a, b) = (points[first], points[last]);
    let mut worst = 0.0;
    let mut index = first;
    for (i, &p) in points.iter().enumerate().take(last).skip(first + 1) {
        let d = distance_to_segment(p, a, b);
        if d > worst {
            worst = d;
            index = i;
        }
    }
    if worst > epsilon {
        keep[index] = true;
        mark_kept(points, first, index, epsilon, keep);
        mark_kept(points, index, last, epsilon, keep);
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.hypot2();
    if len_sq < 1e-12 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Turn a simplified ring into corner and curve segments.
pub fn smooth_contour(vertices: &[Point], alpha_max: f64) -> Option<Contour> {
    let m = vertices.len();
    if m < 3 {
        return None;
    }

    let start = vertices[m - 1].midpoint(vertices[0]);
    let segments = (0..m)
        .map(|j| {
            let prev = vertices[(j + m - 1) % m];
            let vertex = vertices[j];
            let next = vertices[(j + 1) % m];
            let end = vertex.midpoint(next);
            let alpha = compute_alpha(prev, vertex, next);
            if alpha >= alpha_max {
                TracedSegment::Corner { vertex, end }
            } else {
                let alpha = alpha.clamp(0.55, 1.0);
                let lambda = 0.5 + 0.5 * alpha;
                TracedSegment::Curve {
                    c1: prev.lerp(vertex, lambda),
                    c2: next.lerp(vertex, lambda),
                    end,
                }
            }
        })
        .collect();

    Some(Contour { start, segments })
}

/// Simplify then smooth a traced ring
pub fn fit_ring(ring: &Ring, tolerance: f64, alpha_max: f64) -> Option<Contour> {
    let simplified = simplify_closed(&ring.points, tolerance);
    smooth_contour(&simplified, alpha_max)
}

/// How sharply the polygon turns at `vj`; 0 is straight, 4/3 the sharpest.
fn compute_alpha(vi: Point, vj: Point, vk: Point) -> f64 {
    // twice the signed area of triangle ijk
    let dpara = (vj.x - vi.x) * (vk.y - vi.y) - (vj.y - vi.y) * (vk.x - vi.x);

    let (ox, oy) = dorth_infty(vi, vk);
    let ddenom = oy * (vk.x - vi.x) - ox * (vk.y - vi.y);
    if ddenom.abs() < 1e-10 {
        return 4.0 / 3.0;
    }

    let dd = (dpara / ddenom).abs();
    let alpha = if dd > 1.0 { 1.0 - 1.0 / dd } else { 0.0 };
    alpha / 0.75
}

/// Direction from p0 to p2 rotated 90 degrees and snapped to an axis
fn dorth_infty(p0: Point, p2: Point) -> (f64, f64) {
    (-sign(p2.y - p0.y), sign(p2.x - p0.x))
}

fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}
