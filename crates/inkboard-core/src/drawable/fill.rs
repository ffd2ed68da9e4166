//! Scanline fill patterns for closed polygons.

use kurbo::{Affine, BezPath, Point};
use std::f64::consts::TAU;

const CIRCLE_SEGMENTS: usize = 36;

/// Regular polygon approximating a circle.
pub(crate) fn circle_polygon(center: Point, radius: f64) -> Vec<Point> {
    (0..CIRCLE_SEGMENTS)
        .map(|i| {
            let angle = TAU * i as f64 / CIRCLE_SEGMENTS as f64;
            Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
        })
        .collect()
}

pub(crate) fn polygon_path(polygon: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    if let Some((first, rest)) = polygon.split_first() {
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
        path.close_path();
    }
    path
}

/// Parallel line segments at `angle_deg` spaced `gap` apart, clipped to
/// the polygon interior (even-odd).
pub(crate) fn hachure_lines(polygon: &[Point], angle_deg: f64, gap: f64) -> Vec<(Point, Point)> {
    if polygon.len() < 3 || gap <= 0.0 {
        return Vec::new();
    }
    // Rotate so the hachure direction is horizontal, scan, rotate back.
    let to_scan = Affine::rotate(-angle_deg.to_radians());
    let from_scan = Affine::rotate(angle_deg.to_radians());
    let pts: Vec<Point> = polygon.iter().map(|p| to_scan * *p).collect();

    let min_y = pts.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = pts.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

    let mut lines = Vec::new();
    let mut y = min_y + gap / 2.0;
    while y < max_y {
        let mut xs: Vec<f64> = pts
            .iter()
            .zip(pts.iter().cycle().skip(1))
            .filter(|(a, b)| (a.y <= y && b.y > y) || (b.y <= y && a.y > y))
            .map(|(a, b)| a.x + (y - a.y) / (b.y - a.y) * (b.x - a.x))
            .collect();
        xs.sort_by(f64::total_cmp);
        for pair in xs.chunks_exact(2) {
            lines.push((
                from_scan * Point::new(pair[0], y),
                from_scan * Point::new(pair[1], y),
            ));
        }
        y += gap;
    }
    lines
}

/// Independent segments as one multi-subpath path.
pub(crate) fn lines_path(lines: &[(Point, Point)]) -> BezPath {
    let mut path = BezPath::new();
    for (a, b) in lines {
        path.move_to(*a);
        path.line_to(*b);
    }
    path
}

/// Segments joined end to end, alternating direction.
pub(crate) fn zigzag_path(lines: &[(Point, Point)]) -> BezPath {
    let mut path = BezPath::new();
    for (i, (a, b)) in lines.iter().enumerate() {
        let (from, to) = if i % 2 == 0 { (*a, *b) } else { (*b, *a) };
        if i == 0 {
            path.move_to(from);
        } else {
            path.line_to(from);
        }
        path.line_to(to);
    }
    path
}
