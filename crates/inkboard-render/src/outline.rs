//! Freehand stroke outlines.
//!
//! A raw pointer trail becomes a closed, variable-width polygon: the points
//! are streamlined towards each other, a simulated pressure derived from
//! pointer speed sets the local radius, and each point is offset to both
//! sides of the stroke direction. Round caps close both ends. The polygon is
//! then drawn as a smooth quadratic path through its edge midpoints.

use kurbo::{BezPath, Point, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// How quickly simulated pressure follows pointer speed.
const PRESSURE_RATE: f64 = 0.275;
/// Segments per semicircular end cap.
const CAP_SEGMENTS: usize = 8;
/// Segments of the dot drawn for a single-point stroke.
const DOT_SEGMENTS: usize = 16;

/// Outline shaping parameters, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineOptions {
    /// How much pressure narrows the stroke.
    pub thinning: f64,
    /// Minimum spacing between outline points, as a fraction of the size.
    pub smoothing: f64,
    /// How strongly each point is pulled towards the previous one.
    pub streamline: f64,
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            thinning: 0.5,
            smoothing: 0.5,
            streamline: 0.5,
        }
    }
}

fn streamlined(points: &[Point], streamline: f64) -> Vec<Point> {
    let t = 0.15 + (1.0 - streamline.clamp(0.0, 1.0)) * 0.85;
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        match out.last() {
            Some(&prev) => {
                let next = prev.lerp(p, t);
                if next != prev {
                    out.push(next);
                }
            }
            None => out.push(p),
        }
    }
    out
}

fn radius_for(size: f64, thinning: f64, pressure: f64) -> f64 {
    (size * (0.5 - thinning * (0.5 - pressure))).max(0.01)
}

fn dot(center: Point, radius: f64) -> Vec<Point> {
    (0..DOT_SEGMENTS)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / DOT_SEGMENTS as f64;
            center + Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

/// Arc of half a circle around `center`, from `center + from * r` to
/// `center - from * r` through `center + through * r`.
fn cap(center: Point, from: Vec2, through: Vec2, radius: f64) -> impl Iterator<Item = Point> {
    (1..CAP_SEGMENTS).map(move |i| {
        let theta = PI * i as f64 / CAP_SEGMENTS as f64;
        center + (from * theta.cos() + through * theta.sin()) * radius
    })
}

/// Outline polygon for a stroke of `size` through `points`.
///
/// Empty input yields an empty outline; a single point (or a trail that
/// never moves) yields a round dot.
pub fn stroke_outline(points: &[Point], size: f64, options: &OutlineOptions) -> Vec<Point> {
    let Some(&first) = points.first() else {
        return Vec::new();
    };
    let pts = streamlined(points, options.streamline);
    if pts.len() < 2 {
        return dot(first, radius_for(size, options.thinning, 0.5));
    }

    let mut pressure = 0.5;
    let mut radii = Vec::with_capacity(pts.len());
    radii.push(radius_for(size, options.thinning, pressure));
    for pair in pts.windows(2) {
        let speed = (pair[0].distance(pair[1]) / size.max(f64::EPSILON)).min(1.0);
        let target = 1.0 - speed;
        pressure += (target - pressure) * (speed * PRESSURE_RATE);
        radii.push(radius_for(size, options.thinning, pressure));
    }

    let min_spacing = (size * options.smoothing).powi(2);
    let last = pts.len() - 1;
    let mut left: Vec<Point> = Vec::with_capacity(pts.len());
    let mut right: Vec<Point> = Vec::with_capacity(pts.len());
    let mut directions = Vec::with_capacity(pts.len());
    for (i, &p) in pts.iter().enumerate() {
        let ahead = pts[(i + 1).min(last)];
        let behind = pts[i.saturating_sub(1)];
        let delta = ahead - behind;
        let dir = if delta.hypot2() > 0.0 {
            delta.normalize()
        } else {
            directions.last().copied().unwrap_or(Vec2::new(1.0, 0.0))
        };
        directions.push(dir);
        let normal = Vec2::new(-dir.y, dir.x) * radii[i];
        let (l, r) = (p + normal, p - normal);
        let keep = i == 0
            || i == last
            || left.last().is_none_or(|prev| (*prev - l).hypot2() >= min_spacing);
        if keep {
            left.push(l);
            right.push(r);
        }
    }

    let end_dir = directions[last];
    let end_normal = Vec2::new(-end_dir.y, end_dir.x);
    let start_dir = directions[0];
    let start_normal = Vec2::new(-start_dir.y, start_dir.x);

    let mut outline = left;
    outline.extend(cap(pts[last], end_normal, end_dir, radii[last]));
    outline.extend(right.into_iter().rev());
    outline.extend(cap(pts[0], -start_normal, -start_dir, radii[0]));
    outline
}

/// Closed quadratic path through the midpoints of `outline`'s edges.
pub fn outline_path(outline: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let Some(&first) = outline.first() else {
        return path;
    };
    path.move_to(first);
    for (i, &p) in outline.iter().enumerate() {
        let next = outline[(i + 1) % outline.len()];
        path.quad_to(p, p.midpoint(next));
    }
    path.close_path();
    path
}

/// Filled path for a freehand stroke.
pub fn freehand_path(points: &[Point], size: f64, options: &OutlineOptions) -> BezPath {
    outline_path(&stroke_outline(points, size, options))
}
