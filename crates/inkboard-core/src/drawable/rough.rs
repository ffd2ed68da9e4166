//! Seeded hand-drawn stroke generator.

use super::fill::{self, circle_polygon};
use super::{Drawable, DrawableFill, ShapeDescription, ShapeGeometry, SketchyRenderer};
use crate::element::FillStyle;
use kurbo::{BezPath, PathEl, Point, Shape as _};

/// Hachure angle in degrees.
const HACHURE_ANGLE: f64 = -41.0;

/// Simple seeded random number generator (xorshift32).
struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform in `[-1, 1]`.
    fn next_f64(&mut self) -> f64 {
        (self.next_u32() as f64 / u32::MAX as f64) * 2.0 - 1.0
    }

    fn offset(&mut self, amount: f64) -> f64 {
        self.next_f64() * amount
    }

    fn jitter(&mut self, p: Point, amount: f64) -> Point {
        Point::new(p.x + self.offset(amount), p.y + self.offset(amount))
    }
}

/// Default sketchy renderer: two overlapping jittered passes per outline,
/// straight edges bowed through a quadratic midpoint.
#[derive(Debug, Clone, Copy)]
pub struct RoughGenerator {
    pub roughness: f64,
    pub bowing: f64,
    /// Number of outline passes.
    pub passes: u32,
}

impl Default for RoughGenerator {
    fn default() -> Self {
        Self {
            roughness: 1.5,
            bowing: 1.0,
            passes: 2,
        }
    }
}

impl RoughGenerator {
    /// Jitter `path` deterministically for pass `pass` of `seed`.
    fn roughen(&self, path: &BezPath, seed: u32, pass: u32) -> BezPath {
        if self.roughness <= 0.0 {
            return path.clone();
        }
        let max_offset = self.roughness * 2.0;
        let mut rng = SimpleRng::new(seed.wrapping_add(pass.wrapping_mul(99991)));
        let mut result = BezPath::new();
        let mut last = Point::ZERO;

        for el in path.elements() {
            match *el {
                PathEl::MoveTo(p) => {
                    result.move_to(rng.jitter(p, max_offset));
                    last = p;
                }
                PathEl::LineTo(p) => {
                    let delta = p - last;
                    let len = delta.hypot();
                    let bow = rng.offset(self.bowing * self.roughness * len / 200.0);
                    let perp = if len > 0.001 {
                        kurbo::Vec2::new(-delta.y / len, delta.x / len)
                    } else {
                        kurbo::Vec2::ZERO
                    };
                    let mid = last.midpoint(p) + perp * bow;
                    result.quad_to(mid, rng.jitter(p, max_offset));
                    last = p;
                }
                PathEl::QuadTo(p1, p2) => {
                    result.quad_to(rng.jitter(p1, max_offset * 0.7), rng.jitter(p2, max_offset));
                    last = p2;
                }
                PathEl::CurveTo(p1, p2, p3) => {
                    result.curve_to(
                        rng.jitter(p1, max_offset * 0.5),
                        rng.jitter(p2, max_offset * 0.5),
                        rng.jitter(p3, max_offset),
                    );
                    last = p3;
                }
                PathEl::ClosePath => result.close_path(),
            }
        }
        result
    }

    fn outline(geometry: &ShapeGeometry) -> BezPath {
        match *geometry {
            ShapeGeometry::Line { start, end } => {
                let mut path = BezPath::new();
                path.move_to(start);
                path.line_to(end);
                path
            }
            ShapeGeometry::Rectangle(rect) => {
                // Explicit closing edge so every side gets its own bow.
                let mut path = BezPath::new();
                path.move_to(Point::new(rect.x0, rect.y0));
                path.line_to(Point::new(rect.x1, rect.y0));
                path.line_to(Point::new(rect.x1, rect.y1));
                path.line_to(Point::new(rect.x0, rect.y1));
                path.line_to(Point::new(rect.x0, rect.y0));
                path
            }
            ShapeGeometry::Circle { center, radius } => {
                kurbo::Circle::new(center, radius).to_path(0.1)
            }
        }
    }

    fn polygon(geometry: &ShapeGeometry) -> Option<Vec<Point>> {
        match *geometry {
            ShapeGeometry::Line { .. } => None,
            ShapeGeometry::Rectangle(rect) => Some(vec![
                Point::new(rect.x0, rect.y0),
                Point::new(rect.x1, rect.y0),
                Point::new(rect.x1, rect.y1),
                Point::new(rect.x0, rect.y1),
            ]),
            ShapeGeometry::Circle { center, radius } => Some(circle_polygon(center, radius)),
        }
    }

    fn fill(&self, shape: &ShapeDescription) -> Option<DrawableFill> {
        let style = &shape.style;
        if style.fill == FillStyle::None {
            return None;
        }
        let polygon = Self::polygon(&shape.geometry)?;
        let color = style.fill_color;
        let gap = (style.stroke_width * 4.0).max(1.0);
        let width = (style.stroke_width / 2.0).max(1.0);
        let path = match style.fill {
            FillStyle::None => return None,
            FillStyle::Solid => {
                return Some(DrawableFill::Solid {
                    path: fill::polygon_path(&polygon),
                    color,
                });
            }
            FillStyle::Hachure => fill::lines_path(&fill::hachure_lines(&polygon, HACHURE_ANGLE, gap)),
            FillStyle::ZigZag => fill::zigzag_path(&fill::hachure_lines(&polygon, HACHURE_ANGLE, gap)),
            FillStyle::CrossHatch => {
                let mut lines = fill::hachure_lines(&polygon, HACHURE_ANGLE, gap);
                lines.extend(fill::hachure_lines(&polygon, HACHURE_ANGLE + 90.0, gap));
                fill::lines_path(&lines)
            }
        };
        Some(DrawableFill::Pattern { path, color, width })
    }
}

impl SketchyRenderer for RoughGenerator {
    fn generate(&self, shape: &ShapeDescription) -> Drawable {
        let outline = Self::outline(&shape.geometry);
        let strokes = (0..self.passes.max(1))
            .map(|pass| self.roughen(&outline, shape.style.seed, pass))
            .collect();
        Drawable {
            strokes,
            stroke_color: shape.style.stroke_color,
            stroke_width: shape.style.stroke_width,
            fill: self.fill(shape),
        }
    }
}
