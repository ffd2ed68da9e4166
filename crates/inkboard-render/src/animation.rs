//! Looping motion for decorations.

use inkboard_core::element::Decoration;
use inkboard_core::AnimationKind;
use kurbo::{Affine, Vec2};
use std::f64::consts::TAU;

/// Vertical travel of a bounce, world units.
const BOUNCE_HEIGHT: f64 = 30.0;
/// Scale swing of a pulse around 1.
const PULSE_AMPLITUDE: f64 = 0.1;
/// Radius of the float orbit, world units.
const FLOAT_RADIUS: f64 = 20.0;

/// World-space transform for `decoration` at loop progress `progress`
/// (`0..1`).
pub fn animation_at(decoration: &Decoration, progress: f64) -> Affine {
    let phase = progress * TAU;
    let center = decoration.bounds().center();
    match decoration.animation {
        AnimationKind::Rotate => Affine::rotate_about(phase, center),
        AnimationKind::Bounce => Affine::translate(Vec2::new(0.0, -phase.sin().abs() * BOUNCE_HEIGHT)),
        AnimationKind::Pulse => {
            let scale = 1.0 + phase.sin() * PULSE_AMPLITUDE;
            Affine::translate(center.to_vec2())
                * Affine::scale(scale)
                * Affine::translate(-center.to_vec2())
        }
        AnimationKind::Float => Affine::translate(Vec2::new(
            phase.sin() * FLOAT_RADIUS,
            phase.cos() * FLOAT_RADIUS,
        )),
    }
}

/// Transform for `decoration` at wall-clock time `now_ms`.
pub fn animation_transform(decoration: &Decoration, now_ms: u64) -> Affine {
    animation_at(decoration, decoration.progress(now_ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Size};

    fn decoration(animation: AnimationKind) -> Decoration {
        Decoration::new(
            Point::new(0.0, 0.0),
            Size::new(100.0, 100.0),
            animation,
            "star".into(),
            0,
            1000,
        )
    }

    fn close(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-9
    }

    #[test]
    fn test_rotate_keeps_center() {
        let d = decoration(AnimationKind::Rotate);
        let t = animation_at(&d, 0.25);
        assert!(close(t * Point::new(50.0, 50.0), Point::new(50.0, 50.0)));
        assert!(close(t * Point::new(100.0, 50.0), Point::new(50.0, 100.0)));
    }

    #[test]
    fn test_bounce_peaks_at_quarter() {
        let d = decoration(AnimationKind::Bounce);
        assert!(close(animation_at(&d, 0.0) * Point::ZERO, Point::ZERO));
        assert!(close(animation_at(&d, 0.25) * Point::ZERO, Point::new(0.0, -30.0)));
        assert!(close(animation_at(&d, 0.75) * Point::ZERO, Point::new(0.0, -30.0)));
    }

    #[test]
    fn test_pulse_scales_about_center() {
        let d = decoration(AnimationKind::Pulse);
        let t = animation_at(&d, 0.25);
        assert!(close(t * Point::new(50.0, 50.0), Point::new(50.0, 50.0)));
        assert!(close(t * Point::new(100.0, 50.0), Point::new(105.0, 50.0)));
    }

    #[test]
    fn test_float_orbits() {
        let d = decoration(AnimationKind::Float);
        assert!(close(animation_at(&d, 0.0) * Point::ZERO, Point::new(0.0, 20.0)));
        assert!(close(animation_at(&d, 0.25) * Point::ZERO, Point::new(20.0, 0.0)));
    }

    #[test]
    fn test_transform_loops_with_time() {
        let d = decoration(AnimationKind::Bounce);
        let a = animation_transform(&d, 250);
        let b = animation_transform(&d, 1250);
        assert!(close(a * Point::ZERO, b * Point::ZERO));
    }
}
