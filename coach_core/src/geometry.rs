//! Joint angle calculation using the dot product.
//!
//! cos(θ) = (v1 · v2) / (|v1| × |v2| + ε), clamped to [-1, 1].

/// Added to the magnitude product so zero-length segments never divide by zero
const EPSILON: f64 = 1e-6;

/// A planar landmark position (normalized image coordinates are typical)
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Angle at vertex `b` between rays b→a and b→c, in degrees within [0, 180]
///
/// Coincident points produce a degenerate 180° rather than an error.
pub fn angle_at(a: Point, b: Point, c: Point) -> f64 {
    let v1 = (a.x - b.x, a.y - b.y);
    let v2 = (c.x - b.x, c.y - b.y);

    let dot = v1.0 * v2.0 + v1.1 * v2.1;
    let mag1 = v1.0.hypot(v1.1);
    let mag2 = v2.0.hypot(v2.1);

    // A collapsed segment has no direction; treat the joint as straight
    if mag1 < EPSILON || mag2 < EPSILON {
        return 180.0;
    }

    let cos_angle = (dot / (mag1 * mag2 + EPSILON)).clamp(-1.0, 1.0);

    cos_angle.acos().to_degrees().clamp(0.0, 180.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_line() {
        let angle = angle_at(
            Point::new(0.0, 0.0),
            Point::new(0.5, 0.0),
            Point::new(1.0, 0.0),
        );
        assert!((angle - 180.0).abs() < 0.5);
    }

    #[test]
    fn test_right_angle() {
        let angle = angle_at(
            Point::new(0.0, 0.0),
            Point::new(0.5, 0.0),
            Point::new(0.5, 0.5),
        );
        assert!((angle - 90.0).abs() < 0.1);
    }

    #[test]
    fn test_folded_back() {
        let angle = angle_at(
            Point::new(1.0, 1.0),
            Point::new(0.0, 0.0),
            Point::new(2.0, 2.0),
        );
        assert!(angle.abs() < 0.1);
    }

    #[test]
    fn test_coincident_points_are_defined() {
        let p = Point::new(0.3, 0.3);
        let angle = angle_at(p, p, p);
        assert!(angle.is_finite());
        assert_eq!(angle, 180.0);

        let one_collapsed = angle_at(p, p, Point::new(0.9, 0.1));
        assert_eq!(one_collapsed, 180.0);
    }

    #[test]
    fn test_range_over_many_points() {
        for i in 0..36 {
            let theta = (i as f64 * 10.0).to_radians();
            let angle = angle_at(
                Point::new(1.0, 0.0),
                Point::new(0.0, 0.0),
                Point::new(theta.cos(), theta.sin()),
            );
            assert!((0.0..=180.0).contains(&angle));
        }
    }
}
