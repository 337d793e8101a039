use serde::{Deserialize, Serialize};

/// 2D point in either pixel or unit-square coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset_from(self, origin: Point2) -> Point2 {
        Point2::new(self.x - origin.x, self.y - origin.y)
    }

    /// Maps a pixel position into the unit square of a `width` x `height` frame.
    pub fn normalized(self, width: f32, height: f32) -> Point2 {
        let w = width.max(1.0);
        let h = height.max(1.0);
        Point2::new((self.x / w).clamp(0.0, 1.0), (self.y / h).clamp(0.0, 1.0))
    }
}

/// Angle in degrees at `center` between the vectors `center->a` and `center->c`.
///
/// A zero-length vector yields `0.0` instead of NaN.
pub fn angle_at(center: Point2, a: Point2, c: Point2) -> f32 {
    let (ax, ay) = (a.x - center.x, a.y - center.y);
    let (cx, cy) = (c.x - center.x, c.y - center.y);

    let mag_a = (ax * ax + ay * ay).sqrt();
    let mag_c = (cx * cx + cy * cy).sqrt();
    if mag_a == 0.0 || mag_c == 0.0 {
        return 0.0;
    }

    let cos_angle = ((ax * cx + ay * cy) / (mag_a * mag_c)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-3,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn perpendicular_vectors_give_right_angle() {
        let origin = Point2::new(0.0, 0.0);
        approx(angle_at(origin, Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)), 90.0);
    }

    #[test]
    fn opposite_vectors_give_straight_angle() {
        let knee = Point2::new(5.0, 5.0);
        approx(angle_at(knee, Point2::new(5.0, 0.0), Point2::new(5.0, 10.0)), 180.0);
    }

    #[test]
    fn zero_length_vector_falls_back_to_zero() {
        let p = Point2::new(3.0, 4.0);
        assert_eq!(angle_at(p, p, Point2::new(0.0, 0.0)), 0.0);
        assert_eq!(angle_at(p, Point2::new(0.0, 0.0), p), 0.0);
    }

    #[test]
    fn nearly_collinear_vectors_stay_finite() {
        let origin = Point2::new(0.0, 0.0);
        let angle = angle_at(origin, Point2::new(1e-3, 0.0), Point2::new(1e6, 1e-9));
        assert!(angle.is_finite());
        approx(angle, 0.0);
    }

    #[test]
    fn normalization_clamps_into_unit_square() {
        let p = Point2::new(320.0, 600.0).normalized(640.0, 480.0);
        assert_eq!(p, Point2::new(0.5, 1.0));
        let degenerate = Point2::new(0.5, 0.5).normalized(0.0, 0.0);
        assert_eq!(degenerate, Point2::new(0.5, 0.5));
    }
}
