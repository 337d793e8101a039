use kneecore::math::Point2;
use std::f32::consts::PI;

/// Knee angle over one gait cycle: fully extended at phase 0, most flexed at 0.5.
pub fn knee_angle(phase: f32, min_deg: f32, max_deg: f32) -> f32 {
    let swing = 0.5 + 0.5 * (2.0 * PI * phase).cos();
    min_deg + (max_deg - min_deg) * swing
}

/// Knee and ankle for a vertical thigh hanging from `hip` with the given knee angle.
pub fn leg_points(hip: Point2, thigh: f32, shank: f32, knee_deg: f32) -> (Point2, Point2) {
    let knee = Point2::new(hip.x, hip.y + thigh);
    let theta = knee_deg.clamp(0.0, 180.0).to_radians();
    let ankle = Point2::new(knee.x + shank * theta.sin(), knee.y - shank * theta.cos());
    (knee, ankle)
}
