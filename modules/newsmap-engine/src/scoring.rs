// Distance-to-points mapping for a single round.
//
// Linear interpolation between the anchor points: 0 km scores 1000,
// 10000 km scores 500, 20000 km and beyond score 0. Monotonically
// non-increasing in distance, deterministic, no side effects.

/// Maximum points a single round can award.
pub const MAX_ROUND_SCORE: u32 = 1000;

/// Distance at and beyond which a guess scores zero. Roughly half the
/// Earth's circumference — no two points are farther apart.
pub const MAX_SCORED_DISTANCE_KM: f64 = 20000.0;

/// Score a guess by its distance from the true location, in kilometers.
pub fn score(distance_km: f64) -> u32 {
    let remaining = 1.0 - distance_km.max(0.0) / MAX_SCORED_DISTANCE_KM;
    (f64::from(MAX_ROUND_SCORE) * remaining.max(0.0)).round() as u32
}
