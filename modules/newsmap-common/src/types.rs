use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Whether the point lies within valid coordinate ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// One entry of the static location dataset. Loaded once at startup,
/// immutable for the lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub location_id: String,
    pub city: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
    pub timezone: String,
}

impl Location {
    pub fn point(&self) -> GeoPoint {
        GeoPoint {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

/// A news headline returned by a provider. Immutable once created;
/// `cached_at` is stamped by the headline cache when the value is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    pub source: String,
    pub published_at: String,
    pub url: String,
    pub cached_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Game API payloads, shared between the engine and the transport layer.
// ---------------------------------------------------------------------------

/// Response to starting a new game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStart {
    pub game_id: Uuid,
    pub total_rounds: usize,
    pub current_round_number: usize,
    pub headline: String,
}

/// Response to a scored guess. The true location is revealed here and
/// nowhere earlier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessResult {
    pub correct_location: Location,
    pub guess_location: GeoPoint,
    pub distance_km: f64,
    pub round_score: u32,
    pub total_score: u32,
    pub current_round_number: usize,
    pub is_final_round: bool,
}

/// The next round's headline after the previous round was resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextRound {
    pub round_number: usize,
    pub headline: String,
}

/// Per-round breakdown in the final summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round_number: usize,
    pub city: String,
    pub country: String,
    pub headline: String,
    pub distance_km: f64,
    pub score: u32,
}

/// Final game statistics, only available once every round is resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSummary {
    pub game_id: Uuid,
    pub total_score: u32,
    pub max_possible_score: u32,
    pub average_distance_km: f64,
    pub rounds_summary: Vec<RoundSummary>,
}
