//! End-to-end engine tests against mock headline providers.
//!
//! No network, no API keys: providers are swapped behind `HeadlineProvider`
//! and the location directory is built in memory.
//!
//! Run with: cargo test -p newsmap-engine --test game_flow_test

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use newsmap_common::{GeoPoint, Headline, Location, NewsMapError};
use newsmap_engine::{GameEngine, LocationDirectory};
use newsmap_headlines::{HeadlineCache, HeadlineProvider, ProviderChain};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Serves a canned headline for every city, except those it is broken for.
struct CannedProvider {
    broken_cities: Vec<String>,
}

#[async_trait]
impl HeadlineProvider for CannedProvider {
    fn name(&self) -> &str {
        "canned"
    }

    async fn fetch(&self, city: &str, _country: &str) -> Result<Headline> {
        if self.broken_cities.iter().any(|c| c == city) {
            anyhow::bail!("no usable article for {city}");
        }
        Ok(Headline {
            title: format!("{city} headline"),
            source: "canned".to_string(),
            published_at: String::new(),
            url: "https://example.com/article".to_string(),
            cached_at: Utc::now(),
        })
    }
}

fn loc(id: &str, city: &str, lat: f64, lng: f64) -> Location {
    Location {
        location_id: id.to_string(),
        city: city.to_string(),
        country: "Testland".to_string(),
        lat,
        lng,
        timezone: "UTC".to_string(),
    }
}

fn world() -> Vec<Location> {
    vec![
        loc("new-york", "New York", 40.7128, -74.0060),
        loc("london", "London", 51.5074, -0.1278),
        loc("tokyo", "Tokyo", 35.6762, 139.6503),
        loc("sydney", "Sydney", -33.8688, 151.2093),
        loc("nairobi", "Nairobi", -1.2921, 36.8219),
        loc("lima", "Lima", -12.0464, -77.0428),
        loc("berlin", "Berlin", 52.5200, 13.4050),
        loc("mumbai", "Mumbai", 19.0760, 72.8777),
    ]
}

fn engine_with(
    locations: Vec<Location>,
    broken_cities: Vec<&str>,
    round_count: usize,
    session_ttl: Duration,
) -> GameEngine {
    let broken_cities = broken_cities.into_iter().map(String::from).collect();
    let directory = Arc::new(LocationDirectory::new(locations));
    let chain = ProviderChain::new(vec![Box::new(CannedProvider { broken_cities })]);
    let cache = Arc::new(HeadlineCache::new(chain, Duration::from_secs(1800)));
    GameEngine::new(directory, cache, round_count, session_ttl)
}

fn engine() -> GameEngine {
    engine_with(world(), vec![], 5, Duration::from_secs(1800))
}

const ORIGIN: GeoPoint = GeoPoint { lat: 0.0, lng: 0.0 };

/// Play a started game to completion with a fixed guess.
async fn finish_game(engine: &GameEngine, game_id: Uuid, total_rounds: usize) {
    for round in 1..=total_rounds {
        let result = engine.submit_guess(game_id, ORIGIN).await.unwrap();
        assert_eq!(result.current_round_number, round);
        assert_eq!(result.is_final_round, round == total_rounds);
        if !result.is_final_round {
            engine.advance_round(game_id).await.unwrap();
        }
    }
}

// ---------------------------------------------------------------------------
// Session creation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_session_returns_first_headline() {
    let engine = engine();
    let start = engine.create_session().await.unwrap();

    assert_eq!(start.total_rounds, 5);
    assert_eq!(start.current_round_number, 1);
    assert!(start.headline.ends_with("headline"));
}

#[tokio::test]
async fn too_small_directory_is_rejected() {
    let engine = engine_with(world().into_iter().take(3).collect(), vec![], 5, Duration::from_secs(1800));
    let err = engine.create_session().await.unwrap_err();
    assert!(matches!(
        err,
        NewsMapError::InsufficientLocations { available: 3, needed: 5 }
    ));
}

#[tokio::test]
async fn all_providers_down_fails_session_creation() {
    let cities = world();
    let broken: Vec<&str> = cities.iter().map(|l| l.city.as_str()).collect();
    let engine = engine_with(world(), broken, 5, Duration::from_secs(1800));
    let err = engine.create_session().await.unwrap_err();
    assert!(matches!(err, NewsMapError::HeadlinesUnavailable));
}

#[tokio::test]
async fn sessions_use_distinct_locations() {
    let engine = engine();
    let start = engine.create_session().await.unwrap();
    finish_game(&engine, start.game_id, 5).await;

    let summary = engine.get_summary(start.game_id).await.unwrap();
    let mut cities: Vec<String> = summary.rounds_summary.iter().map(|r| r.city.clone()).collect();
    cities.sort();
    cities.dedup();
    assert_eq!(cities.len(), 5, "expected 5 distinct cities");
}

#[tokio::test]
async fn broken_location_is_substituted_with_a_spare() {
    // One city never yields a headline; the engine must swap in a spare and
    // still produce a full game without it.
    let engine = engine_with(world(), vec!["Tokyo"], 5, Duration::from_secs(1800));
    let start = engine.create_session().await.unwrap();
    finish_game(&engine, start.game_id, 5).await;

    let summary = engine.get_summary(start.game_id).await.unwrap();
    assert_eq!(summary.rounds_summary.len(), 5);
    assert!(summary.rounds_summary.iter().all(|r| r.city != "Tokyo"));
}

// ---------------------------------------------------------------------------
// Guess evaluation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn perfect_guess_scores_maximum() {
    let engine = engine_with(vec![loc("london", "London", 51.5074, -0.1278)], vec![], 1, Duration::from_secs(1800));
    let start = engine.create_session().await.unwrap();

    let result = engine
        .submit_guess(start.game_id, GeoPoint { lat: 51.5074, lng: -0.1278 })
        .await
        .unwrap();

    assert!(result.distance_km < 0.001);
    assert_eq!(result.round_score, 1000);
    assert_eq!(result.correct_location.city, "London");
    assert!(result.is_final_round);
}

#[tokio::test]
async fn distant_guess_scores_between_bounds() {
    // True location London, guess New York: ~5570 km.
    let engine = engine_with(vec![loc("london", "London", 51.5074, -0.1278)], vec![], 1, Duration::from_secs(1800));
    let start = engine.create_session().await.unwrap();

    let result = engine
        .submit_guess(start.game_id, GeoPoint { lat: 40.7128, lng: -74.0060 })
        .await
        .unwrap();

    assert!((result.distance_km - 5570.0).abs() < 20.0);
    assert!(result.round_score > 0 && result.round_score < 1000);
}

#[tokio::test]
async fn invalid_coordinates_are_rejected() {
    let engine = engine();
    let start = engine.create_session().await.unwrap();

    for (lat, lng) in [(120.0, 0.0), (-91.0, 0.0), (0.0, 181.0), (0.0, -200.0)] {
        let err = engine
            .submit_guess(start.game_id, GeoPoint { lat, lng })
            .await
            .unwrap_err();
        assert!(matches!(err, NewsMapError::InvalidCoordinates { .. }));
    }

    // The round is still guessable afterwards.
    assert!(engine.submit_guess(start.game_id, ORIGIN).await.is_ok());
}

#[tokio::test]
async fn second_guess_is_a_conflict() {
    let engine = engine();
    let start = engine.create_session().await.unwrap();

    engine.submit_guess(start.game_id, ORIGIN).await.unwrap();
    let err = engine.submit_guess(start.game_id, ORIGIN).await.unwrap_err();
    assert!(matches!(err, NewsMapError::RoundAlreadyResolved));
}

#[tokio::test]
async fn concurrent_guesses_have_exactly_one_winner() {
    let engine = Arc::new(engine());
    let start = engine.create_session().await.unwrap();

    let (a, b) = tokio::join!(
        engine.submit_guess(start.game_id, ORIGIN),
        engine.submit_guess(start.game_id, ORIGIN),
    );

    let winners = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one concurrent guess must win");
    let loser = if a.is_err() { a } else { b };
    assert!(matches!(loser.unwrap_err(), NewsMapError::RoundAlreadyResolved));
}

// ---------------------------------------------------------------------------
// Round advancement and summary
// ---------------------------------------------------------------------------

#[tokio::test]
async fn advance_requires_a_resolved_round() {
    let engine = engine();
    let start = engine.create_session().await.unwrap();

    let err = engine.advance_round(start.game_id).await.unwrap_err();
    assert!(matches!(err, NewsMapError::RoundNotResolved));
}

#[tokio::test]
async fn advance_moves_to_the_next_round() {
    let engine = engine();
    let start = engine.create_session().await.unwrap();

    engine.submit_guess(start.game_id, ORIGIN).await.unwrap();
    let next = engine.advance_round(start.game_id).await.unwrap();
    assert_eq!(next.round_number, 2);
    assert!(!next.headline.is_empty());
}

#[tokio::test]
async fn completed_game_cannot_advance() {
    let engine = engine();
    let start = engine.create_session().await.unwrap();
    finish_game(&engine, start.game_id, 5).await;

    let err = engine.advance_round(start.game_id).await.unwrap_err();
    assert!(matches!(err, NewsMapError::GameAlreadyComplete));

    // And the rounds are untouched: the summary still adds up.
    let summary = engine.get_summary(start.game_id).await.unwrap();
    let sum: u32 = summary.rounds_summary.iter().map(|r| r.score).sum();
    assert_eq!(summary.total_score, sum);
}

#[tokio::test]
async fn summary_is_gated_on_completion() {
    let engine = engine();
    let start = engine.create_session().await.unwrap();

    let err = engine.get_summary(start.game_id).await.unwrap_err();
    assert!(matches!(err, NewsMapError::GameNotComplete));

    engine.submit_guess(start.game_id, ORIGIN).await.unwrap();
    let err = engine.get_summary(start.game_id).await.unwrap_err();
    assert!(matches!(err, NewsMapError::GameNotComplete));
}

#[tokio::test]
async fn summary_aggregates_all_rounds() {
    let engine = engine();
    let start = engine.create_session().await.unwrap();
    finish_game(&engine, start.game_id, 5).await;

    let summary = engine.get_summary(start.game_id).await.unwrap();
    assert_eq!(summary.game_id, start.game_id);
    assert_eq!(summary.max_possible_score, 5000);
    assert_eq!(summary.rounds_summary.len(), 5);
    assert!(summary.total_score <= summary.max_possible_score);
    assert!(summary.average_distance_km >= 0.0);

    let numbers: Vec<usize> = summary.rounds_summary.iter().map(|r| r.round_number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5]);

    let expected_avg = summary
        .rounds_summary
        .iter()
        .map(|r| r.distance_km)
        .sum::<f64>()
        / 5.0;
    assert!((summary.average_distance_km - expected_avg).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// Session lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_session_is_not_found() {
    let engine = engine();
    let missing = Uuid::new_v4();

    assert!(matches!(
        engine.submit_guess(missing, ORIGIN).await.unwrap_err(),
        NewsMapError::SessionNotFound
    ));
    assert!(matches!(
        engine.advance_round(missing).await.unwrap_err(),
        NewsMapError::SessionNotFound
    ));
    assert!(matches!(
        engine.get_summary(missing).await.unwrap_err(),
        NewsMapError::SessionNotFound
    ));
}

#[tokio::test]
async fn idle_sessions_expire() {
    let engine = engine_with(world(), vec![], 5, Duration::ZERO);
    let start = engine.create_session().await.unwrap();

    let err = engine.submit_guess(start.game_id, ORIGIN).await.unwrap_err();
    assert!(matches!(err, NewsMapError::SessionNotFound));
}
