// Game session engine: orchestrates round progression, draws headlines via
// the cache for randomly chosen locations, evaluates guesses, and aggregates
// results into a final summary.

use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;
use tracing::{info, warn};
use uuid::Uuid;

use newsmap_common::{
    GameStart, GameSummary, GeoPoint, GuessResult, Headline, NewsMapError, NextRound, RoundSummary,
};
use newsmap_headlines::HeadlineCache;

use crate::directory::LocationDirectory;
use crate::session::{GameSession, SessionState};
use crate::store::SessionStore;
use crate::{distance, scoring};

pub struct GameEngine {
    directory: Arc<LocationDirectory>,
    headlines: Arc<HeadlineCache>,
    sessions: SessionStore,
    round_count: usize,
    session_ttl: Duration,
}

impl GameEngine {
    pub fn new(
        directory: Arc<LocationDirectory>,
        headlines: Arc<HeadlineCache>,
        round_count: usize,
        session_ttl: Duration,
    ) -> Self {
        Self {
            directory,
            headlines,
            sessions: SessionStore::new(),
            round_count,
            session_ttl,
        }
    }

    /// Start a new game: sample distinct locations, fetch the round-1
    /// headline, store the session. The true locations are never part of
    /// the response.
    pub async fn create_session(&self) -> Result<GameStart, NewsMapError> {
        self.sessions.evict_stale(self.session_ttl).await;

        let available = self.directory.len();
        if available < self.round_count {
            return Err(NewsMapError::InsufficientLocations {
                available,
                needed: self.round_count,
            });
        }

        // Shuffle the whole directory: the first N ids are the rounds, the
        // rest are spares for headline-failure substitution.
        let mut ids: Vec<String> = self
            .directory
            .all()
            .iter()
            .map(|l| l.location_id.clone())
            .collect();
        ids.shuffle(&mut rand::rng());

        let mut session = GameSession::new(self.round_count, ids);
        let headline = self.start_round(&mut session).await?;

        let game_id = session.id;
        let total_rounds = session.total_rounds();
        self.sessions.insert(session).await;

        info!(session_id = %game_id, rounds = total_rounds, "Started new game");

        Ok(GameStart {
            game_id,
            total_rounds,
            current_round_number: 1,
            headline: headline.title,
        })
    }

    /// Score a guess for the current round and reveal the true location.
    pub async fn submit_guess(
        &self,
        session_id: Uuid,
        guess: GeoPoint,
    ) -> Result<GuessResult, NewsMapError> {
        if !guess.is_valid() {
            return Err(NewsMapError::InvalidCoordinates {
                lat: guess.lat,
                lng: guess.lng,
            });
        }

        let entry = self
            .sessions
            .get(session_id, self.session_ttl)
            .await
            .ok_or(NewsMapError::SessionNotFound)?;
        let mut session = entry.lock().await;
        session.touch();

        let location_id = match session.current_round() {
            Some(round) => round.location_id.clone(),
            None => return Err(NewsMapError::SessionNotFound),
        };
        let location = self
            .directory
            .lookup(&location_id)
            .ok_or_else(|| NewsMapError::LocationNotFound(location_id.clone()))?
            .clone();

        let distance_km = distance::haversine_km(guess, location.point());
        let round_score = scoring::score(distance_km);

        let (round_number, is_final) = session.resolve_guess(guess, distance_km, round_score)?;
        let total_score = session.total_score;

        info!(
            session_id = %session_id,
            round = round_number,
            distance_km,
            score = round_score,
            total = total_score,
            "Guess scored"
        );

        Ok(GuessResult {
            correct_location: location,
            guess_location: guess,
            distance_km,
            round_score,
            total_score,
            current_round_number: round_number,
            is_final_round: is_final,
        })
    }

    /// Move a resolved session on to its next round and fetch that round's
    /// headline. On headline failure the session stays resolved, so the
    /// caller may retry.
    pub async fn advance_round(&self, session_id: Uuid) -> Result<NextRound, NewsMapError> {
        let entry = self
            .sessions
            .get(session_id, self.session_ttl)
            .await
            .ok_or(NewsMapError::SessionNotFound)?;
        let mut session = entry.lock().await;
        session.touch();

        match session.state {
            SessionState::Completed => return Err(NewsMapError::GameAlreadyComplete),
            SessionState::AwaitingGuess => return Err(NewsMapError::RoundNotResolved),
            SessionState::RoundResolved => {}
        }

        let headline = self.start_round(&mut session).await?;
        Ok(NextRound {
            round_number: session.rounds().len(),
            headline: headline.title,
        })
    }

    /// Final statistics. Only available once every round is resolved.
    pub async fn get_summary(&self, session_id: Uuid) -> Result<GameSummary, NewsMapError> {
        let entry = self
            .sessions
            .get(session_id, self.session_ttl)
            .await
            .ok_or(NewsMapError::SessionNotFound)?;
        let session = entry.lock().await;

        if session.state != SessionState::Completed {
            return Err(NewsMapError::GameNotComplete);
        }

        let mut rounds_summary = Vec::with_capacity(session.rounds().len());
        let mut total_distance = 0.0;
        for round in session.rounds() {
            let Some(outcome) = &round.outcome else {
                continue;
            };
            let (city, country) = self
                .directory
                .lookup(&round.location_id)
                .map(|l| (l.city.clone(), l.country.clone()))
                .unwrap_or_else(|| ("Unknown".to_string(), "Unknown".to_string()));
            total_distance += outcome.distance_km;
            rounds_summary.push(RoundSummary {
                round_number: round.number,
                city,
                country,
                headline: round.headline.title.clone(),
                distance_km: outcome.distance_km,
                score: outcome.score,
            });
        }

        let average_distance_km = if rounds_summary.is_empty() {
            0.0
        } else {
            total_distance / rounds_summary.len() as f64
        };
        let max_possible_score = session.total_rounds() as u32 * scoring::MAX_ROUND_SCORE;

        info!(
            session_id = %session_id,
            total_score = session.total_score,
            average_distance_km,
            "Game results"
        );

        Ok(GameSummary {
            game_id: session.id,
            total_score: session.total_score,
            max_possible_score,
            average_distance_km,
            rounds_summary,
        })
    }

    /// Begin the next round, substituting spare locations until a headline
    /// is available. A round is never exposed in a headline-less state.
    async fn start_round(&self, session: &mut GameSession) -> Result<Headline, NewsMapError> {
        loop {
            let location_id = session
                .next_location_id()
                .ok_or(NewsMapError::GameAlreadyComplete)?
                .to_string();
            let location = self
                .directory
                .lookup(&location_id)
                .ok_or_else(|| NewsMapError::LocationNotFound(location_id.clone()))?;

            match self.headlines.get(location).await {
                Ok(headline) => {
                    session.begin_round(headline.clone());
                    return Ok(headline);
                }
                Err(e) => {
                    warn!(location_id, error = %e, "No headline for location, trying a spare");
                    if !session.substitute_next_location() {
                        return Err(NewsMapError::HeadlinesUnavailable);
                    }
                }
            }
        }
    }
}
