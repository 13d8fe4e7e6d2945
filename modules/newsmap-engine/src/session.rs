// Per-session game state: a fixed sequence of rounds plus the state machine
// that gates guess submission and round advancement.

use std::time::{Duration, Instant};

use uuid::Uuid;

use newsmap_common::{GeoPoint, Headline, NewsMapError};

/// Lifecycle of a session. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingGuess,
    RoundResolved,
    Completed,
}

/// A resolved guess. Written exactly once per round.
#[derive(Debug, Clone)]
pub struct GuessOutcome {
    pub guess: GeoPoint,
    pub distance_km: f64,
    pub score: u32,
}

/// One headline-guess-score cycle. Created when the engine advances to it;
/// immutable once scored.
#[derive(Debug, Clone)]
pub struct Round {
    pub number: usize,
    pub location_id: String,
    pub headline: Headline,
    pub outcome: Option<GuessOutcome>,
}

/// One complete game instance. The pre-chosen location ids never grow or
/// shrink after creation; spares exist only to substitute a location whose
/// headline fetch fails, before its round is ever shown to the player.
pub struct GameSession {
    pub id: Uuid,
    locations: Vec<String>,
    spares: Vec<String>,
    rounds: Vec<Round>,
    pub total_score: u32,
    pub state: SessionState,
    last_activity: Instant,
}

impl GameSession {
    /// Split a without-replacement sample into the played locations (first
    /// `round_count`) and spares (the rest). Callers guarantee
    /// `ids.len() >= round_count`.
    pub fn new(round_count: usize, mut ids: Vec<String>) -> Self {
        let spares = ids.split_off(round_count);
        Self {
            id: Uuid::new_v4(),
            locations: ids,
            spares,
            rounds: Vec::with_capacity(round_count),
            total_score: 0,
            state: SessionState::AwaitingGuess,
            last_activity: Instant::now(),
        }
    }

    pub fn total_rounds(&self) -> usize {
        self.locations.len()
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// The location id the next round will use, if any round remains.
    pub fn next_location_id(&self) -> Option<&str> {
        self.locations.get(self.rounds.len()).map(String::as_str)
    }

    /// Swap the next round's location for a spare after a headline failure.
    /// Returns false when no spares remain. Never touches started rounds,
    /// so locations stay distinct across the session.
    pub fn substitute_next_location(&mut self) -> bool {
        let Some(spare) = self.spares.pop() else {
            return false;
        };
        self.locations[self.rounds.len()] = spare;
        true
    }

    /// Start the next round with its headline and await a guess.
    pub fn begin_round(&mut self, headline: Headline) {
        let number = self.rounds.len() + 1;
        let location_id = self.locations[self.rounds.len()].clone();
        self.rounds.push(Round {
            number,
            location_id,
            headline,
            outcome: None,
        });
        self.state = SessionState::AwaitingGuess;
    }

    pub fn current_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    /// Record a scored guess for the current round. The absent→present
    /// transition of the outcome happens here and nowhere else.
    /// Returns (round number, is_final_round).
    pub fn resolve_guess(
        &mut self,
        guess: GeoPoint,
        distance_km: f64,
        score: u32,
    ) -> Result<(usize, bool), NewsMapError> {
        match self.state {
            SessionState::Completed => return Err(NewsMapError::GameAlreadyComplete),
            SessionState::RoundResolved => return Err(NewsMapError::RoundAlreadyResolved),
            SessionState::AwaitingGuess => {}
        }

        let is_final = self.rounds.len() == self.locations.len();
        let round = self
            .rounds
            .last_mut()
            .ok_or(NewsMapError::RoundAlreadyResolved)?;
        round.outcome = Some(GuessOutcome {
            guess,
            distance_km,
            score,
        });
        let number = round.number;

        self.total_score += score;
        self.state = if is_final {
            SessionState::Completed
        } else {
            SessionState::RoundResolved
        };
        Ok((number, is_final))
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_activity.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn headline(title: &str) -> Headline {
        Headline {
            title: title.to_string(),
            source: "test".to_string(),
            published_at: String::new(),
            url: "https://example.com".to_string(),
            cached_at: Utc::now(),
        }
    }

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("city-{i}")).collect()
    }

    const GUESS: GeoPoint = GeoPoint { lat: 0.0, lng: 0.0 };

    #[test]
    fn round_count_is_fixed_at_creation() {
        let session = GameSession::new(5, ids(8));
        assert_eq!(session.total_rounds(), 5);
        assert_eq!(session.rounds().len(), 0);
    }

    #[test]
    fn double_resolve_is_a_conflict() {
        let mut session = GameSession::new(2, ids(2));
        session.begin_round(headline("r1"));
        session.resolve_guess(GUESS, 100.0, 900).unwrap();
        assert!(matches!(
            session.resolve_guess(GUESS, 100.0, 900),
            Err(NewsMapError::RoundAlreadyResolved)
        ));
    }

    #[test]
    fn final_round_completes_the_session() {
        let mut session = GameSession::new(2, ids(2));
        session.begin_round(headline("r1"));
        let (number, is_final) = session.resolve_guess(GUESS, 0.0, 1000).unwrap();
        assert_eq!((number, is_final), (1, false));
        assert_eq!(session.state, SessionState::RoundResolved);

        session.begin_round(headline("r2"));
        let (number, is_final) = session.resolve_guess(GUESS, 0.0, 1000).unwrap();
        assert_eq!((number, is_final), (2, true));
        assert_eq!(session.state, SessionState::Completed);
        assert_eq!(session.total_score, 2000);

        assert!(matches!(
            session.resolve_guess(GUESS, 0.0, 1000),
            Err(NewsMapError::GameAlreadyComplete)
        ));
    }

    #[test]
    fn substitution_only_touches_the_unstarted_round() {
        let mut session = GameSession::new(2, vec![
            "a".to_string(),
            "b".to_string(),
            "spare".to_string(),
        ]);
        session.begin_round(headline("r1"));
        session.resolve_guess(GUESS, 0.0, 1000).unwrap();

        assert_eq!(session.next_location_id(), Some("b"));
        assert!(session.substitute_next_location());
        assert_eq!(session.next_location_id(), Some("spare"));
        assert!(!session.substitute_next_location());
        assert_eq!(session.rounds()[0].location_id, "a");
    }

    #[test]
    fn total_score_accumulates_incrementally() {
        let mut session = GameSession::new(3, ids(3));
        for score in [100u32, 250, 400] {
            session.begin_round(headline("r"));
            session.resolve_guess(GUESS, 5000.0, score).unwrap();
        }
        assert_eq!(session.total_score, 750);
    }
}
