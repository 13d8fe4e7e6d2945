//! Game session engine: round lifecycle, guess evaluation, scoring, and
//! aggregation, plus the read-only location directory it draws from.

pub mod directory;
pub mod distance;
pub mod engine;
pub mod scoring;
pub mod session;
pub mod store;

pub use directory::LocationDirectory;
pub use engine::GameEngine;
pub use session::{GameSession, Round, SessionState};
pub use store::SessionStore;
