//! Scoring engine.
//!
//! Pure functions over round collections:
//! - Event identity (which rounds compete against each other)
//! - Competition ranking within an event
//! - Points under league or legacy scoring
//! - Event recomputation after every submission
//! - Badge/trophy triggers
//! - Leaderboards and league standings
//!
//! Nothing here performs I/O. Callers load rounds, hand them in, and persist
//! whatever comes back.

mod awards;
mod event_key;
mod points;
mod rank;
mod recompute;
mod standings;

pub use awards::*;
pub use event_key::*;
pub use points::*;
pub use rank::*;
pub use recompute::*;
pub use standings::*;
