//! Submitted golf round model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{BonusFlags, EntityId, LeagueId, PlayerId, PointsBreakdown, RoundId, UserId};
use crate::calculate::{event_key, EventKey};

/// Lowest par accepted for a submitted round.
pub const MIN_PAR: i32 = 60;

/// Highest par accepted for a submitted round.
pub const MAX_PAR: i32 = 78;

/// Reasons a round is rejected before submission.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoundValidationError {
    #[error("Hole count must be 9 or 18, got {0}")]
    InvalidHoles(u8),

    #[error("Par must be between {MIN_PAR} and {MAX_PAR}, got {0}")]
    ParOutOfRange(i32),

    #[error("Gross score must be positive, got {0}")]
    InvalidGrossScore(i32),
}

fn default_holes() -> u8 {
    18
}

fn default_par() -> i32 {
    72
}

fn default_did_play() -> bool {
    true
}

/// One player's performance in one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// Unique identifier (derived from player + event key + submission time)
    pub id: RoundId,

    /// The golfer this round belongs to
    pub player_id: PlayerId,

    /// Who entered the round
    pub submitted_by: UserId,

    /// League, or `None` for an open event
    #[serde(default)]
    pub league_id: Option<LeagueId>,

    /// Calendar day the round was played
    #[serde(default)]
    pub date: Option<NaiveDate>,

    /// Course name as typed by the submitter
    #[serde(default)]
    pub course: Option<String>,

    /// 9 or 18
    #[serde(default = "default_holes")]
    pub holes: u8,

    /// Total strokes; `None` while a draft is incomplete
    #[serde(default)]
    pub gross_score: Option<i32>,

    #[serde(default = "default_par")]
    pub par: i32,

    #[serde(default)]
    pub birdies: u32,

    #[serde(default)]
    pub eagles: u32,

    #[serde(default)]
    pub hole_in_ones: u32,

    /// Major-day rounds are multiplied under legacy scoring
    #[serde(default)]
    pub is_major: bool,

    #[serde(default = "default_did_play")]
    pub did_play: bool,

    pub submitted_at: DateTime<Utc>,

    /// Competition rank within the event, set by recomputation
    #[serde(default)]
    pub rank: Option<u32>,

    #[serde(default)]
    pub points: u32,

    #[serde(default)]
    pub breakdown: Option<PointsBreakdown>,
}

impl Round {
    /// Create a new Round with auto-generated ID.
    pub fn new(
        player_id: PlayerId,
        league_id: Option<LeagueId>,
        date: Option<NaiveDate>,
        course: Option<String>,
        holes: u8,
    ) -> Self {
        let mut round = Self {
            id: EntityId::new(String::new()),
            submitted_by: player_id.clone(),
            player_id,
            league_id,
            date,
            course,
            holes,
            gross_score: None,
            par: default_par(),
            birdies: 0,
            eagles: 0,
            hole_in_ones: 0,
            is_major: false,
            did_play: true,
            submitted_at: Utc::now(),
            rank: None,
            points: 0,
            breakdown: None,
        };
        round.id = round.derive_id();
        round
    }

    fn derive_id(&self) -> RoundId {
        EntityId::hashed(&[
            self.player_id.as_str(),
            self.event_key().as_str(),
            &self.submitted_at.to_rfc3339(),
        ])
    }

    /// The event this round competes in.
    pub fn event_key(&self) -> EventKey {
        event_key(
            self.league_id.as_ref(),
            self.date,
            self.course.as_deref(),
            self.holes,
        )
    }

    /// Builder method to set gross score and par.
    pub fn with_score(mut self, gross_score: i32, par: i32) -> Self {
        self.gross_score = Some(gross_score);
        self.par = par;
        self
    }

    /// Builder method to set birdie, eagle, and hole-in-one counts.
    pub fn with_counts(mut self, birdies: u32, eagles: u32, hole_in_ones: u32) -> Self {
        self.birdies = birdies;
        self.eagles = eagles;
        self.hole_in_ones = hole_in_ones;
        self
    }

    pub fn with_major(mut self, is_major: bool) -> Self {
        self.is_major = is_major;
        self
    }

    pub fn with_did_play(mut self, did_play: bool) -> Self {
        self.did_play = did_play;
        self
    }

    /// Builder method for rounds entered on someone else's behalf.
    pub fn with_submitter(mut self, submitted_by: UserId) -> Self {
        self.submitted_by = submitted_by;
        self
    }

    /// Set the submission time. Regenerates the ID.
    pub fn with_submitted_at(mut self, submitted_at: DateTime<Utc>) -> Self {
        self.submitted_at = submitted_at;
        self.id = self.derive_id();
        self
    }

    /// Which bonus events happened at least once.
    pub fn bonus_flags(&self) -> BonusFlags {
        BonusFlags {
            birdie: self.birdies > 0,
            eagle: self.eagles > 0,
            hole_in_one: self.hole_in_ones > 0,
        }
    }

    /// Strokes relative to par, if scored.
    pub fn to_par(&self) -> Option<i32> {
        self.gross_score.map(|gross| gross - self.par)
    }

    /// Drop any derived rank and points.
    pub fn clear_scoring(&mut self) {
        self.rank = None;
        self.points = 0;
        self.breakdown = None;
    }

    /// Basic form validation. The engine itself never rejects rounds.
    pub fn validate(&self) -> Result<(), RoundValidationError> {
        if self.holes != 9 && self.holes != 18 {
            return Err(RoundValidationError::InvalidHoles(self.holes));
        }
        if !(MIN_PAR..=MAX_PAR).contains(&self.par) {
            return Err(RoundValidationError::ParOutOfRange(self.par));
        }
        if let Some(gross) = self.gross_score {
            if gross <= 0 {
                return Err(RoundValidationError::InvalidGrossScore(gross));
            }
        }
        Ok(())
    }
}
