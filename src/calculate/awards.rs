//! Badge and trophy triggers, plus idempotent granting.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::models::{Award, AwardKind, AwardSet, Round};

/// Gross score below which Break 90 is earned.
pub const BREAK_90: i32 = 90;

/// Gross score below which Break 80 is earned.
pub const BREAK_80: i32 = 80;

/// Birdies needed in one round for Birdie Fest.
pub const BIRDIE_FEST_MIN: u32 = 5;

/// The player's other rounds. `round` itself is excluded by id.
pub fn prior_rounds_for_player<'a>(all_rounds: &'a [Round], round: &Round) -> Vec<&'a Round> {
    all_rounds
        .iter()
        .filter(|r| r.player_id == round.player_id && r.id != round.id)
        .collect()
}

/// Every award `round` qualifies for. Score-based awards need a gross score.
pub fn evaluate_awards(round: &Round, prior_rounds_for_player: &[&Round]) -> AwardSet {
    let mut set = AwardSet::default();

    if prior_rounds_for_player.is_empty() {
        set.insert(AwardKind::FirstRound);
    }
    if round.birdies > 0 {
        set.insert(AwardKind::FirstBirdie);
    }
    if round.eagles > 0 {
        set.insert(AwardKind::EagleClub);
    }
    if round.hole_in_ones > 0 {
        set.insert(AwardKind::HoleInOne);
    }
    if let Some(gross) = round.gross_score {
        if gross < BREAK_90 {
            set.insert(AwardKind::Break90);
        }
        if gross < BREAK_80 {
            set.insert(AwardKind::Break80);
        }
    }
    if round.to_par().is_some_and(|to_par| to_par <= 0) {
        set.insert(AwardKind::ParOrBetter);
    }
    if round.birdies >= BIRDIE_FEST_MIN {
        set.insert(AwardKind::BirdieFest);
    }
    if round.is_major {
        set.insert(AwardKind::MajorDay);
    }

    debug!("Round {} qualifies for {} awards", round.id, set.len());
    set
}

/// Add `award` unless the player already holds its key.
///
/// Returns false (and leaves `held` alone, original timestamp included) when
/// the key is already held.
pub fn grant(held: &mut Vec<Award>, award: Award) -> bool {
    let already = held
        .iter()
        .any(|a| a.player_id == award.player_id && a.key == award.key);
    if already {
        return false;
    }
    held.push(award);
    true
}

/// Grant everything in `set` for `round`, returning only the new awards.
pub fn award_delta(
    held: &mut Vec<Award>,
    round: &Round,
    set: &AwardSet,
    earned_at: DateTime<Utc>,
) -> Vec<Award> {
    let mut delta = Vec::new();
    for kind in set.iter() {
        let award = Award::new(kind, round.player_id.clone(), round.id.clone(), earned_at);
        if grant(held, award.clone()) {
            delta.push(award);
        }
    }

    if !delta.is_empty() {
        info!(
            "Player {} earned {} new awards from round {}",
            round.player_id,
            delta.len(),
            round.id
        );
    }
    delta
}
