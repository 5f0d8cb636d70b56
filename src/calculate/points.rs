//! Points for a ranked round under either scoring mode.

use tracing::debug;

use crate::models::{
    BonusFlags, LeagueScoring, LegacyScoring, PointsBreakdown, PointsSystem, Round,
};

/// League mode: placement + one bonus per bonus type that occurred +
/// participation.
pub fn league_points(
    scoring: &LeagueScoring,
    rank: Option<u32>,
    bonus: BonusFlags,
    did_play: bool,
) -> PointsBreakdown {
    let placement = scoring.placement_points(rank);

    let mut bonus_points = 0;
    if bonus.birdie {
        bonus_points += scoring.birdie_points();
    }
    if bonus.eagle {
        bonus_points += scoring.eagle_points();
    }
    if bonus.hole_in_one {
        bonus_points += scoring.hole_in_one_points();
    }

    let participation = if did_play {
        scoring.participation_points()
    } else {
        0
    };

    PointsBreakdown::League {
        placement,
        bonus: bonus_points,
        participation,
        total: placement
            .saturating_add(bonus_points)
            .saturating_add(participation),
    }
}

/// Legacy mode: `(base + per-count extras) * major multiplier`, rounded half
/// to even. Rank plays no part.
pub fn legacy_points(
    scoring: &LegacyScoring,
    birdies: u32,
    eagles: u32,
    hole_in_ones: u32,
    is_major: bool,
    did_play: bool,
) -> PointsBreakdown {
    let base = if did_play { scoring.base_points() } else { 0.0 };
    let extras = birdies as f64 * scoring.birdie_points()
        + eagles as f64 * scoring.eagle_points()
        + hole_in_ones as f64 * scoring.hole_in_one_points();
    let multiplier = if is_major {
        scoring.major_multiplier()
    } else {
        1.0
    };

    PointsBreakdown::Legacy {
        base,
        extras,
        multiplier,
        total: to_points((base + extras) * multiplier),
    }
}

/// Round half to even and clamp into `u32`.
fn to_points(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.round_ties_even().min(u32::MAX as f64) as u32
}

/// Score a round at the given rank.
pub fn points_for_round(system: &PointsSystem, rank: Option<u32>, round: &Round) -> PointsBreakdown {
    let breakdown = match system {
        PointsSystem::League(scoring) => {
            league_points(scoring, rank, round.bonus_flags(), round.did_play)
        }
        PointsSystem::Legacy(scoring) => legacy_points(
            scoring,
            round.birdies,
            round.eagles,
            round.hole_in_ones,
            round.is_major,
            round.did_play,
        ),
    };

    debug!(
        "Round {} rank {:?} scored {} points ({} mode)",
        round.id,
        rank,
        breakdown.total(),
        system.mode_name()
    );
    breakdown
}
