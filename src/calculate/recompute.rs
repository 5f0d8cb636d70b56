//! Event recomputation.
//!
//! Whenever an event's round set changes, every member is re-ranked and
//! re-scored against the new set, including rounds submitted long before.
//! Rounds in other events come back untouched and in their original order.
//! The returned collection must be persisted as one write.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use super::{points_for_round, rank_for_score, EventKey};
use crate::models::{
    DuplicatePolicy, PlayerId, PointsBreakdown, PointsRegistry, PointsSystem, Round,
};

/// What a draft would receive if it were submitted now.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringPreview {
    pub event_key: EventKey,
    pub rank: Option<u32>,
    pub breakdown: Option<PointsBreakdown>,
    /// Rounds in the event, the draft included
    pub field_size: usize,
}

impl ScoringPreview {
    pub fn points(&self) -> u32 {
        self.breakdown.as_ref().map_or(0, PointsBreakdown::total)
    }
}

/// Which members count for ranking under `policy`, parallel to `members`.
fn counted_members(members: &[&Round], policy: DuplicatePolicy) -> Vec<bool> {
    if policy == DuplicatePolicy::KeepAll {
        return vec![true; members.len()];
    }

    let mut chosen: HashMap<&PlayerId, usize> = HashMap::new();
    for (i, round) in members.iter().enumerate() {
        let current = match chosen.get(&round.player_id) {
            Some(&current) => current,
            None => {
                chosen.insert(&round.player_id, i);
                continue;
            }
        };
        let incumbent = members[current];

        let replace = match policy {
            DuplicatePolicy::KeepAll => false,
            DuplicatePolicy::BestPerPlayer => match (round.gross_score, incumbent.gross_score) {
                (Some(score), Some(best)) => {
                    score < best
                        || (score == best && round.submitted_at < incumbent.submitted_at)
                }
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => round.submitted_at >= incumbent.submitted_at,
            },
            DuplicatePolicy::LatestPerPlayer => round.submitted_at >= incumbent.submitted_at,
        };

        if replace {
            chosen.insert(&round.player_id, i);
        }
    }

    let keep: HashSet<usize> = chosen.into_values().collect();
    (0..members.len()).map(|i| keep.contains(&i)).collect()
}

/// Re-rank and re-score every round in `rounds` whose key is `key`.
/// Returns the number of event members.
pub fn rescore_event(
    rounds: &mut [Round],
    key: &EventKey,
    system: &PointsSystem,
    policy: DuplicatePolicy,
) -> usize {
    let member_idx: Vec<usize> = rounds
        .iter()
        .enumerate()
        .filter(|(_, r)| r.event_key() == *key)
        .map(|(i, _)| i)
        .collect();

    let members: Vec<&Round> = member_idx.iter().map(|&i| &rounds[i]).collect();
    let counted = counted_members(&members, policy);

    let field: Vec<i32> = members
        .iter()
        .zip(&counted)
        .filter(|(_, counts)| **counts)
        .filter_map(|(r, _)| r.gross_score)
        .collect();

    let results: Vec<Option<(Option<u32>, PointsBreakdown)>> = members
        .iter()
        .zip(&counted)
        .map(|(round, counts)| {
            if !counts {
                debug!("Round {} superseded under {} policy", round.id, policy);
                return None;
            }
            let rank = rank_for_score(field.iter().copied(), round.gross_score);
            Some((rank, points_for_round(system, rank, round)))
        })
        .collect();

    for (&i, result) in member_idx.iter().zip(results) {
        let round = &mut rounds[i];
        match result {
            Some((rank, breakdown)) => {
                round.rank = rank;
                round.points = breakdown.total();
                round.breakdown = Some(breakdown);
            }
            None => round.clear_scoring(),
        }
    }

    member_idx.len()
}

/// Upsert `changed` (matched by id) and recompute its event.
///
/// If the round moved between events (course, date, or league edited), the
/// event it left is recomputed too, with that event's own league system.
pub fn recompute_event(
    all_rounds: &[Round],
    changed: &Round,
    registry: &PointsRegistry,
    policy: DuplicatePolicy,
) -> Vec<Round> {
    let mut rounds = all_rounds.to_vec();
    let key = changed.event_key();

    let previous = match rounds.iter().position(|r| r.id == changed.id) {
        Some(i) => {
            let left = (rounds[i].event_key(), rounds[i].league_id.clone());
            rounds[i] = changed.clone();
            Some(left)
        }
        None => {
            rounds.push(changed.clone());
            None
        }
    };

    let system = registry.for_league(changed.league_id.as_ref());
    let members = rescore_event(&mut rounds, &key, system, policy);
    info!("Recomputed {} rounds for event {}", members, key);

    if let Some((previous, league_id)) = previous.filter(|(previous, _)| *previous != key) {
        let system = registry.for_league(league_id.as_ref());
        let members = rescore_event(&mut rounds, &previous, system, policy);
        info!(
            "Round {} left event {}, recomputed {} remaining rounds",
            changed.id, previous, members
        );
    }

    rounds
}

/// Recompute every event in the collection, each with its league's system.
pub fn recompute_all(
    all_rounds: &[Round],
    registry: &PointsRegistry,
    policy: DuplicatePolicy,
) -> Vec<Round> {
    let mut rounds = all_rounds.to_vec();

    let mut seen = HashSet::new();
    let events: Vec<(EventKey, PointsSystem)> = rounds
        .iter()
        .filter(|r| seen.insert(r.event_key()))
        .map(|r| {
            (
                r.event_key(),
                registry.for_league(r.league_id.as_ref()).clone(),
            )
        })
        .collect();

    for (key, system) in &events {
        rescore_event(&mut rounds, key, system, policy);
    }

    info!(
        "Recomputed {} events across {} rounds",
        events.len(),
        rounds.len()
    );
    rounds
}

/// Rank and points `draft` would get if submitted, without changing anything.
pub fn preview(
    all_rounds: &[Round],
    draft: &Round,
    system: &PointsSystem,
    policy: DuplicatePolicy,
) -> ScoringPreview {
    let key = draft.event_key();
    let mut rounds: Vec<Round> = all_rounds
        .iter()
        .filter(|r| r.event_key() == key && r.id != draft.id)
        .cloned()
        .collect();
    rounds.push(draft.clone());

    let field_size = rescore_event(&mut rounds, &key, system, policy);
    let scored = rounds.last();

    ScoringPreview {
        event_key: key,
        rank: scored.and_then(|r| r.rank),
        breakdown: scored.and_then(|r| r.breakdown.clone()),
        field_size,
    }
}
