//! Event leaderboards and league season tables.

use std::collections::BTreeMap;

use serde::Serialize;

use super::EventKey;
use crate::models::{LeagueId, PlayerId, Round};

/// One player's line in a league table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    /// Competition rank on total points
    pub rank: u32,
    pub player_id: PlayerId,
    pub rounds_played: u32,
    pub total_points: u64,
    /// Events finished at rank 1 (shared wins count)
    pub event_wins: u32,
    pub best_score: Option<i32>,
}

/// Rounds of one event, best rank first. Unranked rounds go last.
pub fn event_leaderboard<'a>(all_rounds: &'a [Round], key: &EventKey) -> Vec<&'a Round> {
    let mut board: Vec<&Round> = all_rounds
        .iter()
        .filter(|r| r.event_key() == *key)
        .collect();
    board.sort_by_key(|r| r.rank.unwrap_or(u32::MAX));
    board
}

/// Season table for a league (`None` for open events).
pub fn league_standings(all_rounds: &[Round], league_id: Option<&LeagueId>) -> Vec<Standing> {
    let mut by_player: BTreeMap<&PlayerId, Standing> = BTreeMap::new();

    for round in all_rounds
        .iter()
        .filter(|r| r.league_id.as_ref() == league_id)
    {
        let entry = by_player
            .entry(&round.player_id)
            .or_insert_with(|| Standing {
                rank: 0,
                player_id: round.player_id.clone(),
                rounds_played: 0,
                total_points: 0,
                event_wins: 0,
                best_score: None,
            });

        if round.did_play {
            entry.rounds_played += 1;
        }
        entry.total_points += u64::from(round.points);
        if round.rank == Some(1) {
            entry.event_wins += 1;
        }
        if let Some(gross) = round.gross_score {
            entry.best_score = Some(entry.best_score.map_or(gross, |best| best.min(gross)));
        }
    }

    let mut table: Vec<Standing> = by_player.into_values().collect();
    let totals: Vec<u64> = table.iter().map(|s| s.total_points).collect();
    for standing in &mut table {
        let ahead = totals
            .iter()
            .filter(|t| **t > standing.total_points)
            .count();
        standing.rank = ahead as u32 + 1;
    }

    // Player id only orders the display of tied lines
    table.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.player_id.cmp(&b.player_id)));
    table
}
