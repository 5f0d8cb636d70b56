//! Competition ranking within an event.
//!
//! Lower gross score is better. Tied scores share a rank and the next score
//! skips past the whole tie group (72, 75, 75, 80 ranks 1, 2, 2, 4). Rank
//! depends only on the multiset of scores, never on submission order.

use crate::models::Round;

/// Rank a score against a set of scores.
///
/// Returns `None` when there is no target score or no scores to rank against.
pub fn rank_for_score<I>(scores: I, target: Option<i32>) -> Option<u32>
where
    I: IntoIterator<Item = i32>,
{
    let target = target?;
    let mut seen_any = false;
    let mut better = 0u32;

    for score in scores {
        seen_any = true;
        if score < target {
            better += 1;
        }
    }

    seen_any.then_some(better + 1)
}

/// Rank `target_score` among the scored rounds of one event.
pub fn rank<'a, I>(event_rounds: I, target_score: Option<i32>) -> Option<u32>
where
    I: IntoIterator<Item = &'a Round>,
{
    rank_for_score(
        event_rounds.into_iter().filter_map(|r| r.gross_score),
        target_score,
    )
}

/// Rank every score in a slice, preserving order.
pub fn rank_all(scores: &[Option<i32>]) -> Vec<Option<u32>> {
    let scored: Vec<i32> = scores.iter().flatten().copied().collect();
    scores
        .iter()
        .map(|score| rank_for_score(scored.iter().copied(), *score))
        .collect()
}
