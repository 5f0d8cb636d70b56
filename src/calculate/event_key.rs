//! Event identity.
//!
//! An event is never stored. Rounds belong to the same event when they share
//! league, date, course, and hole count, compared through [`EventKey`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::LeagueId;

/// League component for rounds with no league.
pub const OPEN_EVENT: &str = "open";

/// Date component for rounds with no date.
pub const UNDATED: &str = "undated";

/// Course component for rounds with a missing or blank course name.
pub const UNKNOWN_COURSE: &str = "unknown-course";

/// Canonical grouping key: `league|date|course|holes`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventKey(String);

impl EventKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventKey({})", self.0)
    }
}

/// Case-fold and trim a course name. Blank names map to [`UNKNOWN_COURSE`].
pub fn normalize_course(course: Option<&str>) -> String {
    match course.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_lowercase(),
        _ => UNKNOWN_COURSE.to_string(),
    }
}

/// Resolve the event a round belongs to. Total over every input.
pub fn event_key(
    league_id: Option<&LeagueId>,
    date: Option<NaiveDate>,
    course: Option<&str>,
    holes: u8,
) -> EventKey {
    let league = league_id.map_or(OPEN_EVENT, |id| id.as_str());
    let date = date.map_or_else(|| UNDATED.to_string(), |d| d.format("%Y-%m-%d").to_string());
    let course = normalize_course(course);

    EventKey(format!("{}|{}|{}|{}", league, date, course, holes))
}
