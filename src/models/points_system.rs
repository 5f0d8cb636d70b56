//! Points system configuration and points breakdowns.
//!
//! A league scores its events in one of two modes. Every numeric field is
//! optional; missing or malformed values resolve to the `DEFAULT_*` constants
//! below instead of failing, so a half-configured league still scores.

use std::collections::{BTreeMap, HashMap};

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use super::LeagueId;

pub const DEFAULT_LEAGUE_BIRDIE_BONUS: u32 = 1;
pub const DEFAULT_LEAGUE_EAGLE_BONUS: u32 = 3;
pub const DEFAULT_LEAGUE_HOLE_IN_ONE_BONUS: u32 = 5;
pub const DEFAULT_LEAGUE_PARTICIPATION: u32 = 1;

pub const DEFAULT_LEGACY_BASE: f64 = 10.0;
pub const DEFAULT_LEGACY_BIRDIE: f64 = 2.0;
pub const DEFAULT_LEGACY_EAGLE: f64 = 5.0;
pub const DEFAULT_LEGACY_HOLE_IN_ONE: f64 = 10.0;
pub const DEFAULT_LEGACY_MAJOR_MULTIPLIER: f64 = 2.0;

/// Whatever a config or league document put in a numeric slot.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Int(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

impl RawNumber {
    /// A finite, non-negative number, or `None`.
    fn to_f64(&self) -> Option<f64> {
        let value = match self {
            RawNumber::Int(n) => Some(*n as f64),
            RawNumber::Float(f) => Some(*f),
            RawNumber::Text(s) => s.trim().parse::<f64>().ok(),
            RawNumber::Other(_) => None,
        };
        value.filter(|v| v.is_finite() && *v >= 0.0)
    }

    fn to_points(&self) -> Option<u32> {
        self.to_f64()
            .filter(|v| *v <= u32::MAX as f64)
            .map(|v| v.round_ties_even() as u32)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTable {
    Map(BTreeMap<String, RawNumber>),
    List(Vec<RawNumber>),
    Other(IgnoredAny),
}

fn lenient_points<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(raw.and_then(|raw| {
        let points = raw.to_points();
        if points.is_none() {
            warn!("Ignoring malformed points value {:?}, using default", raw);
        }
        points
    }))
}

fn lenient_factor<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(raw.and_then(|raw| {
        let factor = raw.to_f64();
        if factor.is_none() {
            warn!("Ignoring malformed scoring factor {:?}, using default", raw);
        }
        factor
    }))
}

/// Like `lenient_factor`, but a zero multiplier would wipe out every major
/// round, so it falls back to the default as well.
fn lenient_multiplier<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let factor = lenient_factor(deserializer)?;
    Ok(factor.filter(|f| {
        if *f == 0.0 {
            warn!("Ignoring zero major multiplier, using default");
        }
        *f > 0.0
    }))
}

/// Accepts `{ "1" = 10, "2" = 6 }` or `[10, 6]` (index 0 is rank 1).
/// Entries that are not a positive rank with a numeric value are dropped.
fn lenient_table<'de, D>(deserializer: D) -> Result<BTreeMap<u32, u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawTable>::deserialize(deserializer)?;
    let mut table = BTreeMap::new();

    match raw {
        None => {}
        Some(RawTable::Map(entries)) => {
            for (key, value) in entries {
                let rank = key.trim().parse::<u32>().ok().filter(|r| *r > 0);
                match (rank, value.to_points()) {
                    (Some(rank), Some(points)) => {
                        table.insert(rank, points);
                    }
                    _ => warn!("Dropping placement entry {:?} => {:?}", key, value),
                }
            }
        }
        Some(RawTable::List(values)) => {
            for (i, value) in values.iter().enumerate() {
                match value.to_points() {
                    Some(points) => {
                        table.insert(i as u32 + 1, points);
                    }
                    None => warn!("Dropping placement entry for rank {}: {:?}", i + 1, value),
                }
            }
        }
        Some(RawTable::Other(_)) => warn!("Placement table is not a table or list, ignoring"),
    }

    Ok(table)
}

fn serialize_table<S>(table: &BTreeMap<u32, u32>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(table.iter().map(|(rank, points)| (rank.to_string(), points)))
}

/// Placement-based scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeagueScoring {
    /// Rank -> points. Ranks without an entry earn nothing.
    #[serde(
        default,
        deserialize_with = "lenient_table",
        serialize_with = "serialize_table"
    )]
    pub placement: BTreeMap<u32, u32>,

    #[serde(default, deserialize_with = "lenient_points", skip_serializing_if = "Option::is_none")]
    pub birdie_bonus: Option<u32>,

    #[serde(default, deserialize_with = "lenient_points", skip_serializing_if = "Option::is_none")]
    pub eagle_bonus: Option<u32>,

    #[serde(default, deserialize_with = "lenient_points", skip_serializing_if = "Option::is_none")]
    pub hole_in_one_bonus: Option<u32>,

    #[serde(default, deserialize_with = "lenient_points", skip_serializing_if = "Option::is_none")]
    pub participation: Option<u32>,
}

impl LeagueScoring {
    pub fn with_placement(mut self, table: impl IntoIterator<Item = (u32, u32)>) -> Self {
        self.placement = table.into_iter().collect();
        self
    }

    pub fn with_bonuses(mut self, birdie: u32, eagle: u32, hole_in_one: u32) -> Self {
        self.birdie_bonus = Some(birdie);
        self.eagle_bonus = Some(eagle);
        self.hole_in_one_bonus = Some(hole_in_one);
        self
    }

    pub fn with_participation(mut self, points: u32) -> Self {
        self.participation = Some(points);
        self
    }

    /// Table lookup. Never extrapolated past the last entry.
    pub fn placement_points(&self, rank: Option<u32>) -> u32 {
        rank.and_then(|r| self.placement.get(&r).copied())
            .unwrap_or(0)
    }

    pub fn birdie_points(&self) -> u32 {
        self.birdie_bonus.unwrap_or(DEFAULT_LEAGUE_BIRDIE_BONUS)
    }

    pub fn eagle_points(&self) -> u32 {
        self.eagle_bonus.unwrap_or(DEFAULT_LEAGUE_EAGLE_BONUS)
    }

    pub fn hole_in_one_points(&self) -> u32 {
        self.hole_in_one_bonus
            .unwrap_or(DEFAULT_LEAGUE_HOLE_IN_ONE_BONUS)
    }

    pub fn participation_points(&self) -> u32 {
        self.participation.unwrap_or(DEFAULT_LEAGUE_PARTICIPATION)
    }
}

/// Flat per-round formula used before leagues had placement tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyScoring {
    #[serde(default, deserialize_with = "lenient_factor", skip_serializing_if = "Option::is_none")]
    pub base: Option<f64>,

    #[serde(default, deserialize_with = "lenient_factor", skip_serializing_if = "Option::is_none")]
    pub birdie: Option<f64>,

    #[serde(default, deserialize_with = "lenient_factor", skip_serializing_if = "Option::is_none")]
    pub eagle: Option<f64>,

    #[serde(default, deserialize_with = "lenient_factor", skip_serializing_if = "Option::is_none")]
    pub hole_in_one: Option<f64>,

    #[serde(default, deserialize_with = "lenient_multiplier", skip_serializing_if = "Option::is_none")]
    pub major_multiplier: Option<f64>,
}

impl LegacyScoring {
    pub fn base_points(&self) -> f64 {
        self.base.unwrap_or(DEFAULT_LEGACY_BASE)
    }

    pub fn birdie_points(&self) -> f64 {
        self.birdie.unwrap_or(DEFAULT_LEGACY_BIRDIE)
    }

    pub fn eagle_points(&self) -> f64 {
        self.eagle.unwrap_or(DEFAULT_LEGACY_EAGLE)
    }

    pub fn hole_in_one_points(&self) -> f64 {
        self.hole_in_one.unwrap_or(DEFAULT_LEGACY_HOLE_IN_ONE)
    }

    pub fn major_multiplier(&self) -> f64 {
        self.major_multiplier
            .filter(|m| *m > 0.0)
            .unwrap_or(DEFAULT_LEGACY_MAJOR_MULTIPLIER)
    }
}

/// The scoring mode active for a league.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PointsSystem {
    League(LeagueScoring),
    Legacy(LegacyScoring),
}

impl Default for PointsSystem {
    fn default() -> Self {
        PointsSystem::Legacy(LegacyScoring::default())
    }
}

impl PointsSystem {
    /// Parse a league's points document, falling back to the legacy default
    /// when it cannot be read at all (unknown mode, not an object).
    pub fn from_json_lenient(value: &serde_json::Value) -> Self {
        match serde_json::from_value(value.clone()) {
            Ok(system) => system,
            Err(e) => {
                warn!("Unreadable points system ({}), falling back to legacy", e);
                PointsSystem::default()
            }
        }
    }

    pub fn mode_name(&self) -> &'static str {
        match self {
            PointsSystem::League(_) => "league",
            PointsSystem::Legacy(_) => "legacy",
        }
    }
}

/// Bonus events that occurred at least once in a round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BonusFlags {
    pub birdie: bool,
    pub eagle: bool,
    pub hole_in_one: bool,
}

/// How a round's points were produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PointsBreakdown {
    League {
        placement: u32,
        bonus: u32,
        participation: u32,
        total: u32,
    },
    Legacy {
        base: f64,
        extras: f64,
        multiplier: f64,
        total: u32,
    },
}

impl PointsBreakdown {
    pub fn total(&self) -> u32 {
        match self {
            PointsBreakdown::League { total, .. } | PointsBreakdown::Legacy { total, .. } => *total,
        }
    }
}

/// Points systems per league, with the fallback used for open events and
/// leagues that never configured one.
#[derive(Debug, Clone, Default)]
pub struct PointsRegistry {
    default: PointsSystem,
    leagues: HashMap<LeagueId, PointsSystem>,
}

impl PointsRegistry {
    pub fn new(default: PointsSystem) -> Self {
        Self {
            default,
            leagues: HashMap::new(),
        }
    }

    pub fn with_league(mut self, league_id: LeagueId, system: PointsSystem) -> Self {
        self.leagues.insert(league_id, system);
        self
    }

    pub fn for_league(&self, league_id: Option<&LeagueId>) -> &PointsSystem {
        league_id
            .and_then(|id| self.leagues.get(id))
            .unwrap_or(&self.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_league_defaults() {
        let league = LeagueScoring::default();
        assert_eq!(league.birdie_points(), DEFAULT_LEAGUE_BIRDIE_BONUS);
        assert_eq!(league.eagle_points(), DEFAULT_LEAGUE_EAGLE_BONUS);
        assert_eq!(league.hole_in_one_points(), DEFAULT_LEAGUE_HOLE_IN_ONE_BONUS);
        assert_eq!(league.participation_points(), DEFAULT_LEAGUE_PARTICIPATION);
        assert_eq!(league.placement_points(Some(1)), 0);
    }

    #[test]
    fn test_legacy_defaults() {
        let legacy = LegacyScoring::default();
        assert_eq!(legacy.base_points(), DEFAULT_LEGACY_BASE);
        assert_eq!(legacy.major_multiplier(), DEFAULT_LEGACY_MAJOR_MULTIPLIER);
    }

    #[test]
    fn test_placement_points_not_extrapolated() {
        let league = LeagueScoring::default().with_placement([(1, 10), (2, 6), (3, 4)]);
        assert_eq!(league.placement_points(Some(1)), 10);
        assert_eq!(league.placement_points(Some(3)), 4);
        assert_eq!(league.placement_points(Some(4)), 0);
        assert_eq!(league.placement_points(None), 0);
    }

    #[test]
    fn test_parse_league_system_from_json() {
        let system: PointsSystem = serde_json::from_value(json!({
            "mode": "league",
            "placement": { "1": 10, "2": 6, "3": 4 },
            "birdie_bonus": 2,
            "participation": 1
        }))
        .unwrap();

        let expected = PointsSystem::League(LeagueScoring {
            placement: [(1, 10), (2, 6), (3, 4)].into_iter().collect(),
            birdie_bonus: Some(2),
            eagle_bonus: None,
            hole_in_one_bonus: None,
            participation: Some(1),
        });
        assert_eq!(system, expected);
    }

    #[test]
    fn test_placement_list_form() {
        let system: PointsSystem = serde_json::from_value(json!({
            "mode": "league",
            "placement": [10, 6, 4]
        }))
        .unwrap();

        match system {
            PointsSystem::League(league) => {
                assert_eq!(league.placement_points(Some(1)), 10);
                assert_eq!(league.placement_points(Some(3)), 4);
            }
            other => panic!("expected league mode, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_values_fall_back_to_defaults() {
        let system: PointsSystem = serde_json::from_value(json!({
            "mode": "league",
            "placement": { "1": "ten", "2": "6", "x": 3, "0": 9 },
            "birdie_bonus": "lots",
            "eagle_bonus": -4,
            "hole_in_one_bonus": { "nested": true },
            "participation": null
        }))
        .unwrap();

        match system {
            PointsSystem::League(league) => {
                // "6" is a numeric string and is kept; the rest are dropped
                assert_eq!(league.placement, [(2, 6)].into_iter().collect());
                assert_eq!(league.birdie_points(), DEFAULT_LEAGUE_BIRDIE_BONUS);
                assert_eq!(league.eagle_points(), DEFAULT_LEAGUE_EAGLE_BONUS);
                assert_eq!(league.hole_in_one_points(), DEFAULT_LEAGUE_HOLE_IN_ONE_BONUS);
                assert_eq!(league.participation_points(), DEFAULT_LEAGUE_PARTICIPATION);
            }
            other => panic!("expected league mode, got {:?}", other),
        }
    }

    #[test]
    fn test_legacy_fractional_factors() {
        let system: PointsSystem = serde_json::from_value(json!({
            "mode": "legacy",
            "base": 7.5,
            "major_multiplier": "1.5"
        }))
        .unwrap();

        match system {
            PointsSystem::Legacy(legacy) => {
                assert_eq!(legacy.base_points(), 7.5);
                assert_eq!(legacy.major_multiplier(), 1.5);
                assert_eq!(legacy.birdie_points(), DEFAULT_LEGACY_BIRDIE);
            }
            other => panic!("expected legacy mode, got {:?}", other),
        }
    }

    #[test]
    fn test_legacy_zero_multiplier_uses_default() {
        let system: PointsSystem = serde_json::from_value(json!({
            "mode": "legacy",
            "major_multiplier": 0
        }))
        .unwrap();

        match system {
            PointsSystem::Legacy(legacy) => {
                assert_eq!(legacy.major_multiplier, None);
                assert_eq!(legacy.major_multiplier(), DEFAULT_LEGACY_MAJOR_MULTIPLIER);
            }
            other => panic!("expected legacy mode, got {:?}", other),
        }

        let built = LegacyScoring {
            major_multiplier: Some(0.0),
            ..LegacyScoring::default()
        };
        assert_eq!(built.major_multiplier(), DEFAULT_LEGACY_MAJOR_MULTIPLIER);
    }

    #[test]
    fn test_fractional_points_round_half_to_even() {
        let system: PointsSystem = serde_json::from_value(json!({
            "mode": "league",
            "placement": { "1": 2.5, "2": 3.5 },
            "birdie_bonus": 0.5
        }))
        .unwrap();

        match system {
            PointsSystem::League(league) => {
                assert_eq!(league.placement_points(Some(1)), 2);
                assert_eq!(league.placement_points(Some(2)), 4);
                assert_eq!(league.birdie_points(), 0);
            }
            other => panic!("expected league mode, got {:?}", other),
        }
    }

    #[test]
    fn test_from_json_lenient_unknown_mode() {
        let system = PointsSystem::from_json_lenient(&json!({ "mode": "stableford" }));
        assert_eq!(system, PointsSystem::default());

        let system = PointsSystem::from_json_lenient(&json!("not an object"));
        assert_eq!(system.mode_name(), "legacy");
    }

    #[test]
    fn test_league_system_serialization_round_trip() {
        let system = PointsSystem::League(
            LeagueScoring::default()
                .with_placement([(1, 10), (2, 6)])
                .with_participation(2),
        );
        let json = serde_json::to_value(&system).unwrap();
        assert_eq!(json["mode"], "league");
        assert_eq!(json["placement"]["1"], 10);

        let back: PointsSystem = serde_json::from_value(json).unwrap();
        assert_eq!(back, system);
    }

    #[test]
    fn test_registry_falls_back_to_default() {
        let league_system = PointsSystem::League(LeagueScoring::default());
        let registry = PointsRegistry::default()
            .with_league(LeagueId::from("league-a"), league_system.clone());

        assert_eq!(
            registry.for_league(Some(&LeagueId::from("league-a"))),
            &league_system
        );
        assert_eq!(
            registry.for_league(Some(&LeagueId::from("league-b"))).mode_name(),
            "legacy"
        );
        assert_eq!(registry.for_league(None).mode_name(), "legacy");
    }

    #[test]
    fn test_breakdown_total() {
        let league = PointsBreakdown::League {
            placement: 10,
            bonus: 3,
            participation: 1,
            total: 14,
        };
        assert_eq!(league.total(), 14);

        let legacy = PointsBreakdown::Legacy {
            base: 10.0,
            extras: 6.0,
            multiplier: 2.0,
            total: 32,
        };
        assert_eq!(legacy.total(), 32);
    }
}
