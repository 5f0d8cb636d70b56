//! Badge and trophy models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PlayerId, RoundId};

/// Badges are the everyday awards; trophies mark rarer achievements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AwardTier {
    Badge,
    Trophy,
}

impl std::fmt::Display for AwardTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AwardTier::Badge => write!(f, "badge"),
            AwardTier::Trophy => write!(f, "trophy"),
        }
    }
}

/// Every award a round can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AwardKind {
    FirstRound,
    FirstBirdie,
    EagleClub,
    HoleInOne,
    Break90,
    Break80,
    ParOrBetter,
    BirdieFest,
    MajorDay,
}

impl AwardKind {
    pub const ALL: [AwardKind; 9] = [
        AwardKind::FirstRound,
        AwardKind::FirstBirdie,
        AwardKind::EagleClub,
        AwardKind::HoleInOne,
        AwardKind::Break90,
        AwardKind::Break80,
        AwardKind::ParOrBetter,
        AwardKind::BirdieFest,
        AwardKind::MajorDay,
    ];

    /// Stable key used for idempotent grants.
    pub fn key(&self) -> &'static str {
        match self {
            AwardKind::FirstRound => "first_round",
            AwardKind::FirstBirdie => "first_birdie",
            AwardKind::EagleClub => "eagle_club",
            AwardKind::HoleInOne => "hole_in_one",
            AwardKind::Break90 => "break_90",
            AwardKind::Break80 => "break_80",
            AwardKind::ParOrBetter => "par_or_better",
            AwardKind::BirdieFest => "birdie_fest",
            AwardKind::MajorDay => "major_day",
        }
    }

    pub fn tier(&self) -> AwardTier {
        match self {
            AwardKind::FirstRound
            | AwardKind::FirstBirdie
            | AwardKind::Break90
            | AwardKind::MajorDay => AwardTier::Badge,
            AwardKind::EagleClub
            | AwardKind::HoleInOne
            | AwardKind::Break80
            | AwardKind::ParOrBetter
            | AwardKind::BirdieFest => AwardTier::Trophy,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AwardKind::FirstRound => "First Round",
            AwardKind::FirstBirdie => "First Birdie",
            AwardKind::EagleClub => "Eagle Club",
            AwardKind::HoleInOne => "Hole in One",
            AwardKind::Break90 => "Break 90",
            AwardKind::Break80 => "Break 80",
            AwardKind::ParOrBetter => "Par or Better",
            AwardKind::BirdieFest => "Birdie Fest",
            AwardKind::MajorDay => "Major Day",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AwardKind::FirstRound => "Posted a first round",
            AwardKind::FirstBirdie => "Made a birdie",
            AwardKind::EagleClub => "Made an eagle",
            AwardKind::HoleInOne => "Holed out from the tee",
            AwardKind::Break90 => "Shot under 90",
            AwardKind::Break80 => "Shot under 80",
            AwardKind::ParOrBetter => "Finished at or under par",
            AwardKind::BirdieFest => "Made five or more birdies in one round",
            AwardKind::MajorDay => "Played a major",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            AwardKind::FirstRound => "flag",
            AwardKind::FirstBirdie => "bird",
            AwardKind::EagleClub => "eagle",
            AwardKind::HoleInOne => "target",
            AwardKind::Break90 => "trending-down",
            AwardKind::Break80 => "medal",
            AwardKind::ParOrBetter => "star",
            AwardKind::BirdieFest => "party",
            AwardKind::MajorDay => "crown",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

/// A granted badge or trophy. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Award {
    pub key: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub tier: AwardTier,
    pub player_id: PlayerId,

    /// The round that earned it
    pub round_id: RoundId,

    pub earned_at: DateTime<Utc>,
}

impl Award {
    pub fn new(
        kind: AwardKind,
        player_id: PlayerId,
        round_id: RoundId,
        earned_at: DateTime<Utc>,
    ) -> Self {
        Self {
            key: kind.key().to_string(),
            title: kind.title().to_string(),
            description: kind.description().to_string(),
            icon: kind.icon().to_string(),
            tier: kind.tier(),
            player_id,
            round_id,
            earned_at,
        }
    }

    pub fn kind(&self) -> Option<AwardKind> {
        AwardKind::from_key(&self.key)
    }
}

/// Awards a single round qualifies for, split by tier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwardSet {
    pub badges: Vec<AwardKind>,
    pub trophies: Vec<AwardKind>,
}

impl AwardSet {
    /// Add a kind to its tier's list. Returns false if already present.
    pub fn insert(&mut self, kind: AwardKind) -> bool {
        let list = match kind.tier() {
            AwardTier::Badge => &mut self.badges,
            AwardTier::Trophy => &mut self.trophies,
        };
        if list.contains(&kind) {
            return false;
        }
        list.push(kind);
        true
    }

    pub fn contains(&self, kind: AwardKind) -> bool {
        self.badges.contains(&kind) || self.trophies.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.badges.is_empty() && self.trophies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.badges.len() + self.trophies.len()
    }

    /// Badges first, then trophies.
    pub fn iter(&self) -> impl Iterator<Item = AwardKind> + '_ {
        self.badges.iter().chain(self.trophies.iter()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_unique_and_reversible() {
        for kind in AwardKind::ALL {
            assert_eq!(AwardKind::from_key(kind.key()), Some(kind));
        }
        let mut keys: Vec<_> = AwardKind::ALL.iter().map(|k| k.key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), AwardKind::ALL.len());
    }

    #[test]
    fn test_tiers() {
        assert_eq!(AwardKind::FirstRound.tier(), AwardTier::Badge);
        assert_eq!(AwardKind::Break90.tier(), AwardTier::Badge);
        assert_eq!(AwardKind::Break80.tier(), AwardTier::Trophy);
        assert_eq!(AwardKind::BirdieFest.tier(), AwardTier::Trophy);
        assert_eq!(AwardKind::MajorDay.tier(), AwardTier::Badge);
    }

    #[test]
    fn test_award_set_insert_dedups() {
        let mut set = AwardSet::default();
        assert!(set.insert(AwardKind::Break90));
        assert!(set.insert(AwardKind::Break80));
        assert!(!set.insert(AwardKind::Break90));

        assert_eq!(set.badges, vec![AwardKind::Break90]);
        assert_eq!(set.trophies, vec![AwardKind::Break80]);
        assert_eq!(set.len(), 2);
        assert!(set.contains(AwardKind::Break80));
    }

    #[test]
    fn test_award_new_copies_catalog_entry() {
        let award = Award::new(
            AwardKind::EagleClub,
            PlayerId::from("p1"),
            RoundId::from("r1"),
            Utc::now(),
        );
        assert_eq!(award.key, "eagle_club");
        assert_eq!(award.title, "Eagle Club");
        assert_eq!(award.tier, AwardTier::Trophy);
        assert_eq!(award.kind(), Some(AwardKind::EagleClub));
    }

    #[test]
    fn test_tier_serializes_lowercase() {
        let json = serde_json::to_string(&AwardTier::Trophy).unwrap();
        assert_eq!(json, "\"trophy\"");
    }
}
