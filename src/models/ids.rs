//! Identifiers for players, leagues, and rounds.
//!
//! Player, user, and league ids come from the surrounding application and are
//! carried verbatim. Round ids are derived from content so the same submission
//! always hashes to the same id.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Hex characters kept from a round id digest.
const HASHED_ID_LEN: usize = 16;

/// A player, user, league, or round id.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Content id for a submission: `parts` joined with `|`, SHA256 digested,
    /// hex prefix kept. Same parts, same id.
    pub fn hashed(parts: &[&str]) -> Self {
        let digest = Sha256::digest(parts.join("|").as_bytes());
        let mut id = hex::encode(digest);
        id.truncate(HASHED_ID_LEN);
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntityId").field(&self.0).finish()
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Round ids
pub type RoundId = EntityId;

/// The golfer a round belongs to
pub type PlayerId = EntityId;

/// The account that entered a round (may differ from the player)
pub type UserId = EntityId;

/// League ids
pub type LeagueId = EntityId;
