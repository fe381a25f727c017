//! Favorite links: join entities between a user and a person or planet.
//!
//! A link records raw foreign keys only. The referenced person/planet may be
//! deleted later (no cascade); readers must tolerate the dangling id.
//! Duplicate links for the same (user, target) pair are permitted.

use crate::entity::Entity;
use crate::id::{FavoriteId, PersonId, PlanetId, UserId};

/// Which join table a favorite link lives in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FavoriteKind {
    People,
    Planet,
}

impl FavoriteKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FavoriteKind::People => "people",
            FavoriteKind::Planet => "planet",
        }
    }
}

impl core::fmt::Display for FavoriteKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User → person link.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FavoritePerson {
    pub id: FavoriteId,
    pub user_id: UserId,
    pub people_id: PersonId,
}

/// User → planet link.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FavoritePlanet {
    pub id: FavoriteId,
    pub user_id: UserId,
    pub planet_id: PlanetId,
}

impl Entity for FavoritePerson {
    type Id = FavoriteId;

    fn id(&self) -> FavoriteId {
        self.id
    }
}

impl Entity for FavoritePlanet {
    type Id = FavoriteId;

    fn id(&self) -> FavoriteId {
        self.id
    }
}
