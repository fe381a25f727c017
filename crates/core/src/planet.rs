//! Planets.

use crate::entity::Entity;
use crate::error::{DomainResult, require};
use crate::id::PlanetId;

/// A stored planet. `terrain` is the only optional column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Planet {
    pub id: PlanetId,
    pub name: String,
    pub terrain: Option<String>,
    pub gravity: String,
    pub population: i64,
    pub rotation_period: i64,
    pub orbital_period: i64,
    pub diameter: i64,
    pub surface_water: i64,
}

impl Entity for Planet {
    type Id = PlanetId;

    fn id(&self) -> PlanetId {
        self.id
    }
}

/// A planet that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlanet {
    pub name: String,
    pub terrain: Option<String>,
    pub gravity: String,
    pub population: i64,
    pub rotation_period: i64,
    pub orbital_period: i64,
    pub diameter: i64,
    pub surface_water: i64,
}

impl NewPlanet {
    pub fn validated(self) -> DomainResult<Self> {
        Ok(Self {
            name: require("name", self.name)?,
            gravity: require("gravity", self.gravity)?,
            ..self
        })
    }

    pub fn into_planet(self, id: PlanetId) -> Planet {
        Planet {
            id,
            name: self.name,
            terrain: self.terrain,
            gravity: self.gravity,
            population: self.population,
            rotation_period: self.rotation_period,
            orbital_period: self.orbital_period,
            diameter: self.diameter,
            surface_water: self.surface_water,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terrain_may_be_absent() {
        let planet = NewPlanet {
            name: "Kamino".to_string(),
            terrain: None,
            gravity: "1 standard".to_string(),
            population: 1_000_000_000,
            rotation_period: 27,
            orbital_period: 463,
            diameter: 19720,
            surface_water: 100,
        }
        .validated()
        .unwrap()
        .into_planet(PlanetId::new(10));

        assert_eq!(planet.id(), PlanetId::new(10));
        assert!(planet.terrain.is_none());
    }
}
