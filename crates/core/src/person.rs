//! People (characters).

use crate::entity::Entity;
use crate::error::{DomainResult, require};
use crate::id::PersonId;

/// A stored person. Every field is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub birth_year: i64,
    pub height: i64,
    pub mass: i64,
    pub hair_color: String,
    pub gender: String,
}

impl Entity for Person {
    type Id = PersonId;

    fn id(&self) -> PersonId {
        self.id
    }
}

/// A person that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
    pub name: String,
    pub birth_year: i64,
    pub height: i64,
    pub mass: i64,
    pub hair_color: String,
    pub gender: String,
}

impl NewPerson {
    /// Presence check for the string fields; numeric fields are present by
    /// construction.
    pub fn validated(self) -> DomainResult<Self> {
        Ok(Self {
            name: require("name", self.name)?,
            hair_color: require("hair_color", self.hair_color)?,
            gender: require("gender", self.gender)?,
            ..self
        })
    }

    pub fn into_person(self, id: PersonId) -> Person {
        Person {
            id,
            name: self.name,
            birth_year: self.birth_year,
            height: self.height,
            mass: self.mass,
            hair_color: self.hair_color,
            gender: self.gender,
        }
    }
}
