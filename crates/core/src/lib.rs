//! `holocron-core` — entity model for the holocron catalogue.
//!
//! This crate contains **pure domain** types (no storage or HTTP concerns).

pub mod entity;
pub mod error;
pub mod favorite;
pub mod id;
pub mod person;
pub mod planet;
pub mod user;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use favorite::{FavoriteKind, FavoritePerson, FavoritePlanet};
pub use id::{FavoriteId, PersonId, PlanetId, UserId};
pub use person::{NewPerson, Person};
pub use planet::{NewPlanet, Planet};
pub use user::{NewUser, User};
