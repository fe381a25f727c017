//! Entity storage.
//!
//! [`Store`] is the only owner of entity lifetime. Every method is a single
//! statement against the backing store, so each call commits atomically and no
//! call spans more than one entity write.
//!
//! Two backends:
//! - [`SqlStore`]: relational (Postgres or SQLite, chosen by URL scheme)
//! - [`InMemoryStore`]: process-local maps for tests/dev

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use holocron_core::{
    FavoriteId, FavoriteKind, FavoritePerson, FavoritePlanet, NewPerson, NewPlanet, NewUser, Person,
    PersonId, Planet, PlanetId, User, UserId,
};

pub mod in_memory;
pub mod schema;
pub mod sql;

pub use in_memory::InMemoryStore;
pub use sql::SqlStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Message carried by [`StoreError::Conflict`] when a user insert collides.
pub const USER_CONFLICT: &str = "a user with that email or username already exists";

/// Storage operation error.
///
/// - **NotFound**: a delete targeted a row that does not exist
/// - **Conflict**: a unique constraint (`users.email`, `users.username`) was violated
/// - **Backend**: anything else the engine reported (connection, decode, ...)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Relational store for users, people, planets and favorite links.
///
/// Lookups return `Ok(None)` for absent rows; only deletes report
/// [`StoreError::NotFound`]. Lists are ordered by id.
#[async_trait]
pub trait Store: Send + Sync {
    async fn list_users(&self) -> StoreResult<Vec<User>>;
    async fn get_user(&self, id: UserId) -> StoreResult<Option<User>>;
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;

    async fn list_people(&self) -> StoreResult<Vec<Person>>;
    async fn get_person(&self, id: PersonId) -> StoreResult<Option<Person>>;
    async fn insert_person(&self, person: NewPerson) -> StoreResult<Person>;
    async fn delete_person(&self, id: PersonId) -> StoreResult<Person>;

    async fn list_planets(&self) -> StoreResult<Vec<Planet>>;
    async fn get_planet(&self, id: PlanetId) -> StoreResult<Option<Planet>>;
    async fn insert_planet(&self, planet: NewPlanet) -> StoreResult<Planet>;
    async fn delete_planet(&self, id: PlanetId) -> StoreResult<Planet>;

    /// Insert a link without checking that either side exists; callers
    /// validate references first.
    async fn insert_favorite_person(&self, user_id: UserId, people_id: PersonId) -> StoreResult<FavoritePerson>;
    async fn insert_favorite_planet(&self, user_id: UserId, planet_id: PlanetId) -> StoreResult<FavoritePlanet>;

    /// First (lowest id) link matching the pair, if any.
    async fn find_favorite_person(&self, people_id: PersonId, user_id: UserId) -> StoreResult<Option<FavoritePerson>>;
    async fn find_favorite_planet(&self, planet_id: PlanetId, user_id: UserId) -> StoreResult<Option<FavoritePlanet>>;

    async fn delete_favorite(&self, kind: FavoriteKind, id: FavoriteId) -> StoreResult<()>;

    /// People a user has favorited, in link order. Links whose person was
    /// deleted are skipped.
    async fn favorite_people_of(&self, user_id: UserId) -> StoreResult<Vec<Person>>;

    /// Planets a user has favorited, in link order. Links whose planet was
    /// deleted are skipped.
    async fn favorite_planets_of(&self, user_id: UserId) -> StoreResult<Vec<Planet>>;
}

#[async_trait]
impl<S> Store for Arc<S>
where
    S: Store + ?Sized,
{
    async fn list_users(&self) -> StoreResult<Vec<User>> {
        (**self).list_users().await
    }

    async fn get_user(&self, id: UserId) -> StoreResult<Option<User>> {
        (**self).get_user(id).await
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        (**self).insert_user(user).await
    }

    async fn list_people(&self) -> StoreResult<Vec<Person>> {
        (**self).list_people().await
    }

    async fn get_person(&self, id: PersonId) -> StoreResult<Option<Person>> {
        (**self).get_person(id).await
    }

    async fn insert_person(&self, person: NewPerson) -> StoreResult<Person> {
        (**self).insert_person(person).await
    }

    async fn delete_person(&self, id: PersonId) -> StoreResult<Person> {
        (**self).delete_person(id).await
    }

    async fn list_planets(&self) -> StoreResult<Vec<Planet>> {
        (**self).list_planets().await
    }

    async fn get_planet(&self, id: PlanetId) -> StoreResult<Option<Planet>> {
        (**self).get_planet(id).await
    }

    async fn insert_planet(&self, planet: NewPlanet) -> StoreResult<Planet> {
        (**self).insert_planet(planet).await
    }

    async fn delete_planet(&self, id: PlanetId) -> StoreResult<Planet> {
        (**self).delete_planet(id).await
    }

    async fn insert_favorite_person(&self, user_id: UserId, people_id: PersonId) -> StoreResult<FavoritePerson> {
        (**self).insert_favorite_person(user_id, people_id).await
    }

    async fn insert_favorite_planet(&self, user_id: UserId, planet_id: PlanetId) -> StoreResult<FavoritePlanet> {
        (**self).insert_favorite_planet(user_id, planet_id).await
    }

    async fn find_favorite_person(&self, people_id: PersonId, user_id: UserId) -> StoreResult<Option<FavoritePerson>> {
        (**self).find_favorite_person(people_id, user_id).await
    }

    async fn find_favorite_planet(&self, planet_id: PlanetId, user_id: UserId) -> StoreResult<Option<FavoritePlanet>> {
        (**self).find_favorite_planet(planet_id, user_id).await
    }

    async fn delete_favorite(&self, kind: FavoriteKind, id: FavoriteId) -> StoreResult<()> {
        (**self).delete_favorite(kind, id).await
    }

    async fn favorite_people_of(&self, user_id: UserId) -> StoreResult<Vec<Person>> {
        (**self).favorite_people_of(user_id).await
    }

    async fn favorite_planets_of(&self, user_id: UserId) -> StoreResult<Vec<Planet>> {
        (**self).favorite_planets_of(user_id).await
    }
}
