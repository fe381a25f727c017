//! SQL-backed store (sqlx `Any` driver).
//!
//! One implementation serves Postgres and SQLite; the engine is picked from the
//! connection URL and only the DDL differs (see [`super::schema`]).
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError | Scenario |
//! |------------|------------|----------|
//! | Database (unique violation) | `Conflict` | duplicate `users.email` / `users.username` |
//! | Database (other) | `Backend` | constraint or engine failure |
//! | PoolClosed | `Backend` | pool shut down during a request |
//! | Other | `Backend` | connection, protocol, decode failures |
//!
//! Every operation is a single statement, so each insert/delete commits on its
//! own without an explicit transaction.

use async_trait::async_trait;
use sqlx::any::{AnyPoolOptions, AnyRow};
use sqlx::{AnyPool, FromRow, Row};
use tracing::instrument;

use holocron_core::{
    FavoriteId, FavoriteKind, FavoritePerson, FavoritePlanet, NewPerson, NewPlanet, NewUser, Person, PersonId,
    Planet, PlanetId, User, UserId,
};

use super::schema::Backend;
use super::{Store, StoreError, StoreResult, USER_CONFLICT};

const USER_COLUMNS: &str = "id, email, username, password, is_active";
const PERSON_COLUMNS: &str = "id, name, birth_year, height, mass, hair_color, gender";
const PLANET_COLUMNS: &str =
    "id, name, terrain, gravity, population, rotation_period, orbital_period, diameter, surface_water";

/// Relational [`Store`] over a sqlx connection pool.
///
/// The pool is the only shared state; it is cheap to clone and safe to use
/// from concurrent requests.
#[derive(Debug, Clone)]
pub struct SqlStore {
    pool: AnyPool,
    backend: Backend,
}

impl SqlStore {
    /// Connect to `url` and make sure the tables exist.
    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        sqlx::any::install_default_drivers();
        let pool = AnyPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        Self::with_pool(pool, Backend::from_url(url)).await
    }

    /// Private SQLite database living in a single pooled connection.
    ///
    /// The connection never idles out, otherwise the database would vanish
    /// with it.
    pub async fn in_memory() -> StoreResult<Self> {
        sqlx::any::install_default_drivers();
        let pool = AnyPoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        Self::with_pool(pool, Backend::Sqlite).await
    }

    async fn with_pool(pool: AnyPool, backend: Backend) -> StoreResult<Self> {
        let store = Self { pool, backend };
        store.migrate().await?;
        tracing::info!(backend = backend.as_str(), "store ready");
        Ok(store)
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Apply the idempotent schema for this backend.
    #[instrument(skip(self), fields(backend = self.backend.as_str()), err)]
    pub async fn migrate(&self) -> StoreResult<()> {
        for statement in self.backend.statements() {
            sqlx::query(&statement)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("migrate", e))?;
        }
        Ok(())
    }
}

#[async_trait]
impl Store for SqlStore {
    #[instrument(skip(self), err)]
    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_users", e))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self), err)]
    async fn get_user(&self, id: UserId) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_user", e))?;
        Ok(row.map(Into::into))
    }

    #[instrument(skip(self, user), fields(username = %user.username), err)]
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (email, username, password, is_active) VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        ))
        .bind(user.email)
        .bind(user.username)
        .bind(user.password)
        .bind(i64::from(user.is_active))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match map_sqlx_error("insert_user", e) {
            StoreError::Conflict(_) => StoreError::Conflict(USER_CONFLICT.to_string()),
            other => other,
        })?;
        Ok(row.into())
    }

    #[instrument(skip(self), err)]
    async fn list_people(&self) -> StoreResult<Vec<Person>> {
        let rows = sqlx::query_as::<_, PersonRow>(&format!("SELECT {PERSON_COLUMNS} FROM people ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_people", e))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self), err)]
    async fn get_person(&self, id: PersonId) -> StoreResult<Option<Person>> {
        let row = sqlx::query_as::<_, PersonRow>(&format!("SELECT {PERSON_COLUMNS} FROM people WHERE id = $1"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_person", e))?;
        Ok(row.map(Into::into))
    }

    #[instrument(skip(self, person), fields(name = %person.name), err)]
    async fn insert_person(&self, person: NewPerson) -> StoreResult<Person> {
        let row = sqlx::query_as::<_, PersonRow>(&format!(
            r#"
            INSERT INTO people (name, birth_year, height, mass, hair_color, gender)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PERSON_COLUMNS}
            "#
        ))
        .bind(person.name)
        .bind(person.birth_year)
        .bind(person.height)
        .bind(person.mass)
        .bind(person.hair_color)
        .bind(person.gender)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_person", e))?;
        Ok(row.into())
    }

    #[instrument(skip(self), err)]
    async fn delete_person(&self, id: PersonId) -> StoreResult<Person> {
        let row = sqlx::query_as::<_, PersonRow>(&format!("DELETE FROM people WHERE id = $1 RETURNING {PERSON_COLUMNS}"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_person", e))?;
        row.map(Into::into).ok_or(StoreError::NotFound)
    }

    #[instrument(skip(self), err)]
    async fn list_planets(&self) -> StoreResult<Vec<Planet>> {
        let rows = sqlx::query_as::<_, PlanetRow>(&format!("SELECT {PLANET_COLUMNS} FROM planets ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_planets", e))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self), err)]
    async fn get_planet(&self, id: PlanetId) -> StoreResult<Option<Planet>> {
        let row = sqlx::query_as::<_, PlanetRow>(&format!("SELECT {PLANET_COLUMNS} FROM planets WHERE id = $1"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_planet", e))?;
        Ok(row.map(Into::into))
    }

    #[instrument(skip(self, planet), fields(name = %planet.name), err)]
    async fn insert_planet(&self, planet: NewPlanet) -> StoreResult<Planet> {
        let row = sqlx::query_as::<_, PlanetRow>(&format!(
            r#"
            INSERT INTO planets (
                name,
                terrain,
                gravity,
                population,
                rotation_period,
                orbital_period,
                diameter,
                surface_water
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PLANET_COLUMNS}
            "#
        ))
        .bind(planet.name)
        .bind(planet.terrain)
        .bind(planet.gravity)
        .bind(planet.population)
        .bind(planet.rotation_period)
        .bind(planet.orbital_period)
        .bind(planet.diameter)
        .bind(planet.surface_water)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_planet", e))?;
        Ok(row.into())
    }

    #[instrument(skip(self), err)]
    async fn delete_planet(&self, id: PlanetId) -> StoreResult<Planet> {
        let row = sqlx::query_as::<_, PlanetRow>(&format!("DELETE FROM planets WHERE id = $1 RETURNING {PLANET_COLUMNS}"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_planet", e))?;
        row.map(Into::into).ok_or(StoreError::NotFound)
    }

    #[instrument(skip(self), err)]
    async fn insert_favorite_person(&self, user_id: UserId, people_id: PersonId) -> StoreResult<FavoritePerson> {
        let row = sqlx::query_as::<_, FavoritePersonRow>(
            "INSERT INTO favorites_people (user_id, people_id) VALUES ($1, $2) RETURNING id, user_id, people_id",
        )
        .bind(user_id.get())
        .bind(people_id.get())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_favorite_person", e))?;
        Ok(row.into())
    }

    #[instrument(skip(self), err)]
    async fn insert_favorite_planet(&self, user_id: UserId, planet_id: PlanetId) -> StoreResult<FavoritePlanet> {
        let row = sqlx::query_as::<_, FavoritePlanetRow>(
            "INSERT INTO favorites_planets (user_id, planet_id) VALUES ($1, $2) RETURNING id, user_id, planet_id",
        )
        .bind(user_id.get())
        .bind(planet_id.get())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_favorite_planet", e))?;
        Ok(row.into())
    }

    #[instrument(skip(self), err)]
    async fn find_favorite_person(&self, people_id: PersonId, user_id: UserId) -> StoreResult<Option<FavoritePerson>> {
        let row = sqlx::query_as::<_, FavoritePersonRow>(
            r#"
            SELECT id, user_id, people_id
            FROM favorites_people
            WHERE people_id = $1 AND user_id = $2
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(people_id.get())
        .bind(user_id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_favorite_person", e))?;
        Ok(row.map(Into::into))
    }

    #[instrument(skip(self), err)]
    async fn find_favorite_planet(&self, planet_id: PlanetId, user_id: UserId) -> StoreResult<Option<FavoritePlanet>> {
        let row = sqlx::query_as::<_, FavoritePlanetRow>(
            r#"
            SELECT id, user_id, planet_id
            FROM favorites_planets
            WHERE planet_id = $1 AND user_id = $2
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(planet_id.get())
        .bind(user_id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_favorite_planet", e))?;
        Ok(row.map(Into::into))
    }

    #[instrument(skip(self), err)]
    async fn delete_favorite(&self, kind: FavoriteKind, id: FavoriteId) -> StoreResult<()> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", favorite_table(kind)))
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_favorite", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn favorite_people_of(&self, user_id: UserId) -> StoreResult<Vec<Person>> {
        // Inner join drops links whose person no longer exists.
        let rows = sqlx::query_as::<_, PersonRow>(
            r#"
            SELECT p.id, p.name, p.birth_year, p.height, p.mass, p.hair_color, p.gender
            FROM favorites_people f
            JOIN people p ON p.id = f.people_id
            WHERE f.user_id = $1
            ORDER BY f.id
            "#,
        )
        .bind(user_id.get())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("favorite_people_of", e))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self), err)]
    async fn favorite_planets_of(&self, user_id: UserId) -> StoreResult<Vec<Planet>> {
        let rows = sqlx::query_as::<_, PlanetRow>(
            r#"
            SELECT
                p.id,
                p.name,
                p.terrain,
                p.gravity,
                p.population,
                p.rotation_period,
                p.orbital_period,
                p.diameter,
                p.surface_water
            FROM favorites_planets f
            JOIN planets p ON p.id = f.planet_id
            WHERE f.user_id = $1
            ORDER BY f.id
            "#,
        )
        .bind(user_id.get())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("favorite_planets_of", e))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

fn favorite_table(kind: FavoriteKind) -> &'static str {
    match kind {
        FavoriteKind::People => "favorites_people",
        FavoriteKind::Planet => "favorites_planets",
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            if db_err.is_unique_violation() {
                StoreError::Conflict(format!("unique constraint violated in {operation}"))
            } else {
                StoreError::Backend(format!("database error in {}: {}", operation, db_err.message()))
            }
        }
        sqlx::Error::PoolClosed => StoreError::Backend(format!("connection pool closed in {operation}")),
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}

// SQLx row types

#[derive(Debug)]
struct UserRow {
    id: i64,
    email: String,
    username: String,
    password: String,
    is_active: i64,
}

impl<'r> FromRow<'r, AnyRow> for UserRow {
    fn from_row(row: &'r AnyRow) -> Result<Self, sqlx::Error> {
        Ok(UserRow {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            username: row.try_get("username")?,
            password: row.try_get("password")?,
            is_active: row.try_get("is_active")?,
        })
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId::new(row.id),
            email: row.email,
            username: row.username,
            password: row.password,
            is_active: row.is_active != 0,
        }
    }
}

#[derive(Debug)]
struct PersonRow {
    id: i64,
    name: String,
    birth_year: i64,
    height: i64,
    mass: i64,
    hair_color: String,
    gender: String,
}

impl<'r> FromRow<'r, AnyRow> for PersonRow {
    fn from_row(row: &'r AnyRow) -> Result<Self, sqlx::Error> {
        Ok(PersonRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            birth_year: row.try_get("birth_year")?,
            height: row.try_get("height")?,
            mass: row.try_get("mass")?,
            hair_color: row.try_get("hair_color")?,
            gender: row.try_get("gender")?,
        })
    }
}

impl From<PersonRow> for Person {
    fn from(row: PersonRow) -> Self {
        Person {
            id: PersonId::new(row.id),
            name: row.name,
            birth_year: row.birth_year,
            height: row.height,
            mass: row.mass,
            hair_color: row.hair_color,
            gender: row.gender,
        }
    }
}

#[derive(Debug)]
struct PlanetRow {
    id: i64,
    name: String,
    terrain: Option<String>,
    gravity: String,
    population: i64,
    rotation_period: i64,
    orbital_period: i64,
    diameter: i64,
    surface_water: i64,
}

impl<'r> FromRow<'r, AnyRow> for PlanetRow {
    fn from_row(row: &'r AnyRow) -> Result<Self, sqlx::Error> {
        Ok(PlanetRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            terrain: row.try_get("terrain")?,
            gravity: row.try_get("gravity")?,
            population: row.try_get("population")?,
            rotation_period: row.try_get("rotation_period")?,
            orbital_period: row.try_get("orbital_period")?,
            diameter: row.try_get("diameter")?,
            surface_water: row.try_get("surface_water")?,
        })
    }
}

impl From<PlanetRow> for Planet {
    fn from(row: PlanetRow) -> Self {
        Planet {
            id: PlanetId::new(row.id),
            name: row.name,
            terrain: row.terrain,
            gravity: row.gravity,
            population: row.population,
            rotation_period: row.rotation_period,
            orbital_period: row.orbital_period,
            diameter: row.diameter,
            surface_water: row.surface_water,
        }
    }
}

#[derive(Debug)]
struct FavoritePersonRow {
    id: i64,
    user_id: i64,
    people_id: i64,
}

impl<'r> FromRow<'r, AnyRow> for FavoritePersonRow {
    fn from_row(row: &'r AnyRow) -> Result<Self, sqlx::Error> {
        Ok(FavoritePersonRow {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            people_id: row.try_get("people_id")?,
        })
    }
}

impl From<FavoritePersonRow> for FavoritePerson {
    fn from(row: FavoritePersonRow) -> Self {
        FavoritePerson {
            id: FavoriteId::new(row.id),
            user_id: UserId::new(row.user_id),
            people_id: PersonId::new(row.people_id),
        }
    }
}

#[derive(Debug)]
struct FavoritePlanetRow {
    id: i64,
    user_id: i64,
    planet_id: i64,
}

impl<'r> FromRow<'r, AnyRow> for FavoritePlanetRow {
    fn from_row(row: &'r AnyRow) -> Result<Self, sqlx::Error> {
        Ok(FavoritePlanetRow {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            planet_id: row.try_get("planet_id")?,
        })
    }
}

impl From<FavoritePlanetRow> for FavoritePlanet {
    fn from(row: FavoritePlanetRow) -> Self {
        FavoritePlanet {
            id: FavoriteId::new(row.id),
            user_id: UserId::new(row.user_id),
            planet_id: PlanetId::new(row.planet_id),
        }
    }
}
