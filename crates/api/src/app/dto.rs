//! Request bodies and transfer records.
//!
//! Transfer records are the only types that leave the process as JSON. None
//! of them carries a password field, so a user's password cannot be
//! serialized by construction.

use serde::{Deserialize, Serialize};

use holocron_core::{
    DomainResult, FavoriteId, FavoritePerson, FavoritePlanet, NewPerson, NewPlanet, NewUser, Person, PersonId,
    Planet, PlanetId, User, UserId,
};
use holocron_infra::{Store, StoreResult};

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /user`. No `Debug`: it carries the plaintext password.
#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl CreateUserRequest {
    pub fn into_new_user(self) -> DomainResult<NewUser> {
        NewUser::new(self.username, self.email, self.password)
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePersonRequest {
    pub name: String,
    pub birth_year: i64,
    pub height: i64,
    pub mass: i64,
    pub hair_color: String,
    pub gender: String,
}

impl CreatePersonRequest {
    pub fn into_new_person(self) -> DomainResult<NewPerson> {
        NewPerson {
            name: self.name,
            birth_year: self.birth_year,
            height: self.height,
            mass: self.mass,
            hair_color: self.hair_color,
            gender: self.gender,
        }
        .validated()
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePlanetRequest {
    pub name: String,
    /// The key must be present; `null` is accepted.
    #[serde(deserialize_with = "Option::deserialize")]
    pub terrain: Option<String>,
    pub gravity: String,
    pub population: i64,
    pub rotation_period: i64,
    pub orbital_period: i64,
    pub diameter: i64,
    pub surface_water: i64,
}

impl CreatePlanetRequest {
    pub fn into_new_planet(self) -> DomainResult<NewPlanet> {
        NewPlanet {
            name: self.name,
            terrain: self.terrain,
            gravity: self.gravity,
            population: self.population,
            rotation_period: self.rotation_period,
            orbital_period: self.orbital_period,
            diameter: self.diameter,
            surface_water: self.surface_water,
        }
        .validated()
    }
}

/// Body of every `/favorite/...` request.
#[derive(Debug, Deserialize)]
pub struct FavoriteRequest {
    pub user_id: UserId,
}

// -------------------------
// Transfer records
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonResponse {
    pub id: PersonId,
    pub name: String,
    pub birth_year: i64,
    pub height: i64,
    pub mass: i64,
    pub hair_color: String,
    pub gender: String,
}

impl From<Person> for PersonResponse {
    fn from(p: Person) -> Self {
        Self {
            id: p.id,
            name: p.name,
            birth_year: p.birth_year,
            height: p.height,
            mass: p.mass,
            hair_color: p.hair_color,
            gender: p.gender,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanetResponse {
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

impl From<Planet> for PlanetResponse {
    fn from(p: Planet) -> Self {
        Self {
            id: p.id,
            name: p.name,
            terrain: p.terrain,
            gravity: p.gravity,
            population: p.population,
            rotation_period: p.rotation_period,
            orbital_period: p.orbital_period,
            diameter: p.diameter,
            surface_water: p.surface_water,
        }
    }
}

/// A user with their favorites embedded one level deep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub favorites_planets: Vec<PlanetResponse>,
    pub favorites_people: Vec<PersonResponse>,
}

impl UserResponse {
    /// Pair a user with already-resolved favorites. `password` and
    /// `is_active` are dropped here.
    pub fn new(user: User, planets: Vec<Planet>, people: Vec<Person>) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            favorites_planets: planets.into_iter().map(Into::into).collect(),
            favorites_people: people.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolve the user's favorites through the store's join queries.
    /// Links to deleted people/planets do not appear.
    pub async fn load(store: &dyn Store, user: User) -> StoreResult<Self> {
        let planets = store.favorite_planets_of(user.id).await?;
        let people = store.favorite_people_of(user.id).await?;
        Ok(Self::new(user, planets, people))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FavoritePersonResponse {
    pub id: FavoriteId,
    pub user_id: UserId,
    pub people_id: PersonId,
    pub people: PersonResponse,
}

impl FavoritePersonResponse {
    pub fn new(link: FavoritePerson, person: Person) -> Self {
        Self {
            id: link.id,
            user_id: link.user_id,
            people_id: link.people_id,
            people: person.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FavoritePlanetResponse {
    pub id: FavoriteId,
    pub user_id: UserId,
    pub planet_id: PlanetId,
    pub planet: PlanetResponse,
}

impl FavoritePlanetResponse {
    pub fn new(link: FavoritePlanet, planet: Planet) -> Self {
        Self {
            id: link.id,
            user_id: link.user_id,
            planet_id: link.planet_id,
            planet: planet.into(),
        }
    }
}

/// Confirmation body for favorite deletions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageResponse {
    pub msg: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn vader() -> User {
        User {
            id: UserId::new(1),
            email: "vader@empire.gov".to_string(),
            username: "vader".to_string(),
            password: "iamyourfather".to_string(),
            is_active: true,
        }
    }

    fn hoth() -> Planet {
        Planet {
            id: PlanetId::new(4),
            name: "Hoth".to_string(),
            terrain: Some("tundra".to_string()),
            gravity: "1.1 standard".to_string(),
            population: 0,
            rotation_period: 23,
            orbital_period: 549,
            diameter: 7200,
            surface_water: 100,
        }
    }

    #[test]
    fn user_json_never_contains_password() {
        let value = serde_json::to_value(UserResponse::new(vader(), vec![], vec![])).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 1,
                "email": "vader@empire.gov",
                "username": "vader",
                "favorites_planets": [],
                "favorites_people": [],
            })
        );
        assert!(!value.to_string().contains("iamyourfather"));
    }

    #[test]
    fn favorite_planet_embeds_planet_alongside_ids() {
        let link = FavoritePlanet {
            id: FavoriteId::new(9),
            user_id: UserId::new(1),
            planet_id: PlanetId::new(4),
        };
        let value = serde_json::to_value(FavoritePlanetResponse::new(link, hoth())).unwrap();
        assert_eq!(value["id"], 9);
        assert_eq!(value["user_id"], 1);
        assert_eq!(value["planet_id"], 4);
        assert_eq!(value["planet"]["name"], "Hoth");
        assert_eq!(value["planet"]["terrain"], "tundra");
    }

    #[test]
    fn planet_body_requires_terrain_key_but_allows_null() {
        let with_null = json!({
            "name": "Bespin", "terrain": null, "gravity": "1.5 (surface)",
            "population": 6000000, "rotation_period": 12, "orbital_period": 5110,
            "diameter": 118000, "surface_water": 0
        });
        let req: CreatePlanetRequest = serde_json::from_value(with_null.clone()).unwrap();
        assert!(req.terrain.is_none());

        let mut missing = with_null;
        missing.as_object_mut().unwrap().remove("terrain");
        assert!(serde_json::from_value::<CreatePlanetRequest>(missing).is_err());
    }

    #[test]
    fn blank_person_name_fails_validation() {
        let req: CreatePersonRequest = serde_json::from_value(json!({
            "name": " ", "birth_year": 19, "height": 150, "mass": 49,
            "hair_color": "brown", "gender": "female"
        }))
        .unwrap();
        assert!(req.into_new_person().is_err());
    }
}
