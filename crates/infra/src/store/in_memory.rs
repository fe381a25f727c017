//! In-memory store for tests/dev.
//!
//! Mirrors the relational backend: ids are assigned from per-table sequences
//! starting at 1, `email`/`username` are unique, and favorite links keep raw
//! foreign keys that may dangle after a delete.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use holocron_core::{
    Entity, FavoriteId, FavoriteKind, FavoritePerson, FavoritePlanet, NewPerson, NewPlanet, NewUser, Person,
    PersonId, Planet, PlanetId, User, UserId,
};

use super::{Store, StoreError, StoreResult, USER_CONFLICT};

/// One table: rows keyed by id plus the next id to hand out.
#[derive(Debug)]
struct Table<K, V> {
    rows: BTreeMap<K, V>,
    next_id: i64,
}

impl<K: Ord, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<K, V> Table<K, V>
where
    K: Ord + Copy + From<i64>,
    V: Entity<Id = K> + Clone,
{
    fn allocate(&mut self) -> K {
        let id = K::from(self.next_id);
        self.next_id += 1;
        id
    }

    fn insert(&mut self, row: V) -> V {
        self.rows.insert(row.id(), row.clone());
        row
    }

    fn get(&self, id: K) -> Option<V> {
        self.rows.get(&id).cloned()
    }

    fn list(&self) -> Vec<V> {
        self.rows.values().cloned().collect()
    }
}

#[derive(Debug, Default)]
struct State {
    users: Table<UserId, User>,
    people: Table<PersonId, Person>,
    planets: Table<PlanetId, Planet>,
    favorite_people: Table<FavoriteId, FavoritePerson>,
    favorite_planets: Table<FavoriteId, FavoritePlanet>,
}

/// Process-local [`Store`] guarded by a single `RwLock`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, State>> {
        self.inner
            .read()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, State>> {
        self.inner
            .write()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.read()?.users.list())
    }

    async fn get_user(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.read()?.users.get(id))
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut state = self.write()?;
        let taken = state
            .users
            .rows
            .values()
            .any(|u| u.email == user.email || u.username == user.username);
        if taken {
            return Err(StoreError::Conflict(USER_CONFLICT.to_string()));
        }
        let id = state.users.allocate();
        Ok(state.users.insert(user.into_user(id)))
    }

    async fn list_people(&self) -> StoreResult<Vec<Person>> {
        Ok(self.read()?.people.list())
    }

    async fn get_person(&self, id: PersonId) -> StoreResult<Option<Person>> {
        Ok(self.read()?.people.get(id))
    }

    async fn insert_person(&self, person: NewPerson) -> StoreResult<Person> {
        let mut state = self.write()?;
        let id = state.people.allocate();
        Ok(state.people.insert(person.into_person(id)))
    }

    async fn delete_person(&self, id: PersonId) -> StoreResult<Person> {
        self.write()?.people.rows.remove(&id).ok_or(StoreError::NotFound)
    }

    async fn list_planets(&self) -> StoreResult<Vec<Planet>> {
        Ok(self.read()?.planets.list())
    }

    async fn get_planet(&self, id: PlanetId) -> StoreResult<Option<Planet>> {
        Ok(self.read()?.planets.get(id))
    }

    async fn insert_planet(&self, planet: NewPlanet) -> StoreResult<Planet> {
        let mut state = self.write()?;
        let id = state.planets.allocate();
        Ok(state.planets.insert(planet.into_planet(id)))
    }

    async fn delete_planet(&self, id: PlanetId) -> StoreResult<Planet> {
        self.write()?.planets.rows.remove(&id).ok_or(StoreError::NotFound)
    }

    async fn insert_favorite_person(&self, user_id: UserId, people_id: PersonId) -> StoreResult<FavoritePerson> {
        let mut state = self.write()?;
        let id = state.favorite_people.allocate();
        Ok(state.favorite_people.insert(FavoritePerson { id, user_id, people_id }))
    }

    async fn insert_favorite_planet(&self, user_id: UserId, planet_id: PlanetId) -> StoreResult<FavoritePlanet> {
        let mut state = self.write()?;
        let id = state.favorite_planets.allocate();
        Ok(state.favorite_planets.insert(FavoritePlanet { id, user_id, planet_id }))
    }

    async fn find_favorite_person(&self, people_id: PersonId, user_id: UserId) -> StoreResult<Option<FavoritePerson>> {
        Ok(self
            .read()?
            .favorite_people
            .rows
            .values()
            .find(|f| f.people_id == people_id && f.user_id == user_id)
            .copied())
    }

    async fn find_favorite_planet(&self, planet_id: PlanetId, user_id: UserId) -> StoreResult<Option<FavoritePlanet>> {
        Ok(self
            .read()?
            .favorite_planets
            .rows
            .values()
            .find(|f| f.planet_id == planet_id && f.user_id == user_id)
            .copied())
    }

    async fn delete_favorite(&self, kind: FavoriteKind, id: FavoriteId) -> StoreResult<()> {
        let mut state = self.write()?;
        let removed = match kind {
            FavoriteKind::People => state.favorite_people.rows.remove(&id).is_some(),
            FavoriteKind::Planet => state.favorite_planets.rows.remove(&id).is_some(),
        };
        if removed { Ok(()) } else { Err(StoreError::NotFound) }
    }

    async fn favorite_people_of(&self, user_id: UserId) -> StoreResult<Vec<Person>> {
        let state = self.read()?;
        Ok(state
            .favorite_people
            .rows
            .values()
            .filter(|f| f.user_id == user_id)
            .filter_map(|f| state.people.get(f.people_id))
            .collect())
    }

    async fn favorite_planets_of(&self, user_id: UserId) -> StoreResult<Vec<Planet>> {
        let state = self.read()?;
        Ok(state
            .favorite_planets
            .rows
            .values()
            .filter(|f| f.user_id == user_id)
            .filter_map(|f| state.planets.get(f.planet_id))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn new_person(name: &str) -> NewPerson {
        NewPerson {
            name: name.to_string(),
            birth_year: 41,
            height: 202,
            mass: 136,
            hair_color: "none".to_string(),
            gender: "male".to_string(),
        }
    }

    fn new_planet(name: &str) -> NewPlanet {
        NewPlanet {
            name: name.to_string(),
            terrain: Some("desert".to_string()),
            gravity: "1 standard".to_string(),
            population: 200_000,
            rotation_period: 23,
            orbital_period: 304,
            diameter: 10465,
            surface_water: 1,
        }
    }

    #[tokio::test]
    async fn ids_are_assigned_sequentially_per_table() {
        let store = InMemoryStore::new();
        let a = store.insert_person(new_person("Vader")).await.unwrap();
        let b = store.insert_person(new_person("Palpatine")).await.unwrap();
        let p = store.insert_planet(new_planet("Tatooine")).await.unwrap();

        assert_eq!(a.id, PersonId::new(1));
        assert_eq!(b.id, PersonId::new(2));
        assert_eq!(p.id, PlanetId::new(1));
    }

    #[tokio::test]
    async fn duplicate_email_or_username_conflicts() {
        let store = InMemoryStore::new();
        store
            .insert_user(NewUser::new("han", "han@falcon.io", "kessel").unwrap())
            .await
            .unwrap();

        let same_email = store
            .insert_user(NewUser::new("solo", "han@falcon.io", "kessel").unwrap())
            .await;
        assert!(matches!(same_email, Err(StoreError::Conflict(_))));

        let same_name = store
            .insert_user(NewUser::new("han", "other@falcon.io", "kessel").unwrap())
            .await;
        assert!(matches!(same_name, Err(StoreError::Conflict(_))));

        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn deleting_missing_rows_reports_not_found() {
        let store = InMemoryStore::new();
        assert_eq!(store.delete_person(PersonId::new(9)).await, Err(StoreError::NotFound));
        assert_eq!(store.delete_planet(PlanetId::new(9)).await, Err(StoreError::NotFound));
        assert_eq!(
            store.delete_favorite(FavoriteKind::People, FavoriteId::new(9)).await,
            Err(StoreError::NotFound)
        );
    }

    #[tokio::test]
    async fn favorites_of_skip_deleted_targets() {
        let store = InMemoryStore::new();
        let user = store
            .insert_user(NewUser::new("rey", "rey@jakku.org", "bb8").unwrap())
            .await
            .unwrap();
        let jakku = store.insert_planet(new_planet("Jakku")).await.unwrap();
        let ahch_to = store.insert_planet(new_planet("Ahch-To")).await.unwrap();
        store.insert_favorite_planet(user.id, jakku.id).await.unwrap();
        store.insert_favorite_planet(user.id, ahch_to.id).await.unwrap();

        store.delete_planet(jakku.id).await.unwrap();

        let planets = store.favorite_planets_of(user.id).await.unwrap();
        assert_eq!(planets, vec![ahch_to]);
        // The dangling link itself is still there.
        assert!(store.find_favorite_planet(jakku.id, user.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn find_favorite_matches_both_keys() {
        let store = InMemoryStore::new();
        let link = store
            .insert_favorite_person(UserId::new(1), PersonId::new(5))
            .await
            .unwrap();

        assert_eq!(store.find_favorite_person(PersonId::new(5), UserId::new(1)).await.unwrap(), Some(link));
        assert_eq!(store.find_favorite_person(PersonId::new(5), UserId::new(2)).await.unwrap(), None);

        store.delete_favorite(FavoriteKind::People, link.id).await.unwrap();
        assert_eq!(store.find_favorite_person(PersonId::new(5), UserId::new(1)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_favorites_are_kept() {
        let store = InMemoryStore::new();
        let first = store.insert_favorite_planet(UserId::new(1), PlanetId::new(1)).await.unwrap();
        let second = store.insert_favorite_planet(UserId::new(1), PlanetId::new(1)).await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(store.find_favorite_planet(PlanetId::new(1), UserId::new(1)).await.unwrap(), Some(first));
    }

    proptest! {
        #[test]
        fn inserted_person_reads_back_unchanged(
            name in "[A-Za-z][A-Za-z ]{0,20}",
            birth_year in 0i64..1000,
            height in 0i64..300,
            mass in 0i64..2000,
        ) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            rt.block_on(async {
                let store = InMemoryStore::new();
                let new = NewPerson { birth_year, height, mass, ..new_person(&name) };
                let stored = store.insert_person(new.clone()).await.unwrap();
                let fetched = store.get_person(stored.id).await.unwrap().unwrap();
                prop_assert_eq!(fetched, new.into_person(stored.id));
                Ok(())
            })?;
        }
    }
}
