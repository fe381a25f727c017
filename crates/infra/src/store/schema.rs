//! Table definitions, applied idempotently when a [`super::SqlStore`] connects.
//!
//! All integer columns are 64-bit so rows decode the same way through the
//! `Any` driver on both engines. Favorite links reference `users(id)` but not
//! the person/planet tables: those rows can be deleted while links to them
//! remain, and readers skip the dangling ones.

/// Relational engine behind a connection URL.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

impl Backend {
    pub fn from_url(url: &str) -> Self {
        if url.starts_with("sqlite:") {
            Backend::Sqlite
        } else {
            Backend::Postgres
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Postgres => "postgres",
            Backend::Sqlite => "sqlite",
        }
    }

    /// DDL statements, in dependency order.
    pub fn statements(self) -> [String; 7] {
        let pk = match self {
            Backend::Postgres => "BIGSERIAL PRIMARY KEY",
            Backend::Sqlite => "INTEGER PRIMARY KEY AUTOINCREMENT",
        };

        [
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS users (
                    id {pk},
                    email VARCHAR(120) NOT NULL UNIQUE,
                    username VARCHAR(80) NOT NULL UNIQUE,
                    password VARCHAR(80) NOT NULL,
                    is_active BIGINT NOT NULL
                )
                "#
            ),
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS people (
                    id {pk},
                    name VARCHAR(250) NOT NULL,
                    birth_year BIGINT NOT NULL,
                    height BIGINT NOT NULL,
                    mass BIGINT NOT NULL,
                    hair_color VARCHAR(250) NOT NULL,
                    gender VARCHAR(250) NOT NULL
                )
                "#
            ),
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS planets (
                    id {pk},
                    name VARCHAR(250) NOT NULL,
                    terrain VARCHAR(250),
                    gravity VARCHAR(250) NOT NULL,
                    population BIGINT NOT NULL,
                    rotation_period BIGINT NOT NULL,
                    orbital_period BIGINT NOT NULL,
                    diameter BIGINT NOT NULL,
                    surface_water BIGINT NOT NULL
                )
                "#
            ),
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS favorites_people (
                    id {pk},
                    user_id BIGINT NOT NULL REFERENCES users(id),
                    people_id BIGINT NOT NULL
                )
                "#
            ),
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS favorites_planets (
                    id {pk},
                    user_id BIGINT NOT NULL REFERENCES users(id),
                    planet_id BIGINT NOT NULL
                )
                "#
            ),
            "CREATE INDEX IF NOT EXISTS favorites_people_user_idx ON favorites_people (user_id)".to_string(),
            "CREATE INDEX IF NOT EXISTS favorites_planets_user_idx ON favorites_planets (user_id)".to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_follows_url_scheme() {
        assert_eq!(Backend::from_url("sqlite::memory:"), Backend::Sqlite);
        assert_eq!(Backend::from_url("sqlite:///tmp/holocron.db?mode=rwc"), Backend::Sqlite);
        assert_eq!(Backend::from_url("postgresql://localhost/holocron"), Backend::Postgres);
    }

    #[test]
    fn primary_keys_match_engine() {
        assert!(Backend::Postgres.statements()[0].contains("BIGSERIAL PRIMARY KEY"));
        assert!(Backend::Sqlite.statements()[0].contains("INTEGER PRIMARY KEY AUTOINCREMENT"));
    }
}
