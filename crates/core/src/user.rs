//! User accounts.
//!
//! A user owns zero or more favorite links (see [`crate::favorite`]). The
//! password is stored verbatim; `User` deliberately has no `Serialize` impl so
//! it can only leave the process through a transfer type that omits it.

use crate::entity::Entity;
use crate::error::{DomainResult, require};
use crate::id::UserId;

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub password: String,
    pub is_active: bool,
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}

/// A user that has not been stored yet (no id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password: String,
    pub is_active: bool,
}

impl NewUser {
    /// Build a new, active account. `email` and `username` uniqueness is
    /// enforced by the store, not here.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> DomainResult<Self> {
        Ok(Self {
            username: require("username", username.into())?,
            email: require("email", email.into())?,
            password: require("password", password.into())?,
            is_active: true,
        })
    }

    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            email: self.email,
            username: self.username,
            password: self.password,
            is_active: self.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DomainError;

    #[test]
    fn new_users_start_active() {
        let user = NewUser::new("luke", "luke@tatooine.net", "x-wing").unwrap();
        assert!(user.is_active);
        assert_eq!(user.username, "luke");
    }

    #[test]
    fn blank_fields_are_rejected() {
        let err = NewUser::new("luke", "  ", "x-wing").unwrap_err();
        assert_eq!(err, DomainError::validation("`email` must not be blank"));
    }

    #[test]
    fn into_user_keeps_every_field() {
        let user = NewUser::new("leia", "leia@alderaan.gov", "hope")
            .unwrap()
            .into_user(UserId::new(7));
        assert_eq!(user.id(), UserId::new(7));
        assert_eq!(user.password, "hope");
    }
}
