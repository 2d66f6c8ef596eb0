//! In-memory user directory — registration and credential verification.

use chrono::Utc;
use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

use drivebox_core::error::AppError;
use drivebox_core::result::AppResult;
use drivebox_entity::user::User;

use crate::password::PasswordHasher;

/// In-memory user store keyed by lowercased email.
#[derive(Debug, Default)]
pub struct UserDirectory {
    /// Email -> user.
    users: DashMap<String, User>,
    /// Password hasher.
    hasher: PasswordHasher,
}

impl UserDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            hasher: PasswordHasher::new(),
        }
    }

    /// Registers a new user. The email must be unused.
    pub fn register(&self, username: &str, email: &str, password: &str) -> AppResult<User> {
        let key = email.trim().to_lowercase();
        if self.users.contains_key(&key) {
            return Err(AppError::validation("User already exists"));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: key.clone(),
            password_hash: self.hasher.hash_password(password)?,
            created_at: Utc::now(),
        };

        // contains_key + insert is not atomic; entry() arbitrates the race.
        let mut won = false;
        self.users.entry(key).or_insert_with(|| {
            won = true;
            user.clone()
        });
        if !won {
            return Err(AppError::validation("User already exists"));
        }

        info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Verifies credentials and returns the matching user.
    ///
    /// Unknown email and wrong password produce the same generic error.
    pub fn login(&self, email: &str, password: &str) -> AppResult<User> {
        let key = email.trim().to_lowercase();
        let user = self
            .users
            .get(&key)
            .map(|u| u.clone())
            .ok_or_else(|| AppError::unauthenticated("Invalid credentials"))?;

        if !self.hasher.verify_password(password, &user.password_hash)? {
            return Err(AppError::unauthenticated("Invalid credentials"));
        }

        Ok(user)
    }

    /// Looks up a user by id.
    pub fn find_by_id(&self, id: Uuid) -> Option<User> {
        self.users.iter().find(|u| u.id == id).map(|u| u.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drivebox_core::error::ErrorKind;

    #[test]
    fn register_then_login() {
        let dir = UserDirectory::new();
        let user = dir.register("alice", "alice@example.com", "secret123").unwrap();

        let logged_in = dir.login("alice@example.com", "secret123").unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[test]
    fn duplicate_email_rejected() {
        let dir = UserDirectory::new();
        dir.register("alice", "alice@example.com", "secret123").unwrap();

        let err = dir
            .register("alice2", "Alice@Example.COM", "other")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn bad_credentials_are_indistinguishable() {
        let dir = UserDirectory::new();
        dir.register("alice", "alice@example.com", "secret123").unwrap();

        let wrong_pw = dir.login("alice@example.com", "nope").unwrap_err();
        let unknown = dir.login("bob@example.com", "nope").unwrap_err();

        assert_eq!(wrong_pw.kind, ErrorKind::Unauthenticated);
        assert_eq!(wrong_pw.message, unknown.message);
    }
}
