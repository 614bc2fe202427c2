use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::UserStore;
use crate::userdb::errors::UserError;
use crate::userdb::password::{hash_password, verify_password};
use crate::userdb::types::User;

/// Deterministic account store for tests and `DATABASE_URL=memory`.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the `active` flag of an account.
    pub async fn set_active(&self, id: i64, active: bool) -> Result<(), UserError> {
        let mut users = self.users.lock().await;
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(UserError::NoRecord)?;
        user.active = active;
        Ok(())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, name: &str, email: &str, password: &str) -> Result<i64, UserError> {
        let hashed_password =
            hash_password(password).map_err(|e| UserError::Storage(e.to_string()))?;

        let mut users = self.users.lock().await;
        if users.iter().any(|u| u.email == email) {
            return Err(UserError::DuplicateEmail);
        }

        let id = users.len() as i64 + 1;
        users.push(User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            hashed_password,
            created: Utc::now(),
            active: true,
        });
        Ok(id)
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<i64, UserError> {
        let users = self.users.lock().await;
        users
            .iter()
            .find(|u| u.email == email && u.active)
            .filter(|u| verify_password(password, &u.hashed_password))
            .map(|u| u.id)
            .ok_or(UserError::InvalidCredentials)
    }

    async fn get(&self, id: i64) -> Result<User, UserError> {
        let users = self.users.lock().await;
        users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(UserError::NoRecord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = InMemoryUserStore::new();
        let id = store
            .insert("Alice", "alice@example.com", "pa$$word123")
            .await
            .unwrap();

        let user = store.get(id).await.unwrap();
        assert_eq!(user.name, "Alice");
        assert_eq!(user.email, "alice@example.com");
        assert!(user.active);
        assert_ne!(user.hashed_password, "pa$$word123");
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let store = InMemoryUserStore::new();
        store
            .insert("Alice", "alice@example.com", "pa$$word123")
            .await
            .unwrap();

        let err = store
            .insert("Other", "alice@example.com", "different1234")
            .await
            .unwrap_err();
        assert_eq!(err, UserError::DuplicateEmail);
    }

    #[tokio::test]
    async fn test_authenticate() {
        let store = InMemoryUserStore::new();
        let id = store
            .insert("Alice", "alice@example.com", "pa$$word123")
            .await
            .unwrap();

        assert_eq!(
            store.authenticate("alice@example.com", "pa$$word123").await,
            Ok(id)
        );
        assert_eq!(
            store.authenticate("alice@example.com", "wrong").await,
            Err(UserError::InvalidCredentials)
        );
        assert_eq!(
            store.authenticate("nobody@example.com", "pa$$word123").await,
            Err(UserError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn test_inactive_user_cannot_authenticate() {
        let store = InMemoryUserStore::new();
        let id = store
            .insert("Alice", "alice@example.com", "pa$$word123")
            .await
            .unwrap();
        store.set_active(id, false).await.unwrap();

        assert_eq!(
            store.authenticate("alice@example.com", "pa$$word123").await,
            Err(UserError::InvalidCredentials)
        );
        assert!(!store.get(id).await.unwrap().active);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = InMemoryUserStore::new();
        assert_eq!(store.get(42).await, Err(UserError::NoRecord));
        assert_eq!(store.set_active(42, false).await, Err(UserError::NoRecord));
    }
}
