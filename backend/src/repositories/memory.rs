//! In-memory credential store
//!
//! Used for local development and tests. Uniqueness is enforced under the
//! write lock, so concurrent inserts of one email still produce exactly one
//! winner.

use super::credential::{Credential, CredentialStore, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemoryCredentialStore {
    credentials: Arc<RwLock<HashMap<String, Credential>>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored credentials
    pub async fn len(&self) -> usize {
        self.credentials.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.credentials.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Credential>, StoreError> {
        Ok(self.credentials.read().await.get(email).cloned())
    }

    async fn insert(&self, credential: &Credential) -> Result<(), StoreError> {
        let mut credentials = self.credentials.write().await;
        if credentials.contains_key(&credential.email) {
            return Err(StoreError::Duplicate);
        }
        credentials.insert(credential.email.clone(), credential.clone());
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keygate_shared::Role;

    fn credential(email: &str) -> Credential {
        Credential {
            email: email.to_string(),
            password_hash: "$2b$04$placeholder".to_string(),
            role: Role::Guest,
        }
    }

    #[tokio::test]
    async fn test_insert_then_find() {
        let store = InMemoryCredentialStore::new();
        store.insert(&credential("user@test.io")).await.unwrap();

        let found = store.find_by_email("user@test.io").await.unwrap();
        assert_eq!(found, Some(credential("user@test.io")));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_lookup_is_case_sensitive() {
        let store = InMemoryCredentialStore::new();
        store.insert(&credential("user@test.io")).await.unwrap();

        assert!(store.find_by_email("User@test.io").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let store = InMemoryCredentialStore::new();
        store.insert(&credential("user@test.io")).await.unwrap();

        let err = store.insert(&credential("user@test.io")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_have_one_winner() {
        let store = InMemoryCredentialStore::new();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.insert(&credential("race@test.io")).await })
            })
            .collect();

        let mut wins = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                wins += 1;
            }
        }

        assert_eq!(wins, 1);
        assert_eq!(store.len().await, 1);
    }
}
