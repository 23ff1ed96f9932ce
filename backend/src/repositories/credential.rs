//! Credential store contract and its Postgres implementation

use anyhow::anyhow;
use async_trait::async_trait;
use keygate_shared::Role;
use sqlx::PgPool;
use thiserror::Error;

/// Persisted account credential
///
/// Created once at registration and never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Credential store failures
#[derive(Error, Debug)]
pub enum StoreError {
    /// The email is already taken. The store decides this atomically.
    #[error("email already registered")]
    Duplicate,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let duplicate = matches!(
            &err,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation()
        );
        if duplicate {
            StoreError::Duplicate
        } else {
            StoreError::Backend(err.into())
        }
    }
}

/// Storage the service depends on
///
/// Implementations must enforce email uniqueness themselves: `insert` is the
/// linearization point for concurrent registrations of the same email.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up a credential by exact email
    async fn find_by_email(&self, email: &str) -> Result<Option<Credential>, StoreError>;

    /// Insert a new credential, failing with [`StoreError::Duplicate`] if the
    /// email is taken
    async fn insert(&self, credential: &Credential) -> Result<(), StoreError>;

    /// Check that the store is reachable
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Postgres-backed credential store
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Credential>, StoreError> {
        let row = sqlx::query_as::<_, (String, String, String)>(
            r#"
            SELECT email, password_hash, role
            FROM credentials
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        let Some((email, password_hash, role)) = row else {
            return Ok(None);
        };
        let role: Role = role
            .parse()
            .map_err(|e| anyhow!("Stored credential for {} is corrupt: {}", email, e))?;

        Ok(Some(Credential {
            email,
            password_hash,
            role,
        }))
    }

    async fn insert(&self, credential: &Credential) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO credentials (email, password_hash, role)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(&credential.email)
        .bind(&credential.password_hash)
        .bind(credential.role.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        crate::db::health_check(&self.pool)
            .await
            .map_err(StoreError::Backend)
    }
}
