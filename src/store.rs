use axum::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use tracing::error;

use crate::auth::error::AuthError;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,                   // assigned by the store, immutable
    pub email: String,             // unique login key, stored as received
    #[serde(skip_serializing)]
    pub hashed_password: String,   // argon2 PHC string; "" for provider accounts
    pub full_name: Option<String>,
    pub is_active: bool,
}

/// Fields for a user not yet persisted; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub hashed_password: String,
    pub full_name: Option<String>,
    pub is_active: bool,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;

    /// Persists a new user. Email uniqueness is enforced by the store
    /// itself, so a concurrent insert for the same email surfaces as
    /// `DuplicateEmail` rather than slipping past a stale lookup.
    async fn insert(&self, user: NewUser) -> Result<User, AuthError>;
}

pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, hashed_password, full_name, is_active
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, "find_by_email failed");
            AuthError::Internal(e.into())
        })?;
        Ok(user)
    }

    async fn insert(&self, user: NewUser) -> Result<User, AuthError> {
        let row = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, hashed_password, full_name, is_active)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, hashed_password, full_name, is_active
            "#,
        )
        .bind(&user.email)
        .bind(&user.hashed_password)
        .bind(&user.full_name)
        .bind(user.is_active)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            // The unique index on email closes the lookup-then-insert
            // race; a losing insert surfaces as a duplicate, not a 500.
            if e.as_database_error()
                .map(|db| db.is_unique_violation())
                .unwrap_or(false)
            {
                return AuthError::DuplicateEmail;
            }
            error!(error = %e, "insert user failed");
            AuthError::Internal(e.into())
        })?;
        Ok(row)
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use std::sync::Mutex;

    use super::*;

    /// In-memory store so the auth flows can run without Postgres.
    #[derive(Default)]
    pub struct MemoryStore {
        users: Mutex<Vec<User>>,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn len(&self) -> usize {
            self.users.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl UserStore for MemoryStore {
        async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email == email)
                .cloned())
        }

        async fn insert(&self, user: NewUser) -> Result<User, AuthError> {
            let mut users = self.users.lock().unwrap();
            if users.iter().any(|u| u.email == user.email) {
                return Err(AuthError::DuplicateEmail);
            }
            let stored = User {
                id: users.len() as i64 + 1,
                email: user.email,
                hashed_password: user.hashed_password,
                full_name: user.full_name,
                is_active: user.is_active,
            };
            users.push(stored.clone());
            Ok(stored)
        }
    }
}
