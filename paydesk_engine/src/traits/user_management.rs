use thiserror::Error;

use crate::db_types::{NewUser, User};

/// Actor identity storage. Passwords arrive pre-hashed; verification lives with the caller.
#[allow(async_fn_in_trait)]
pub trait UserManagement: Clone {
    async fn register_user(&self, user: &NewUser) -> Result<User, AuthApiError>;
    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, AuthApiError>;
    async fn fetch_user(&self, id: i64) -> Result<Option<User>, AuthApiError>;
}

#[derive(Debug, Clone, Error)]
pub enum AuthApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The email address is already registered: {0}")]
    DuplicateEmail(String),
}

impl From<sqlx::Error> for AuthApiError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return AuthApiError::DuplicateEmail(db.message().to_string());
            }
        }
        AuthApiError::DatabaseError(e.to_string())
    }
}
