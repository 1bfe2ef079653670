use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewUser, User},
    traits::{AuthApiError, UserManagement},
};

/// Actor identity management. Password hashing and verification happen at the caller; this API
/// only ever handles hashes.
pub struct UserApi<B> {
    db: B,
}

impl<B> Debug for UserApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UserApi")
    }
}

impl<B> UserApi<B>
where B: UserManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn register_user(&self, user: &NewUser) -> Result<User, AuthApiError> {
        let user = self.db.register_user(user).await?;
        info!("🔑️ Registered {} {} as {}", user.first_name, user.last_name, user.role);
        Ok(user)
    }

    pub async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, AuthApiError> {
        self.db.fetch_user_by_email(email).await
    }

    pub async fn fetch_user(&self, id: i64) -> Result<Option<User>, AuthApiError> {
        self.db.fetch_user(id).await
    }
}
