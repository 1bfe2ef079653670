use sqlx::SqliteConnection;

use crate::{
    db_types::{NewUser, User},
    traits::AuthApiError,
};

pub(crate) async fn insert_user(user: &NewUser, conn: &mut SqliteConnection) -> Result<User, AuthApiError> {
    let user = sqlx::query_as(
        r#"
        INSERT INTO users (first_name, last_name, email, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *;
        "#,
    )
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.role.to_string())
    .fetch_one(&mut *conn)
    .await?;
    Ok(user)
}

pub(crate) async fn fetch_user_by_email(email: &str, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE email = $1").bind(email).fetch_optional(&mut *conn).await
}

pub(crate) async fn fetch_user(id: i64, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE id = $1").bind(id).fetch_optional(&mut *conn).await
}
