use sqlx::PgPool;

use crate::{
    auth::repo_types::{NewUser, User},
    error::{AppError, AppResult},
};

const UNIQUE_VIOLATION: &str = "23505";

/// Find a user by (lowercased) email.
pub async fn find_by_email(db: &PgPool, email: &str) -> AppResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password_hash, created_at, has_responded, answer, answered_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

/// Create a new user with hashed password.
pub async fn create(db: &PgPool, new: &NewUser) -> AppResult<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, email, password_hash)
        VALUES ($1, $2, $3)
        RETURNING id, name, email, password_hash, created_at, has_responded, answer, answered_at
        "#,
    )
    .bind(&new.name)
    .bind(&new.email)
    .bind(&new.password_hash)
    .fetch_one(db)
    .await
    .map_err(|e| {
        let duplicate = e
            .as_database_error()
            .and_then(|d| d.code())
            .is_some_and(|code| code == UNIQUE_VIOLATION);
        // Lost a race with a concurrent sign-up for the same email.
        if duplicate {
            AppError::Conflict("Email already registered".into())
        } else {
            AppError::from(e)
        }
    })?;
    Ok(user)
}

pub async fn count(db: &PgPool) -> AppResult<i64> {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(db)
        .await?;
    Ok(n)
}
