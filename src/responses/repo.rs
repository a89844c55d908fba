use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    error::AppResult,
    responses::repo_types::{NewResponse, ResponseRecord},
};

/// Insert the response and update its owner inside one transaction.
pub async fn record(db: &PgPool, new: &NewResponse) -> AppResult<ResponseRecord> {
    let now = OffsetDateTime::now_utc();
    let mut tx = db.begin().await?;

    let record = sqlx::query_as::<_, ResponseRecord>(
        r#"
        INSERT INTO responses (user_id, user_name, user_email, answer, created_at, ip)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, user_id, user_name, user_email, answer, created_at, ip
        "#,
    )
    .bind(new.user_id)
    .bind(&new.user_name)
    .bind(&new.user_email)
    .bind(new.answer.as_str())
    .bind(now)
    .bind(&new.ip)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        UPDATE users
           SET has_responded = TRUE, answer = $2, answered_at = $3
         WHERE id = $1
        "#,
    )
    .bind(new.user_id)
    .bind(new.answer.as_str())
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(record)
}

pub async fn list_all(db: &PgPool) -> AppResult<Vec<ResponseRecord>> {
    let rows = sqlx::query_as::<_, ResponseRecord>(
        r#"
        SELECT id, user_id, user_name, user_email, answer, created_at, ip
          FROM responses
         ORDER BY created_at DESC
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn list_by_user(db: &PgPool, user_id: Uuid, limit: i64) -> AppResult<Vec<ResponseRecord>> {
    let rows = sqlx::query_as::<_, ResponseRecord>(
        r#"
        SELECT id, user_id, user_name, user_email, answer, created_at, ip
          FROM responses
         WHERE user_id = $1
         ORDER BY created_at DESC
         LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
