use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,                           // unique user ID
    pub name: String,                       // display name
    pub email: String,                      // lowercased, unique
    #[serde(skip_serializing)]
    pub password_hash: String,              // Argon2 hash, not exposed in JSON
    pub created_at: OffsetDateTime,         // creation timestamp
    pub has_responded: bool,                // set by the first submission
    pub answer: Option<String>,             // last recorded answer
    pub answered_at: Option<OffsetDateTime>,
}

/// Fields needed to insert a user; everything else is defaulted by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}
