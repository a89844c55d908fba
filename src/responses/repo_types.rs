use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    pub fn as_str(self) -> &'static str {
        match self {
            Answer::Yes => "yes",
            Answer::No => "no",
        }
    }
}

/// One submitted answer. Never updated after insert.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub user_name: String,
    pub user_email: String,
    pub answer: String,
    #[serde(with = "time::serde::rfc3339")]
    #[sqlx(rename = "created_at")]
    pub timestamp: OffsetDateTime,
    pub ip: String,
}

/// Submission as handed to the store: the response row plus the owner whose
/// status gets updated in the same unit.
#[derive(Debug, Clone)]
pub struct NewResponse {
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub answer: Answer,
    pub ip: String,
}
