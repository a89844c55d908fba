use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    auth::repo_types::{NewUser, User},
    error::AppResult,
    responses::repo_types::{NewResponse, ResponseRecord},
};

/// Credential store and response store behind one seam.
///
/// Implementations map connectivity failures to
/// [`AppError::ServiceUnavailable`](crate::error::AppError::ServiceUnavailable)
/// and duplicate emails to [`AppError::Conflict`](crate::error::AppError::Conflict).
#[async_trait]
pub trait Store: Send + Sync {
    /// `email` must already be lowercased.
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn create_user(&self, user: NewUser) -> AppResult<User>;

    async fn count_users(&self) -> AppResult<i64>;

    /// Inserts the response and marks its owner as responded, as one unit.
    async fn record_response(&self, response: NewResponse) -> AppResult<ResponseRecord>;

    /// All responses, newest first.
    async fn list_responses(&self) -> AppResult<Vec<ResponseRecord>>;

    async fn list_user_responses(&self, user_id: Uuid, limit: i64)
        -> AppResult<Vec<ResponseRecord>>;
}
