use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::{Answer, ResponseRecord};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmitRequest {
    pub answer: Answer,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: &'static str,
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct RecentResponses {
    pub success: bool,
    pub responses: Vec<ResponseRecord>,
}
