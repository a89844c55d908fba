use serde::{Deserialize, Serialize};

use crate::responses::repo_types::ResponseRecord;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdminCredentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_responses: i64,
    pub yes_count: i64,
}

#[derive(Debug, Serialize)]
pub struct DashboardData {
    pub responses: Vec<ResponseRecord>,
    pub stats: DashboardStats,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub success: bool,
    pub data: DashboardData,
}
