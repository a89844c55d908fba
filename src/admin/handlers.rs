use axum::{extract::State, Json};
use tracing::instrument;

use crate::{
    admin::{
        dto::{AdminCredentials, DashboardResponse},
        services,
    },
    error::{AppJson, AppResult},
    state::AppState,
};

/// Credentials are resent on every call, including dashboard refresh polls.
#[instrument(skip(state, creds))]
pub async fn dashboard(
    State(state): State<AppState>,
    AppJson(creds): AppJson<AdminCredentials>,
) -> AppResult<Json<DashboardResponse>> {
    services::check_admin(&state.config.admin, &creds)?;
    let data = services::dashboard(state.store.as_ref()).await?;
    Ok(Json(DashboardResponse {
        success: true,
        data,
    }))
}
