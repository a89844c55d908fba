use axum::{
    extract::State,
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser,
    error::{AppJson, AppResult},
    responses::{
        dto::{RecentResponses, SubmitRequest, SubmitResponse},
        services::{self, client_ip},
    },
    state::AppState,
};

pub fn response_routes() -> Router<AppState> {
    Router::new().route("/responses", post(submit_response).get(list_my_responses))
}

#[instrument(skip(state, headers, caller), fields(user_id = %caller.sub))]
pub async fn submit_response(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    headers: HeaderMap,
    AppJson(body): AppJson<SubmitRequest>,
) -> AppResult<Json<SubmitResponse>> {
    let record = services::submit(
        state.store.as_ref(),
        state.notifier.as_ref(),
        &caller,
        body.answer,
        client_ip(&headers),
    )
    .await?;

    Ok(Json(SubmitResponse {
        success: true,
        message: "Response saved successfully",
        id: record.id,
    }))
}

#[instrument(skip(state, caller), fields(user_id = %caller.sub))]
pub async fn list_my_responses(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> AppResult<Json<RecentResponses>> {
    let responses = services::recent_for(state.store.as_ref(), &caller).await?;
    Ok(Json(RecentResponses {
        success: true,
        responses,
    }))
}
