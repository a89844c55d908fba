use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, LogoutResponse, MeResponse, PublicUser, SignupRequest},
        extractors::{clear_session_cookie, session_cookie, AuthUser},
        jwt::JwtKeys,
        services::{self, Session},
    },
    error::{AppJson, AppResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn with_session(
    state: &AppState,
    jar: CookieJar,
    session: Session,
    message: &'static str,
) -> (CookieJar, Json<AuthResponse>) {
    let jar = jar.add(session_cookie(session.token, state.config.is_production()));
    (
        jar,
        Json(AuthResponse {
            success: true,
            message,
            user: session.user,
        }),
    )
}

#[instrument(skip(state, jar, payload))]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<SignupRequest>,
) -> AppResult<(CookieJar, Json<AuthResponse>)> {
    let keys = JwtKeys::from_ref(&state);
    let session = services::signup(state.store.as_ref(), &keys, payload).await?;
    Ok(with_session(&state, jar, session, "Account created successfully"))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<(CookieJar, Json<AuthResponse>)> {
    let keys = JwtKeys::from_ref(&state);
    let session = services::login(state.store.as_ref(), &keys, payload).await?;
    Ok(with_session(&state, jar, session, "Logged in successfully"))
}

/// Drops the cookie only; an unexpired copy of the token stays valid.
#[instrument(skip(jar, caller))]
pub async fn logout(
    jar: CookieJar,
    caller: Option<AuthUser>,
) -> (CookieJar, Json<LogoutResponse>) {
    if let Some(AuthUser(claims)) = caller {
        info!(user_id = %claims.sub, "user logged out");
    }
    (
        clear_session_cookie(jar),
        Json(LogoutResponse {
            success: true,
            message: "Logged out",
        }),
    )
}

#[instrument(skip(caller))]
pub async fn get_me(AuthUser(caller): AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        success: true,
        user: PublicUser::from(&caller),
    })
}
