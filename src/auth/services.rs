use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, warn};

use crate::{
    auth::{
        claims::SessionIdentity,
        dto::{LoginRequest, PublicUser, SignupRequest},
        jwt::JwtKeys,
        password::{hash_password_blocking, verify_password_blocking},
        repo_types::{NewUser, User},
    },
    error::{AppError, AppResult},
    store::Store,
};

const MIN_PASSWORD_LEN: usize = 6;
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Freshly authenticated user plus the token to put in the cookie.
#[derive(Debug)]
pub struct Session {
    pub user: PublicUser,
    pub token: String,
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn open_session(keys: &JwtKeys, user: &User) -> AppResult<Session> {
    let token = keys.issue(&SessionIdentity {
        user_id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
    })?;
    Ok(Session {
        user: PublicUser::from(user),
        token,
    })
}

pub async fn signup(store: &dyn Store, keys: &JwtKeys, req: SignupRequest) -> AppResult<Session> {
    let name = req.name.trim().to_string();
    let email = normalize_email(&req.email);

    if name.is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation("All fields are required".into()));
    }
    if !is_valid_email(&email) {
        warn!(%email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(
            "Password must be at least 6 characters".into(),
        ));
    }

    if store.find_user_by_email(&email).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let password_hash = hash_password_blocking(req.password).await?;
    let user = store
        .create_user(NewUser {
            name,
            email,
            password_hash,
        })
        .await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    open_session(keys, &user)
}

pub async fn login(store: &dyn Store, keys: &JwtKeys, req: LoginRequest) -> AppResult<Session> {
    let email = normalize_email(&req.email);

    let Some(user) = store.find_user_by_email(&email).await? else {
        warn!(%email, "login unknown email");
        return Err(AppError::Auth(INVALID_CREDENTIALS.into()));
    };

    let matches = match verify_password_blocking(req.password, user.password_hash.clone()).await {
        Ok(matches) => matches,
        Err(e) => {
            error!(error = %e, user_id = %user.id, "stored password hash unusable");
            false
        }
    };
    if !matches {
        warn!(%email, user_id = %user.id, "login invalid password");
        return Err(AppError::Auth(INVALID_CREDENTIALS.into()));
    }

    info!(user_id = %user.id, email = %user.email, "user logged in");
    open_session(keys, &user)
}
