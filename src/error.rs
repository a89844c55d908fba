use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::state::AppState;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Auth(String),

    #[error("admin credentials not configured")]
    AdminNotConfigured,

    #[error("{0}")]
    Conflict(String),

    #[error("store unavailable: {0}")]
    ServiceUnavailable(#[source] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) | AppError::AdminNotConfigured => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ServiceUnavailable(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show to any caller.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::Auth(msg) | AppError::Conflict(msg) => {
                msg.clone()
            }
            AppError::AdminNotConfigured => "Invalid admin credentials".into(),
            AppError::ServiceUnavailable(_) => "Service temporarily unavailable".into(),
            AppError::Internal(_) => "An internal error occurred".into(),
        }
    }

    /// Connectivity failures are safe to retry; everything else is not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::ServiceUnavailable(_))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => AppError::ServiceUnavailable(e),
            other => AppError::Internal(anyhow::Error::new(other)),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Uniform failure envelope.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Internal detail of a failed request, kept in response extensions so the
/// detail middleware can decide whether the caller gets to see it.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub status: StatusCode,
    pub message: String,
    pub detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.public_message();
        let detail = match &self {
            AppError::Internal(e) => format!("{e:#}"),
            other => other.to_string(),
        };

        match &self {
            AppError::AdminNotConfigured => {
                error!(%detail, "admin dashboard requested without configured credentials")
            }
            e if status.is_server_error() => {
                error!(error = %detail, retryable = e.is_retryable(), "request failed")
            }
            _ => warn!(%status, %message, "request rejected"),
        }

        let mut res = (
            status,
            Json(ErrorBody {
                success: false,
                message: message.clone(),
                error: None,
            }),
        )
            .into_response();
        res.extensions_mut().insert(ErrorReport {
            status,
            message,
            detail,
        });
        res
    }
}

/// Outside production, rewrites error envelopes to carry the internal detail.
pub async fn expose_error_detail(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let res = next.run(req).await;
    if state.config.is_production() {
        return res;
    }
    match res.extensions().get::<ErrorReport>().cloned() {
        Some(report) => (
            report.status,
            Json(ErrorBody {
                success: false,
                message: report.message,
                error: Some(report.detail),
            }),
        )
            .into_response(),
        None => res,
    }
}

/// `Json` extractor whose rejections use the uniform envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
