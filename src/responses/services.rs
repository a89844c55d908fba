use std::time::Duration;

use axum::http::HeaderMap;
use tracing::{info, warn};

use crate::{
    auth::claims::Claims,
    error::AppResult,
    notify::Notifier,
    responses::repo_types::{Answer, NewResponse, ResponseRecord},
    store::Store,
};

/// Upper bound on how long a submission waits for the notifier.
pub const NOTIFY_TIMEOUT: Duration = Duration::from_secs(5);
pub const RECENT_LIMIT: i64 = 10;

/// Client address as reported by the proxy chain, or `"unknown"`.
pub fn client_ip(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };
    forwarded
        .or_else(real_ip)
        .unwrap_or("unknown")
        .to_string()
}

/// Records `answer` for the caller and, on "yes", notifies best-effort.
pub async fn submit(
    store: &dyn Store,
    notifier: &dyn Notifier,
    caller: &Claims,
    answer: Answer,
    ip: String,
) -> AppResult<ResponseRecord> {
    let record = store
        .record_response(NewResponse {
            user_id: caller.sub,
            user_name: caller.name.clone(),
            user_email: caller.email.clone(),
            answer,
            ip,
        })
        .await?;
    info!(response_id = %record.id, user_id = %caller.sub, answer = answer.as_str(), "response saved");

    if answer == Answer::Yes {
        notify_best_effort(notifier, &caller.name, &caller.email).await;
    }
    Ok(record)
}

async fn notify_best_effort(notifier: &dyn Notifier, name: &str, email: &str) {
    match tokio::time::timeout(NOTIFY_TIMEOUT, notifier.notify_accepted(name, email)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %format!("{e:#}"), %email, "acceptance notification failed"),
        Err(_) => warn!(%email, timeout = ?NOTIFY_TIMEOUT, "acceptance notification timed out"),
    }
}

pub async fn recent_for(store: &dyn Store, caller: &Claims) -> AppResult<Vec<ResponseRecord>> {
    store.list_user_responses(caller.sub, RECENT_LIMIT).await
}
