mod admin;
mod app;
mod auth;
mod config;
mod db;
mod error;
mod notify;
mod responses;
mod state;
mod store;
#[cfg(test)]
mod testing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "valentine=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let (app_state, store) = state::AppState::init().await?;
    tracing::info!(
        environment = ?app_state.config.environment,
        admin_configured = app_state.config.admin.email.is_some() && app_state.config.admin.password.is_some(),
        mail_configured = app_state.config.mail.is_some(),
        "configuration loaded"
    );

    if let Err(e) = store.migrate().await {
        tracing::warn!(error = %e, "migration failed; continuing");
    }

    app::serve(app::build_app(app_state)).await
}
