use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_days: i64,
}

/// Fixed admin identity. Either half may be missing, which disables the dashboard.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminConfig {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub notify_to: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub environment: Environment,
    pub jwt: JwtConfig,
    pub admin: AdminConfig,
    pub mail: Option<MailConfig>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let environment = match std::env::var("APP_ENV").as_deref() {
            Ok("production") => Environment::Production,
            _ => Environment::Development,
        };
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "valentine".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "valentine-users".into()),
            ttl_days: 7,
        };
        let admin = AdminConfig {
            email: non_empty_var("ADMIN_EMAIL"),
            password: non_empty_var("ADMIN_PASSWORD"),
        };

        // Mail needs at least a sender account and a destination.
        let mail = match (non_empty_var("SMTP_USER"), non_empty_var("NOTIFICATION_EMAIL")) {
            (Some(username), Some(notify_to)) => Some(MailConfig {
                host: non_empty_var("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".into()),
                port: std::env::var("SMTP_PORT")
                    .ok()
                    .and_then(|v| v.parse::<u16>().ok())
                    .unwrap_or(587),
                username,
                password: std::env::var("SMTP_PASS").unwrap_or_default(),
                notify_to,
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            environment,
            jwt,
            admin,
            mail,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
