use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::{
    auth::{
        repo as users,
        repo_types::{NewUser, User},
    },
    error::AppResult,
    responses::{
        repo as responses,
        repo_types::{NewResponse, ResponseRecord},
    },
    store::Store,
};

const MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

fn pool_options() -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
}

/// PostgreSQL-backed [`Store`] over one shared pool.
#[derive(Clone)]
pub struct PgStore {
    pub db: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let db = pool_options()
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { db })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db)
            .await
            .context("run migrations")?;
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        users::find_by_email(&self.db, email).await
    }

    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        users::create(&self.db, &user).await
    }

    async fn count_users(&self) -> AppResult<i64> {
        users::count(&self.db).await
    }

    async fn record_response(&self, response: NewResponse) -> AppResult<ResponseRecord> {
        responses::record(&self.db, &response).await
    }

    async fn list_responses(&self) -> AppResult<Vec<ResponseRecord>> {
        responses::list_all(&self.db).await
    }

    async fn list_user_responses(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<ResponseRecord>> {
        responses::list_by_user(&self.db, user_id, limit).await
    }
}
