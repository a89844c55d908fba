//! In-memory doubles for the store and notifier seams.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::repo_types::{NewUser, User},
    error::{AppError, AppResult},
    notify::Notifier,
    responses::repo_types::{NewResponse, ResponseRecord},
    store::Store,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    responses: Vec<ResponseRecord>,
}

/// Store backed by two vectors; can be switched into an "unreachable" mode.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn set_unavailable(&self, down: bool) {
        self.unavailable.store(down, Ordering::SeqCst);
    }

    fn check(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::ServiceUnavailable(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    pub fn user_by_email(&self, email: &str) -> Option<User> {
        let tables = self.tables.lock().unwrap();
        tables.users.iter().find(|u| u.email == email).cloned()
    }

    pub fn user_count(&self) -> usize {
        self.tables.lock().unwrap().users.len()
    }

    pub fn response_count(&self) -> usize {
        self.tables.lock().unwrap().responses.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.check()?;
        Ok(self.user_by_email(email))
    }

    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("Email already registered".into()));
        }
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: OffsetDateTime::now_utc(),
            has_responded: false,
            answer: None,
            answered_at: None,
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn count_users(&self) -> AppResult<i64> {
        self.check()?;
        Ok(self.user_count() as i64)
    }

    async fn record_response(&self, response: NewResponse) -> AppResult<ResponseRecord> {
        self.check()?;
        let now = OffsetDateTime::now_utc();
        let record = ResponseRecord {
            id: Uuid::new_v4(),
            user_id: Some(response.user_id),
            user_name: response.user_name,
            user_email: response.user_email,
            answer: response.answer.as_str().to_string(),
            timestamp: now,
            ip: response.ip,
        };

        let mut tables = self.tables.lock().unwrap();
        // Mirrors the foreign key on responses.user_id.
        let Some(user) = tables.users.iter_mut().find(|u| u.id == response.user_id) else {
            return Err(AppError::Internal(anyhow::anyhow!(
                "responses.user_id references missing user {}",
                response.user_id
            )));
        };
        user.has_responded = true;
        user.answer = Some(response.answer.as_str().to_string());
        user.answered_at = Some(now);
        tables.responses.push(record.clone());
        Ok(record)
    }

    async fn list_responses(&self) -> AppResult<Vec<ResponseRecord>> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.responses.iter().rev().cloned().collect())
    }

    async fn list_user_responses(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<ResponseRecord>> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .responses
            .iter()
            .rev()
            .filter(|r| r.user_id == Some(user_id))
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }
}

/// Notifier that remembers every call and optionally fails them.
#[derive(Default)]
pub struct RecordingNotifier {
    calls: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            calls: Mutex::default(),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify_accepted(&self, name: &str, email: &str) -> anyhow::Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((name.to_string(), email.to_string()));
        if self.fail {
            anyhow::bail!("smtp relay refused connection");
        }
        Ok(())
    }
}
