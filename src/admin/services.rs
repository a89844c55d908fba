use tracing::{info, warn};

use crate::{
    admin::dto::{AdminCredentials, DashboardData, DashboardStats},
    config::AdminConfig,
    error::{AppError, AppResult},
    responses::repo_types::Answer,
    store::Store,
};

/// Exact comparison against the configured pair; no token is issued.
pub fn check_admin(config: &AdminConfig, creds: &AdminCredentials) -> AppResult<()> {
    let (Some(email), Some(password)) = (&config.email, &config.password) else {
        return Err(AppError::AdminNotConfigured);
    };
    if creds.email != *email || creds.password != *password {
        warn!(email = %creds.email, "admin login rejected");
        return Err(AppError::Auth("Invalid admin credentials".into()));
    }
    Ok(())
}

/// Response stats are derived from the listed rows so they always agree with them.
pub async fn dashboard(store: &dyn Store) -> AppResult<DashboardData> {
    let responses = store.list_responses().await?;
    let total_users = store.count_users().await?;
    let yes_count = responses
        .iter()
        .filter(|r| r.answer == Answer::Yes.as_str())
        .count() as i64;

    let stats = DashboardStats {
        total_users,
        total_responses: responses.len() as i64,
        yes_count,
    };
    info!(?stats, "admin dashboard served");
    Ok(DashboardData { responses, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::repo_types::{NewUser, User},
        responses::repo_types::{NewResponse, ResponseRecord},
        testing::MemoryStore,
    };
    use async_trait::async_trait;
    use uuid::Uuid;

    /// Commits a "yes" right after every listing, like a submission landing
    /// mid-dashboard.
    struct ConcurrentSubmitter {
        inner: MemoryStore,
        voter: User,
    }

    #[async_trait]
    impl Store for ConcurrentSubmitter {
        async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
            self.inner.find_user_by_email(email).await
        }

        async fn create_user(&self, user: NewUser) -> AppResult<User> {
            self.inner.create_user(user).await
        }

        async fn count_users(&self) -> AppResult<i64> {
            self.inner.count_users().await
        }

        async fn record_response(&self, response: NewResponse) -> AppResult<ResponseRecord> {
            self.inner.record_response(response).await
        }

        async fn list_responses(&self) -> AppResult<Vec<ResponseRecord>> {
            let listed = self.inner.list_responses().await?;
            self.inner
                .record_response(NewResponse {
                    user_id: self.voter.id,
                    user_name: self.voter.name.clone(),
                    user_email: self.voter.email.clone(),
                    answer: Answer::Yes,
                    ip: "unknown".into(),
                })
                .await?;
            Ok(listed)
        }

        async fn list_user_responses(
            &self,
            user_id: Uuid,
            limit: i64,
        ) -> AppResult<Vec<ResponseRecord>> {
            self.inner.list_user_responses(user_id, limit).await
        }
    }

    fn admin() -> AdminConfig {
        AdminConfig {
            email: Some("admin@x.com".into()),
            password: Some("hunter22".into()),
        }
    }

    fn creds(email: &str, password: &str) -> AdminCredentials {
        AdminCredentials {
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn accepts_exact_pair_only() {
        assert!(check_admin(&admin(), &creds("admin@x.com", "hunter22")).is_ok());

        for (e, p) in [
            ("admin@x.com", "hunter2"),
            ("Admin@x.com", "hunter22"),
            ("", ""),
        ] {
            let err = check_admin(&admin(), &creds(e, p)).unwrap_err();
            assert!(matches!(err, AppError::Auth(_)), "got {err:?}");
        }
    }

    #[test]
    fn unconfigured_is_distinguishable_but_looks_the_same() {
        let half = AdminConfig {
            email: Some("admin@x.com".into()),
            password: None,
        };
        let unconfigured = check_admin(&half, &creds("admin@x.com", "")).unwrap_err();
        let mismatch = check_admin(&admin(), &creds("admin@x.com", "nope")).unwrap_err();

        assert!(matches!(unconfigured, AppError::AdminNotConfigured));
        assert_eq!(unconfigured.status(), mismatch.status());
        assert_eq!(unconfigured.public_message(), mismatch.public_message());
        assert_ne!(unconfigured.to_string(), mismatch.to_string());
    }

    #[tokio::test]
    async fn stats_track_store_contents() {
        let store = MemoryStore::default();
        let mut users = Vec::new();
        for (name, email) in [("Ana", "ana@x.com"), ("Bo", "bo@x.com"), ("Cy", "cy@x.com")] {
            users.push(
                store
                    .create_user(NewUser {
                        name: name.into(),
                        email: email.into(),
                        password_hash: "hash".into(),
                    })
                    .await
                    .unwrap(),
            );
        }

        let answers = [Answer::Yes, Answer::No, Answer::Yes, Answer::Yes, Answer::No];
        for (i, answer) in answers.iter().enumerate() {
            let user = &users[i % users.len()];
            store
                .record_response(NewResponse {
                    user_id: user.id,
                    user_name: user.name.clone(),
                    user_email: user.email.clone(),
                    answer: *answer,
                    ip: "unknown".into(),
                })
                .await
                .unwrap();

            let data = dashboard(&store).await.unwrap();
            let yes_rows = data.responses.iter().filter(|r| r.answer == "yes").count() as i64;
            assert_eq!(data.stats.total_users, 3);
            assert_eq!(data.stats.total_responses, store.response_count() as i64);
            assert_eq!(data.stats.yes_count, yes_rows);
        }

        let data = dashboard(&store).await.unwrap();
        assert_eq!(
            data.stats,
            DashboardStats {
                total_users: 3,
                total_responses: 5,
                yes_count: 3,
            }
        );
        assert!(data
            .responses
            .windows(2)
            .all(|w| w[0].timestamp >= w[1].timestamp));
    }

    #[tokio::test]
    async fn stats_match_rows_when_submission_lands_mid_dashboard() {
        let inner = MemoryStore::default();
        let voter = inner
            .create_user(NewUser {
                name: "Ana".into(),
                email: "ana@x.com".into(),
                password_hash: "hash".into(),
            })
            .await
            .unwrap();
        let store = ConcurrentSubmitter { inner, voter };

        let first = dashboard(&store).await.unwrap();
        assert!(first.responses.is_empty());
        assert_eq!(first.stats.total_responses, 0);
        assert_eq!(first.stats.yes_count, 0);

        let second = dashboard(&store).await.unwrap();
        let yes_rows = second.responses.iter().filter(|r| r.answer == "yes").count() as i64;
        assert_eq!(second.responses.len(), 1);
        assert_eq!(second.stats.yes_count, yes_rows);
        assert_eq!(store.inner.response_count(), 2);
    }
}
