use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Duration;
use widget_auth::AuthInfo;
use widget_auth::IdentityRecord;
use widget_auth::ResultSink;
use widget_auth::VerifyIdentity;

use super::errors::LoginError;
use super::models::LoginRequest;
use super::models::TelegramUser;
use crate::config::TelegramConfig;

/// Service decision applied to logins whose hash already verified.
///
/// Refuses logins older than `max_auth_age` and, when an allow-list is set,
/// users outside it.
#[derive(Debug, Clone, Default)]
pub struct LoginPolicy {
    max_auth_age: Option<Duration>,
    allowed_ids: Option<HashSet<String>>,
}

impl LoginPolicy {
    /// Create a policy accepting every verified login.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the policy from the `[telegram]` configuration section.
    pub fn from_config(config: &TelegramConfig) -> Self {
        let mut policy = Self::new();
        if let Some(seconds) = config.max_auth_age_secs.filter(|seconds| *seconds > 0) {
            policy = policy.with_max_auth_age(Duration::seconds(seconds));
        }
        if !config.allowed_ids.is_empty() {
            policy = policy.with_allowed_ids(config.allowed_ids.iter().cloned());
        }
        policy
    }

    /// Refuse logins whose `auth_date` is older than `max_age`.
    pub fn with_max_auth_age(mut self, max_age: Duration) -> Self {
        self.max_auth_age = Some(max_age);
        self
    }

    /// Only let the given Telegram user ids in.
    pub fn with_allowed_ids(mut self, ids: impl IntoIterator<Item = String>) -> Self {
        self.allowed_ids = Some(ids.into_iter().collect());
        self
    }

    /// Decide on a verified login.
    ///
    /// # Returns
    /// `Ok(Some(user))` to accept, `Ok(None)` with info to refuse
    ///
    /// # Errors
    /// * `InvalidAuthDate` - `auth_date` is not a Unix timestamp
    pub fn evaluate(
        &self,
        request: &LoginRequest,
        record: &IdentityRecord,
    ) -> Result<(Option<TelegramUser>, Option<AuthInfo>), LoginError> {
        let issued_at = record
            .issued_at()
            .ok_or_else(|| LoginError::InvalidAuthDate(record.auth_date().to_string()))?;

        if let Some(max_age) = self.max_auth_age {
            if request.received_time() - issued_at > max_age {
                let info = AuthInfo::message("Login data is outdated").with_kind("expired");
                return Ok((None, Some(info)));
            }
        }

        if let Some(allowed_ids) = &self.allowed_ids {
            if !allowed_ids.contains(record.id()) {
                let info = AuthInfo::message("User is not allowed to log in").with_kind("forbidden");
                return Ok((None, Some(info)));
            }
        }

        let user = TelegramUser::from_record(record, request.received_time());
        Ok((Some(user), None))
    }
}

#[async_trait]
impl VerifyIdentity<LoginRequest, TelegramUser> for LoginPolicy {
    async fn verify(
        &self,
        request: &LoginRequest,
        record: IdentityRecord,
        done: ResultSink<TelegramUser>,
    ) {
        match self.evaluate(request, &record) {
            Ok((user, info)) => done.complete(Ok(user), info),
            Err(e) => done.error(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;
    use widget_auth::build_check_string;
    use widget_auth::Disposition;
    use widget_auth::FieldSource;
    use widget_auth::HashVerifier;
    use widget_auth::RejectStatus;
    use widget_auth::WidgetAuthenticator;

    use super::*;
    use crate::domain::login::models::LoginAuthenticator;

    const BOT_TOKEN: &str = "123456:test-bot-token";
    const AUTH_DATE: i64 = 1_700_000_000;

    fn signed_request(id: &str, auth_date: &str, received_after_secs: i64) -> LoginRequest {
        let mut fields = vec![
            ("id", id),
            ("first_name", "John"),
            ("last_name", "Doe"),
            ("auth_date", auth_date),
        ];
        let verifier = HashVerifier::new(BOT_TOKEN).expect("Failed to create verifier");
        let hash = verifier.sign(&build_check_string(fields.iter().copied(), "hash"));
        fields.push(("hash", hash.as_str()));

        let received_at = Utc
            .timestamp_opt(AUTH_DATE + received_after_secs, 0)
            .single()
            .expect("valid timestamp");
        LoginRequest::received_at(FieldSource::from_pairs(fields), received_at)
    }

    fn authenticator(policy: LoginPolicy) -> LoginAuthenticator {
        WidgetAuthenticator::builder()
            .secret(BOT_TOKEN)
            .verify(policy)
            .build()
            .expect("Failed to build authenticator")
    }

    #[tokio::test]
    async fn test_fresh_login_accepted() {
        let authenticator = authenticator(LoginPolicy::new().with_max_auth_age(Duration::hours(1)));
        let request = signed_request("42", &AUTH_DATE.to_string(), 60);

        match authenticator.authenticate(&request).await {
            Disposition::Accept { identity, info } => {
                assert_eq!(identity.id, "42");
                assert_eq!(identity.display_name, "John Doe");
                assert_eq!(identity.last_name.as_deref(), Some("Doe"));
                assert!(info.is_none());
            }
            other => panic!("expected accept, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_outdated_login_unauthorized() {
        let authenticator = authenticator(LoginPolicy::new().with_max_auth_age(Duration::hours(1)));
        let request = signed_request("42", &AUTH_DATE.to_string(), 2 * 3600);

        match authenticator.authenticate(&request).await {
            Disposition::Reject { info, status } => {
                assert_eq!(status, RejectStatus::Unauthorized);
                assert_eq!(info.and_then(|info| info.kind).as_deref(), Some("expired"));
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_user_outside_allow_list_unauthorized() {
        let policy = LoginPolicy::new().with_allowed_ids(["7".to_string()]);
        let authenticator = authenticator(policy);

        let rejected = authenticator
            .authenticate(&signed_request("42", &AUTH_DATE.to_string(), 0))
            .await;
        assert_eq!(rejected.reject_status(), Some(RejectStatus::Unauthorized));

        let accepted = authenticator
            .authenticate(&signed_request("7", &AUTH_DATE.to_string(), 0))
            .await;
        assert!(accepted.is_accept());
    }

    #[tokio::test]
    async fn test_unusable_auth_date_aborts() {
        let authenticator = authenticator(LoginPolicy::new());
        let request = signed_request("42", "yesterday", 0);

        match authenticator.authenticate(&request).await {
            Disposition::Abort(error) => {
                assert_eq!(
                    error.downcast_ref::<LoginError>(),
                    Some(&LoginError::InvalidAuthDate("yesterday".to_string()))
                );
            }
            other => panic!("expected abort, got {:?}", other),
        }
    }

    #[test]
    fn test_from_config() {
        let config = TelegramConfig {
            bot_token: BOT_TOKEN.to_string(),
            max_auth_age_secs: Some(0),
            allowed_ids: vec!["1".to_string()],
        };

        let policy = LoginPolicy::from_config(&config);
        assert!(policy.max_auth_age.is_none());
        assert_eq!(
            policy.allowed_ids,
            Some(HashSet::from(["1".to_string()]))
        );
    }
}
