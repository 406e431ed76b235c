use axum::http::StatusCode;
use serde::Serialize;
use widget_auth::AuthInfo;
use widget_auth::DispositionSink;
use widget_auth::RejectStatus;

use super::handlers::ApiError;
use super::handlers::ApiErrorData;
use super::handlers::ApiSuccess;
use crate::domain::login::models::TelegramUser;

/// Turns an authentication outcome into an HTTP response.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpResponder;

impl DispositionSink<TelegramUser> for HttpResponder {
    type Output = Result<ApiSuccess<LoginResponseData>, ApiError>;

    fn accept(self, identity: TelegramUser, info: Option<AuthInfo>) -> Self::Output {
        tracing::info!(user_id = %identity.id, "Telegram login succeeded");
        Ok(ApiSuccess::new(
            StatusCode::OK,
            LoginResponseData {
                user: identity,
                info,
            },
        ))
    }

    fn reject(self, info: Option<AuthInfo>, status: RejectStatus) -> Self::Output {
        Err(match status {
            RejectStatus::BadRequest => {
                ApiError::BadRequest(ApiErrorData::from_info(info, "Invalid login data"))
            }
            RejectStatus::Unauthorized => {
                ApiError::Unauthorized(ApiErrorData::from_info(info, "Unauthorized"))
            }
        })
    }

    fn abort(self, error: anyhow::Error) -> Self::Output {
        tracing::error!(error = %error, "Telegram login aborted");
        Err(ApiError::InternalServerError(
            "Authentication failed due to an internal error".to_string(),
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub user: TelegramUser,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<AuthInfo>,
}
