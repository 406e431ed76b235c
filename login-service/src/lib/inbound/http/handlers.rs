use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;
use widget_auth::AuthInfo;

pub mod health;
pub mod telegram_callback;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }

    pub fn status(&self) -> StatusCode {
        self.0
    }

    pub fn data(&self) -> &T {
        &self.1 .0.data
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(ApiErrorData),
    Unauthorized(ApiErrorData),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, data) = match self {
            ApiError::InternalServerError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorData {
                    message: msg,
                    kind: None,
                },
            ),
            ApiError::BadRequest(data) => (StatusCode::BAD_REQUEST, data),
            ApiError::Unauthorized(data) => (StatusCode::UNAUTHORIZED, data),
        };

        (status, Json(ApiResponseBody::new(status, data))).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl ApiErrorData {
    /// Build error data from optional auth info, falling back to `default_message`.
    pub fn from_info(info: Option<AuthInfo>, default_message: &str) -> Self {
        let info = info.unwrap_or_default();
        Self {
            message: info.message.unwrap_or_else(|| default_message.to_string()),
            kind: info.kind,
        }
    }
}
