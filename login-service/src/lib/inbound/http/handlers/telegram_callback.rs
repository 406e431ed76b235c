use axum::extract::Query;
use axum::extract::State;
use axum::Form;
use axum::Json;
use serde_json::Map;
use serde_json::Value;
use widget_auth::FieldSource;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::login::models::LoginRequest;
use crate::inbound::http::responder::HttpResponder;
use crate::inbound::http::responder::LoginResponseData;
use crate::inbound::http::router::AppState;

/// Widget redirect: fields arrive in the query string.
pub async fn telegram_callback_query(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    login(&state, FieldSource::from_pairs(pairs)).await
}

/// Widget post: fields arrive form-encoded in the body.
pub async fn telegram_callback_form(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    login(&state, FieldSource::from_pairs(pairs)).await
}

/// Widget JavaScript callback: the user object is posted as JSON.
pub async fn telegram_verify_json(
    State(state): State<AppState>,
    Json(body): Json<Map<String, Value>>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    login(&state, widget_json_fields(body)).await
}

async fn login(
    state: &AppState,
    fields: FieldSource,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let request = LoginRequest::new(fields);
    state
        .authenticator
        .authenticate_with(&request, HttpResponder)
        .await
}

/// The widget serialises `id` and `auth_date` as JSON integers; they are
/// signed in their decimal form.
fn widget_json_fields(body: Map<String, Value>) -> FieldSource {
    let body = body
        .into_iter()
        .map(|(key, value)| match value {
            Value::Number(number) if number.is_i64() || number.is_u64() => {
                (key, Value::String(number.to_string()))
            }
            other => (key, other),
        })
        .collect();

    FieldSource::from_json(body)
}
