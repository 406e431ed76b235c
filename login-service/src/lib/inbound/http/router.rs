use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::health::health;
use super::handlers::telegram_callback::telegram_callback_form;
use super::handlers::telegram_callback::telegram_callback_query;
use super::handlers::telegram_callback::telegram_verify_json;
use crate::domain::login::models::LoginAuthenticator;

#[derive(Clone)]
pub struct AppState {
    pub authenticator: Arc<LoginAuthenticator>,
}

pub fn create_router(authenticator: Arc<LoginAuthenticator>) -> Router {
    let state = AppState { authenticator };

    let login_routes = Router::new()
        .route(
            "/auth/telegram/callback",
            get(telegram_callback_query).post(telegram_callback_form),
        )
        .route("/auth/telegram/verify", post(telegram_verify_json));

    // Request URIs carry the login fields, hash included; only the path is logged.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                path = %request.uri().path(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                path = %request.uri().path(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .route("/health", get(health))
        .merge(login_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
