use std::sync::Arc;

use login_service::config::Config;
use login_service::domain::login::models::LoginAuthenticator;
use login_service::domain::login::policy::LoginPolicy;
use login_service::inbound::http::router::create_router;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "login_service=debug,widget_auth=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "login-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        max_auth_age_secs = ?config.telegram.max_auth_age_secs,
        allowed_ids = config.telegram.allowed_ids.len(),
        "Configuration loaded"
    );

    let policy = LoginPolicy::from_config(&config.telegram);
    let authenticator: LoginAuthenticator = LoginAuthenticator::builder()
        .secret(&config.telegram.bot_token)
        .verify(policy)
        .build()?;
    tracing::info!(strategy = authenticator.name(), "Widget authenticator ready");

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(Arc::new(authenticator));
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited successfully");

    Ok(())
}
