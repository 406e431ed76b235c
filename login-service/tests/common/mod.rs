use std::sync::Arc;

use login_service::domain::login::models::LoginAuthenticator;
use login_service::domain::login::policy::LoginPolicy;
use login_service::inbound::http::router::create_router;
use widget_auth::build_check_string;
use widget_auth::HashVerifier;

pub const BOT_TOKEN: &str = "123456789:test-bot-token";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub signer: HashVerifier,
}

impl TestApp {
    /// Spawn the application with a policy accepting every verified login
    pub async fn spawn() -> Self {
        Self::spawn_with_policy(LoginPolicy::new()).await
    }

    /// Spawn the application in a background task and return TestApp
    pub async fn spawn_with_policy(policy: LoginPolicy) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let authenticator = LoginAuthenticator::builder()
            .secret(BOT_TOKEN)
            .verify(policy)
            .build()
            .expect("Failed to build authenticator");

        let router = create_router(Arc::new(authenticator));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            signer: HashVerifier::new(BOT_TOKEN).expect("Failed to create signer"),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Sign widget fields the way the identity provider does, hash appended last
    pub fn sign(&self, fields: &[(&str, &str)]) -> Vec<(String, String)> {
        let hash = self
            .signer
            .sign(&build_check_string(fields.iter().copied(), "hash"));

        let mut signed: Vec<(String, String)> = fields
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        signed.push(("hash".to_string(), hash));
        signed
    }
}
