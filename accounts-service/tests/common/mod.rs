use std::sync::Arc;

use accounts_service::domain::authentication::service::AuthService;
use accounts_service::inbound::http::router::create_router;
use accounts_service::outbound::repositories::InMemoryUserRepository;
use auth::CredentialConfig;
use auth::CredentialService;
use chrono::Duration;
use serde_json::json;

pub const TEST_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const TEST_ISSUER: &str = "accounts-test";

/// Test application that spawns a real server over an in-memory store
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub repository: Arc<InMemoryUserRepository>,
    pub credentials: Arc<CredentialService>,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryUserRepository::new());
        let credentials = Arc::new(CredentialService::new(&CredentialConfig {
            issuer: TEST_ISSUER.to_string(),
            secret: TEST_SECRET.to_string(),
            access_ttl: Duration::seconds(900),
            refresh_ttl: Duration::seconds(3600),
        }));

        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&repository),
            Arc::clone(&credentials),
        ));
        let router = create_router(auth_service);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            repository,
            credentials,
            api_client: reqwest::Client::builder()
                .build()
                .expect("Failed to create reqwest client"),
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

    pub async fn register(&self, username: &str, email: &str, password: &str) -> reqwest::Response {
        self.post("/auth/register")
            .json(&json!({
                "username": username,
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/auth/login")
            .json(&json!({
                "username": username,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn refresh(&self, refresh_token: &str) -> reqwest::Response {
        self.post("/auth/refresh")
            .header("X-Refresh-Token", refresh_token)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn validate(&self, access_token: &str) -> reqwest::Response {
        self.post("/auth/validate")
            .json(&json!({ "access_token": access_token }))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
