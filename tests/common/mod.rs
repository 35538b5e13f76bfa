use std::sync::Arc;
use std::time::Duration;

use cafe_api::{
    config::{DatabaseConfig, ServerConfig},
    create_app,
    handlers::ApiState,
    observability::Metrics,
    repositories::{create_pool, SqliteCafeRepository, TableManager},
    services::{ApiKey, CafeService},
};
use reqwest::{Client, Response};
use tokio::net::TcpListener;

pub const TEST_API_KEY: &str = "integration-test-key";

pub struct TestEnvironment {
    pub client: Client,
    pub base_url: String,
}

/// Form fields for a complete cafe with only wifi available
pub fn cafe_form(name: &str, location: &str) -> Vec<(&'static str, String)> {
    vec![
        ("name", name.to_string()),
        ("map_url", format!("https://maps.example.com/{}", name)),
        ("img_url", format!("https://img.example.com/{}.jpg", name)),
        ("location", location.to_string()),
        ("seats", "20-30".to_string()),
        ("has_toilet", "0".to_string()),
        ("has_wifi", "1".to_string()),
        ("has_sockets", "0".to_string()),
        ("can_take_calls", "0".to_string()),
        ("coffee_price", "£2.40".to_string()),
    ]
}

impl TestEnvironment {
    /// Serve the real application over a private in-memory database
    pub async fn new() -> Self {
        // One connection keeps every query on the same in-memory database
        let pool = create_pool(&DatabaseConfig {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            busy_timeout_ms: 1000,
        })
        .await
        .expect("Failed to open database");
        TableManager::new(pool.clone())
            .create_cafe_table()
            .await
            .expect("Failed to create cafe table");

        let metrics = Arc::new(Metrics::new().expect("Failed to create metrics"));
        let repository = Arc::new(SqliteCafeRepository::new(pool).with_metrics(metrics.clone()));
        let cafe_service = Arc::new(
            CafeService::new(repository, ApiKey::new(TEST_API_KEY)).with_metrics(metrics.clone()),
        );

        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            request_timeout_seconds: 10,
            max_request_size: 64 * 1024,
        };
        let app = create_app(ApiState { cafe_service }, metrics, &server);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Failed to get local address");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Failed to serve app");
        });

        // Wait for server to start
        tokio::time::sleep(Duration::from_millis(50)).await;

        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn add(&self, form: &[(&str, String)]) -> Response {
        self.client
            .post(self.url("/add"))
            .form(form)
            .send()
            .await
            .expect("Failed to send request")
    }

    pub async fn add_cafe(&self, name: &str, location: &str) {
        let response = self.add(&cafe_form(name, location)).await;
        assert_eq!(response.status().as_u16(), 200, "adding {}", name);
    }

    pub async fn get_json(&self, path: &str) -> (u16, serde_json::Value) {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send request");
        let status = response.status().as_u16();
        let body = response.json().await.expect("Failed to parse response");
        (status, body)
    }

    pub async fn all_cafes(&self) -> Vec<serde_json::Value> {
        let (status, body) = self.get_json("/all").await;
        assert_eq!(status, 200);
        body["cafes"]
            .as_array()
            .expect("Expected cafes array")
            .clone()
    }
}
