#![allow(dead_code)]

use person_service::config::{MongoConfig, PersonConfig, StorageBackend, StorageConfig};
use person_service::services::{InMemoryPersonStore, MongoPersonStore, PersonStore};
use person_service::Application;
use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;
use uuid::Uuid;

pub const MONGODB_URI: &str = "mongodb://localhost:27017";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
    mongo: Option<(MongoPersonStore, String)>,
}

pub fn test_config(backend: StorageBackend, database: &str) -> PersonConfig {
    PersonConfig {
        common: CoreConfig {
            port: 0, // Random port for testing
            log_level: "error".to_string(),
            otlp_endpoint: None,
        },
        mongodb: MongoConfig {
            uri: Secret::new(MONGODB_URI.to_string()),
            database: database.to_string(),
            collection: "people".to_string(),
        },
        storage: StorageConfig { backend },
        request_timeout_secs: 5,
    }
}

impl TestApp {
    /// Application backed by the in-memory store.
    pub async fn spawn() -> Self {
        let config = test_config(StorageBackend::Memory, "unused");
        Self::spawn_with(config, Arc::new(InMemoryPersonStore::new()), None).await
    }

    /// Application backed by a throwaway database on a local mongod.
    pub async fn spawn_with_mongo() -> Self {
        let db_name = format!("person_test_{}", Uuid::new_v4().simple());
        let config = test_config(StorageBackend::MongoDb, &db_name);
        let store = MongoPersonStore::connect(MONGODB_URI, &db_name, "people")
            .await
            .expect("Failed to create MongoDB client");
        Self::spawn_with(config, Arc::new(store.clone()), Some((store, db_name))).await
    }

    async fn spawn_with(
        config: PersonConfig,
        store: Arc<dyn PersonStore>,
        mongo: Option<(MongoPersonStore, String)>,
    ) -> Self {
        let app = Application::build_with_store(config, store)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
            mongo,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn create_person(&self, body: serde_json::Value) -> String {
        let response = self
            .client
            .post(self.url("/person"))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        body["inserted_id"]
            .as_str()
            .expect("Missing inserted_id")
            .to_string()
    }

    pub async fn get_person(&self, id: &str) -> reqwest::Response {
        self.client
            .get(self.url(&format!("/person/{}", id)))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Drops the test database, if any.
    pub async fn cleanup(&self) {
        if let Some((store, db_name)) = &self.mongo {
            let _ = store.client().database(db_name).drop(None).await;
        }
    }
}
