//! Provider integration tests — mock/remote selection, reset, shared client shape

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use url::Url;

use savings_mockbase::auth::SignInCredentials;
use savings_mockbase::schema::{TABLE_GOALS, TABLE_NOTIFICATIONS};
use savings_mockbase::seed::POWER_USER_ID;
use savings_mockbase::{
    BackendConfig, Client, MockBackend, MockbaseError, Provider, RemoteConnector, Result,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn mock_config() -> BackendConfig {
    BackendConfig::mock().without_delay()
}

/// Stands in for the hosted client: records the endpoint, serves a mock client
#[derive(Default)]
struct RecordingConnector {
    seen: Mutex<Option<(Url, String)>>,
    backend: Mutex<Option<MockBackend>>,
}

#[async_trait]
impl RemoteConnector for RecordingConnector {
    async fn connect(&self, url: Url, anon_key: &str) -> Result<Client> {
        *self.seen.lock() = Some((url, anon_key.to_string()));
        let backend = MockBackend::new(&mock_config())?;
        let client = backend.client();
        *self.backend.lock() = Some(backend);
        Ok(client)
    }
}

#[tokio::test]
async fn test_mock_mode_builds_seeded_client() {
    init_tracing();
    let provider = Provider::connect(mock_config(), None).await.unwrap();
    assert!(provider.is_mock());
    assert!(provider.config().mock_mode);

    let goals = provider
        .client()
        .from(TABLE_GOALS)
        .eq("user_id", POWER_USER_ID)
        .await
        .data
        .unwrap();
    assert_eq!(goals.len(), 5);
}

#[tokio::test]
async fn test_client_clones_share_one_store() {
    let provider = Provider::connect(mock_config(), None).await.unwrap();
    let a = provider.client().clone();
    let b = provider.client().clone();

    a.from(TABLE_NOTIFICATIONS)
        .insert(json!({"user_id": POWER_USER_ID, "title": "Hi"}))
        .await;
    let rows = b
        .from(TABLE_NOTIFICATIONS)
        .eq("title", "Hi")
        .await
        .data
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_reset_restores_seed_state() {
    let provider = Provider::connect(mock_config(), None).await.unwrap();
    let mock = provider.mock().unwrap();
    let initial = mock.state();

    let client = provider.client();
    client.from(TABLE_GOALS).insert(json!({"title": "Rent"})).await;
    client.from(TABLE_GOALS).delete().eq("user_id", POWER_USER_ID).await;
    assert_ne!(mock.state(), initial);

    mock.reset();
    assert_eq!(mock.state(), initial);
}

#[tokio::test]
async fn test_auth_reachable_through_client() {
    let provider = Provider::connect(mock_config(), None).await.unwrap();
    let resp = provider
        .client()
        .auth()
        .sign_in_with_password(SignInCredentials::new("power-user@test.com", "password123"))
        .await;
    assert_eq!(resp.data.user.unwrap().id, POWER_USER_ID);
}

#[tokio::test]
async fn test_remote_mode_uses_connector() {
    init_tracing();
    let connector = Arc::new(RecordingConnector::default());
    let config = BackendConfig::remote("https://project.example.co", "anon-key");

    let provider = Provider::connect(config, Some(connector.clone() as Arc<dyn RemoteConnector>))
        .await
        .unwrap();
    assert!(!provider.is_mock());
    assert!(provider.mock().is_none());

    let (url, key) = connector.seen.lock().clone().unwrap();
    assert_eq!(url.host_str(), Some("project.example.co"));
    assert_eq!(key, "anon-key");

    // Same client surface regardless of backend
    let rows = provider.client().from(TABLE_GOALS).limit(1).await.data.unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_remote_mode_without_connector_fails() {
    let config = BackendConfig::remote("https://project.example.co", "anon-key");
    let err = Provider::connect(config, None).await.unwrap_err();
    assert!(matches!(err, MockbaseError::Config(_)));
}

#[tokio::test]
async fn test_remote_mode_with_bad_url_fails() {
    let connector = Arc::new(RecordingConnector::default());
    let config = BackendConfig::remote("not a url", "anon-key");
    let err = Provider::connect(config, Some(connector.clone() as Arc<dyn RemoteConnector>))
        .await
        .unwrap_err();
    assert!(matches!(err, MockbaseError::Config(_)));
    assert!(connector.seen.lock().is_none());
}

#[tokio::test]
async fn test_remote_mode_without_credentials_fails() {
    let config = BackendConfig::default();
    let err = Provider::connect(config, None).await.unwrap_err();
    assert!(matches!(err, MockbaseError::Config(_)));
}

#[tokio::test]
async fn test_inverted_delay_window_rejected() {
    let config = BackendConfig::mock().with_delay(900, 100);
    let err = Provider::connect(config, None).await.unwrap_err();
    assert!(matches!(err, MockbaseError::Config(_)));
}
