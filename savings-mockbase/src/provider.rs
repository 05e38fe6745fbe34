//! Provider selection — the composition root
//!
//! Decided once at startup from [`BackendConfig`]: either the mock pair
//! (record store + auth actor) or a real backend client produced by an
//! injected [`RemoteConnector`]. Both yield the same [`Client`] shape, so
//! calling code never branches on which backend is active.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use url::Url;

use crate::auth::{AuthActor, AuthHandle, AuthProvider};
use crate::config::BackendConfig;
use crate::error::{MockbaseError, Result};
use crate::latency::Latency;
use crate::query::{MockExecutor, QueryBuilder, QueryExecutor};
use crate::seed::{SeedData, TEST_CREDENTIALS};
use crate::store::{RecordStore, TableSet};

// ─── Client ───

/// Per-table query factory plus auth façade
#[derive(Clone)]
pub struct Client {
    executor: Arc<dyn QueryExecutor>,
    auth: Arc<dyn AuthProvider>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

impl Client {
    pub fn new(executor: Arc<dyn QueryExecutor>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { executor, auth }
    }

    /// Start a query against `table`
    pub fn from(&self, table: impl Into<String>) -> QueryBuilder {
        QueryBuilder::new(table, self.executor.clone())
    }

    pub fn auth(&self) -> &dyn AuthProvider {
        self.auth.as_ref()
    }
}

/// Builds a [`Client`] for the hosted backend
#[async_trait]
pub trait RemoteConnector: Send + Sync {
    async fn connect(&self, url: Url, anon_key: &str) -> Result<Client>;
}

// ─── Mock backend ───

/// The mock pair sharing one record store
#[derive(Debug)]
pub struct MockBackend {
    store: Arc<RecordStore>,
    auth: AuthHandle,
    client: Client,
}

impl MockBackend {
    /// Seed from freshly generated scenario data
    pub fn new(config: &BackendConfig) -> Result<Self> {
        Self::with_seed(SeedData::generate().to_tables()?, config)
    }

    /// Seed from an explicit table set; `reset()` restores exactly this snapshot
    pub fn with_seed(seed: TableSet, config: &BackendConfig) -> Result<Self> {
        let store = Arc::new(RecordStore::new(seed));
        let latency = Latency::from_config(config);
        let executor = MockExecutor::new(store.clone(), latency.clone(), config.enable_logging);
        let auth = AuthActor::spawn(store.clone(), latency, config.enable_logging)?;
        let client = Client::new(Arc::new(executor), Arc::new(auth.clone()));
        Ok(Self {
            store,
            auth,
            client,
        })
    }

    pub fn client(&self) -> Client {
        self.client.clone()
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    pub fn auth(&self) -> &AuthHandle {
        &self.auth
    }

    /// Restore every table to the seed snapshot. The session is left as is.
    pub fn reset(&self) {
        self.store.reset();
    }

    /// Deep copy of all tables
    pub fn state(&self) -> TableSet {
        self.store.get_state()
    }
}

// ─── Provider ───

/// Process-wide backend choice, fixed for the provider's lifetime
#[derive(Debug)]
pub struct Provider {
    config: BackendConfig,
    client: Client,
    mock: Option<MockBackend>,
}

impl Provider {
    /// Build the client selected by `config.mock_mode`.
    ///
    /// Remote mode needs a valid URL and anon key plus a connector; anything
    /// missing is a [`MockbaseError::Config`].
    pub async fn connect(
        config: BackendConfig,
        remote: Option<Arc<dyn RemoteConnector>>,
    ) -> Result<Self> {
        config.validate()?;

        if config.mock_mode {
            let mock = MockBackend::new(&config)?;
            info!(
                delay_min_ms = config.delay_min_ms,
                delay_max_ms = config.delay_max_ms,
                "Mock data mode active"
            );
            for account in TEST_CREDENTIALS.iter() {
                info!(
                    scenario = %account.scenario,
                    email = account.email,
                    password = account.password,
                    "Test credentials"
                );
            }
            return Ok(Self {
                client: mock.client(),
                mock: Some(mock),
                config,
            });
        }

        let (url, key) = config.remote_endpoint()?;
        let Some(connector) = remote else {
            warn!(%url, "Remote mode selected without a connector");
            return Err(MockbaseError::Config(
                "Remote mode requires a backend connector".into(),
            ));
        };
        let client = connector.connect(url.clone(), key).await?;
        info!(%url, "Remote backend connected");
        Ok(Self {
            client,
            mock: None,
            config,
        })
    }

    /// Read `USE_MOCK_DATA` and friends from the environment, then connect
    pub async fn from_env(remote: Option<Arc<dyn RemoteConnector>>) -> Result<Self> {
        Self::connect(BackendConfig::from_env(), remote).await
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn is_mock(&self) -> bool {
        self.mock.is_some()
    }

    /// Mock internals, for test isolation and diagnostics
    pub fn mock(&self) -> Option<&MockBackend> {
        self.mock.as_ref()
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }
}
