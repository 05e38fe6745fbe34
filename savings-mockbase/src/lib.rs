//! # Savings Mockbase
//!
//! In-process stand-in for the savings app's hosted backend — a record
//! store, a chainable query builder, session auth, and seeded scenario data,
//! all answering with the same `{data, error}` shapes as the real client.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │                 Provider                  │
//! │     (mock or remote, chosen at startup)   │
//! ├─────────────────────┬─────────────────────┤
//! │    QueryBuilder     │     AuthActor       │
//! │  (filters, order,   │  (session, sign-in, │
//! │   limit, mutations) │   observers)        │
//! ├─────────────────────┴─────────────────────┤
//! │         Latency (simulated delay)         │
//! ├───────────────────────────────────────────┤
//! │               RecordStore                 │
//! │  (tables of JSON records, seed snapshot)  │
//! └───────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use savings_mockbase::auth::SignInCredentials;
//! use savings_mockbase::query::OrderOptions;
//! use savings_mockbase::{BackendConfig, Provider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = Provider::connect(BackendConfig::mock(), None).await?;
//!     let client = provider.client();
//!
//!     let auth = client
//!         .auth()
//!         .sign_in_with_password(SignInCredentials::new("active-user@test.com", "password123"))
//!         .await;
//!     let user = auth.data.user.ok_or("sign-in failed")?;
//!
//!     let goals = client
//!         .from("goals")
//!         .select("id, title, current_amount")
//!         .eq("user_id", user.id.as_str())
//!         .order("created_at", OrderOptions::desc())
//!         .await;
//!     println!("{} goals", goals.data.map_or(0, |g| g.len()));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Same shapes as the hosted client**: every data call resolves to a
//!   [`Response`]; failures are values, never panics
//! - **Deterministic tests**: zero latency via config, injectable [`latency::Sleeper`],
//!   `reset()` back to the seed snapshot
//! - **Scenario accounts**: new, active and power users with realistic history

pub mod auth;
pub mod config;
pub mod error;
pub mod filter;
pub mod latency;
pub mod provider;
pub mod query;
pub mod response;
pub mod schema;
pub mod seed;
pub mod store;

// Re-exports for convenience
pub use auth::{AuthActor, AuthHandle, AuthProvider};
pub use config::BackendConfig;
pub use error::{ApiError, ErrorCode, MockbaseError, Result};
pub use filter::{Filter, FilterOp, Record};
pub use provider::{Client, MockBackend, Provider, RemoteConnector};
pub use query::{OrderOptions, QueryBuilder};
pub use response::{Inserted, Response};
pub use seed::{SeedData, TEST_CREDENTIALS};
pub use store::{RecordStore, TableSet};
