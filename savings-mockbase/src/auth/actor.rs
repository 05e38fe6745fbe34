//! AuthActor — Tokio actor owning the mock session
//!
//! Sign-up, sign-in, sign-out and session reads are processed sequentially
//! via an mpsc channel, so the signed-out → signed-in → signed-out state
//! machine never sees interleaved transitions. The simulated latency runs
//! in [`AuthHandle`] before a message is sent.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use savings_mockbase::auth::{AuthActor, AuthProvider, SignInCredentials};
//! use savings_mockbase::latency::Latency;
//! use savings_mockbase::seed::SeedData;
//! use savings_mockbase::store::RecordStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(RecordStore::new(SeedData::generate().to_tables()?));
//!     let auth = AuthActor::spawn(store, Latency::none(), true)?;
//!
//!     let sub = auth.on_auth_state_change(Box::new(|event, session| {
//!         println!("{event}: {:?}", session.map(|s| &s.user.email));
//!     }));
//!
//!     let resp = auth
//!         .sign_in_with_password(SignInCredentials::new("active-user@test.com", "password123"))
//!         .await;
//!     assert!(resp.is_ok());
//!
//!     sub.unsubscribe();
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use rand::distr::Alphanumeric;
use rand::Rng;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::error::{ApiError, ErrorCode, MockbaseError, Result};
use crate::filter::{Filter, Record};
use crate::latency::Latency;
use crate::schema::{self, KycStatus, UserProfile, TABLE_USER_PROFILES};
use crate::seed::TEST_CREDENTIALS;
use crate::store::{QueryOptions, RecordStore};

use super::observers::{AuthCallback, ObserverRegistry, Subscription};
use super::types::*;

// ─── Actor Messages ───

enum AuthMsg {
    SignUp {
        credentials: SignUpCredentials,
        reply: oneshot::Sender<Result<Session>>,
    },
    SignIn {
        credentials: SignInCredentials,
        reply: oneshot::Sender<Result<Session>>,
    },
    SignOut {
        reply: oneshot::Sender<()>,
    },
    GetSession {
        reply: oneshot::Sender<Option<Session>>,
    },
}

// ─── Actor ───

/// Authentication actor — owns the current session
pub struct AuthActor {
    store: Arc<RecordStore>,
    observers: Arc<ObserverRegistry>,
    session: Option<Session>,
    logging: bool,
    rx: mpsc::Receiver<AuthMsg>,
}

impl AuthActor {
    /// Spawn the actor on the current tokio runtime and return its handle
    pub fn spawn(store: Arc<RecordStore>, latency: Latency, logging: bool) -> Result<AuthHandle> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| MockbaseError::ActorUnavailable(format!("AuthActor needs a tokio runtime: {e}")))?;

        let (tx, rx) = mpsc::channel(64);
        let observers = ObserverRegistry::new();
        let actor = Self {
            store,
            observers: observers.clone(),
            session: None,
            logging,
            rx,
        };

        runtime.spawn(actor.run());
        info!("AuthActor spawned");
        Ok(AuthHandle {
            tx,
            observers,
            latency,
        })
    }

    /// Main event loop
    async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                AuthMsg::SignUp { credentials, reply } => {
                    let _ = reply.send(self.handle_sign_up(credentials));
                }
                AuthMsg::SignIn { credentials, reply } => {
                    let _ = reply.send(self.handle_sign_in(credentials));
                }
                AuthMsg::SignOut { reply } => {
                    self.handle_sign_out();
                    let _ = reply.send(());
                }
                AuthMsg::GetSession { reply } => {
                    let _ = reply.send(self.session.clone());
                }
            }
        }
        debug!("AuthActor stopped");
    }

    // ─── Handlers ───

    fn handle_sign_up(&mut self, credentials: SignUpCredentials) -> Result<Session> {
        let SignUpCredentials { email, options, .. } = credentials;

        let existing = self.store.query(
            TABLE_USER_PROFILES,
            &[Filter::eq("email", email.as_str())],
            &QueryOptions::default(),
        );
        if !existing.is_empty() {
            return Err(MockbaseError::UserAlreadyExists);
        }

        let full_name = options
            .data
            .as_ref()
            .and_then(|data| data.get("full_name"))
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .unwrap_or("New User")
            .to_string();
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        let profile = UserProfile {
            // Assigned by the store
            id: String::new(),
            email,
            full_name,
            phone_number: None,
            total_balance: 0.0,
            total_saved: 0.0,
            lottery_entries: 0,
            referral_code: referral_code(),
            referred_by: None,
            kyc_status: KycStatus::Pending,
            kyc_document_url: None,
            kyc_id_number: None,
            kyc_address: None,
            created_at: now.clone(),
            updated_at: now,
        };
        let stored = self
            .store
            .insert(TABLE_USER_PROFILES, schema::to_record(&profile)?);

        let user = AuthUser {
            id: text_field(&stored, "id")?,
            email: profile.email,
            user_metadata: options.data,
        };
        self.log("SIGN_UP", &user.email);
        Ok(self.start_session(user))
    }

    fn handle_sign_in(&mut self, credentials: SignInCredentials) -> Result<Session> {
        let account = TEST_CREDENTIALS
            .iter()
            .find(|c| c.email == credentials.email && c.password == credentials.password)
            .ok_or(MockbaseError::InvalidCredentials)?;

        let row = self
            .store
            .query(
                TABLE_USER_PROFILES,
                &[Filter::eq("id", account.user_id)],
                &QueryOptions::default(),
            )
            .into_iter()
            .next()
            .ok_or(MockbaseError::UserNotFound)?;

        // Only id, email and full_name are read; the rest of the row is free-form
        let mut metadata = Record::new();
        if let Some(full_name) = row.get("full_name") {
            metadata.insert("full_name".to_string(), full_name.clone());
        }
        let user = AuthUser {
            id: text_field(&row, "id")?,
            email: text_field(&row, "email")?,
            user_metadata: Some(metadata),
        };
        self.log("SIGN_IN", &user.email);
        Ok(self.start_session(user))
    }

    fn handle_sign_out(&mut self) {
        self.session = None;
        self.observers.notify(AuthChangeEvent::SignedOut, None);
        if self.logging {
            info!(op = "SIGN_OUT", "Mock auth operation");
        }
    }

    fn start_session(&mut self, user: AuthUser) -> Session {
        let session = Session::issue(user, Utc::now().timestamp_millis());
        self.session = Some(session.clone());
        self.observers
            .notify(AuthChangeEvent::SignedIn, self.session.as_ref());
        session
    }

    fn log(&self, op: &str, email: &str) {
        if self.logging {
            info!(op, email, "Mock auth operation");
        }
    }
}

fn text_field(row: &Record, column: &str) -> Result<String> {
    row.get(column)
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| MockbaseError::Internal(format!("user profile has no text `{column}`")))
}

/// `REF` followed by six uppercase alphanumerics
fn referral_code() -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();
    format!("REF{}", suffix.to_uppercase())
}

// ─── Handle ───

/// Client-facing handle to the auth actor (cloneable)
#[derive(Clone)]
pub struct AuthHandle {
    tx: mpsc::Sender<AuthMsg>,
    observers: Arc<ObserverRegistry>,
    latency: Latency,
}

impl std::fmt::Debug for AuthHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthHandle")
            .field("observers", &self.observers)
            .field("latency", &self.latency)
            .finish_non_exhaustive()
    }
}

impl AuthHandle {
    async fn request<T>(&self, msg: AuthMsg, rx: oneshot::Receiver<T>) -> Result<T> {
        self.tx
            .send(msg)
            .await
            .map_err(|_| MockbaseError::ActorUnavailable("AuthActor".into()))?;
        rx.await
            .map_err(|_| MockbaseError::ActorUnavailable("AuthActor dropped".into()))
    }

    async fn transition(&self, msg: AuthMsg, rx: oneshot::Receiver<Result<Session>>) -> AuthResponse {
        match self.request(msg, rx).await.and_then(|r| r) {
            Ok(session) => AuthResponse::signed_in(session),
            Err(err) => AuthResponse::failed(ApiError::from_internal(ErrorCode::Auth, &err)),
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

#[async_trait]
impl AuthProvider for AuthHandle {
    async fn sign_up(&self, credentials: SignUpCredentials) -> AuthResponse {
        self.latency.simulate().await;
        let (reply, rx) = oneshot::channel();
        self.transition(AuthMsg::SignUp { credentials, reply }, rx).await
    }

    async fn sign_in_with_password(&self, credentials: SignInCredentials) -> AuthResponse {
        self.latency.simulate().await;
        let (reply, rx) = oneshot::channel();
        self.transition(AuthMsg::SignIn { credentials, reply }, rx).await
    }

    async fn sign_out(&self) -> SignOutResponse {
        self.latency.simulate().await;
        let (reply, rx) = oneshot::channel();
        if let Err(err) = self.request(AuthMsg::SignOut { reply }, rx).await {
            warn!(error = %err, "Sign-out not delivered");
        }
        SignOutResponse::default()
    }

    async fn get_session(&self) -> SessionResponse {
        let (reply, rx) = oneshot::channel();
        match self.request(AuthMsg::GetSession { reply }, rx).await {
            Ok(session) => SessionResponse::current(session),
            Err(err) => SessionResponse::failed(ApiError::from_internal(ErrorCode::Auth, &err)),
        }
    }

    async fn get_user(&self) -> UserResponse {
        self.get_session().await.into()
    }

    fn on_auth_state_change(&self, callback: AuthCallback) -> Subscription {
        self.observers.register(callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TableSet;

    #[test]
    fn test_referral_code_shape() {
        let code = referral_code();
        assert_eq!(code.len(), 9);
        assert!(code.starts_with("REF"));
        assert!(code[3..]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_spawn_outside_runtime_fails() {
        let store = Arc::new(RecordStore::new(TableSet::new()));
        let err = AuthActor::spawn(store, Latency::none(), false).unwrap_err();
        assert!(matches!(err, MockbaseError::ActorUnavailable(_)));
    }

    #[tokio::test]
    async fn test_sign_in_without_profile_is_user_not_found() {
        let store = Arc::new(RecordStore::new(TableSet::new()));
        let auth = AuthActor::spawn(store, Latency::none(), false).unwrap();

        let resp = auth
            .sign_in_with_password(SignInCredentials::new("active-user@test.com", "password123"))
            .await;
        let err = resp.error.unwrap();
        assert_eq!(err.code, ErrorCode::Auth);
        assert_eq!(err.message, "User not found");
        let current = auth.get_session().await;
        assert!(current.error.is_none());
        assert!(current.data.session.is_none());
    }

    #[tokio::test]
    async fn test_reads_after_actor_stops_report_auth_error() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let auth = AuthHandle {
            tx,
            observers: ObserverRegistry::new(),
            latency: Latency::none(),
        };

        let session = auth.get_session().await;
        assert_eq!(session.error.unwrap().code, ErrorCode::Auth);
        assert!(session.data.session.is_none());

        let user = auth.get_user().await;
        assert_eq!(user.error.unwrap().code, ErrorCode::Auth);
        assert!(user.data.user.is_none());
    }
}
