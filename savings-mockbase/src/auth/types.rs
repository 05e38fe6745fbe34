//! Auth domain types: sessions, users, credentials, responses
//!
//! Field names follow the hosted backend's auth payloads, so these serialize
//! to the same JSON the application already consumes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::ApiError;
use crate::filter::Record;

use super::observers::{AuthCallback, Subscription};

/// Lifetime of a mock session, epoch milliseconds
pub const SESSION_TTL_MS: i64 = 3_600_000;

/// Authenticated-user snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_metadata: Option<Record>,
}

impl AuthUser {
    pub fn full_name(&self) -> Option<&str> {
        self.user_metadata
            .as_ref()?
            .get("full_name")
            .and_then(Value::as_str)
    }
}

/// Active session. Expiry is informational; nothing expires it on a timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Epoch milliseconds
    pub expires_at: i64,
    pub user: AuthUser,
}

impl Session {
    /// Fresh opaque tokens, expiring one hour after `now_millis`
    pub fn issue(user: AuthUser, now_millis: i64) -> Self {
        Self {
            access_token: format!("mock-token-{}", Uuid::new_v4()),
            refresh_token: format!("mock-refresh-{}", Uuid::new_v4()),
            expires_at: now_millis + SESSION_TTL_MS,
            user,
        }
    }

    pub fn is_expired_at(&self, now_millis: i64) -> bool {
        now_millis >= self.expires_at
    }
}

/// Transition delivered to auth observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthChangeEvent {
    SignedIn,
    SignedOut,
}

impl AuthChangeEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SignedIn => "SIGNED_IN",
            Self::SignedOut => "SIGNED_OUT",
        }
    }
}

impl std::fmt::Display for AuthChangeEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Requests ───

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignUpOptions {
    /// Free-form profile metadata; `full_name` is read when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Record>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignUpCredentials {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub options: SignUpOptions,
}

impl SignUpCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            options: SignUpOptions::default(),
        }
    }

    pub fn with_metadata(mut self, data: Record) -> Self {
        self.options.data = Some(data);
        self
    }

    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.options
            .data
            .get_or_insert_with(Record::new)
            .insert("full_name".to_string(), Value::String(full_name.into()));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignInCredentials {
    pub email: String,
    pub password: String,
}

impl SignInCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

// ─── Responses ───

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthData {
    pub user: Option<AuthUser>,
    pub session: Option<Session>,
}

/// `{data: {user, session}, error}` returned by sign-up and sign-in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub data: AuthData,
    pub error: Option<ApiError>,
}

impl AuthResponse {
    pub fn signed_in(session: Session) -> Self {
        Self {
            data: AuthData {
                user: Some(session.user.clone()),
                session: Some(session),
            },
            error: None,
        }
    }

    pub fn failed(error: ApiError) -> Self {
        Self {
            data: AuthData::default(),
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignOutResponse {
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub session: Option<Session>,
}

/// `{data: {session}, error}`; a signed-out read is `session: None` with no error
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionResponse {
    pub data: SessionData,
    pub error: Option<ApiError>,
}

impl SessionResponse {
    pub fn current(session: Option<Session>) -> Self {
        Self {
            data: SessionData { session },
            error: None,
        }
    }

    pub fn failed(error: ApiError) -> Self {
        Self {
            data: SessionData::default(),
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    pub user: Option<AuthUser>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub data: UserData,
    pub error: Option<ApiError>,
}

impl From<SessionResponse> for UserResponse {
    fn from(resp: SessionResponse) -> Self {
        Self {
            data: UserData {
                user: resp.data.session.map(|session| session.user),
            },
            error: resp.error,
        }
    }
}

// ─── Provider seam ───

/// Session-based authentication surface shared by the mock and a real backend
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_up(&self, credentials: SignUpCredentials) -> AuthResponse;

    async fn sign_in_with_password(&self, credentials: SignInCredentials) -> AuthResponse;

    /// Always succeeds, even when already signed out
    async fn sign_out(&self) -> SignOutResponse;

    async fn get_session(&self) -> SessionResponse;

    async fn get_user(&self) -> UserResponse;

    /// Register an observer for every later transition
    fn on_auth_state_change(&self, callback: AuthCallback) -> Subscription;
}
