//! Authentication façade — sessions, credentials, and state observers
//!
//! The mock keeps one session per façade instance, inside an actor.

pub mod actor;
pub mod observers;
pub mod types;

pub use actor::{AuthActor, AuthHandle};
pub use observers::{AuthCallback, ObserverRegistry, Subscription};
pub use types::{
    AuthChangeEvent, AuthData, AuthProvider, AuthResponse, AuthUser, Session, SessionData,
    SessionResponse, SignInCredentials, SignOutResponse, SignUpCredentials, SignUpOptions,
    UserData, UserResponse, SESSION_TTL_MS,
};
