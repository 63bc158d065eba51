/*---------- Imports ----------*/
use crate::models::query::QueryOptions;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use thiserror::Error;

pub mod auth;
pub mod firebase;

/*---------- Enums ----------*/
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("missing environment variable {0}")]
    MissingEnv(&'static str),

    #[error("invalid service account credentials: {0}")]
    Credentials(String),

    #[error("request to the backend failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend rejected the request with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected backend response: {0}")]
    Unexpected(String),

    #[error("token verification failed: {0}")]
    TokenVerification(String),
}

/// Capability surface of the remote database and auth service. The facade is
/// generic over it; `FirebaseBackend` is the production implementation and
/// the tests drive the facade through a recording mock.
#[async_trait]
pub trait Backend: Send + Sync + Sized + 'static {
    /// Opens a named connection. Credentials and endpoints come from the
    /// process environment, read here and not before.
    async fn connect(app_name: Option<&str>) -> Result<Self, BackendError>;

    /// One-shot read of the value matched by `query`.
    async fn read(&self, query: &QueryOptions) -> Result<Value, BackendError>;

    /// Overwrites the value at `path`.
    async fn set(&self, path: &str, data: &Value) -> Result<(), BackendError>;

    /// Merges fields at `path` without touching siblings.
    async fn update(&self, path: &str, data: &Value) -> Result<(), BackendError>;

    /// Appends `data` under a generated child key at `path` and returns the key.
    async fn push(&self, path: &str, data: &Value) -> Result<String, BackendError>;

    /// Deletes the value at `path`.
    async fn remove(&self, path: &str) -> Result<(), BackendError>;

    /// Verifies a bearer ID token and returns its decoded claims.
    async fn verify_id_token(&self, token: &str) -> Result<Map<String, Value>, BackendError>;

    /// Releases the connection. Called exactly once per invocation by the
    /// adapter, after the response envelope has been computed.
    async fn shutdown(&self) -> Result<(), BackendError>;

    /// Sentinel the backend replaces with its own clock reading at write time.
    fn server_timestamp() -> Value {
        json!({ ".sv": "timestamp" })
    }
}
