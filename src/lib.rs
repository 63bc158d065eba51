//! Thin adapter between a serverless gateway and a Firebase-style backend:
//! register named handlers, read/write the realtime database through a small
//! query DSL, and let the adapter shape responses and tear down the backend
//! connection after every invocation.

pub mod application;
pub mod backend;
pub mod models;

pub use application::{Application, ApplicationOptions, EntryPoint, HandlerError};
pub use backend::firebase::FirebaseBackend;
pub use backend::{Backend, BackendError};
pub use models::event::GatewayEvent;
pub use models::query::QueryOptions;
pub use models::request::HandlerRequest;
pub use models::response::{HandlerResponse, ResponseDefaults, ResponseEnvelope};
