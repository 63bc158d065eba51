/*---------- Imports ----------*/
use crate::backend::firebase::FirebaseBackend;
use crate::backend::{Backend, BackendError};
use crate::models::event::GatewayEvent;
use crate::models::query::QueryOptions;
use crate::models::request::HandlerRequest;
use crate::models::response::{HandlerResponse, ResponseDefaults, ResponseEnvelope};
use lambda_runtime::{service_fn, LambdaEvent};
use log::{error, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

/// Error type handlers resolve with; backend errors convert into it via `?`.
pub type HandlerError = lambda_runtime::Error;

type HandlerFuture = Pin<Box<dyn Future<Output = Result<HandlerResponse, HandlerError>> + Send>>;
type HandlerFn<B> = Arc<dyn Fn(HandlerRequest, Application<B>) -> HandlerFuture + Send + Sync>;

/*---------- Structs ----------*/
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ApplicationOptions {
    /// Identifies the backend connection instance; the platform default
    /// identity when absent.
    pub name: Option<String>,
    /// Fields merged into every response envelope, under handler output.
    pub results: ResponseDefaults,
}

struct AppInner<B: Backend> {
    app_name: Option<String>,
    defaults: ResponseDefaults,
    /// Zero-or-one backend handle: acquired on first data access within an
    /// invocation, released by `end` once the envelope has been computed.
    backend: Mutex<Option<Arc<B>>>,
    handlers: RwLock<HashMap<String, HandlerFn<B>>>,
}

/// Facade over the backend database and auth service, plus the registry of
/// named gateway handlers. Cloning is cheap and every clone shares the same
/// backend handle and registry, which is how handlers receive the facade they
/// were registered on.
pub struct Application<B: Backend = FirebaseBackend> {
    inner: Arc<AppInner<B>>,
}

impl<B: Backend> Clone for Application<B> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<B: Backend> Application<B> {
    pub fn new(options: ApplicationOptions) -> Self {
        Self {
            inner: Arc::new(AppInner {
                app_name: options.name,
                defaults: options.results,
                backend: Mutex::new(None),
                handlers: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Starts out with an already-connected handle instead of connecting
    /// lazily from the environment. `end` releases it like any other handle.
    pub fn with_backend(options: ApplicationOptions, backend: Arc<B>) -> Self {
        Self {
            inner: Arc::new(AppInner {
                app_name: options.name,
                defaults: options.results,
                backend: Mutex::new(Some(backend)),
                handlers: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Registers `handler` under `name`. The handler is only ever run by an
    /// invocation, never here. Registering the same name again replaces the
    /// previous handler.
    pub fn create<F, Fut>(&self, name: &str, handler: F)
    where
        F: Fn(HandlerRequest, Application<B>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HandlerResponse, HandlerError>> + Send + 'static,
    {
        let handler: HandlerFn<B> =
            Arc::new(move |request, app| Box::pin(handler(request, app)));

        self.inner
            .handlers
            .write()
            .expect("handler registry lock poisoned")
            .insert(name.to_owned(), handler);
    }

    /// The dispatch table: every registered name mapped to its entry point.
    pub fn handlers(&self) -> HashMap<String, EntryPoint<B>> {
        self.inner
            .handlers
            .read()
            .expect("handler registry lock poisoned")
            .iter()
            .map(|(name, handler)| {
                (
                    name.clone(),
                    EntryPoint {
                        name: name.clone(),
                        app: self.clone(),
                        handler: handler.clone(),
                    },
                )
            })
            .collect()
    }

    pub fn handler(&self, name: &str) -> Option<EntryPoint<B>> {
        self.inner
            .handlers
            .read()
            .expect("handler registry lock poisoned")
            .get(name)
            .map(|handler| EntryPoint {
                name: name.to_owned(),
                app: self.clone(),
                handler: handler.clone(),
            })
    }

    async fn backend(&self) -> Result<Arc<B>, BackendError> {
        let mut slot = self.inner.backend.lock().await;

        if let Some(handle) = slot.as_ref() {
            return Ok(handle.clone());
        }

        let handle = Arc::new(B::connect(self.inner.app_name.as_deref()).await?);
        *slot = Some(handle.clone());

        Ok(handle)
    }

    /// Releases the backend handle, if one exists. The slot is cleared only
    /// after the shutdown completed, and the next data access reconnects, so
    /// calling this again before then is a no-op.
    pub async fn end(&self) -> Result<(), BackendError> {
        let mut slot = self.inner.backend.lock().await;

        if let Some(handle) = slot.as_ref() {
            handle.shutdown().await?;
            *slot = None;
        }

        Ok(())
    }

    /// One-shot read. `options` is either a bare reference path or a full
    /// `QueryOptions` record.
    pub async fn get_db(&self, options: impl Into<QueryOptions>) -> Result<Value, BackendError> {
        let options = options.into();
        self.backend().await?.read(&options).await
    }

    /// Overwrites the value at `path`.
    pub async fn set_db(&self, path: &str, data: impl Into<Value>) -> Result<(), BackendError> {
        self.backend().await?.set(path, &data.into()).await
    }

    /// Merges fields at `path` without overwriting siblings.
    pub async fn update_db(&self, path: &str, data: impl Into<Value>) -> Result<(), BackendError> {
        self.backend().await?.update(path, &data.into()).await
    }

    /// Appends `data` under a generated child key and resolves to that key.
    pub async fn push_db(&self, path: &str, data: impl Into<Value>) -> Result<String, BackendError> {
        self.backend().await?.push(path, &data.into()).await
    }

    /// Deletes the value at `path`.
    pub async fn remove_db(&self, path: &str) -> Result<(), BackendError> {
        self.backend().await?.remove(path).await
    }

    /// Sentinel the backend substitutes with its own clock reading at write
    /// time; never a client-computed timestamp.
    pub fn timestamp(&self) -> Value {
        B::server_timestamp()
    }

    /// Verifies a bearer ID token and resolves to its decoded claims.
    pub async fn get_user_from_token(
        &self,
        token: &str,
    ) -> Result<Map<String, Value>, BackendError> {
        self.backend().await?.verify_id_token(token).await
    }
}

/// One registered handler, bound to its facade, in the shape the platform
/// dispatches to. `invoke` runs the whole invocation chain and is infallible:
/// the platform always receives an envelope, never a raw error.
pub struct EntryPoint<B: Backend = FirebaseBackend> {
    name: String,
    app: Application<B>,
    handler: HandlerFn<B>,
}

impl<B: Backend> Clone for EntryPoint<B> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            app: self.app.clone(),
            handler: self.handler.clone(),
        }
    }
}

impl<B: Backend> EntryPoint<B> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn invoke(&self, event: LambdaEvent<GatewayEvent>) -> ResponseEnvelope {
        let (payload, context) = event.into_parts();
        let request = HandlerRequest::from_event(payload, context);

        let (output, default_status) = match (self.handler)(request, self.app.clone()).await {
            Ok(response) => (response, 200),
            Err(err) => {
                error!("## Error with handler: {} ##: {}", self.name, err);
                (HandlerResponse::new(), 500)
            }
        };

        let envelope =
            ResponseEnvelope::build(output, default_status, &self.app.inner.defaults);

        // Teardown runs exactly once, before the platform sees the envelope,
        // on the success and the failure path alike.
        if let Err(err) = self.app.end().await {
            warn!("closing the backend handle failed: {}", err);
        }

        envelope
    }

    /// Mounts this entry point on the Lambda runtime.
    pub async fn serve(self) -> Result<(), HandlerError> {
        lambda_runtime::run(service_fn(move |event: LambdaEvent<GatewayEvent>| {
            let entry = self.clone();
            async move { Ok::<ResponseEnvelope, HandlerError>(entry.invoke(event).await) }
        }))
        .await
    }
}
