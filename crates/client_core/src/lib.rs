use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use shared::domain::{AuditEvent, LinkId, PostId, VoteDirection};
use tracing::{debug, warn};

pub mod audit;
mod auth;
pub mod config;
pub mod error;
pub mod links;
mod related_links;
pub mod store;
pub mod transport;
mod vote_queue;

pub use audit::{TracingAuditSink, TracingNotifier};
pub use config::{load_settings, Settings};
pub use error::{ActionError, Rejection, TransportError};
pub use store::MemoryStore;
pub use transport::HttpTransport;
use vote_queue::VoteQueue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.body)
    }
}

/// Issues a single request against the backend API. `path` is relative to
/// the configured base URL.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse, TransportError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastStyle {
    Bubble,
    Outline,
    Primary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPlacement {
    TopCenter,
    BottomCenter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastOptions {
    /// Replace an already visible toast instead of stacking a new one.
    pub dedupe: bool,
    pub style: ToastStyle,
    pub placement: ToastPlacement,
    pub duration: Duration,
}

impl ToastOptions {
    pub fn bubble(duration: Duration) -> Self {
        Self {
            dedupe: true,
            style: ToastStyle::Bubble,
            placement: ToastPlacement::BottomCenter,
            duration,
        }
    }
}

pub trait Notifier: Send + Sync {
    fn show_error(&self, message: &str, options: &ToastOptions);
}

pub trait AuditSink: Send + Sync {
    fn record(&self, event: AuditEvent);
}

pub trait AuthState: Send + Sync {
    fn is_logged_in(&self) -> bool;
}

/// Related links are kept as the JSON objects the server returned.
pub trait LinkStore: Send + Sync {
    fn apply_vote(&self, id: &LinkId, post_id: &PostId, direction: VoteDirection);
    fn set_related_links(&self, post_id: &PostId, links: &[Value]);
}

/// Result of an action that got past the transport: either the request
/// completed, or a local precondition rejected it before anything was sent.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome<T> {
    Completed(T),
    Rejected(Rejection),
}

impl<T> ActionOutcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            ActionOutcome::Completed(value) => Some(value),
            ActionOutcome::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            ActionOutcome::Completed(_) => None,
            ActionOutcome::Rejected(rejection) => Some(rejection),
        }
    }
}

pub type ActionResult<T> = Result<ActionOutcome<T>, ActionError>;

#[derive(Debug, Clone)]
pub struct ActionOptions {
    pub episode_host: String,
    pub link_toast: ToastOptions,
    pub login_toast: ToastOptions,
}

impl Default for ActionOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl ActionOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            episode_host: settings.episode_host.clone(),
            link_toast: ToastOptions::bubble(Duration::from_millis(
                settings.link_toast_duration_ms,
            )),
            login_toast: ToastOptions::bubble(Duration::from_millis(
                settings.login_toast_duration_ms,
            )),
        }
    }
}

/// Runs user actions against the backend: validates input, records an audit
/// event, sends one request and reports failures to the user.
pub struct ActionContext {
    transport: Arc<dyn Transport>,
    notifier: Arc<dyn Notifier>,
    audit: Arc<dyn AuditSink>,
    auth: Arc<dyn AuthState>,
    links: Arc<dyn LinkStore>,
    votes: VoteQueue,
    options: ActionOptions,
}

impl ActionContext {
    pub fn new(
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn Notifier>,
        audit: Arc<dyn AuditSink>,
        auth: Arc<dyn AuthState>,
        links: Arc<dyn LinkStore>,
    ) -> Self {
        Self {
            transport,
            notifier,
            audit,
            auth,
            links,
            votes: VoteQueue::default(),
            options: ActionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ActionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ActionOptions {
        &self.options
    }

    fn record(&self, category: &str, action: &str, label: impl Into<String>) {
        let event = AuditEvent::new(category, action, label);
        debug!(
            category = %event.category,
            action = %event.action,
            "audit: recording event"
        );
        self.audit.record(event);
    }

    fn reject<T>(&self, action: &str, rejection: Rejection) -> ActionOutcome<T> {
        warn!(action, %rejection, "action rejected before request");
        self.notifier
            .show_error(&rejection.to_string(), &self.options.link_toast);
        ActionOutcome::Rejected(rejection)
    }

    async fn send<B: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse, ActionError> {
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|source| ActionError::Json {
                path: path.to_string(),
                source,
            })?;
        debug!(%method, path, "sending request");
        Ok(self.transport.request(method, path, body).await?)
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod support;
