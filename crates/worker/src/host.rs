//! Contracts the browser host provides to the worker.

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::error::WorkerError;
use crate::notification::Notification;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub url: Url,
}

impl Request {
    pub fn new(method: impl Into<String>, url: Url) -> Self {
        Self {
            method: method.into(),
            url,
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new("GET", url)
    }

    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }
}

/// Mirrors the Fetch API response types the worker cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    Basic,
    Cors,
    /// Cross-origin no-cors result; status and body are not inspectable.
    Opaque,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub kind: ResponseType,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            kind: ResponseType::Basic,
            body: body.into(),
        }
    }

    pub fn opaque() -> Self {
        Self {
            status: 0,
            kind: ResponseType::Opaque,
            body: Vec::new(),
        }
    }

    /// Network error surfaced as a response, like `Response.error()`.
    pub fn error() -> Self {
        Self {
            status: 0,
            kind: ResponseType::Error,
            body: Vec::new(),
        }
    }

    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Named cache generations, each mapping request URLs to responses.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Names of every existing generation.
    async fn keys(&self) -> Result<Vec<String>, WorkerError>;

    /// Returns whether a generation with that name existed.
    async fn delete(&self, name: &str) -> Result<bool, WorkerError>;

    /// Store `response` under `request` in generation `name`, creating the
    /// generation if needed.
    async fn put(&self, name: &str, request: &Request, response: Response)
    -> Result<(), WorkerError>;

    async fn lookup(&self, name: &str, request: &Request)
    -> Result<Option<Response>, WorkerError>;
}

#[async_trait]
pub trait Network: Send + Sync {
    /// Fails only when no response was obtained at all (offline, DNS, ...).
    async fn fetch(&self, request: &Request) -> Result<Response, WorkerError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowClient {
    pub id: String,
    pub url: String,
    /// Whether the host exposes `focus()` on this client.
    pub focusable: bool,
}

#[async_trait]
pub trait Clients: Send + Sync {
    async fn match_all(&self, include_uncontrolled: bool)
    -> Result<Vec<WindowClient>, WorkerError>;

    async fn focus(&self, id: &str) -> Result<(), WorkerError>;

    /// Whether the host supports opening new windows.
    fn can_open_window(&self) -> bool;

    async fn open_window(&self, url: &str) -> Result<(), WorkerError>;

    /// Start controlling every open client immediately.
    async fn claim(&self) -> Result<(), WorkerError>;
}

#[async_trait]
pub trait Registration: Send + Sync {
    async fn show_notification(&self, notification: Notification) -> Result<(), WorkerError>;

    fn close_notification(&self, notification: &Notification);

    /// Activate without waiting for existing clients to close.
    async fn skip_waiting(&self) -> Result<(), WorkerError>;
}

/// Bundle of host services handed to the runtime.
#[derive(Clone)]
pub struct Host {
    pub caches: Arc<dyn CacheStorage>,
    pub network: Arc<dyn Network>,
    pub clients: Arc<dyn Clients>,
    pub registration: Arc<dyn Registration>,
}
