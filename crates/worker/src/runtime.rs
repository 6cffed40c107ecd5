//! Service worker lifecycle and event handlers.
//!
//! Lifecycle: `Parsed → Installing → Installed → Activating → Active`, or
//! `Redundant` if installation fails. Each deployed worker owns exactly one
//! cache generation; activating it deletes every other generation.

use std::sync::Mutex;

use futures::future::try_join_all;
use url::Url;

use crate::error::WorkerError;
use crate::event::ExtendableEvent;
use crate::host::{Host, Request, Response, ResponseType};
use crate::notification::{Notification, NotificationDefaults};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Parsed,
    Installing,
    Installed,
    Activating,
    Active,
    Redundant,
}

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Registration scope; its origin decides what counts as same-origin.
    pub scope: Url,
    /// Name of this worker's cache generation.
    pub cache_name: String,
    /// Root-relative paths cached at install time.
    pub precache: Vec<String>,
    pub notifications: NotificationDefaults,
}

impl WorkerConfig {
    pub const DEFAULT_CACHE_NAME: &'static str = "diego-danna-v1";

    pub fn new(scope: Url) -> Self {
        Self {
            scope,
            cache_name: Self::DEFAULT_CACHE_NAME.to_string(),
            precache: ["/", "/index.html", "/manifest.webmanifest", "/portada.jpeg"]
                .into_iter()
                .map(String::from)
                .collect(),
            notifications: NotificationDefaults::default(),
        }
    }

    pub fn with_cache_name(mut self, name: impl Into<String>) -> Self {
        self.cache_name = name.into();
        self
    }

    pub fn with_precache(mut self, paths: Vec<String>) -> Self {
        self.precache = paths;
        self
    }
}

pub struct FetchEvent {
    pub request: Request,
    pub lifetime: ExtendableEvent,
}

impl FetchEvent {
    pub fn new(request: Request) -> Self {
        Self {
            request,
            lifetime: ExtendableEvent::new(),
        }
    }
}

pub struct PushEvent {
    /// Raw message body, if the push carried one.
    pub data: Option<Vec<u8>>,
    pub lifetime: ExtendableEvent,
}

impl PushEvent {
    pub fn new(data: Option<Vec<u8>>) -> Self {
        Self {
            data,
            lifetime: ExtendableEvent::new(),
        }
    }
}

pub struct NotificationClickEvent {
    pub notification: Notification,
    pub lifetime: ExtendableEvent,
}

impl NotificationClickEvent {
    pub fn new(notification: Notification) -> Self {
        Self {
            notification,
            lifetime: ExtendableEvent::new(),
        }
    }
}

pub struct ServiceWorker {
    config: WorkerConfig,
    host: Host,
    phase: Mutex<Phase>,
}

impl ServiceWorker {
    pub fn new(config: WorkerConfig, host: Host) -> Self {
        Self {
            config,
            host,
            phase: Mutex::new(Phase::Parsed),
        }
    }

    pub fn phase(&self) -> Phase {
        *self.phase.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn cache_name(&self) -> &str {
        &self.config.cache_name
    }

    fn set_phase(&self, phase: Phase) {
        *self.phase.lock().unwrap_or_else(|e| e.into_inner()) = phase;
    }

    fn advance(&self, expected: Phase, next: Phase) -> Result<(), WorkerError> {
        let mut phase = self.phase.lock().unwrap_or_else(|e| e.into_inner());
        if *phase != expected {
            return Err(WorkerError::InvalidState {
                expected,
                found: *phase,
            });
        }
        *phase = next;
        Ok(())
    }

    /// Dispatch the install event and settle it.
    pub async fn install(&self) -> Result<(), WorkerError> {
        self.advance(Phase::Parsed, Phase::Installing)?;

        let mut event = ExtendableEvent::new();
        let outcome = match self.on_install(&mut event) {
            Ok(()) => event.settle().await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => {
                self.set_phase(Phase::Installed);
                tracing::info!(cache = %self.config.cache_name, "Service worker installed");
                Ok(())
            }
            Err(e) => {
                self.set_phase(Phase::Redundant);
                tracing::warn!(cache = %self.config.cache_name, error = %e, "Install failed");
                Err(e)
            }
        }
    }

    /// Dispatch the activate event and settle it.
    pub async fn activate(&self) -> Result<(), WorkerError> {
        self.advance(Phase::Installed, Phase::Activating)?;

        let mut event = ExtendableEvent::new();
        self.on_activate(&mut event);
        event.settle().await?;

        self.set_phase(Phase::Active);
        tracing::info!(cache = %self.config.cache_name, "Service worker active");
        Ok(())
    }

    /// Precache the manifest, then skip waiting. Either every asset is
    /// stored or none is.
    pub fn on_install(&self, event: &mut ExtendableEvent) -> Result<(), WorkerError> {
        let requests = self
            .config
            .precache
            .iter()
            .map(|path| -> Result<Request, WorkerError> {
                Ok(Request::get(self.config.scope.join(path)?))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let cache_name = self.config.cache_name.clone();
        let host = self.host.clone();

        event.wait_until(async move {
            let mut fetched = Vec::with_capacity(requests.len());
            for request in requests {
                let response = host.network.fetch(&request).await?;
                if !response.ok() {
                    return Err(WorkerError::Precache {
                        url: request.url.to_string(),
                        status: response.status,
                    });
                }
                fetched.push((request, response));
            }

            for (request, response) in fetched {
                host.caches.put(&cache_name, &request, response).await?;
            }

            host.registration.skip_waiting().await
        });

        Ok(())
    }

    /// Drop every cache generation except this worker's, then claim clients.
    pub fn on_activate(&self, event: &mut ExtendableEvent) {
        let current = self.config.cache_name.clone();
        let host = self.host.clone();

        event.wait_until(async move {
            let stale: Vec<String> = host
                .caches
                .keys()
                .await?
                .into_iter()
                .filter(|name| *name != current)
                .collect();

            try_join_all(stale.iter().map(|name| {
                tracing::debug!(cache = %name, "Deleting stale cache generation");
                host.caches.delete(name)
            }))
            .await?;

            host.clients.claim().await
        });
    }

    /// Network first, cache as fallback.
    ///
    /// Successful same-origin GETs (and opaque responses) are copied into the
    /// current generation in the background; the live response is returned
    /// without waiting for that write. `None` means neither the network nor
    /// the cache could answer.
    pub async fn on_fetch(&self, event: &mut FetchEvent) -> Option<Response> {
        let request = event.request.clone();

        match self.host.network.fetch(&request).await {
            Ok(response) => {
                let storable = response.ok() || response.kind == ResponseType::Opaque;
                if self.is_cacheable(&request) && storable {
                    let caches = self.host.caches.clone();
                    let cache_name = self.config.cache_name.clone();
                    let copy = response.clone();

                    event.lifetime.wait_until(async move {
                        if let Err(e) = caches.put(&cache_name, &request, copy).await {
                            tracing::debug!(url = %request.url, error = %e, "Cache write failed");
                        }
                        Ok(())
                    });
                }
                Some(response)
            }
            Err(e) => {
                tracing::debug!(url = %request.url, error = %e, "Network failed, trying cache");
                match self
                    .host
                    .caches
                    .lookup(&self.config.cache_name, &request)
                    .await
                {
                    Ok(cached) => cached,
                    Err(e) => {
                        tracing::debug!(url = %request.url, error = %e, "Cache lookup failed");
                        None
                    }
                }
            }
        }
    }

    fn is_cacheable(&self, request: &Request) -> bool {
        request.is_get() && request.url.origin() == self.config.scope.origin()
    }

    pub fn on_push(&self, event: &mut PushEvent) {
        let notification =
            Notification::from_push(event.data.as_deref(), &self.config.notifications);
        let registration = self.host.registration.clone();

        event
            .lifetime
            .wait_until(async move { registration.show_notification(notification).await });
    }

    /// Close the notification, then focus a window already showing its
    /// target or open a new one.
    pub fn on_notification_click(&self, event: &mut NotificationClickEvent) {
        self.host
            .registration
            .close_notification(&event.notification);

        let target = event.notification.click_target(&self.config.notifications);
        let clients = self.host.clients.clone();

        event.lifetime.wait_until(async move {
            let windows = clients.match_all(true).await?;
            if let Some(window) = windows
                .iter()
                .find(|w| w.focusable && !w.url.is_empty() && w.url.contains(&target))
            {
                return clients.focus(&window.id).await;
            }

            if clients.can_open_window() {
                clients.open_window(&target).await?;
            }
            Ok(())
        });
    }
}
