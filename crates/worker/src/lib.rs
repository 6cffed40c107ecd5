//! Browser-side client runtime (service worker).
//!
//! The browser host is abstracted behind the traits in [`host`]: cache
//! storage, the network, window clients and the service-worker registration.
//! Handlers never block on side effects they start; those are attached to
//! the event's [`event::ExtendableEvent`] and the host must settle the event
//! before it recycles the worker.

pub mod error;
pub mod event;
pub mod host;
pub mod notification;
pub mod runtime;
