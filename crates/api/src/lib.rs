//! HTTP surface for the push notification triggers.
//!
//! - POST /api/anniversary-check: run the daily anniversary check now
//! - POST /api/send-push: send a notification to one user's devices
//! - GET  /api/push-config: VAPID public key for browser registration
//! - GET  /health: liveness

pub mod routes;
pub mod scheduler;
pub mod state;
