//! Lazily initialised store + transport clients.
//!
//! Every entry point calls [`LazyBackend::get`] first. The first successful
//! call validates configuration and builds the clients; later calls reuse
//! them. A failed initialisation leaves the cell empty so the next call
//! retries.

use std::sync::Arc;

use tokio::sync::OnceCell;

use pushbell_common::config::AppConfig;
use pushbell_common::error::AppError;

use crate::dispatcher::Dispatcher;
use crate::firestore::FirestoreStore;
use crate::store::SubscriptionStore;
use crate::transport::PushTransport;
use crate::webpush::WebPushTransport;

pub struct Backend {
    dispatcher: Dispatcher,
}

impl Backend {
    pub fn new(store: Arc<dyn SubscriptionStore>, transport: Arc<dyn PushTransport>) -> Self {
        Self {
            dispatcher: Dispatcher::new(store, transport),
        }
    }

    /// Build the production clients, validating the store credential first
    /// and the VAPID key pair second.
    pub async fn connect(config: &AppConfig) -> Result<Self, AppError> {
        let account = config.service_account()?;
        let vapid = config.vapid()?;

        let project_id = account.project_id.clone();
        let store = FirestoreStore::new(account, config.firestore_collection.clone())?;
        let transport = WebPushTransport::new(vapid, config.push_ttl_seconds)?;

        tracing::info!(
            project_id = %project_id,
            collection = %config.firestore_collection,
            "Push backend initialised"
        );

        Ok(Self::new(Arc::new(store), Arc::new(transport)))
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

pub struct LazyBackend {
    config: Arc<AppConfig>,
    cell: OnceCell<Backend>,
}

impl LazyBackend {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            config,
            cell: OnceCell::new(),
        }
    }

    /// Start out already initialised with `backend`.
    pub fn ready(config: Arc<AppConfig>, backend: Backend) -> Self {
        Self {
            config,
            cell: OnceCell::from(backend),
        }
    }

    pub async fn get(&self) -> Result<&Backend, AppError> {
        self.cell
            .get_or_try_init(|| Backend::connect(&self.config))
            .await
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}
