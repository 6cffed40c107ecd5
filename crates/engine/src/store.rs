//! Subscription store contract.

use async_trait::async_trait;

use pushbell_common::error::AppError;
use pushbell_common::types::{KnownUser, StoredSubscription};

/// Which subscriptions a dispatch targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// Every stored subscription, up to [`Selector::ALL_LIMIT`].
    All,
    /// Subscriptions owned by one user, up to [`Selector::USER_LIMIT`].
    User(KnownUser),
}

impl Selector {
    pub const ALL_LIMIT: usize = 200;
    pub const USER_LIMIT: usize = 50;

    /// Maximum number of documents fetched for this selector.
    pub fn limit(&self) -> usize {
        match self {
            Selector::All => Self::ALL_LIMIT,
            Selector::User(_) => Self::USER_LIMIT,
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::All => write!(f, "all"),
            Selector::User(user) => write!(f, "user = {}", user),
        }
    }
}

/// Document collection holding push subscriptions.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Fetch one page of subscriptions matching `selector`, in store order.
    async fn list(&self, selector: &Selector) -> Result<Vec<StoredSubscription>, AppError>;

    /// Delete the subscription document with the given id.
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}
