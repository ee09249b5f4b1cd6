//! Server module containing the shared application state

use crate::config::Config;
use crate::error::Result;
use crate::notify::{Notifier, create_notifier};
use crate::store::Store;
use std::sync::Arc;

// Submodules
pub mod router;

/// Main peer-feedback server state, cloned into every handler
#[derive(Clone)]
pub struct FeedbackServer {
    pub store: Store,
    pub notifier: Arc<dyn Notifier>,
    pub config: Arc<Config>, // Retain config to avoid future env reads
}

impl FeedbackServer {
    /// Open the configured store and mail notifier
    pub fn new(config: Config) -> Result<Self> {
        let store = Store::open(&config.database.path)?;
        let notifier = create_notifier(&config.mail)?;
        Ok(Self::with_parts(config, store, notifier))
    }

    pub fn with_parts(config: Config, store: Store, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            config: Arc::new(config),
        }
    }
}
