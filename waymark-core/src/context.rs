use once_cell::sync::OnceCell;

use crate::{StoreConfig, StoreHandle};

/// Application-scoped context handed to the store by the host.
///
/// The context owns the configuration and the slot for the one store
/// opened from it. Hosts create a single context at start-up and pass it
/// by reference to every consumer.
#[derive(Debug, Default)]
pub struct AppContext {
    config: StoreConfig,
    store: OnceCell<StoreHandle>,
}

impl AppContext {
    /// Create a context with no store opened yet.
    #[must_use]
    pub const fn new(config: StoreConfig) -> Self {
        Self {
            config,
            store: OnceCell::new(),
        }
    }

    /// Configuration used when the store is first opened.
    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The store opened from this context, if any.
    #[must_use]
    pub fn store(&self) -> Option<&StoreHandle> {
        self.store.get()
    }

    pub(crate) const fn store_slot(&self) -> &OnceCell<StoreHandle> {
        &self.store
    }
}
