use std::sync::Arc;

use quiz_core::Catalog;
use storage::{LocalStore, Storage};

use crate::Clock;
use crate::error::AppServicesError;
use crate::events::EventBus;
use crate::resolver::Resolver;
use crate::sessions::QuizFlow;

/// Assembles the catalog, storage and event bus behind one handle.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<Catalog>,
    store: LocalStore,
    clock: Clock,
    events: EventBus,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        catalog: Catalog,
        events: EventBus,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock, catalog, events))
    }

    #[must_use]
    pub fn in_memory(clock: Clock, catalog: Catalog, events: EventBus) -> Self {
        Self::from_storage(&Storage::in_memory(), clock, catalog, events)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock, catalog: Catalog, events: EventBus) -> Self {
        Self {
            catalog: Arc::new(catalog),
            store: LocalStore::new(storage, clock.clone()),
            clock,
            events,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn store(&self) -> LocalStore {
        self.store.clone()
    }

    #[must_use]
    pub fn resolver(&self) -> Resolver {
        Resolver::new(self.catalog(), self.clock.clone())
    }

    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// A fresh flow on the login screen.
    #[must_use]
    pub fn flow(&self) -> QuizFlow {
        QuizFlow::new(
            self.resolver(),
            self.store(),
            self.events.clone(),
            self.clock.clone(),
        )
    }
}
