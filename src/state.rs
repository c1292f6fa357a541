//! Application context
//!
//! One `App` value owns the configuration, the storage backend, the loaded
//! store and the session, and is passed explicitly into every handler and
//! into the router; there is no ambient global state. `commit` is the
//! single mutation-completion point: it persists the whole store before
//! returning and records which data kinds changed so the view registry can
//! refresh the affected page.

use crate::config::Config;
use crate::entity::Account;
use crate::error::AppResult;
use crate::session::Session;
use crate::store::{FileStorage, StorageBackend, Store};
use crate::view::DataKind;

pub struct App {
    pub config: Config,
    pub store: Store,
    pub session: Session,
    storage: Box<dyn StorageBackend>,
    pending: Vec<DataKind>,
}

impl App {
    /// Start the application against the configured data directory: load
    /// the store (seeding if needed), then reconstruct the session from the
    /// stored token.
    pub fn bootstrap(config: Config) -> Self {
        let storage = Box::new(FileStorage::new(config.data_dir.clone()));
        Self::with_storage(config, storage)
    }

    /// Same as [`App::bootstrap`] over an explicit storage backend
    pub fn with_storage(config: Config, mut storage: Box<dyn StorageBackend>) -> Self {
        let store = Store::load(storage.as_mut());
        let mut session = Session::new();
        session.resolve_from_token(&store, storage.as_mut());
        Self {
            config,
            store,
            session,
            storage,
            pending: Vec::new(),
        }
    }

    /// Persist the whole store and record the changed data kinds. Must be
    /// the final step of every mutating operation, before any redirect or
    /// re-render, so that a restart at any later point observes the
    /// mutation.
    pub fn commit(&mut self, changed: &[DataKind]) -> AppResult<()> {
        self.store.save(self.storage.as_mut())?;
        self.record_changes(changed);
        Ok(())
    }

    /// Record changed kinds without persisting (session-only changes)
    pub fn record_changes(&mut self, changed: &[DataKind]) {
        for kind in changed {
            if !self.pending.contains(kind) {
                self.pending.push(*kind);
            }
        }
    }

    /// Drain the changed kinds accumulated since the last drain; the shell
    /// feeds these to the view registry after each handled event.
    pub fn take_changes(&mut self) -> Vec<DataKind> {
        std::mem::take(&mut self.pending)
    }

    pub fn login(&mut self, email: &str, password: &str) -> AppResult<Account> {
        let account = self
            .session
            .login(&self.store, self.storage.as_mut(), email, password)?;
        self.record_changes(&[DataKind::Session]);
        Ok(account)
    }

    pub fn logout(&mut self) {
        self.session.logout(self.storage.as_mut());
        self.record_changes(&[DataKind::Session]);
    }
}
