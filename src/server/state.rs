use crate::config::Config;
use crate::contact::{MailDispatcher, SubscriberStore};
use crate::directory::{Directory, StatusBoard};
use crate::location::{AddressResolver, OverrideTable};
use crate::schedule;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard};
use tracing::debug;

pub struct AppState {
    pub config: Config,
    directory: RwLock<Directory>,
    /// Set when the venues could not be loaded at startup.
    load_failed: bool,
    board: RwLock<StatusBoard>,
    resolver: Mutex<AddressResolver>,
    subscribers: Mutex<SubscriberStore>,
    pub mailer: Arc<dyn MailDispatcher>,
}

impl AppState {
    pub fn new(
        config: Config,
        directory: Option<Directory>,
        resolver: AddressResolver,
        subscribers: SubscriberStore,
        mailer: Arc<dyn MailDispatcher>,
    ) -> Self {
        let load_failed = directory.is_none();
        let directory = directory.unwrap_or_default();
        let board = directory.status_board(schedule::local_now());
        Self {
            config,
            directory: RwLock::new(directory),
            load_failed,
            board: RwLock::new(board),
            resolver: Mutex::new(resolver),
            subscribers: Mutex::new(subscribers),
            mailer,
        }
    }

    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    pub fn directory(&self) -> RwLockReadGuard<'_, Directory> {
        self.directory.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn board(&self) -> RwLockReadGuard<'_, StatusBoard> {
        self.board.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn resolver(&self) -> MutexGuard<'_, AddressResolver> {
        self.resolver.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribers(&self) -> MutexGuard<'_, SubscriberStore> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Re-evaluate open/closed for every venue at the current local time.
    pub fn refresh_status(&self) {
        let board = self.directory().status_board(schedule::local_now());
        debug!(open = board.open_count(), total = board.len(), "status board refreshed");
        *self.board.write().unwrap_or_else(PoisonError::into_inner) = board;
    }

    pub fn merge_overrides(&self, overrides: OverrideTable) {
        let mut resolver = self.resolver();
        resolver.merge_overrides(overrides);
        debug!(total = resolver.overrides().len(), "address overrides merged");
    }
}
