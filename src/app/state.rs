use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

use crate::access::OwnerAccess;
use crate::app::Config;
use crate::gateway::{Backend, HttpGateway};
use crate::i18n::Locale;
use crate::session::SessionStore;
use crate::storage::{FileStore, KeyValueStore};

/// Global application state
///
/// Both stores sit behind their own lock; concurrent triggers queue on it.
pub struct AppState {
    /// Configuration
    pub config: Arc<RwLock<Config>>,
    /// Authentication and display state
    pub session: Arc<RwLock<SessionStore>>,
    /// Owner-access gate
    pub access: Arc<RwLock<OwnerAccess>>,
}

impl AppState {
    /// Wire the HTTP gateway and file store from `config`, then restore both stores
    pub fn from_config(config: Config) -> Result<Self> {
        let backend = HttpGateway::new(
            &config.backend.base_url,
            Duration::from_secs(config.backend.timeout_secs),
        )
        .context("Failed to build HTTP client")?;
        let storage = FileStore::open(config.storage_dir()?)?;
        debug!("Using store at {}", storage.dir().display());

        Ok(Self::new(config, Arc::new(backend), Arc::new(storage)))
    }

    /// Create app state over the given backend and storage, restored from storage
    pub fn new(
        config: Config,
        backend: Arc<dyn Backend>,
        storage: Arc<dyn KeyValueStore>,
    ) -> Self {
        let mut session = SessionStore::new(Arc::clone(&backend), Arc::clone(&storage));
        session.restore();
        let mut access = OwnerAccess::new(backend, storage);
        access.restore();

        Self {
            config: Arc::new(RwLock::new(config)),
            session: Arc::new(RwLock::new(session)),
            access: Arc::new(RwLock::new(access)),
        }
    }

    /// Locale messages should render in
    pub async fn display_locale(&self) -> Locale {
        let device = self.config.read().await.device.locale.clone();
        self.session.read().await.session().display_locale(&device)
    }
}
