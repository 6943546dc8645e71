pub mod config;
pub mod logging;
pub mod services;
pub mod store;

pub use xuetong_algo as algo;

pub use config::Config;
pub use logging::LogGuard;
pub use services::analytics::{OverallProgress, ProgressAnalytics, RecentActivity};
pub use services::badge::{Achievements, Badge};
pub use services::practice::PracticeSession;
pub use services::records::ProgressRecords;
pub use store::{RecordStore, StoreError, StoreResult};

/// Store plus the services that read and write it
#[derive(Clone)]
pub struct Engine {
    store: RecordStore,
    analytics: ProgressAnalytics,
    records: ProgressRecords,
}

impl Engine {
    pub fn new(store: RecordStore) -> Self {
        Self {
            analytics: ProgressAnalytics::new(store.clone()),
            records: ProgressRecords::new(store.clone()),
            store,
        }
    }

    /// Attach to the on-disk store described by `config`
    pub fn open(config: &Config) -> StoreResult<Self> {
        Ok(Self::new(RecordStore::open(config)?))
    }

    /// Read `Config` from the environment, install tracing, then open the store.
    /// Keep the returned guard alive for as long as file logs should be written.
    pub fn from_env() -> StoreResult<(Self, LogGuard)> {
        let config = Config::from_env();
        let guard = logging::init_tracing(&config);
        let engine = Self::open(&config)?;
        Ok((engine, guard))
    }

    pub fn in_memory() -> Self {
        Self::new(RecordStore::in_memory())
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn analytics(&self) -> &ProgressAnalytics {
        &self.analytics
    }

    pub fn records(&self) -> &ProgressRecords {
        &self.records
    }
}
