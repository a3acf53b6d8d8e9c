use anyhow::Context;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tour_core::{
    bus::LaunchBus,
    catalog,
    config::TourConfig,
    keys,
    navigation::{History, Navigator},
    orchestrator::Orchestrator,
    runtime::PageContext,
    schema::TourStore,
    store::RedbStore,
};

/// The on-disk store and config of a portal root, with an in-process
/// history standing in for the browser location.
pub struct Portal {
    pub store: TourStore,
    pub config: TourConfig,
    pub history: Arc<History>,
    bus: LaunchBus,
}

impl Portal {
    /// Open `.tour/` under `root` with the location set to `location`.
    pub fn open(root: &Path, location: &str) -> anyhow::Result<Self> {
        let config = TourConfig::load(root).context("failed to load config")?;
        let kv = RedbStore::open(&keys::store_path(root)).context("failed to open tour store")?;
        let routes = catalog::all_pages().into_iter().map(|p| p.path);
        Ok(Self {
            store: TourStore::new(Arc::new(kv)),
            config,
            history: Arc::new(History::with_routes(location, routes)),
            bus: LaunchBus::new(),
        })
    }

    pub fn orchestrator(&self) -> Orchestrator {
        Orchestrator::new(self.store.clone(), self.history.clone(), self.bus.clone())
            .with_config(&self.config)
    }

    pub fn page_context(&self) -> PageContext {
        PageContext {
            orch: Arc::new(Mutex::new(self.orchestrator())),
            store: self.store.clone(),
            bus: self.bus.clone(),
            config: self.config.clone(),
        }
    }

    pub fn location(&self) -> String {
        self.history.current()
    }
}
