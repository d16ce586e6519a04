//! Global grudge ledger persistence.

use std::sync::Arc;

use gauntlet_core::GrudgeLedger;

use super::{JsonStoreExt, KeyValueStore, Result};

/// Reads and writes the grudge ledger under a single global key.
#[derive(Clone)]
pub struct GrudgeStore {
    store: Arc<dyn KeyValueStore>,
}

impl GrudgeStore {
    pub const KEY: &'static str = "gauntlet.grudges";

    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Loads the ledger; a missing key is an empty ledger.
    pub fn load(&self) -> Result<GrudgeLedger> {
        Ok(self
            .store
            .read_json::<GrudgeLedger>(Self::KEY)?
            .unwrap_or_default())
    }

    pub fn save(&self, ledger: &GrudgeLedger) -> Result<()> {
        self.store.write_json(Self::KEY, ledger)
    }
}
