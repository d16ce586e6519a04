//! Character sheet persistence.

use std::sync::Arc;

use gauntlet_core::CharacterSheet;

use super::{JsonStoreExt, KeyValueStore, Result};

/// Stores one [`CharacterSheet`] per character id.
#[derive(Clone)]
pub struct CharacterRepository {
    store: Arc<dyn KeyValueStore>,
}

impl CharacterRepository {
    pub const PREFIX: &'static str = "gauntlet.character.";

    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn key(id: &str) -> String {
        format!("{}{id}", Self::PREFIX)
    }

    /// Loads a sheet, clamping hp/mp back into range.
    pub fn load(&self, id: &str) -> Result<Option<CharacterSheet>> {
        let sheet = self.store.read_json::<CharacterSheet>(&Self::key(id))?;
        Ok(sheet.map(|mut sheet| {
            sheet.normalize();
            sheet
        }))
    }

    pub fn save(&self, sheet: &CharacterSheet) -> Result<()> {
        self.store.write_json(&Self::key(&sheet.id), sheet)
    }
}
