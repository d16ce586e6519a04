//! Per-character loot staging area.
//!
//! Victory loot is staged rather than granted: it only reaches a character's
//! inventory through an explicit [`LootStaging::claim`].

use std::sync::Arc;

use gauntlet_core::{CharacterSheet, LootBundle};

use super::{CharacterRepository, JsonStoreExt, KeyValueStore, Result};

#[derive(Clone)]
pub struct LootStaging {
    store: Arc<dyn KeyValueStore>,
}

impl LootStaging {
    pub const PREFIX: &'static str = "gauntlet.loot.";

    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn key(character_id: &str) -> String {
        format!("{}{character_id}", Self::PREFIX)
    }

    /// Loot currently staged for a character (empty when nothing is staged).
    pub fn staged(&self, character_id: &str) -> Result<LootBundle> {
        Ok(self
            .store
            .read_json::<LootBundle>(&Self::key(character_id))?
            .unwrap_or_default())
    }

    /// Adds `loot` to whatever is already staged and returns the new total.
    pub fn stage(&self, character_id: &str, loot: &LootBundle) -> Result<LootBundle> {
        let mut staged = self.staged(character_id)?;
        staged.merge(loot.clone());
        self.store.write_json(&Self::key(character_id), &staged)?;
        Ok(staged)
    }

    /// Removes and returns everything staged for a character.
    pub fn take(&self, character_id: &str) -> Result<LootBundle> {
        let staged = self.staged(character_id)?;
        self.store.remove_item(&Self::key(character_id))?;
        Ok(staged)
    }

    /// Moves staged loot into `sheet` and saves it, returning what was claimed.
    ///
    /// The updated sheet is written before the staging key is removed, so a
    /// failed write leaves both the stored sheet and the staged loot as they
    /// were. `sheet` is only updated once the claim went through.
    pub fn claim(
        &self,
        sheet: &mut CharacterSheet,
        characters: &CharacterRepository,
    ) -> Result<LootBundle> {
        let staged = self.staged(&sheet.id)?;
        if staged.is_empty() {
            return Ok(staged);
        }

        let mut updated = sheet.clone();
        staged.clone().claim_into(&mut updated);
        characters.save(&updated)?;

        if let Err(e) = self.store.remove_item(&Self::key(&sheet.id)) {
            // keep the loot claimable once rather than twice
            if let Err(restore) = characters.save(sheet) {
                tracing::warn!(
                    "Failed to restore sheet {} after a failed claim: {}",
                    sheet.id,
                    restore
                );
            }
            return Err(e);
        }

        *sheet = updated;
        tracing::debug!(
            "Claimed {} gold and {} items for {}",
            staged.gold,
            staged.items.len(),
            sheet.id
        );
        Ok(staged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryStore;
    use gauntlet_core::{Item, ItemCategory};

    #[test]
    fn stage_accumulates_until_claimed() {
        let store = Arc::new(InMemoryStore::new());
        let staging = LootStaging::new(store.clone());
        let characters = CharacterRepository::new(store);
        staging.stage("hero", &LootBundle::new(12, Vec::new())).unwrap();
        let total = staging
            .stage(
                "hero",
                &LootBundle::new(5, vec![Item::new("Copper Ring", ItemCategory::Accessory)]),
            )
            .unwrap();
        assert_eq!(total.gold, 17);

        let mut sheet = CharacterSheet::new("hero", "Aria", "Fighter", 20, 0);
        let claimed = staging.claim(&mut sheet, &characters).unwrap();
        assert_eq!(claimed.gold, 17);
        assert_eq!(sheet.gold, 17);
        assert_eq!(sheet.inventory.len(), 1);
        assert!(staging.staged("hero").unwrap().is_empty());
        assert_eq!(characters.load("hero").unwrap(), Some(sheet));
    }

    /// Store whose character sheet writes always fail.
    struct SheetWritesFail(InMemoryStore);

    impl KeyValueStore for SheetWritesFail {
        fn get_item(&self, key: &str) -> Result<Option<String>> {
            self.0.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<()> {
            if key.starts_with(CharacterRepository::PREFIX) {
                return Err(std::io::Error::other("read-only sheets").into());
            }
            self.0.set_item(key, value)
        }

        fn remove_item(&self, key: &str) -> Result<()> {
            self.0.remove_item(key)
        }
    }

    #[test]
    fn failed_sheet_write_keeps_the_loot_staged() {
        let store: Arc<dyn KeyValueStore> = Arc::new(SheetWritesFail(InMemoryStore::new()));
        let staging = LootStaging::new(store.clone());
        let characters = CharacterRepository::new(store);
        staging.stage("hero", &LootBundle::new(12, Vec::new())).unwrap();

        let mut sheet = CharacterSheet::new("hero", "Aria", "Fighter", 20, 0).with_gold(25);
        assert!(staging.claim(&mut sheet, &characters).is_err());

        assert_eq!(sheet.gold, 25);
        assert_eq!(staging.staged("hero").unwrap().gold, 12);
    }
}
