//! Victory rewards and the grudge ledger.
//!
//! Loot math is pure: [`generate_loot`] draws from a [`LootTable`] through a
//! [`RandomSource`]. Persisting bundles and grudges is the runtime's job.

mod grudge;

pub use grudge::{GrudgeLedger, GrudgeRecord, GrudgeRoll};

use crate::combatant::{CharacterSheet, Item, ItemCategory};
use crate::config::CombatRules;
use crate::rng::RandomSource;

/// Gold and items granted (or staged) for a player.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LootBundle {
    pub gold: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub items: Vec<Item>,
}

impl LootBundle {
    pub fn new(gold: u32, items: Vec<Item>) -> Self {
        Self { gold, items }
    }

    pub fn is_empty(&self) -> bool {
        self.gold == 0 && self.items.is_empty()
    }

    /// Adds another bundle's gold and items to this one.
    pub fn merge(&mut self, other: LootBundle) {
        self.gold = self.gold.saturating_add(other.gold);
        self.items.extend(other.items);
    }

    /// Moves the bundle into a character's purse and inventory.
    pub fn claim_into(self, sheet: &mut CharacterSheet) {
        sheet.gold = sheet.gold.saturating_add(self.gold);
        sheet.inventory.extend(self.items);
    }
}

impl From<GrudgeRecord> for LootBundle {
    fn from(record: GrudgeRecord) -> Self {
        Self {
            gold: record.gold,
            items: record.items.into_iter().map(|lost| lost.item).collect(),
        }
    }
}

/// Fixed list of bonus items a victory can roll.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LootTable {
    entries: Vec<Item>,
}

impl LootTable {
    pub fn new(entries: Vec<Item>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Item] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Picks `entries[floor(r * len)]`.
    pub fn pick(&self, rng: &mut dyn RandomSource) -> Option<&Item> {
        let len = u32::try_from(self.entries.len()).unwrap_or(u32::MAX);
        if len == 0 {
            return None;
        }
        self.entries.get(rng.below(len) as usize)
    }
}

impl Default for LootTable {
    fn default() -> Self {
        Self::new(vec![
            Item::consumable("Health Potion", "2d4+2"),
            Item::consumable("Mana Potion", "1d4+1"),
            Item::weapon("Iron Dagger", "1d4"),
            Item::new("Copper Ring", ItemCategory::Accessory),
            Item::new("Leather Cap", ItemCategory::Armor),
        ])
    }
}

/// Rolls victory loot: `min + floor(r * spread)` gold and, with the bonus
/// chance, one item from the table.
pub fn generate_loot(
    rules: &CombatRules,
    table: &LootTable,
    rng: &mut dyn RandomSource,
) -> LootBundle {
    let gold = rules.loot_min_gold + rng.below(rules.loot_gold_spread);
    let items = if rng.chance(rules.bonus_item_chance) {
        table.pick(rng).cloned().into_iter().collect()
    } else {
        Vec::new()
    };
    LootBundle { gold, items }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{PcgRng, ScriptedRng};

    #[test]
    fn gold_stays_in_range() {
        let rules = CombatRules::default();
        let table = LootTable::default();
        let mut rng = PcgRng::new(11);
        for _ in 0..500 {
            let loot = generate_loot(&rules, &table, &mut rng);
            assert!((10..=29).contains(&loot.gold), "gold {}", loot.gold);
            assert!(loot.items.len() <= 1);
        }
    }

    #[test]
    fn bonus_item_follows_the_chance_roll() {
        let rules = CombatRules::default();
        let table = LootTable::default();

        // gold roll, bonus roll (hit), table pick
        let mut lucky = ScriptedRng::new([0.999, 0.1, 0.0]);
        let loot = generate_loot(&rules, &table, &mut lucky);
        assert_eq!(loot.gold, 29);
        assert_eq!(loot.items.len(), 1);
        assert_eq!(loot.items[0].name, "Health Potion");

        let mut unlucky = ScriptedRng::new([0.0, 0.3]);
        let loot = generate_loot(&rules, &table, &mut unlucky);
        assert_eq!(loot.gold, 10);
        assert!(loot.items.is_empty());
    }

    #[test]
    fn claim_moves_bundle_into_sheet() {
        let mut sheet = CharacterSheet::new("hero", "Aria", "Fighter", 20, 0).with_gold(5);
        let mut bundle = LootBundle::new(12, vec![Item::new("Copper Ring", ItemCategory::Accessory)]);
        bundle.merge(LootBundle::new(3, Vec::new()));
        bundle.claim_into(&mut sheet);
        assert_eq!(sheet.gold, 20);
        assert_eq!(sheet.inventory.len(), 1);
    }

    #[test]
    fn empty_table_never_yields_items() {
        let rules = CombatRules {
            bonus_item_chance: 1.0,
            ..CombatRules::default()
        };
        let loot = generate_loot(&rules, &LootTable::new(Vec::new()), &mut ScriptedRng::constant(0.0));
        assert!(loot.items.is_empty());
    }
}
