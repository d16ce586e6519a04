//! Applying the player's revival decision.

use gauntlet_core::{
    Combatant, DeathChoice, GrudgeRecord, Penalty, RandomSource, apply_penalty, compute_penalty,
    revival_hp,
};
use tracing::info;

use super::LootEngine;

/// Result of [`DeathResolver::resolve`].
#[derive(Debug, Clone, PartialEq)]
pub struct RevivalOutcome {
    pub choice: DeathChoice,
    /// Penalty actually taken from the fallen player.
    pub penalty: Penalty,
    /// HP the player came back with; `None` when staying dead.
    pub revived_hp: Option<u32>,
    /// Grudge left behind by a retreat.
    pub grudge: Option<GrudgeRecord>,
}

/// Stateless applier of revival penalties.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeathResolver;

impl DeathResolver {
    pub fn new() -> Self {
        Self
    }

    /// Applies `choice` to the fallen player.
    ///
    /// Revival paths strip the computed penalty and heal to half max HP; a
    /// retreat also hands the stripped gold and items to `enemy_type` as a
    /// grudge. Staying dead changes nothing.
    pub fn resolve(
        &self,
        choice: DeathChoice,
        fallen: &mut Combatant,
        enemy_type: &str,
        loot: &mut LootEngine,
        rng: &mut dyn RandomSource,
    ) -> RevivalOutcome {
        let Some(path) = choice.revival_path() else {
            info!("{} stays dead", fallen.name);
            return RevivalOutcome {
                choice,
                penalty: Penalty::default(),
                revived_hp: None,
                grudge: None,
            };
        };

        let computed = compute_penalty(
            path,
            fallen.gold,
            &fallen.inventory,
            &fallen.equipment,
            rng,
        );
        let penalty = apply_penalty(fallen, &computed);
        fallen.set_hp(revival_hp(fallen.max_hp()));

        info!(
            "{} revived via {}: lost {} gold and {} items, back at {} HP",
            fallen.name,
            path,
            penalty.gold_loss,
            penalty.items.len(),
            fallen.hp()
        );

        let grudge = (choice == DeathChoice::Retreat)
            .then(|| loot.track_loot(enemy_type, penalty.gold_loss, penalty.items.clone()));

        RevivalOutcome {
            choice,
            penalty,
            revived_hp: Some(fallen.hp()),
            grudge,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gauntlet_core::{
        CharacterSheet, CombatRules, CombatantId, EquipSlot, Equipment, Item, ItemCategory,
        ScriptedRng, Side,
    };

    use super::*;
    use crate::events::EventBus;
    use crate::repository::{GrudgeStore, InMemoryStore};

    fn fallen_hero() -> Combatant {
        let sheet = CharacterSheet::new("hero", "Aria", "Fighter", 21, 0)
            .with_gold(99)
            .with_equipment(
                Equipment::empty().with(EquipSlot::MainHand, Item::weapon("Longsword", "1d8")),
            )
            .with_item(Item::new("Health Potion", ItemCategory::Consumable));
        let mut hero = Combatant::from_sheet(CombatantId(0), sheet, Side::Player);
        hero.take_damage(21);
        hero
    }

    fn loot_engine() -> LootEngine {
        let grudges = GrudgeStore::new(Arc::new(InMemoryStore::new()));
        LootEngine::new(grudges, CombatRules::default(), EventBus::new())
    }

    #[test]
    fn retreat_pays_two_thirds_and_leaves_a_grudge() {
        let mut hero = fallen_hero();
        let mut loot = loot_engine();
        let outcome = DeathResolver::new().resolve(
            DeathChoice::Retreat,
            &mut hero,
            "Goblin",
            &mut loot,
            &mut ScriptedRng::constant(0.5),
        );

        assert_eq!(outcome.penalty.gold_loss, 66);
        assert_eq!(outcome.penalty.items.len(), 2);
        assert_eq!(outcome.revived_hp, Some(10));
        assert_eq!(hero.gold, 33);
        let grudge = outcome.grudge.unwrap();
        assert_eq!(grudge.gold, 66);
        assert_eq!(grudge.encounter_chance, 1.5);
        assert_eq!(loot.ledger().len(), 1);
    }

    #[test]
    fn revenge_leaves_no_grudge() {
        let mut hero = fallen_hero();
        let mut loot = loot_engine();
        let outcome = DeathResolver::new().resolve(
            DeathChoice::Revenge,
            &mut hero,
            "Goblin",
            &mut loot,
            &mut ScriptedRng::constant(0.5),
        );
        assert_eq!(outcome.penalty.gold_loss, 49);
        assert_eq!(outcome.penalty.items[0].name(), "Health Potion");
        assert!(outcome.grudge.is_none());
        assert!(loot.ledger().is_empty());
    }

    #[test]
    fn staying_dead_costs_nothing() {
        let mut hero = fallen_hero();
        let mut loot = loot_engine();
        let outcome = DeathResolver::new().resolve(
            DeathChoice::StayDead,
            &mut hero,
            "Goblin",
            &mut loot,
            &mut ScriptedRng::constant(0.5),
        );
        assert_eq!(outcome.penalty, Penalty::default());
        assert_eq!(outcome.revived_hp, None);
        assert_eq!((hero.hp(), hero.gold), (0, 99));
    }
}
