//! Victory loot and the cross-session grudge ledger.
//!
//! Persistence failures never stop play: reads fall back to the last ledger
//! this engine saw, writes are logged and dropped.

use chrono::Utc;
use gauntlet_core::{
    CombatRules, GrudgeLedger, GrudgeRecord, GrudgeRoll, LootBundle, LootTable, LostItem,
    RandomSource, generate_loot,
};
use tracing::{debug, info, warn};

use crate::events::{EventBus, NarrativeEvent};
use crate::repository::GrudgeStore;

pub struct LootEngine {
    grudges: GrudgeStore,
    rules: CombatRules,
    table: LootTable,
    events: EventBus,
    /// Last ledger successfully loaded or written.
    cache: GrudgeLedger,
    active_revenge: Option<GrudgeRecord>,
}

impl LootEngine {
    pub fn new(grudges: GrudgeStore, rules: CombatRules, events: EventBus) -> Self {
        Self {
            grudges,
            rules,
            table: LootTable::default(),
            events,
            cache: GrudgeLedger::default(),
            active_revenge: None,
        }
    }

    #[must_use]
    pub fn with_table(mut self, table: LootTable) -> Self {
        self.table = table;
        self
    }

    /// Grudge matched by the start-of-combat roll, if any.
    pub fn active_revenge(&self) -> Option<&GrudgeRecord> {
        self.active_revenge.as_ref()
    }

    pub fn clear_revenge(&mut self) {
        self.active_revenge = None;
    }

    /// Rolls victory loot.
    pub fn generate_loot(&self, rng: &mut dyn RandomSource) -> LootBundle {
        generate_loot(&self.rules, &self.table, rng)
    }

    /// Rolls the oldest grudge against `enemy_type` once, at combat start.
    ///
    /// A hit makes this encounter a revenge match; a miss escalates the
    /// grudge and persists the new chance.
    pub fn check_for_revenge_at_start(
        &mut self,
        enemy_type: &str,
        rng: &mut dyn RandomSource,
    ) -> Option<&GrudgeRecord> {
        self.active_revenge = None;
        let mut ledger = self.load_ledger();

        match ledger.roll(enemy_type, self.rules.grudge_escalation, rng)? {
            GrudgeRoll::Revenge(record) => {
                info!(
                    "Revenge encounter against {} (grudge {}, {:.1}%)",
                    enemy_type, record.id, record.encounter_chance
                );
                self.events.publish(NarrativeEvent::RevengeEncounter {
                    enemy_type: enemy_type.to_string(),
                    grudge_id: record.id,
                    gold: record.gold,
                    items: item_names(&record.items),
                });
                self.active_revenge = Some(record);
            }
            GrudgeRoll::Escalated { id, chance } => {
                debug!("Grudge {} against {} escalated to {:.1}%", id, enemy_type, chance);
                self.persist(ledger);
                self.events.publish(NarrativeEvent::GrudgeEscalated {
                    enemy_type: enemy_type.to_string(),
                    grudge_id: id,
                    chance,
                });
            }
        }
        self.active_revenge.as_ref()
    }

    /// Returns what the active revenge grudge holds and deletes it.
    ///
    /// Only applies when the revenge match is against `enemy_type`; the
    /// grudge is settled at most once. When the stored ledger no longer holds
    /// the record (another session settled it first) nothing is paid out.
    /// An unreadable store settles against the last known ledger instead.
    pub fn check_and_recover_grudge(&mut self, enemy_type: &str) -> Option<LootBundle> {
        if self
            .active_revenge
            .as_ref()
            .is_none_or(|record| record.enemy_type != enemy_type)
        {
            return None;
        }
        let record = self.active_revenge.take()?;

        let mut ledger = self.load_ledger();
        if ledger.remove(record.id).is_none() {
            warn!(
                "Grudge {} against {} was already settled; nothing to recover",
                record.id, enemy_type
            );
            return None;
        }
        self.persist(ledger);

        info!(
            "Recovered {} gold and {} items from {}",
            record.gold,
            record.items.len(),
            enemy_type
        );
        self.events.publish(NarrativeEvent::RevengeRecovered {
            enemy_type: enemy_type.to_string(),
            gold: record.gold,
            items: item_names(&record.items),
        });
        Some(LootBundle::from(record))
    }

    /// Records a new grudge at the base chance.
    pub fn track_loot(
        &mut self,
        enemy_type: &str,
        gold: u32,
        items: Vec<LostItem>,
    ) -> GrudgeRecord {
        let mut ledger = self.load_ledger();
        let record = ledger
            .record(
                enemy_type,
                gold,
                items,
                Utc::now(),
                self.rules.grudge_base_chance,
            )
            .clone();
        self.persist(ledger);

        info!(
            "{} now holds a grudge (id {}): {} gold, {} items",
            enemy_type,
            record.id,
            gold,
            record.items.len()
        );
        self.events.publish(NarrativeEvent::GrudgeRecorded {
            enemy_type: enemy_type.to_string(),
            grudge_id: record.id,
            gold,
            items: item_names(&record.items),
        });
        record
    }

    /// Current ledger, as persisted (or cached when the store is unreadable).
    pub fn ledger(&mut self) -> GrudgeLedger {
        self.load_ledger()
    }

    fn load_ledger(&mut self) -> GrudgeLedger {
        match self.try_load_ledger() {
            Some(ledger) => ledger,
            None => self.cache.clone(),
        }
    }

    /// Fresh ledger from the store, or `None` (logged) when it is unreadable.
    fn try_load_ledger(&mut self) -> Option<GrudgeLedger> {
        match self.grudges.load() {
            Ok(mut ledger) => {
                ledger.normalize(self.rules.grudge_base_chance);
                self.cache = ledger.clone();
                Some(ledger)
            }
            Err(e) => {
                warn!("Failed to load grudge ledger, using last known copy: {}", e);
                self.events.publish(NarrativeEvent::MissingData {
                    what: GrudgeStore::KEY.to_string(),
                    fallback: "last known grudge ledger".to_string(),
                });
                None
            }
        }
    }

    fn persist(&mut self, ledger: GrudgeLedger) {
        if let Err(e) = self.grudges.save(&ledger) {
            warn!("Failed to persist grudge ledger: {}", e);
        }
        self.cache = ledger;
    }
}

fn item_names(items: &[LostItem]) -> Vec<String> {
    items.iter().map(|lost| lost.name().to_string()).collect()
}
