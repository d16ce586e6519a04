//! Grudges: what an enemy type took from a retreating player.
//!
//! The ledger is an ordered list. Several grudges against the same enemy type
//! are independent records; lookups always pick the oldest one.

use chrono::{DateTime, Utc};

use crate::death::LostItem;
use crate::rng::RandomSource;

/// One unsettled grudge.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct GrudgeRecord {
    pub id: u64,
    /// Enemy `kind` this grudge is held against.
    pub enemy_type: String,
    pub gold: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub items: Vec<LostItem>,
    pub created_at: DateTime<Utc>,
    /// Percent chance the next encounter with this enemy type is a revenge match.
    pub encounter_chance: f64,
}

/// Outcome of the start-of-combat grudge roll.
#[derive(Clone, Debug, PartialEq)]
pub enum GrudgeRoll {
    /// The roll hit: this encounter is a revenge match.
    Revenge(GrudgeRecord),
    /// The roll missed; the grudge's chance grew to `chance`.
    Escalated { id: u64, chance: f64 },
}

/// Ordered collection of grudges.
///
/// Ids come from a counter that only moves forward, so a settled grudge's id
/// is never handed to a later one. Persisted as `{ "nextId", "records" }`;
/// a bare array of records is still accepted on load.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", from = "LedgerRepr"))]
pub struct GrudgeLedger {
    next_id: u64,
    records: Vec<GrudgeRecord>,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum LedgerRepr {
    Ledger {
        #[serde(rename = "nextId", default)]
        next_id: u64,
        records: Vec<GrudgeRecord>,
    },
    Records(Vec<GrudgeRecord>),
}

#[cfg(feature = "serde")]
impl From<LedgerRepr> for GrudgeLedger {
    fn from(repr: LedgerRepr) -> Self {
        let (next_id, records) = match repr {
            LedgerRepr::Ledger { next_id, records } => (next_id, records),
            LedgerRepr::Records(records) => (0, records),
        };
        let mut ledger = Self { next_id, records };
        ledger.next_id = ledger.next_id();
        ledger
    }
}

impl GrudgeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[GrudgeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Oldest grudge held against `enemy_type` (exact match).
    pub fn find_oldest(&self, enemy_type: &str) -> Option<&GrudgeRecord> {
        self.records
            .iter()
            .find(|record| record.enemy_type == enemy_type)
    }

    pub fn get(&self, id: u64) -> Option<&GrudgeRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Appends a grudge with the given starting chance and returns it.
    pub fn record(
        &mut self,
        enemy_type: impl Into<String>,
        gold: u32,
        items: Vec<LostItem>,
        created_at: DateTime<Utc>,
        base_chance: f64,
    ) -> &GrudgeRecord {
        let id = self.next_id();
        self.next_id = id + 1;
        let index = self.records.len();
        self.records.push(GrudgeRecord {
            id,
            enemy_type: enemy_type.into(),
            gold,
            items,
            created_at,
            encounter_chance: base_chance,
        });
        &self.records[index]
    }

    /// Raises a grudge's chance by `step`, returning the new chance.
    pub fn escalate(&mut self, id: u64, step: f64) -> Option<f64> {
        let record = self.records.iter_mut().find(|record| record.id == id)?;
        record.encounter_chance += step;
        Some(record.encounter_chance)
    }

    /// Removes exactly the grudge with `id`.
    pub fn remove(&mut self, id: u64) -> Option<GrudgeRecord> {
        let index = self.records.iter().position(|record| record.id == id)?;
        Some(self.records.remove(index))
    }

    /// Rolls the oldest grudge against `enemy_type`.
    ///
    /// `roll = r * 100`; a roll below the record's chance is a revenge match,
    /// anything else escalates the record by `step`. Returns `None` when no
    /// grudge is held against the enemy type.
    pub fn roll(
        &mut self,
        enemy_type: &str,
        step: f64,
        rng: &mut dyn RandomSource,
    ) -> Option<GrudgeRoll> {
        let record = self.find_oldest(enemy_type)?;
        let (id, chance) = (record.id, record.encounter_chance);
        if rng.percent() < chance {
            return Some(GrudgeRoll::Revenge(record.clone()));
        }
        self.escalate(id, step)
            .map(|chance| GrudgeRoll::Escalated { id, chance })
    }

    /// Lifts chances below `floor` back to it, repairing stale records.
    pub fn normalize(&mut self, floor: f64) {
        for record in &mut self.records {
            if record.encounter_chance.is_nan() || record.encounter_chance < floor {
                record.encounter_chance = floor;
            }
        }
    }

    /// Next unused id: past the counter and past every stored record.
    fn next_id(&self) -> u64 {
        let past_records = self
            .records
            .iter()
            .map(|record| record.id + 1)
            .max()
            .unwrap_or(1);
        self.next_id.max(past_records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CombatRules;
    use crate::rng::ScriptedRng;

    fn ledger_with(enemy_types: &[&str]) -> GrudgeLedger {
        let mut ledger = GrudgeLedger::new();
        for (gold, enemy_type) in enemy_types.iter().enumerate() {
            ledger.record(
                *enemy_type,
                gold as u32 * 10,
                Vec::new(),
                Utc::now(),
                CombatRules::GRUDGE_BASE_CHANCE,
            );
        }
        ledger
    }

    #[test]
    fn misses_escalate_linearly() {
        let mut ledger = ledger_with(&["Goblin"]);
        let mut rng = ScriptedRng::constant(0.99);
        for misses in 1..=5 {
            let roll = ledger.roll("Goblin", CombatRules::GRUDGE_ESCALATION, &mut rng);
            let expected = 1.5 + 1.5 * f64::from(misses);
            assert_eq!(roll, Some(GrudgeRoll::Escalated { id: 1, chance: expected }));
        }
        assert_eq!(ledger.records()[0].encounter_chance, 9.0);
    }

    #[test]
    fn roll_below_chance_is_a_match_without_escalation() {
        let mut ledger = ledger_with(&["Goblin"]);
        // 1.0 < 1.5
        let mut rng = ScriptedRng::constant(0.01);
        let roll = ledger.roll("Goblin", 1.5, &mut rng);
        assert!(matches!(roll, Some(GrudgeRoll::Revenge(ref record)) if record.id == 1));
        assert_eq!(ledger.records()[0].encounter_chance, 1.5);
    }

    #[test]
    fn duplicates_are_independent_and_oldest_wins() {
        let mut ledger = ledger_with(&["Goblin", "Wolf", "Goblin"]);
        assert_eq!(ledger.find_oldest("Goblin").map(|record| record.id), Some(1));

        ledger.roll("Goblin", 1.5, &mut ScriptedRng::constant(0.99));
        assert_eq!(ledger.get(1).map(|record| record.encounter_chance), Some(3.0));
        assert_eq!(ledger.get(3).map(|record| record.encounter_chance), Some(1.5));

        assert!(ledger.remove(1).is_some());
        assert!(ledger.remove(1).is_none());
        assert_eq!(ledger.find_oldest("Goblin").map(|record| record.id), Some(3));
    }

    #[test]
    fn enemy_type_must_match_exactly() {
        let mut ledger = ledger_with(&["Goblin"]);
        assert!(ledger.find_oldest("goblin").is_none());
        assert!(ledger.roll("Goblin Chief", 1.5, &mut ScriptedRng::constant(0.0)).is_none());
    }

    #[test]
    fn ids_keep_increasing_after_removal() {
        let mut ledger = ledger_with(&["Goblin", "Wolf"]);
        ledger.remove(1);
        let id = ledger
            .record("Bat", 0, Vec::new(), Utc::now(), 1.5)
            .id;
        assert_eq!(id, 3);
    }

    #[test]
    fn settled_newest_id_is_not_reused() {
        let mut ledger = ledger_with(&["Goblin", "Wolf"]);
        assert!(ledger.remove(2).is_some());
        let id = ledger
            .record("Goblin", 5, Vec::new(), Utc::now(), 1.5)
            .id;
        assert_eq!(id, 3);
        assert!(ledger.get(2).is_none());
    }

    #[test]
    fn normalize_restores_the_floor() {
        let mut ledger = ledger_with(&["Goblin"]);
        ledger.records[0].encounter_chance = -4.0;
        ledger.normalize(CombatRules::GRUDGE_BASE_CHANCE);
        assert_eq!(ledger.records()[0].encounter_chance, 1.5);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn persisted_shape_is_a_camel_case_array() {
        use crate::combatant::{Item, ItemCategory};

        let mut ledger = GrudgeLedger::new();
        ledger.record(
            "Goblin",
            40,
            vec![LostItem {
                item: Item::new("Health Potion", ItemCategory::Consumable),
                equipped: false,
                slot: None,
            }],
            Utc::now(),
            1.5,
        );
        let json = serde_json::to_value(&ledger).unwrap();
        assert_eq!(json["nextId"], 2);
        let first = &json["records"][0];
        assert_eq!(first["enemyType"], "Goblin");
        assert_eq!(first["encounterChance"], 1.5);
        assert_eq!(first["items"][0]["name"], "Health Potion");
        assert_eq!(first["items"][0]["equipped"], false);

        let back: GrudgeLedger = serde_json::from_value(json).unwrap();
        assert_eq!(back, ledger);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn counter_survives_a_reload_after_settling() {
        let mut ledger = ledger_with(&["Goblin", "Wolf"]);
        ledger.remove(2);
        let json = serde_json::to_string(&ledger).unwrap();

        let mut reloaded: GrudgeLedger = serde_json::from_str(&json).unwrap();
        let id = reloaded
            .record("Wolf", 1, Vec::new(), Utc::now(), 1.5)
            .id;
        assert_eq!(id, 3);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn bare_record_arrays_still_load() {
        let records = ledger_with(&["Goblin", "Wolf"]).records().to_vec();
        let json = serde_json::to_string(&records).unwrap();

        let mut ledger: GrudgeLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(ledger.records(), records.as_slice());
        let id = ledger
            .record("Bat", 0, Vec::new(), Utc::now(), 1.5)
            .id;
        assert_eq!(id, 3);
    }
}
