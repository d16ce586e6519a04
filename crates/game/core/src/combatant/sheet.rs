//! Persisted character record.
//!
//! A [`CharacterSheet`] is the long-lived shape stored under a character key;
//! a [`Combatant`](super::Combatant) is the live view of it for one encounter.

use super::item::{Equipment, Item};
use crate::dice::Formula;

/// The six classic ability scores.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityScores {
    #[cfg_attr(feature = "serde", serde(rename = "str"))]
    pub strength: i32,
    #[cfg_attr(feature = "serde", serde(rename = "dex"))]
    pub dexterity: i32,
    #[cfg_attr(feature = "serde", serde(rename = "con"))]
    pub constitution: i32,
    #[cfg_attr(feature = "serde", serde(rename = "int"))]
    pub intelligence: i32,
    #[cfg_attr(feature = "serde", serde(rename = "wis"))]
    pub wisdom: i32,
    #[cfg_attr(feature = "serde", serde(rename = "cha"))]
    pub charisma: i32,
}

impl AbilityScores {
    pub const AVERAGE: i32 = 10;

    /// Standard modifier: `floor((score - 10) / 2)`.
    pub fn modifier(score: i32) -> i32 {
        (score - Self::AVERAGE).div_euclid(2)
    }

    pub fn dex_modifier(&self) -> i32 {
        Self::modifier(self.dexterity)
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self {
            strength: Self::AVERAGE,
            dexterity: Self::AVERAGE,
            constitution: Self::AVERAGE,
            intelligence: Self::AVERAGE,
            wisdom: Self::AVERAGE,
            charisma: Self::AVERAGE,
        }
    }
}

/// Magical element of a spell (presentation only).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Element {
    Fire,
    Cold,
    Lightning,
    Poison,
    Radiant,
    Necrotic,
    Arcane,
}

/// Spell known by a character.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SpellEntry {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub damage: Option<Formula>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub heal: Option<Formula>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mp_cost: u32,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub element: Option<Element>,
}

impl SpellEntry {
    pub fn damage(name: impl Into<String>, damage: impl Into<Formula>, mp_cost: u32) -> Self {
        Self {
            name: name.into(),
            damage: Some(damage.into()),
            heal: None,
            mp_cost,
            element: None,
        }
    }

    pub fn heal(name: impl Into<String>, heal: impl Into<Formula>, mp_cost: u32) -> Self {
        Self {
            name: name.into(),
            damage: None,
            heal: Some(heal.into()),
            mp_cost,
            element: None,
        }
    }

    #[must_use]
    pub fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }
}

/// Non-magical technique (enemy attacks, class abilities).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillEntry {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub damage: Option<Formula>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub heal: Option<Formula>,
}

impl SkillEntry {
    pub fn attack(name: impl Into<String>, damage: impl Into<Formula>) -> Self {
        Self {
            name: name.into(),
            damage: Some(damage.into()),
            heal: None,
        }
    }

    pub fn recovery(name: impl Into<String>, heal: impl Into<Formula>) -> Self {
        Self {
            name: name.into(),
            damage: None,
            heal: Some(heal.into()),
        }
    }
}

/// Persisted character (or enemy template) record.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CharacterSheet {
    pub id: String,
    pub name: String,
    /// Class for heroes, creature type for enemies ("Goblin").
    pub kind: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub gold: u32,
    pub hp: u32,
    pub max_hp: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mp: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_mp: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stats: AbilityScores,
    #[cfg_attr(feature = "serde", serde(default))]
    pub equipment: Equipment,
    #[cfg_attr(feature = "serde", serde(default))]
    pub inventory: Vec<Item>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub spells: Vec<SpellEntry>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: Vec<SkillEntry>,
}

impl CharacterSheet {
    /// Creates a sheet at full health with no gear.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: impl Into<String>,
        max_hp: u32,
        max_mp: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: kind.into(),
            gold: 0,
            hp: max_hp,
            max_hp,
            mp: max_mp,
            max_mp,
            stats: AbilityScores::default(),
            equipment: Equipment::default(),
            inventory: Vec::new(),
            spells: Vec::new(),
            skills: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_gold(mut self, gold: u32) -> Self {
        self.gold = gold;
        self
    }

    #[must_use]
    pub fn with_stats(mut self, stats: AbilityScores) -> Self {
        self.stats = stats;
        self
    }

    #[must_use]
    pub fn with_equipment(mut self, equipment: Equipment) -> Self {
        self.equipment = equipment;
        self
    }

    #[must_use]
    pub fn with_item(mut self, item: Item) -> Self {
        self.inventory.push(item);
        self
    }

    #[must_use]
    pub fn with_spell(mut self, spell: SpellEntry) -> Self {
        self.spells.push(spell);
        self
    }

    #[must_use]
    pub fn with_skill(mut self, skill: SkillEntry) -> Self {
        self.skills.push(skill);
        self
    }

    /// Forces hp/mp into `0..=max`, repairing hand-edited or stale records.
    pub fn normalize(&mut self) {
        self.hp = self.hp.min(self.max_hp);
        self.mp = self.mp.min(self.max_mp);
    }
}
