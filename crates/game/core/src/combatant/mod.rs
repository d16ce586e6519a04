//! Encounter participants.
//!
//! A [`Combatant`] is built from a [`CharacterSheet`] when combat starts and
//! owns the live HP/MP for the encounter. HP and MP are only reachable through
//! clamping mutators, so `0 ≤ hp ≤ max_hp` and `0 ≤ mp ≤ max_mp` hold at all
//! times. Player combatants are written back with [`Combatant::to_sheet`].

mod item;
mod sheet;

pub use item::{EquipSlot, Equipment, Item, ItemCategory};
pub use sheet::{AbilityScores, CharacterSheet, Element, SkillEntry, SpellEntry};

use core::fmt;

/// Session-local identifier of a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId(pub u32);

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which side of the encounter a combatant fights on.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }
}

/// Live participant of one encounter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Combatant {
    pub id: CombatantId,
    /// Id of the sheet this combatant was built from.
    pub sheet_id: String,
    pub name: String,
    /// Class or creature type; enemy kind doubles as the grudge key.
    pub kind: String,
    pub side: Side,
    hp: u32,
    max_hp: u32,
    mp: u32,
    max_mp: u32,
    pub stats: AbilityScores,
    pub gold: u32,
    pub equipment: Equipment,
    pub inventory: Vec<Item>,
    pub spells: Vec<SpellEntry>,
    pub skills: Vec<SkillEntry>,
    /// Set once when hp first drops into the rage band this encounter.
    pub in_rage_mode: bool,
}

impl Combatant {
    /// Builds the live view of a sheet. Out-of-range hp/mp are clamped.
    pub fn from_sheet(id: CombatantId, mut sheet: CharacterSheet, side: Side) -> Self {
        sheet.normalize();
        Self {
            id,
            sheet_id: sheet.id,
            name: sheet.name,
            kind: sheet.kind,
            side,
            hp: sheet.hp,
            max_hp: sheet.max_hp,
            mp: sheet.mp,
            max_mp: sheet.max_mp,
            stats: sheet.stats,
            gold: sheet.gold,
            equipment: sheet.equipment,
            inventory: sheet.inventory,
            spells: sheet.spells,
            skills: sheet.skills,
            in_rage_mode: false,
        }
    }

    /// Snapshot suitable for persistence.
    pub fn to_sheet(&self) -> CharacterSheet {
        CharacterSheet {
            id: self.sheet_id.clone(),
            name: self.name.clone(),
            kind: self.kind.clone(),
            gold: self.gold,
            hp: self.hp,
            max_hp: self.max_hp,
            mp: self.mp,
            max_mp: self.max_mp,
            stats: self.stats,
            equipment: self.equipment.clone(),
            inventory: self.inventory.clone(),
            spells: self.spells.clone(),
            skills: self.skills.clone(),
        }
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn mp(&self) -> u32 {
        self.mp
    }

    pub fn max_mp(&self) -> u32 {
        self.max_mp
    }

    pub fn is_player(&self) -> bool {
        self.side == Side::Player
    }

    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Current HP as a fraction of max HP (0.0 for a zero max).
    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp == 0 {
            return 0.0;
        }
        f64::from(self.hp) / f64::from(self.max_hp)
    }

    /// Applies damage, returning the HP actually removed.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = self.hp.saturating_sub(amount);
        before - self.hp
    }

    /// Restores HP up to max, returning the HP actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
        self.hp - before
    }

    /// Sets HP directly (clamped), used by revival.
    pub fn set_hp(&mut self, hp: u32) {
        self.hp = hp.min(self.max_hp);
    }

    pub fn can_afford(&self, mp_cost: u32) -> bool {
        self.mp >= mp_cost
    }

    /// Deducts MP. Callers check [`can_afford`](Self::can_afford) first;
    /// an unaffordable cost drains MP to zero rather than underflowing.
    pub fn spend_mp(&mut self, mp_cost: u32) {
        self.mp = self.mp.saturating_sub(mp_cost);
    }

    /// Removes the first inventory item with the given name.
    pub fn take_inventory_item(&mut self, name: &str) -> Option<Item> {
        let index = self.inventory.iter().position(|item| item.name == name)?;
        Some(self.inventory.remove(index))
    }

    /// Removes gold, returning the amount actually removed.
    pub fn take_gold(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.gold);
        self.gold -= taken;
        taken
    }
}
