//! Items, equipment slots, and loss priority.

use std::collections::BTreeMap;

use crate::dice::Formula;

/// Broad item classification used by action derivation and loss priority.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
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
pub enum ItemCategory {
    Consumable,
    Accessory,
    Shield,
    Weapon,
    Armor,
    #[default]
    Misc,
}

/// Equipment slot an item can occupy.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EquipSlot {
    MainHand,
    OffHand,
    Armor,
    Head,
    Accessory,
}

/// An inventory or equipped item.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: ItemCategory,
    /// Damage formula when wielded (weapons).
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub damage: Option<Formula>,
    /// Healing formula when consumed.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub heal: Option<Formula>,
}

impl Item {
    pub fn new(name: impl Into<String>, category: ItemCategory) -> Self {
        Self {
            name: name.into(),
            category,
            damage: None,
            heal: None,
        }
    }

    pub fn weapon(name: impl Into<String>, damage: impl Into<Formula>) -> Self {
        Self {
            damage: Some(damage.into()),
            ..Self::new(name, ItemCategory::Weapon)
        }
    }

    pub fn consumable(name: impl Into<String>, heal: impl Into<Formula>) -> Self {
        Self {
            heal: Some(heal.into()),
            ..Self::new(name, ItemCategory::Consumable)
        }
    }

    /// True for potions, salves, and anything else that restores health.
    pub fn is_restorative(&self) -> bool {
        const HEALING_WORDS: [&str; 6] = ["potion", "heal", "elixir", "salve", "tonic", "bandage"];
        if self.category == ItemCategory::Consumable || self.heal.is_some() {
            return true;
        }
        let name = self.name.to_ascii_lowercase();
        HEALING_WORDS.iter().any(|word| name.contains(word))
    }

    /// Loss priority: lower values are taken first by revival penalties.
    ///
    /// | priority | items |
    /// |---|---|
    /// | 1 | consumables, healing-named items |
    /// | 2 | accessories and unclassified trinkets |
    /// | 3 | off-hand items, shields |
    /// | 4 | weapons, body and head armor |
    pub fn loss_priority(&self, slot: Option<EquipSlot>) -> u8 {
        if self.is_restorative() {
            return 1;
        }
        match (slot, self.category) {
            (Some(EquipSlot::OffHand), _) | (_, ItemCategory::Shield) => 3,
            (Some(EquipSlot::MainHand | EquipSlot::Armor | EquipSlot::Head), _)
            | (_, ItemCategory::Weapon | ItemCategory::Armor) => 4,
            _ => 2,
        }
    }
}

/// Items currently worn or wielded, keyed by slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Equipment {
    slots: BTreeMap<EquipSlot, Item>,
}

impl Equipment {
    /// Creates empty equipment.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Equips an item, returning the item previously in that slot.
    pub fn equip(&mut self, slot: EquipSlot, item: Item) -> Option<Item> {
        self.slots.insert(slot, item)
    }

    /// Removes and returns the item in a slot.
    pub fn unequip(&mut self, slot: EquipSlot) -> Option<Item> {
        self.slots.remove(&slot)
    }

    pub fn get(&self, slot: EquipSlot) -> Option<&Item> {
        self.slots.get(&slot)
    }

    /// Equipped items in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (EquipSlot, &Item)> {
        self.slots.iter().map(|(slot, item)| (*slot, item))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Builder-style equip.
    #[must_use]
    pub fn with(mut self, slot: EquipSlot, item: Item) -> Self {
        self.equip(slot, item);
        self
    }
}
