//! Revival paths and the penalties they cost.
//!
//! When every hero falls the player picks a [`DeathChoice`]. The two revival
//! paths take a share of gold and a number of items, cheapest items first;
//! staying dead computes no penalty at all.

use crate::combatant::{Combatant, EquipSlot, Equipment, Item};
use crate::config::CombatRules;
use crate::rng::RandomSource;

/// Decision offered while a defeat is pending.
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
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum DeathChoice {
    /// Resume the current fight with a lighter penalty.
    Revenge,
    /// Leave for the overworld with a heavier penalty; the enemy keeps a grudge.
    Retreat,
    /// End the character session without a penalty.
    StayDead,
}

impl DeathChoice {
    /// The revival path behind this choice, if it revives at all.
    pub fn revival_path(self) -> Option<RevivalPath> {
        match self {
            Self::Revenge => Some(RevivalPath::Revenge),
            Self::Retreat => Some(RevivalPath::Retreat),
            Self::StayDead => None,
        }
    }
}

/// A choice that brings the fallen hero back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[strum(serialize_all = "camelCase")]
pub enum RevivalPath {
    Revenge,
    Retreat,
}

impl RevivalPath {
    /// Gold taken: half for revenge, two thirds for retreat (rounded down).
    pub fn gold_loss(self, current_gold: u32) -> u32 {
        let gold = u64::from(current_gold);
        let loss = match self {
            Self::Revenge => gold / 2,
            Self::Retreat => gold * 2 / 3,
        };
        loss as u32
    }

    pub fn item_count(self) -> usize {
        match self {
            Self::Revenge => CombatRules::REVENGE_ITEM_LOSS,
            Self::Retreat => CombatRules::RETREAT_ITEM_LOSS,
        }
    }
}

/// An item taken from the player, remembering where it was carried.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LostItem {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub item: Item,
    pub equipped: bool,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub slot: Option<EquipSlot>,
}

impl LostItem {
    pub fn name(&self) -> &str {
        &self.item.name
    }

    fn priority(&self) -> u8 {
        self.item.loss_priority(self.slot)
    }
}

/// Gold and items a revival costs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Penalty {
    pub gold_loss: u32,
    pub items: Vec<LostItem>,
}

/// Computes the penalty for a revival path.
///
/// Candidates are every inventory item plus every equipped item, sorted by
/// [`Item::loss_priority`] with a random tie-break; the first
/// [`RevivalPath::item_count`] are taken. Fewer candidates is not an error.
pub fn compute_penalty(
    path: RevivalPath,
    current_gold: u32,
    inventory: &[Item],
    equipment: &Equipment,
    rng: &mut dyn RandomSource,
) -> Penalty {
    let candidates = inventory
        .iter()
        .map(|item| LostItem {
            item: item.clone(),
            equipped: false,
            slot: None,
        })
        .chain(equipment.iter().map(|(slot, item)| LostItem {
            item: item.clone(),
            equipped: true,
            slot: Some(slot),
        }));

    let mut ranked: Vec<(u8, f64, LostItem)> = candidates
        .map(|lost| (lost.priority(), rng.next_f64(), lost))
        .collect();
    ranked.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));

    Penalty {
        gold_loss: path.gold_loss(current_gold),
        items: ranked
            .into_iter()
            .take(path.item_count())
            .map(|(_, _, lost)| lost)
            .collect(),
    }
}

/// Removes the penalty's gold and items from a combatant.
///
/// Returns the penalty actually applied: items no longer carried (already
/// sold, moved) are dropped from the result.
pub fn apply_penalty(combatant: &mut Combatant, penalty: &Penalty) -> Penalty {
    let gold_loss = combatant.take_gold(penalty.gold_loss);
    let items = penalty
        .items
        .iter()
        .filter_map(|lost| {
            let removed = match lost.slot {
                Some(slot) if lost.equipped => combatant
                    .equipment
                    .get(slot)
                    .filter(|item| item.name == lost.item.name)
                    .is_some()
                    .then(|| combatant.equipment.unequip(slot))
                    .flatten(),
                _ => combatant.take_inventory_item(&lost.item.name),
            };
            removed.map(|item| LostItem {
                item,
                equipped: lost.equipped,
                slot: lost.slot,
            })
        })
        .collect();
    Penalty { gold_loss, items }
}

/// HP a revived hero comes back with: half of max, at least 1.
pub fn revival_hp(max_hp: u32) -> u32 {
    (max_hp / 2).max(1)
}
