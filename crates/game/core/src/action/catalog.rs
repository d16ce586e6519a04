//! Action derivation from sheet data.

use super::{Action, ActionError};
use crate::combatant::{Combatant, EquipSlot, Side};
use crate::dice::Formula;

/// Derives the actions a combatant may take this turn.
///
/// Order is stable: wielded weapons (main hand first), then spells, then
/// skills, each in sheet order. Heroes without a damaging weapon get an
/// unarmed strike; enemies only get what their sheet lists.
#[derive(Clone, Copy, Debug, Default)]
pub struct ActionCatalog;

impl ActionCatalog {
    pub const UNARMED_NAME: &'static str = "Unarmed Strike";
    pub const UNARMED_DAMAGE: &'static str = "1d2";

    /// Generic low-damage action for combatants with nothing usable.
    pub const FALLBACK_NAME: &'static str = "Flail";
    pub const FALLBACK_DAMAGE: &'static str = "1d2";

    const WEAPON_SLOTS: [EquipSlot; 2] = [EquipSlot::MainHand, EquipSlot::OffHand];

    /// Every action listed on the combatant's sheet.
    pub fn for_combatant(combatant: &Combatant) -> Vec<Action> {
        let mut actions: Vec<Action> = Self::WEAPON_SLOTS
            .iter()
            .filter_map(|slot| combatant.equipment.get(*slot))
            .filter_map(|item| {
                item.damage.as_ref().map(|damage| Action::Weapon {
                    name: item.name.clone(),
                    damage: damage.clone(),
                })
            })
            .collect();

        if actions.is_empty() && combatant.side == Side::Player {
            actions.push(Action::Weapon {
                name: Self::UNARMED_NAME.to_string(),
                damage: Formula::from(Self::UNARMED_DAMAGE),
            });
        }

        actions.extend(combatant.spells.iter().map(|spell| Action::Spell {
            name: spell.name.clone(),
            damage: spell.damage.clone(),
            heal: spell.heal.clone(),
            mp_cost: spell.mp_cost,
            element: spell.element,
        }));

        actions.extend(combatant.skills.iter().map(|skill| Action::Skill {
            name: skill.name.clone(),
            damage: skill.damage.clone(),
            heal: skill.heal.clone(),
        }));

        actions
    }

    /// Actions the combatant can pay for right now.
    pub fn affordable(combatant: &Combatant) -> Vec<Action> {
        Self::for_combatant(combatant)
            .into_iter()
            .filter(|action| combatant.can_afford(action.mp_cost()))
            .collect()
    }

    /// Looks up an action by name (case-insensitive).
    pub fn find(combatant: &Combatant, name: &str) -> Result<Action, ActionError> {
        Self::for_combatant(combatant)
            .into_iter()
            .find(|action| action.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| ActionError::NotAvailable {
                actor: combatant.id,
                name: name.to_string(),
            })
    }

    pub fn fallback() -> Action {
        Action::Skill {
            name: Self::FALLBACK_NAME.to_string(),
            damage: Some(Formula::from(Self::FALLBACK_DAMAGE)),
            heal: None,
        }
    }
}
