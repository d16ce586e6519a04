//! Combat actions.
//!
//! Actions are derived from a combatant's sheet every turn by
//! [`ActionCatalog`] and applied by [`ActionResolver`]. They are never
//! persisted on their own.

mod catalog;
mod error;
mod resolve;

pub use catalog::ActionCatalog;
pub use error::ActionError;
pub use resolve::{ActionResolver, Resolution};

use crate::combatant::Element;
use crate::dice::Formula;

/// Discriminant of [`Action`], handy for logging and UI grouping.
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
pub enum ActionKind {
    Weapon,
    Spell,
    Skill,
}

/// A usable combat action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Action {
    Weapon {
        name: String,
        damage: Formula,
    },
    Spell {
        name: String,
        damage: Option<Formula>,
        heal: Option<Formula>,
        mp_cost: u32,
        element: Option<Element>,
    },
    Skill {
        name: String,
        damage: Option<Formula>,
        heal: Option<Formula>,
    },
}

impl Action {
    pub fn name(&self) -> &str {
        match self {
            Self::Weapon { name, .. } | Self::Spell { name, .. } | Self::Skill { name, .. } => {
                name
            }
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Weapon { .. } => ActionKind::Weapon,
            Self::Spell { .. } => ActionKind::Spell,
            Self::Skill { .. } => ActionKind::Skill,
        }
    }

    pub fn damage(&self) -> Option<&Formula> {
        match self {
            Self::Weapon { damage, .. } => Some(damage),
            Self::Spell { damage, .. } | Self::Skill { damage, .. } => damage.as_ref(),
        }
    }

    pub fn heal(&self) -> Option<&Formula> {
        match self {
            Self::Weapon { .. } => None,
            Self::Spell { heal, .. } | Self::Skill { heal, .. } => heal.as_ref(),
        }
    }

    pub fn mp_cost(&self) -> u32 {
        match self {
            Self::Spell { mp_cost, .. } => *mp_cost,
            Self::Weapon { .. } | Self::Skill { .. } => 0,
        }
    }

    /// Actions with no damage formula only affect the caster.
    pub fn is_self_only(&self) -> bool {
        self.damage().is_none()
    }
}
