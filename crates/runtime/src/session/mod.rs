//! Combat session orchestration.
//!
//! [`CombatSession`] owns the combatants of one encounter and moves it
//! through its [`SessionPhase`]s. Decisions that belong to the player (which
//! action to take, how to handle a defeat) are handed back to the caller as
//! a [`SessionStatus`].

mod combat;
mod phase;
mod roster;
mod stats;

pub use combat::{CombatSession, CombatSessionBuilder};
pub use phase::SessionPhase;
pub use roster::Roster;
pub use stats::EncounterStats;

use gauntlet_core::{Action, CharacterSheet, CombatantId, GrudgeRecord, LootBundle, Penalty};

/// Participants of one encounter.
#[derive(Debug, Clone, Default)]
pub struct Encounter {
    pub party: Vec<CharacterSheet>,
    pub enemies: Vec<CharacterSheet>,
}

impl Encounter {
    pub fn new(party: Vec<CharacterSheet>, enemies: Vec<CharacterSheet>) -> Self {
        Self { party, enemies }
    }

    /// A single hero against `enemies`.
    pub fn solo(hero: CharacterSheet, enemies: Vec<CharacterSheet>) -> Self {
        Self::new(vec![hero], enemies)
    }
}

/// How a finished encounter ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Every enemy fell. `loot` already includes anything `recovered` from a
    /// settled grudge and has been staged for the lead player.
    Victory {
        loot: LootBundle,
        recovered: Option<LootBundle>,
        stats: EncounterStats,
    },
    /// The party fell and retreated to the overworld.
    Retreated {
        penalty: Penalty,
        grudge: Option<GrudgeRecord>,
    },
    /// The party fell and stayed dead; back to character selection.
    Fallen,
}

/// What the session is waiting for after an operation returns.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionStatus {
    /// No encounter is running.
    Idle,
    /// A player must pick one of `actions`.
    AwaitingPlayer {
        combatant: CombatantId,
        actions: Vec<Action>,
    },
    /// The party fell; a [`DeathChoice`](gauntlet_core::DeathChoice) is needed.
    AwaitingRevival { fallen: CombatantId },
    Resolved(Resolution),
}
