//! Event types for different topics.

use gauntlet_core::{CombatantId, DeathChoice, Resolution, Side};
use serde::{Deserialize, Serialize};

use crate::session::{EncounterStats, SessionPhase};

/// Story beats worth telling the player about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NarrativeEvent {
    /// A combatant dropped into the rage band for the first time.
    RageTriggered { combatant: CombatantId, name: String },

    /// The start-of-combat grudge roll hit: this is a revenge match.
    RevengeEncounter {
        enemy_type: String,
        grudge_id: u64,
        gold: u32,
        items: Vec<String>,
    },

    /// The grudge roll missed and the grudge's chance grew.
    GrudgeEscalated {
        enemy_type: String,
        grudge_id: u64,
        chance: f64,
    },

    /// A retreat left a new grudge behind.
    GrudgeRecorded {
        enemy_type: String,
        grudge_id: u64,
        gold: u32,
        items: Vec<String>,
    },

    /// A revenge victory won back what was lost.
    RevengeRecovered {
        enemy_type: String,
        gold: u32,
        items: Vec<String>,
    },

    /// The player chose how to handle a defeat.
    RevivalOutcome {
        choice: DeathChoice,
        gold_lost: u32,
        items_lost: Vec<String>,
        revived_hp: Option<u32>,
    },

    /// An action was refused; the same combatant is still up.
    ActionRejected {
        combatant: CombatantId,
        action: String,
        reason: String,
    },

    /// Data was missing or unreadable and a fallback was used.
    MissingData { what: String, fallback: String },
}

/// How an encounter finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum EncounterOutcome {
    Victory,
    Retreated,
    Fallen,
    /// Discarded through `force_end`.
    Abandoned,
}

/// Mechanical combat progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    PhaseChanged {
        from: SessionPhase,
        to: SessionPhase,
    },

    TurnStarted {
        combatant: CombatantId,
        side: Side,
        round: u32,
    },

    ActionResolved {
        attacker: CombatantId,
        target: CombatantId,
        action: String,
        outcome: Resolution,
    },

    CombatantDefeated { combatant: CombatantId, side: Side },

    EncounterEnded {
        outcome: EncounterOutcome,
        stats: EncounterStats,
    },
}
