//! Deterministic combat rules shared by the runtime and the client.
//!
//! `gauntlet-core` performs no I/O and never sleeps: it evaluates dice,
//! derives and resolves actions, orders turns, rolls loot, and computes
//! revival penalties. Every random decision flows through
//! [`rng::RandomSource`], so a seeded source replays an encounter exactly.
pub mod action;
pub mod combatant;
pub mod config;
pub mod death;
pub mod dice;
pub mod error;
pub mod loot;
pub mod rng;
pub mod turn;

pub use action::{Action, ActionCatalog, ActionError, ActionKind, ActionResolver, Resolution};
pub use combatant::{
    AbilityScores, CharacterSheet, Combatant, CombatantId, Element, EquipSlot, Equipment, Item,
    ItemCategory, Side, SkillEntry, SpellEntry,
};
pub use config::CombatRules;
pub use death::{DeathChoice, LostItem, Penalty, RevivalPath, apply_penalty, compute_penalty, revival_hp};
pub use dice::{DiceError, DiceExpr, DiceResolver, Formula};
pub use error::{ErrorSeverity, GameError};
pub use loot::{GrudgeLedger, GrudgeRecord, GrudgeRoll, LootBundle, LootTable, generate_loot};
pub use rng::{PcgRng, RandomSource, ScriptedRng};
pub use turn::{TurnError, TurnQueue};
