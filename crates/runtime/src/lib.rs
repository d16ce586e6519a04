//! Async orchestration for turn-based combat encounters.
//!
//! This crate wires the deterministic rules of `gauntlet-core` to the outside
//! world: persistence, presentation, and event streams. Consumers build a
//! [`CombatSession`], start an [`Encounter`], and answer the
//! [`SessionStatus`] each call returns.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the encounter state machine and its builder
//! - [`services`] holds loot/grudge bookkeeping and revival penalties
//! - [`api`] exposes the error type and the renderer contract
//! - [`events`] provides topic-based event bus for narrative and combat events
//! - [`repository`] provides the key/value persistence contract and adapters
pub mod api;
pub mod config;
pub mod events;
pub mod repository;
pub mod services;
pub mod session;

pub use api::{
    DefeatNotifier, DefeatSignal, FloatingNumber, NullRenderer, NumberKind, Pose, Renderer,
    Result, SessionError,
};
pub use config::SessionConfig;
pub use events::{CombatEvent, EncounterOutcome, Event, EventBus, NarrativeEvent, Topic};
pub use repository::{
    CharacterRepository, FileStore, GrudgeStore, InMemoryStore, JsonStoreExt, KeyValueStore,
    LootStaging, RepositoryError,
};
pub use services::{DeathResolver, LootEngine, RevivalOutcome};
pub use session::{
    CombatSession, CombatSessionBuilder, Encounter, EncounterStats, Resolution, Roster,
    SessionPhase, SessionStatus,
};
