//! Encounter services used by the session: loot/grudges and revival.

mod death;
mod loot;

pub use death::{DeathResolver, RevivalOutcome};
pub use loot::LootEngine;
