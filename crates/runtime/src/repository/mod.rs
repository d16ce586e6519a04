//! Repository layer for data that outlives an encounter.
//!
//! Everything is stored as JSON strings behind [`KeyValueStore`]:
//! - `gauntlet.grudges` holds the global grudge ledger
//! - `gauntlet.character.<id>` holds one character sheet
//! - `gauntlet.loot.<id>` holds loot staged for a character

mod characters;
mod error;
mod file;
mod grudges;
mod memory;
mod staging;
mod traits;

pub use characters::CharacterRepository;
pub use error::{RepositoryError, Result};
pub use file::FileStore;
pub use grudges::GrudgeStore;
pub use memory::InMemoryStore;
pub use staging::LootStaging;
pub use traits::{JsonStoreExt, KeyValueStore};
