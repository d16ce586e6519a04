//! Topic-based event bus for encounter events.
//!
//! Events are published to a topic and consumers subscribe only to the
//! topics they need: a narrative log listens to [`Topic::Narrative`], a
//! renderer or recorder to [`Topic::Combat`].

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{CombatEvent, EncounterOutcome, NarrativeEvent};
