//! Per-encounter statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterStats {
    /// Damage dealt by the party.
    pub damage_dealt: u64,
    /// Damage taken by the party.
    pub damage_taken: u64,
    pub turns_taken: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl EncounterStats {
    pub fn started(at: DateTime<Utc>) -> Self {
        Self {
            started_at: Some(at),
            ..Self::default()
        }
    }

    /// Encounter length in milliseconds, once it has ended.
    pub fn duration_ms(&self) -> Option<u64> {
        let elapsed = self.ended_at? - self.started_at?;
        u64::try_from(elapsed.num_milliseconds()).ok()
    }
}
