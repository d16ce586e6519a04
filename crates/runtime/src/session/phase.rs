//! Session lifecycle phases.

use serde::{Deserialize, Serialize};

/// Where a [`CombatSession`](super::CombatSession) is in its lifecycle.
///
/// ```text
/// Idle -> Active -> VictoryPending -> Resolved
///            ^  \
///            |   -> DefeatPending --(revenge)--> Active
///            |                   \--(retreat / stay dead)--> Resolved
///            +---------------- start() from Resolved
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
#[strum(serialize_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Idle,
    Active,
    VictoryPending,
    DefeatPending,
    Resolved,
}

impl SessionPhase {
    /// Phases from which a new encounter may start.
    pub fn can_start(self) -> bool {
        matches!(self, Self::Idle | Self::Resolved)
    }
}
