//! Action validation errors.

use crate::combatant::CombatantId;
use crate::error::{ErrorSeverity, GameError};

/// Errors that reject an action before any state is mutated.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionError {
    /// Attacker has no HP left.
    #[error("{actor} is defeated and cannot act")]
    ActorDefeated { actor: CombatantId },

    /// Target has no HP left.
    #[error("target {target} is already defeated")]
    TargetDefeated { target: CombatantId },

    /// Attacker and target are the same combatant.
    #[error("{actor} cannot target itself with an attack")]
    SelfTarget { actor: CombatantId },

    /// Not enough MP for a spell.
    #[error("not enough MP: {required} required, {available} available")]
    InsufficientMp { required: u32, available: u32 },

    /// Action name not in the combatant's catalog.
    #[error("action `{name}` is not available to {actor}")]
    NotAvailable { actor: CombatantId, name: String },
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InsufficientMp { .. } => ErrorSeverity::Recoverable,
            Self::ActorDefeated { .. }
            | Self::TargetDefeated { .. }
            | Self::SelfTarget { .. }
            | Self::NotAvailable { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ActorDefeated { .. } => "ACTOR_DEFEATED",
            Self::TargetDefeated { .. } => "TARGET_DEFEATED",
            Self::SelfTarget { .. } => "SELF_TARGET",
            Self::InsufficientMp { .. } => "INSUFFICIENT_MP",
            Self::NotAvailable { .. } => "ACTION_NOT_AVAILABLE",
        }
    }
}
