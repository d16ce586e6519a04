//! Unified error types surfaced by the session API.
//!
//! Wraps rule violations from the core, repository failures, and illegal
//! state-machine calls so clients can bubble them up with consistent context.

use gauntlet_core::{ActionError, CombatantId, ErrorSeverity, GameError, Side, TurnError};
use thiserror::Error;

use crate::session::SessionPhase;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The operation is not legal in the current phase. State is untouched.
    #[error("cannot {operation} while the session is {phase}")]
    InvalidTransition {
        operation: &'static str,
        phase: SessionPhase,
    },

    #[error("an encounter needs at least one {side} combatant")]
    EmptySide { side: Side },

    #[error("no combatant {0} in this encounter")]
    UnknownCombatant(CombatantId),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Turn(#[from] TurnError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl GameError for SessionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Action(error) => error.severity(),
            Self::InvalidTransition { .. } | Self::EmptySide { .. } | Self::UnknownCombatant(_) => {
                ErrorSeverity::Validation
            }
            Self::Turn(_) | Self::Repository(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "SESSION_INVALID_TRANSITION",
            Self::EmptySide { .. } => "SESSION_EMPTY_SIDE",
            Self::UnknownCombatant(_) => "SESSION_UNKNOWN_COMBATANT",
            Self::Action(error) => error.error_code(),
            Self::Turn(_) => "SESSION_NO_ACTIVE_COMBATANTS",
            Self::Repository(_) => "SESSION_REPOSITORY",
        }
    }
}
