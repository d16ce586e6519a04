//! Public session API surface.
//!
//! Types consumers implement or match on: the error type and the renderer
//! contract.

pub mod errors;
pub mod renderer;

pub use errors::{Result, SessionError};
pub use renderer::{
    DefeatNotifier, DefeatSignal, FloatingNumber, NullRenderer, NumberKind, Pose, Renderer,
};
