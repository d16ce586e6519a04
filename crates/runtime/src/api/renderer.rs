//! Asynchronous abstraction over the presentation surface.
//!
//! The session drives a [`Renderer`] but never depends on how it draws.
//! The one call whose timing matters is
//! [`Renderer::play_defeat_animation`]: victory is not evaluated until every
//! returned [`DefeatSignal`] has completed.
use std::time::Duration;

use async_trait::async_trait;
use gauntlet_core::{Combatant, CombatantId};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// Presentation pose of a combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Pose {
    Idle,
    Ready,
    Attacking,
    Hurt,
    Defeated,
}

/// What a floating number represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumberKind {
    Damage,
    Healing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloatingNumber {
    pub target: CombatantId,
    pub amount: u32,
    pub kind: NumberKind,
}

/// Completion handle for a defeat animation.
///
/// Created in pairs with a [`DefeatNotifier`] by [`DefeatSignal::channel`].
#[derive(Debug)]
pub struct DefeatSignal {
    rx: Option<oneshot::Receiver<()>>,
}

/// Sending half of a [`DefeatSignal`], held by the renderer.
#[derive(Debug)]
pub struct DefeatNotifier {
    tx: oneshot::Sender<()>,
}

impl DefeatSignal {
    pub fn channel() -> (DefeatNotifier, DefeatSignal) {
        let (tx, rx) = oneshot::channel();
        (DefeatNotifier { tx }, DefeatSignal { rx: Some(rx) })
    }

    /// A signal that is already complete.
    pub fn completed() -> Self {
        Self { rx: None }
    }

    /// Waits for the animation to finish.
    ///
    /// Returns `false` when the notifier was dropped without completing;
    /// callers treat that as finished too.
    pub async fn wait(self) -> bool {
        match self.rx {
            Some(rx) => rx.await.is_ok(),
            None => true,
        }
    }
}

impl DefeatNotifier {
    pub fn complete(self) {
        // receiver gone means nobody is waiting any more
        let _ = self.tx.send(());
    }
}

/// Presentation surface driven by the session.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Places an enemy on screen at encounter start.
    async fn add_enemy(&self, enemy: &Combatant);

    async fn set_pose(&self, combatant: CombatantId, pose: Pose);

    async fn update_health(&self, combatant: CombatantId, hp: u32, max_hp: u32);

    /// Starts a defeat animation lasting roughly `duration`.
    async fn play_defeat_animation(
        &self,
        combatant: CombatantId,
        duration: Duration,
    ) -> DefeatSignal;

    async fn show_floating_number(&self, number: FloatingNumber);
}

/// Renderer that draws nothing and completes every animation immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

#[async_trait]
impl Renderer for NullRenderer {
    async fn add_enemy(&self, _enemy: &Combatant) {}

    async fn set_pose(&self, _combatant: CombatantId, _pose: Pose) {}

    async fn update_health(&self, _combatant: CombatantId, _hp: u32, _max_hp: u32) {}

    async fn play_defeat_animation(
        &self,
        _combatant: CombatantId,
        _duration: Duration,
    ) -> DefeatSignal {
        DefeatSignal::completed()
    }

    async fn show_floating_number(&self, _number: FloatingNumber) {}
}
