//! Plain-text presentation on stdout.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use gauntlet_core::{CharacterSheet, Combatant, CombatantId};
use gauntlet_runtime::{
    DefeatSignal, Event, FloatingNumber, NarrativeEvent, NumberKind, Pose, Renderer,
};
use tokio::sync::broadcast::{self, error::TryRecvError};

/// Renderer that narrates combat as lines of text.
///
/// Defeat "animations" are a pause of the requested length.
#[derive(Default)]
pub struct TerminalRenderer {
    names: Mutex<HashMap<CombatantId, String>>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names party members by roster position (party ids come first).
    pub fn register_party(&self, party: &[CharacterSheet]) {
        let mut names = self.lock();
        names.clear();
        for (index, member) in party.iter().enumerate() {
            names.insert(CombatantId(index as u32), member.name.clone());
        }
    }

    pub fn name_of(&self, id: CombatantId) -> String {
        self.lock()
            .get(&id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<CombatantId, String>> {
        self.names
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Renderer for TerminalRenderer {
    async fn add_enemy(&self, enemy: &Combatant) {
        self.lock().insert(enemy.id, enemy.name.clone());
        println!(
            "A {} steps forward: {} ({} HP)",
            enemy.kind,
            enemy.name,
            enemy.max_hp()
        );
    }

    async fn set_pose(&self, combatant: CombatantId, pose: Pose) {
        match pose {
            Pose::Attacking => println!("{} attacks!", self.name_of(combatant)),
            Pose::Defeated => println!("{} falls.", self.name_of(combatant)),
            Pose::Idle | Pose::Ready | Pose::Hurt => {}
        }
    }

    async fn update_health(&self, combatant: CombatantId, hp: u32, max_hp: u32) {
        println!("  [{} {}]", self.name_of(combatant), health_bar(hp, max_hp));
    }

    async fn play_defeat_animation(&self, _combatant: CombatantId, duration: Duration) -> DefeatSignal {
        let (notifier, signal) = DefeatSignal::channel();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            notifier.complete();
        });
        signal
    }

    async fn show_floating_number(&self, number: FloatingNumber) {
        let name = self.name_of(number.target);
        match number.kind {
            NumberKind::Damage => println!("  {} takes {} damage", name, number.amount),
            NumberKind::Healing => println!("  {} recovers {} HP", name, number.amount),
        }
    }
}

/// `hp/max` followed by a ten-cell bar.
pub fn health_bar(hp: u32, max_hp: u32) -> String {
    const CELLS: u32 = 10;
    let filled = if max_hp == 0 {
        0
    } else {
        (u64::from(hp.min(max_hp)) * u64::from(CELLS)).div_ceil(u64::from(max_hp)) as u32
    };
    format!(
        "{}/{} {}{}",
        hp,
        max_hp,
        "#".repeat(filled as usize),
        ".".repeat((CELLS - filled) as usize)
    )
}

/// Buffered narrative events, printed between session calls.
pub struct NarrativeLog {
    rx: broadcast::Receiver<Event>,
}

impl NarrativeLog {
    pub fn new(rx: broadcast::Receiver<Event>) -> Self {
        Self { rx }
    }

    /// Prints every narrative event received since the last flush.
    pub fn flush(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(Event::Narrative(event)) => println!("{}", describe(&event)),
                Ok(_) => {}
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!("Narrative log skipped {} events", skipped);
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }
}

pub fn describe(event: &NarrativeEvent) -> String {
    match event {
        NarrativeEvent::RageTriggered { name, .. } => format!("{} flies into a rage!", name),
        NarrativeEvent::RevengeEncounter {
            enemy_type,
            gold,
            items,
            ..
        } => format!(
            "This {} still carries what it took from you: {}.",
            enemy_type,
            spoils(*gold, items)
        ),
        NarrativeEvent::GrudgeEscalated {
            enemy_type, chance, ..
        } => format!(
            "Somewhere, a {} remembers you ({:.1}% chance to meet it).",
            enemy_type, chance
        ),
        NarrativeEvent::GrudgeRecorded {
            enemy_type,
            gold,
            items,
            ..
        } => format!(
            "The {} keeps {}. Beat one to get it back.",
            enemy_type,
            spoils(*gold, items)
        ),
        NarrativeEvent::RevengeRecovered {
            enemy_type,
            gold,
            items,
        } => format!(
            "Revenge! You take back {} from the {}.",
            spoils(*gold, items),
            enemy_type
        ),
        NarrativeEvent::RevivalOutcome {
            choice,
            gold_lost,
            items_lost,
            revived_hp,
        } => match revived_hp {
            Some(hp) => format!(
                "You chose {} and rise with {} HP, losing {}.",
                choice,
                hp,
                spoils(*gold_lost, items_lost)
            ),
            None => "You stay dead.".to_string(),
        },
        NarrativeEvent::ActionRejected { action, reason, .. } => {
            format!("Cannot use {}: {}", action, reason)
        }
        NarrativeEvent::MissingData { what, fallback } => {
            format!("({} unavailable, using {})", what, fallback)
        }
    }
}

fn spoils(gold: u32, items: &[String]) -> String {
    if items.is_empty() {
        format!("{} gold", gold)
    } else {
        format!("{} gold and {}", gold, items.join(", "))
    }
}
