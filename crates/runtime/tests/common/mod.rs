//! Shared fixtures for session integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use gauntlet_core::{
    CharacterSheet, Combatant, CombatantId, EquipSlot, Equipment, Item, RandomSource, SkillEntry,
    SpellEntry,
};
use gauntlet_runtime::{
    CombatSession, DefeatSignal, FloatingNumber, KeyValueStore, Pose, Renderer, RepositoryError,
    SessionConfig,
};

/// Hero that kills anything with one swing.
pub fn hero() -> CharacterSheet {
    CharacterSheet::new("hero", "Aria", "Fighter", 20, 5)
        .with_gold(30)
        .with_equipment(
            Equipment::empty().with(EquipSlot::MainHand, Item::weapon("Longsword", "100")),
        )
        .with_item(Item::consumable("Health Potion", "2d4+2"))
        .with_spell(SpellEntry::damage("Meteor", "50", 10))
}

/// Hero with 5 of 20 HP and a twig for a weapon.
pub fn weak_hero() -> CharacterSheet {
    let mut sheet = CharacterSheet::new("hero", "Aria", "Fighter", 20, 0)
        .with_gold(30)
        .with_equipment(Equipment::empty().with(EquipSlot::MainHand, Item::weapon("Twig", "1")))
        .with_item(Item::consumable("Health Potion", "2d4+2"));
    sheet.hp = 5;
    sheet
}

/// Goblin whose club always hits for 10.
pub fn goblin(hp: u32) -> CharacterSheet {
    CharacterSheet::new("goblin", "Snik", "Goblin", hp, 0).with_skill(SkillEntry::attack("Club", "10"))
}

pub fn session(store: Arc<dyn KeyValueStore>, rng: impl RandomSource + 'static) -> CombatSession {
    CombatSession::builder()
        .config(SessionConfig::instant())
        .store(store)
        .rng(rng)
        .build()
}

/// Store whose every operation fails.
pub struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get_item(&self, _key: &str) -> Result<Option<String>, RepositoryError> {
        Err(RepositoryError::Io(std::io::Error::other("disk on fire")))
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), RepositoryError> {
        Err(RepositoryError::Io(std::io::Error::other("disk on fire")))
    }

    fn remove_item(&self, _key: &str) -> Result<(), RepositoryError> {
        Err(RepositoryError::Io(std::io::Error::other("disk on fire")))
    }
}

/// How the test renderer finishes defeat animations.
#[derive(Clone, Copy, Debug)]
pub enum DefeatMode {
    /// Complete after the requested duration.
    Timed,
    /// Drop the notifier without completing.
    Dropped,
}

/// Renderer that records calls and plays defeat animations in real time.
pub struct RecordingRenderer {
    pub calls: Mutex<Vec<String>>,
    mode: DefeatMode,
}

impl RecordingRenderer {
    pub fn new(mode: DefeatMode) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            mode,
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Renderer for RecordingRenderer {
    async fn add_enemy(&self, enemy: &Combatant) {
        self.record(format!("add_enemy {}", enemy.name));
    }

    async fn set_pose(&self, combatant: CombatantId, pose: Pose) {
        self.record(format!("pose {combatant} {pose}"));
    }

    async fn update_health(&self, combatant: CombatantId, hp: u32, max_hp: u32) {
        self.record(format!("health {combatant} {hp}/{max_hp}"));
    }

    async fn play_defeat_animation(&self, combatant: CombatantId, duration: Duration) -> DefeatSignal {
        self.record(format!("defeat {combatant}"));
        let (notifier, signal) = DefeatSignal::channel();
        match self.mode {
            DefeatMode::Timed => {
                tokio::spawn(async move {
                    tokio::time::sleep(duration).await;
                    notifier.complete();
                });
            }
            DefeatMode::Dropped => drop(notifier),
        }
        signal
    }

    async fn show_floating_number(&self, number: FloatingNumber) {
        self.record(format!("number {} {}", number.target, number.amount));
    }
}
