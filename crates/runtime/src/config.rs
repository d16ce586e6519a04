//! Session configuration structures and loaders.

use std::env;
use std::time::Duration;

use gauntlet_core::CombatRules;

/// Tunables for one [`CombatSession`](crate::CombatSession).
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub rules: CombatRules,
    /// Presentation pause before an enemy acts.
    pub enemy_turn_delay: Duration,
    /// Requested length of a defeat animation.
    pub defeat_animation: Duration,
    /// Order turns by `d20 + DEX` instead of party-then-enemies.
    pub roll_initiative: bool,
    pub event_buffer_size: usize,
    /// Fixed RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rules: CombatRules::default(),
            enemy_turn_delay: Duration::from_millis(600),
            defeat_animation: Duration::from_millis(400),
            roll_initiative: false,
            event_buffer_size: 100,
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Configuration with no presentation delays, for tests and headless runs.
    pub fn instant() -> Self {
        Self {
            enemy_turn_delay: Duration::ZERO,
            defeat_animation: Duration::ZERO,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `GAUNTLET_ENEMY_DELAY_MS` - Pause before enemy actions (default: 600)
    /// - `GAUNTLET_DEFEAT_ANIMATION_MS` - Defeat animation length (default: 400)
    /// - `GAUNTLET_ROLL_INITIATIVE` - Roll initiative at combat start (default: false)
    /// - `GAUNTLET_SEED` - Fixed RNG seed (default: random)
    /// - `GAUNTLET_EVENT_BUFFER` - Event bus capacity per topic (default: 100)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ms) = read_env::<u64>("GAUNTLET_ENEMY_DELAY_MS") {
            config.enemy_turn_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = read_env::<u64>("GAUNTLET_DEFEAT_ANIMATION_MS") {
            config.defeat_animation = Duration::from_millis(ms);
        }
        if let Some(roll) = read_env_bool("GAUNTLET_ROLL_INITIATIVE") {
            config.roll_initiative = roll;
        }
        if let Some(seed) = read_env::<u64>("GAUNTLET_SEED") {
            config.seed = Some(seed);
        }
        if let Some(capacity) = read_env::<usize>("GAUNTLET_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
