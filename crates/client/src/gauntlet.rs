//! The run: consecutive encounters with one character.

use std::sync::Arc;

use anyhow::Result;
use gauntlet_core::CharacterSheet;
use gauntlet_runtime::{
    CharacterRepository, CombatSession, Encounter, KeyValueStore, LootStaging, Resolution,
    SessionStatus, Topic,
};
use tracing::{info, warn};

use crate::bestiary::{default_hero, encounter_for};
use crate::config::ClientConfig;
use crate::prompt::Prompt;
use crate::terminal::{NarrativeLog, TerminalRenderer, health_bar};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Cleared,
    Retreated,
    Fallen,
    /// Input closed mid-run.
    Quit,
}

pub struct Gauntlet {
    config: ClientConfig,
    characters: CharacterRepository,
    staging: LootStaging,
    session: CombatSession,
    renderer: Arc<TerminalRenderer>,
    narrative: NarrativeLog,
}

impl Gauntlet {
    pub fn new(config: ClientConfig, store: Arc<dyn KeyValueStore>) -> Self {
        let renderer = Arc::new(TerminalRenderer::new());
        let session = CombatSession::builder()
            .config(config.session.clone())
            .store(store.clone())
            .renderer(renderer.clone())
            .build();
        let narrative = NarrativeLog::new(session.subscribe(Topic::Narrative));

        Self {
            config,
            characters: CharacterRepository::new(store.clone()),
            staging: LootStaging::new(store),
            session,
            renderer,
            narrative,
        }
    }

    pub async fn run(&mut self, prompt: &mut Prompt) -> Result<RunOutcome> {
        for stage in 0..self.config.gauntlet_length {
            let hero = self.prepare_hero()?;
            println!();
            println!(
                "=== Encounter {} of {} === {} [{}], {} gold",
                stage + 1,
                self.config.gauntlet_length,
                hero.name,
                health_bar(hero.hp, hero.max_hp),
                hero.gold
            );

            self.renderer.register_party(std::slice::from_ref(&hero));
            let status = self
                .session
                .start(Encounter::solo(hero, encounter_for(stage)))
                .await?;

            match self.play(status, prompt).await? {
                Some(Resolution::Victory { loot, .. }) => {
                    println!("Victory! Spoils waiting: {} gold, {} items.", loot.gold, loot.items.len());
                }
                Some(Resolution::Retreated { .. }) => return Ok(RunOutcome::Retreated),
                Some(Resolution::Fallen) => return Ok(RunOutcome::Fallen),
                None => return Ok(RunOutcome::Quit),
            }
        }

        self.prepare_hero()?;
        Ok(RunOutcome::Cleared)
    }

    /// Drives one encounter until it resolves, or `None` if input ran out.
    async fn play(
        &mut self,
        mut status: SessionStatus,
        prompt: &mut Prompt,
    ) -> Result<Option<Resolution>> {
        loop {
            self.narrative.flush();
            status = match status {
                SessionStatus::AwaitingPlayer { combatant, actions } => {
                    let actor = self.renderer.name_of(combatant);
                    let Some(action) = prompt.choose_action(&actor, &actions).await? else {
                        self.session.force_end();
                        return Ok(None);
                    };
                    match self.session.submit_player_action(action.name(), None).await {
                        Ok(next) => next,
                        Err(e) => {
                            // the rejection itself is narrated
                            self.narrative.flush();
                            warn!("Player action rejected: {}", e);
                            SessionStatus::AwaitingPlayer { combatant, actions }
                        }
                    }
                }
                SessionStatus::AwaitingRevival { .. } => {
                    self.narrative.flush();
                    let Some(choice) = prompt.choose_revival().await? else {
                        self.session.force_end();
                        return Ok(None);
                    };
                    self.session.resolve_death(choice).await?
                }
                SessionStatus::Resolved(resolution) => {
                    self.narrative.flush();
                    return Ok(Some(resolution));
                }
                SessionStatus::Idle => return Ok(None),
            };
        }
    }

    /// Loads the character, replacing a dead one, and claims staged loot.
    fn prepare_hero(&self) -> Result<CharacterSheet> {
        let id = &self.config.character_id;
        let mut hero = match self.characters.load(id)? {
            Some(sheet) if sheet.hp > 0 => sheet,
            Some(_) => {
                println!("{} did not get up again. A new hero takes the name.", id);
                info!("Replacing fallen character {}", id);
                default_hero(id)
            }
            None => {
                info!("Creating character {}", id);
                default_hero(id)
            }
        };

        self.characters.save(&hero)?;
        let claimed = self.staging.claim(&mut hero, &self.characters)?;
        if !claimed.is_empty() {
            let names: Vec<&str> = claimed.items.iter().map(|item| item.name.as_str()).collect();
            println!(
                "Claimed {} gold{}{}.",
                claimed.gold,
                if names.is_empty() { "" } else { " and " },
                names.join(", ")
            );
        }
        Ok(hero)
    }
}
