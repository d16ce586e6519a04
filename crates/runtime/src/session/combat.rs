//! The encounter state machine and its builder.

use std::sync::Arc;

use chrono::Utc;
use gauntlet_core::{
    Action, ActionCatalog, ActionError, ActionResolver, CombatantId, DeathChoice, LootTable,
    PcgRng, RandomSource, Side, TurnQueue,
};
use tracing::{debug, info, warn};

use super::{EncounterStats, Encounter, Resolution, Roster, SessionPhase, SessionStatus};
use crate::api::{DefeatSignal, FloatingNumber, NumberKind, Pose, Renderer, NullRenderer};
use crate::api::{Result, SessionError};
use crate::config::SessionConfig;
use crate::events::{CombatEvent, EncounterOutcome, Event, EventBus, NarrativeEvent, Topic};
use crate::repository::{
    CharacterRepository, GrudgeStore, InMemoryStore, KeyValueStore, LootStaging,
};
use crate::services::{DeathResolver, LootEngine};

/// Drives one combat encounter at a time.
///
/// Every public operation takes `&mut self`, so actions never interleave.
/// Operations run the encounter forward until it needs a decision and return
/// a [`SessionStatus`] describing what is awaited:
///
/// - [`SessionStatus::AwaitingPlayer`] → call [`submit_player_action`](Self::submit_player_action)
/// - [`SessionStatus::AwaitingRevival`] → call [`resolve_death`](Self::resolve_death)
/// - [`SessionStatus::Resolved`] → read the result, then [`cleanup`](Self::cleanup)
///   or [`start`](Self::start) the next encounter
pub struct CombatSession {
    config: SessionConfig,
    phase: SessionPhase,
    roster: Roster,
    turns: TurnQueue,
    stats: EncounterStats,
    /// Grudge key of the current encounter (first enemy's kind).
    enemy_type: Option<String>,
    awaiting: Option<CombatantId>,
    fallen: Option<CombatantId>,
    pending_defeats: Vec<DefeatSignal>,
    resolution: Option<Resolution>,

    resolver: ActionResolver,
    loot: LootEngine,
    death: DeathResolver,
    characters: CharacterRepository,
    staging: LootStaging,
    renderer: Arc<dyn Renderer>,
    events: EventBus,
    rng: Box<dyn RandomSource>,
}

impl CombatSession {
    /// Create a new session builder
    pub fn builder() -> CombatSessionBuilder {
        CombatSessionBuilder::new()
    }

    // ========================================================================
    // Public operations
    // ========================================================================

    /// Starts an encounter.
    ///
    /// Allowed from `Idle` and `Resolved`; anywhere else the call is rejected
    /// and the running encounter is left untouched.
    pub async fn start(&mut self, encounter: Encounter) -> Result<SessionStatus> {
        if !self.phase.can_start() {
            warn!("Ignoring start() while the session is {}", self.phase);
            return Err(self.invalid("start an encounter"));
        }
        if encounter.party.is_empty() {
            return Err(SessionError::EmptySide { side: Side::Player });
        }
        if encounter.enemies.is_empty() {
            return Err(SessionError::EmptySide { side: Side::Enemy });
        }

        self.reset();
        self.roster = Roster::new(encounter.party, encounter.enemies);
        self.stats = EncounterStats::started(Utc::now());

        for enemy in self.roster.enemies() {
            self.renderer.add_enemy(enemy).await;
        }

        let enemy_type = self
            .roster
            .enemies()
            .first()
            .map(|enemy| enemy.kind.clone())
            .unwrap_or_default();
        self.loot
            .check_for_revenge_at_start(&enemy_type, self.rng.as_mut());
        self.enemy_type = Some(enemy_type);

        self.turns = if self.config.roll_initiative {
            TurnQueue::with_initiative(self.roster.iter(), self.rng.as_mut())
        } else {
            TurnQueue::new(self.roster.ids())
        };

        info!(
            "Encounter started: {} vs {}",
            names(self.roster.party()),
            names(self.roster.enemies())
        );
        self.set_phase(SessionPhase::Active);
        // a side may already be down if its sheets were saved at 0 HP
        self.evaluate_end().await;
        self.run_until_input().await
    }

    /// Resolves the awaited player's action by name.
    ///
    /// `target` defaults to the first living enemy. A rejected action (not
    /// enough MP, defeated target) returns the error and keeps awaiting the
    /// same player.
    pub async fn submit_player_action(
        &mut self,
        action_name: &str,
        target: Option<CombatantId>,
    ) -> Result<SessionStatus> {
        let actor = match self.awaiting {
            Some(actor) if self.phase == SessionPhase::Active => actor,
            _ => {
                warn!("Ignoring player action while the session is {}", self.phase);
                return Err(self.invalid("submit a player action"));
            }
        };

        let combatant = self
            .roster
            .get(actor)
            .ok_or(SessionError::UnknownCombatant(actor))?;
        let action = match ActionCatalog::find(combatant, action_name) {
            Ok(action) => action,
            Err(error) => return Err(self.reject(actor, action_name, error)),
        };

        let target = match target {
            Some(target) => target,
            None => self
                .roster
                .living(Side::Enemy)
                .first()
                .copied()
                .ok_or(SessionError::Turn(gauntlet_core::TurnError::NoActiveCombatants))?,
        };

        match self.apply_action(actor, target, &action).await {
            Ok(_) => {}
            Err(SessionError::Action(error)) => {
                return Err(self.reject(actor, action.name(), error));
            }
            Err(error) => return Err(error),
        }

        self.awaiting = None;
        self.renderer.set_pose(actor, Pose::Idle).await;
        self.commit_players();
        self.evaluate_end().await;
        self.run_until_input().await
    }

    /// Applies the player's revival decision while a defeat is pending.
    pub async fn resolve_death(&mut self, choice: DeathChoice) -> Result<SessionStatus> {
        if self.phase != SessionPhase::DefeatPending {
            warn!("Ignoring resolve_death({}) while the session is {}", choice, self.phase);
            return Err(self.invalid("resolve a defeat"));
        }

        let fallen_id = self.fallen_or_lead()?;
        let enemy_type = self.enemy_type.clone().unwrap_or_default();
        let fallen = self
            .roster
            .get_mut(fallen_id)
            .ok_or(SessionError::UnknownCombatant(fallen_id))?;
        let outcome = self.death.resolve(
            choice,
            fallen,
            &enemy_type,
            &mut self.loot,
            self.rng.as_mut(),
        );
        let health = (fallen.hp(), fallen.max_hp());

        self.events.publish(NarrativeEvent::RevivalOutcome {
            choice,
            gold_lost: outcome.penalty.gold_loss,
            items_lost: outcome
                .penalty
                .items
                .iter()
                .map(|lost| lost.name().to_string())
                .collect(),
            revived_hp: outcome.revived_hp,
        });
        self.commit_players();

        match choice {
            DeathChoice::Revenge => {
                self.renderer
                    .update_health(fallen_id, health.0, health.1)
                    .await;
                self.renderer.set_pose(fallen_id, Pose::Ready).await;
                self.fallen = None;
                self.set_phase(SessionPhase::Active);
                self.evaluate_end().await;
            }
            DeathChoice::Retreat => {
                self.stats.ended_at = Some(Utc::now());
                self.finish(
                    Resolution::Retreated {
                        penalty: outcome.penalty,
                        grudge: outcome.grudge,
                    },
                    EncounterOutcome::Retreated,
                );
            }
            DeathChoice::StayDead => {
                self.stats.ended_at = Some(Utc::now());
                self.finish(Resolution::Fallen, EncounterOutcome::Fallen);
            }
        }

        self.run_until_input().await
    }

    /// Tears the session down to `Idle`.
    ///
    /// Ignored (returns `false`) while a defeat is pending: that state only
    /// ends through [`resolve_death`](Self::resolve_death) or
    /// [`force_end`](Self::force_end).
    pub fn cleanup(&mut self) -> bool {
        if self.phase == SessionPhase::DefeatPending {
            warn!("Ignoring cleanup() while a defeat is pending");
            return false;
        }
        self.reset();
        true
    }

    /// Discards the session in any phase without resolving a pending defeat.
    pub fn force_end(&mut self) {
        if matches!(
            self.phase,
            SessionPhase::Active | SessionPhase::VictoryPending | SessionPhase::DefeatPending
        ) {
            self.stats.ended_at = Some(Utc::now());
            self.events.publish(CombatEvent::EncounterEnded {
                outcome: EncounterOutcome::Abandoned,
                stats: self.stats.clone(),
            });
        }
        info!("Session force-ended from {}", self.phase);
        self.reset();
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn stats(&self) -> &EncounterStats {
        &self.stats
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Player whose action is awaited, if any.
    pub fn awaiting_player(&self) -> Option<CombatantId> {
        self.awaiting
    }

    /// Player recorded as fallen while a defeat is pending.
    pub fn fallen(&self) -> Option<CombatantId> {
        self.fallen
    }

    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.as_ref()
    }

    /// Grudge key of the current encounter.
    pub fn enemy_type(&self) -> Option<&str> {
        self.enemy_type.as_deref()
    }

    pub fn loot(&self) -> &LootEngine {
        &self.loot
    }

    pub fn loot_mut(&mut self) -> &mut LootEngine {
        &mut self.loot
    }

    pub fn characters(&self) -> &CharacterRepository {
        &self.characters
    }

    pub fn staging(&self) -> &LootStaging {
        &self.staging
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Subscribe to one event topic
    pub fn subscribe(&self, topic: Topic) -> tokio::sync::broadcast::Receiver<Event> {
        self.events.subscribe(topic)
    }

    // ========================================================================
    // Turn loop
    // ========================================================================

    /// Advances turns until the encounter needs outside input.
    async fn run_until_input(&mut self) -> Result<SessionStatus> {
        loop {
            match self.phase {
                SessionPhase::Idle => return Ok(SessionStatus::Idle),
                SessionPhase::DefeatPending => {
                    return Ok(SessionStatus::AwaitingRevival {
                        fallen: self.fallen_or_lead()?,
                    });
                }
                SessionPhase::Resolved => {
                    return Ok(self
                        .resolution
                        .clone()
                        .map_or(SessionStatus::Idle, SessionStatus::Resolved));
                }
                SessionPhase::VictoryPending => {
                    self.resolve_victory();
                    continue;
                }
                SessionPhase::Active => {}
            }

            if let Some(actor) = self.awaiting {
                return Ok(self.awaiting_status(actor));
            }

            let roster = &self.roster;
            let next = match self.turns.advance(|id| roster.is_alive(id)) {
                Ok(next) => next,
                Err(error) => {
                    self.evaluate_end().await;
                    if self.phase == SessionPhase::Active {
                        warn!("Nobody can act but the encounter has not ended");
                        return Err(error.into());
                    }
                    continue;
                }
            };

            if let Some(status) = self.on_turn_start(next).await? {
                return Ok(status);
            }
        }
    }

    /// Runs an enemy turn, or reports that a player must act.
    async fn on_turn_start(&mut self, id: CombatantId) -> Result<Option<SessionStatus>> {
        let side = self
            .roster
            .get(id)
            .map(|combatant| combatant.side)
            .ok_or(SessionError::UnknownCombatant(id))?;

        self.stats.turns_taken += 1;
        self.events.publish(CombatEvent::TurnStarted {
            combatant: id,
            side,
            round: self.turns.round(),
        });
        debug!("Turn {} (round {}): {}", self.stats.turns_taken, self.turns.round(), id);

        match side {
            Side::Player => {
                self.awaiting = Some(id);
                self.renderer.set_pose(id, Pose::Ready).await;
                Ok(Some(self.awaiting_status(id)))
            }
            Side::Enemy => {
                self.take_enemy_turn(id).await?;
                Ok(None)
            }
        }
    }

    async fn take_enemy_turn(&mut self, id: CombatantId) -> Result<()> {
        let enemy = self
            .roster
            .get(id)
            .ok_or(SessionError::UnknownCombatant(id))?;

        let mut actions = ActionCatalog::affordable(enemy);
        let action = if actions.is_empty() {
            warn!(
                "{} has no usable action, falling back to {}",
                enemy.name,
                ActionCatalog::FALLBACK_NAME
            );
            self.events.publish(NarrativeEvent::MissingData {
                what: format!("actions for {}", enemy.name),
                fallback: ActionCatalog::FALLBACK_NAME.to_string(),
            });
            ActionCatalog::fallback()
        } else {
            let index = self.rng.below(actions.len() as u32) as usize;
            actions.swap_remove(index)
        };

        let targets = self.roster.living(Side::Player);
        if targets.is_empty() {
            self.evaluate_end().await;
            return Ok(());
        }
        let target = targets[self.rng.below(targets.len() as u32) as usize];

        self.renderer.set_pose(id, Pose::Attacking).await;
        if !self.config.enemy_turn_delay.is_zero() {
            tokio::time::sleep(self.config.enemy_turn_delay).await;
        }

        match self.apply_action(id, target, &action).await {
            Ok(_) => {}
            Err(SessionError::Action(error)) => {
                warn!("Enemy action {} failed: {}", action.name(), error);
                self.events.publish(NarrativeEvent::ActionRejected {
                    combatant: id,
                    action: action.name().to_string(),
                    reason: error.to_string(),
                });
            }
            Err(error) => return Err(error),
        }

        if self.roster.is_alive(id) {
            self.renderer.set_pose(id, Pose::Idle).await;
        }
        self.commit_players();
        self.evaluate_end().await;
        Ok(())
    }

    /// Resolves one action and forwards its effects to stats, renderer, and
    /// event bus.
    async fn apply_action(
        &mut self,
        attacker: CombatantId,
        target: CombatantId,
        action: &Action,
    ) -> Result<gauntlet_core::Resolution> {
        if attacker == target {
            return Err(ActionError::SelfTarget { actor: attacker }.into());
        }
        for id in [attacker, target] {
            if self.roster.get(id).is_none() {
                return Err(SessionError::UnknownCombatant(id));
            }
        }

        let (actor, victim) = self
            .roster
            .pair_mut(attacker, target)
            .ok_or(SessionError::UnknownCombatant(target))?;
        let outcome = self
            .resolver
            .resolve(actor, victim, action, self.rng.as_mut())?;

        let attacker_side = actor.side;
        let actor_health = (actor.hp(), actor.max_hp());
        let victim_side = victim.side;
        let victim_health = (victim.hp(), victim.max_hp());
        let victim_name = victim.name.clone();

        let damage = u64::from(outcome.damage);
        match attacker_side {
            Side::Player => self.stats.damage_dealt += damage,
            Side::Enemy => self.stats.damage_taken += damage,
        }

        if outcome.damage > 0 {
            self.renderer
                .show_floating_number(FloatingNumber {
                    target,
                    amount: outcome.damage,
                    kind: NumberKind::Damage,
                })
                .await;
            if !outcome.defeated {
                self.renderer.set_pose(target, Pose::Hurt).await;
            }
            self.renderer
                .update_health(target, victim_health.0, victim_health.1)
                .await;
        }
        if outcome.healing > 0 {
            self.renderer
                .show_floating_number(FloatingNumber {
                    target: attacker,
                    amount: outcome.healing,
                    kind: NumberKind::Healing,
                })
                .await;
            self.renderer
                .update_health(attacker, actor_health.0, actor_health.1)
                .await;
        }

        self.events.publish(CombatEvent::ActionResolved {
            attacker,
            target,
            action: action.name().to_string(),
            outcome,
        });

        if outcome.rage_triggered {
            info!("{} flies into a rage", victim_name);
            self.events.publish(NarrativeEvent::RageTriggered {
                combatant: target,
                name: victim_name.clone(),
            });
        }

        if outcome.defeated {
            info!("{} is defeated", victim_name);
            self.events.publish(CombatEvent::CombatantDefeated {
                combatant: target,
                side: victim_side,
            });
            self.renderer.set_pose(target, Pose::Defeated).await;
            match victim_side {
                Side::Enemy => {
                    let signal = self
                        .renderer
                        .play_defeat_animation(target, self.config.defeat_animation)
                        .await;
                    self.pending_defeats.push(signal);
                }
                Side::Player => self.fallen = Some(target),
            }
        }

        Ok(outcome)
    }

    /// Checks end conditions after an action.
    ///
    /// Defeat is checked first. Victory is only evaluated once every pending
    /// defeat animation has completed.
    async fn evaluate_end(&mut self) {
        if self.phase != SessionPhase::Active {
            return;
        }

        if self.roster.all_defeated(Side::Player) {
            self.awaiting = None;
            if self.fallen.is_none() {
                self.fallen = self.roster.party().first().map(|player| player.id);
            }
            info!("The party has fallen");
            self.set_phase(SessionPhase::DefeatPending);
            return;
        }

        for signal in std::mem::take(&mut self.pending_defeats) {
            if !signal.wait().await {
                warn!("Defeat animation notifier dropped; treating it as finished");
            }
        }

        if self.roster.all_defeated(Side::Enemy) {
            self.awaiting = None;
            self.set_phase(SessionPhase::VictoryPending);
        }
    }

    fn resolve_victory(&mut self) {
        self.stats.ended_at = Some(Utc::now());

        let mut loot = self.loot.generate_loot(self.rng.as_mut());
        let recovered = match self.enemy_type.clone() {
            Some(enemy_type) => self.loot.check_and_recover_grudge(&enemy_type),
            None => None,
        };
        if let Some(recovered) = &recovered {
            loot.merge(recovered.clone());
        }

        if let Some(lead) = self.roster.party().first()
            && let Err(e) = self.staging.stage(&lead.sheet_id, &loot)
        {
            warn!("Failed to stage loot for {}: {}", lead.sheet_id, e);
        }
        self.commit_players();

        info!(
            "Victory after {} turns: {} gold, {} items",
            self.stats.turns_taken,
            loot.gold,
            loot.items.len()
        );
        let stats = self.stats.clone();
        self.finish(
            Resolution::Victory {
                loot,
                recovered,
                stats,
            },
            EncounterOutcome::Victory,
        );
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn finish(&mut self, resolution: Resolution, outcome: EncounterOutcome) {
        self.resolution = Some(resolution);
        self.set_phase(SessionPhase::Resolved);
        self.events.publish(CombatEvent::EncounterEnded {
            outcome,
            stats: self.stats.clone(),
        });
    }

    fn set_phase(&mut self, to: SessionPhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        self.phase = to;
        debug!("Session phase {} -> {}", from, to);
        self.events.publish(CombatEvent::PhaseChanged { from, to });
    }

    fn reset(&mut self) {
        self.roster = Roster::default();
        self.turns = TurnQueue::default();
        self.stats = EncounterStats::default();
        self.enemy_type = None;
        self.awaiting = None;
        self.fallen = None;
        self.pending_defeats.clear();
        self.resolution = None;
        self.loot.clear_revenge();
        self.set_phase(SessionPhase::Idle);
    }

    /// Writes every party member back through the character repository.
    fn commit_players(&self) {
        for player in self.roster.party() {
            if let Err(e) = self.characters.save(&player.to_sheet()) {
                warn!("Failed to save character {}: {}", player.sheet_id, e);
            }
        }
    }

    fn awaiting_status(&self, combatant: CombatantId) -> SessionStatus {
        let actions = self
            .roster
            .get(combatant)
            .map(ActionCatalog::for_combatant)
            .unwrap_or_default();
        SessionStatus::AwaitingPlayer { combatant, actions }
    }

    fn fallen_or_lead(&self) -> Result<CombatantId> {
        self.fallen
            .or_else(|| self.roster.party().first().map(|player| player.id))
            .ok_or(SessionError::EmptySide { side: Side::Player })
    }

    fn reject(&self, actor: CombatantId, action: &str, error: ActionError) -> SessionError {
        debug!("Rejected {} for {}: {}", action, actor, error);
        self.events.publish(NarrativeEvent::ActionRejected {
            combatant: actor,
            action: action.to_string(),
            reason: error.to_string(),
        });
        error.into()
    }

    fn invalid(&self, operation: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            operation,
            phase: self.phase,
        }
    }
}

fn names(combatants: &[gauntlet_core::Combatant]) -> String {
    combatants
        .iter()
        .map(|combatant| combatant.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builder for [`CombatSession`] with flexible configuration.
pub struct CombatSessionBuilder {
    config: SessionConfig,
    store: Option<Arc<dyn KeyValueStore>>,
    renderer: Option<Arc<dyn Renderer>>,
    rng: Option<Box<dyn RandomSource>>,
    events: Option<EventBus>,
    loot_table: Option<LootTable>,
}

impl CombatSessionBuilder {
    fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            store: None,
            renderer: None,
            rng: None,
            events: None,
            loot_table: None,
        }
    }

    /// Override session configuration
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Persistence backend (default: a fresh [`InMemoryStore`])
    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Presentation surface (default: [`NullRenderer`])
    pub fn renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Random source (default: [`PcgRng`] from the configured seed, or entropy)
    pub fn rng(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    /// Share an existing event bus (default: a new bus sized from config)
    pub fn events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn loot_table(mut self, table: LootTable) -> Self {
        self.loot_table = Some(table);
        self
    }

    pub fn build(self) -> CombatSession {
        let config = self.config;
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(InMemoryStore::new()));
        let events = self
            .events
            .unwrap_or_else(|| EventBus::with_capacity(config.event_buffer_size));
        let rng = self.rng.unwrap_or_else(|| match config.seed {
            Some(seed) => Box::new(PcgRng::new(seed)),
            None => Box::new(PcgRng::from_entropy()),
        });

        let mut loot = LootEngine::new(
            GrudgeStore::new(store.clone()),
            config.rules.clone(),
            events.clone(),
        );
        if let Some(table) = self.loot_table {
            loot = loot.with_table(table);
        }

        CombatSession {
            resolver: ActionResolver::new(&config.rules),
            phase: SessionPhase::Idle,
            roster: Roster::default(),
            turns: TurnQueue::default(),
            stats: EncounterStats::default(),
            enemy_type: None,
            awaiting: None,
            fallen: None,
            pending_defeats: Vec::new(),
            resolution: None,
            loot,
            death: DeathResolver::new(),
            characters: CharacterRepository::new(store.clone()),
            staging: LootStaging::new(store),
            renderer: self.renderer.unwrap_or_else(|| Arc::new(NullRenderer)),
            events,
            rng,
            config,
        }
    }
}
