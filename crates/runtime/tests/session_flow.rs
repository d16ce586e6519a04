mod common;

use std::sync::Arc;

use common::{goblin, hero, session};
use gauntlet_core::{
    ActionError, CombatantId, EquipSlot, Equipment, GameError, Item, PcgRng, ScriptedRng, SkillEntry,
};
use gauntlet_runtime::{
    CharacterRepository, Encounter, Event, InMemoryStore, LootStaging, NarrativeEvent, Resolution,
    SessionError, SessionPhase, SessionStatus, Topic,
};

#[tokio::test]
async fn one_enemy_victory_stages_loot_and_saves_the_hero() {
    let store = Arc::new(InMemoryStore::new());
    let mut session = session(store.clone(), PcgRng::new(7));

    let status = session
        .start(Encounter::solo(hero(), vec![goblin(7)]))
        .await
        .unwrap();
    match status {
        SessionStatus::AwaitingPlayer { combatant, actions } => {
            assert_eq!(combatant, CombatantId(0));
            assert!(actions.iter().any(|action| action.name() == "Longsword"));
        }
        other => panic!("expected the hero to act first, got {other:?}"),
    }

    let status = session
        .submit_player_action("Longsword", None)
        .await
        .unwrap();
    let SessionStatus::Resolved(Resolution::Victory {
        loot,
        recovered,
        stats,
    }) = status
    else {
        panic!("expected victory, got {status:?}");
    };

    assert!((10..=29).contains(&loot.gold), "gold {}", loot.gold);
    assert!(recovered.is_none());
    assert_eq!(stats.turns_taken, 1);
    assert_eq!(stats.damage_dealt, 7);
    assert!(stats.duration_ms().is_some());
    assert_eq!(session.phase(), SessionPhase::Resolved);

    let staged = LootStaging::new(store.clone()).staged("hero").unwrap();
    assert_eq!(staged, loot);
    let saved = CharacterRepository::new(store).load("hero").unwrap().unwrap();
    assert_eq!(saved.gold, 30, "loot is staged, not granted");
}

#[tokio::test]
async fn second_start_is_rejected_while_active() {
    let mut session = session(Arc::new(InMemoryStore::new()), ScriptedRng::constant(0.5));
    session
        .start(Encounter::solo(hero(), vec![goblin(7)]))
        .await
        .unwrap();

    let error = session
        .start(Encounter::solo(hero(), vec![goblin(50)]))
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        SessionError::InvalidTransition {
            phase: SessionPhase::Active,
            ..
        }
    ));
    assert_eq!(session.phase(), SessionPhase::Active);
    assert_eq!(session.awaiting_player(), Some(CombatantId(0)));
    assert_eq!(session.roster().enemies()[0].max_hp(), 7);
}

#[tokio::test]
async fn start_requires_both_sides() {
    let mut session = session(Arc::new(InMemoryStore::new()), ScriptedRng::constant(0.5));
    let error = session
        .start(Encounter::new(Vec::new(), vec![goblin(7)]))
        .await
        .unwrap_err();
    assert!(matches!(error, SessionError::EmptySide { .. }));
    assert_eq!(session.phase(), SessionPhase::Idle);
}

#[tokio::test]
async fn resolved_session_can_start_again() {
    let mut session = session(Arc::new(InMemoryStore::new()), ScriptedRng::constant(0.5));
    session
        .start(Encounter::solo(hero(), vec![goblin(7)]))
        .await
        .unwrap();
    session.submit_player_action("Longsword", None).await.unwrap();
    assert_eq!(session.phase(), SessionPhase::Resolved);

    let status = session
        .start(Encounter::solo(hero(), vec![goblin(9)]))
        .await
        .unwrap();
    assert!(matches!(status, SessionStatus::AwaitingPlayer { .. }));
    assert_eq!(session.roster().enemies()[0].max_hp(), 9);
}

#[tokio::test]
async fn insufficient_mp_keeps_waiting_for_the_same_player() {
    let mut session = session(Arc::new(InMemoryStore::new()), ScriptedRng::constant(0.5));
    let mut narrative = session.subscribe(Topic::Narrative);
    session
        .start(Encounter::solo(hero(), vec![goblin(7)]))
        .await
        .unwrap();

    let error = session
        .submit_player_action("Meteor", None)
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        SessionError::Action(ActionError::InsufficientMp {
            required: 10,
            available: 5
        })
    ));
    assert!(error.severity().is_recoverable());
    assert_eq!(session.awaiting_player(), Some(CombatantId(0)));
    assert_eq!(session.roster().party()[0].mp(), 5);
    assert!(matches!(
        narrative.try_recv(),
        Ok(Event::Narrative(NarrativeEvent::ActionRejected { .. }))
    ));

    let status = session
        .submit_player_action("Longsword", None)
        .await
        .unwrap();
    assert!(matches!(
        status,
        SessionStatus::Resolved(Resolution::Victory { .. })
    ));
}

#[tokio::test]
async fn unknown_action_is_rejected() {
    let mut session = session(Arc::new(InMemoryStore::new()), ScriptedRng::constant(0.5));
    session
        .start(Encounter::solo(hero(), vec![goblin(7)]))
        .await
        .unwrap();
    let error = session
        .submit_player_action("Dance", None)
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        SessionError::Action(ActionError::NotAvailable { .. })
    ));
    assert_eq!(session.awaiting_player(), Some(CombatantId(0)));
}

#[tokio::test]
async fn actions_outside_a_player_turn_are_invalid() {
    let mut session = session(Arc::new(InMemoryStore::new()), ScriptedRng::constant(0.5));
    let error = session
        .submit_player_action("Longsword", None)
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        SessionError::InvalidTransition {
            phase: SessionPhase::Idle,
            ..
        }
    ));
}

#[tokio::test]
async fn rage_is_announced_once() {
    let mut session = session(Arc::new(InMemoryStore::new()), ScriptedRng::constant(0.0));
    let mut narrative = session.subscribe(Topic::Narrative);
    let mut hero = hero();
    hero.equipment = Equipment::empty().with(EquipSlot::MainHand, Item::weapon("Dagger", "8"));
    let mut brute = goblin(10);
    brute.skills = vec![SkillEntry::attack("Club", "1")];

    session
        .start(Encounter::solo(hero, vec![brute]))
        .await
        .unwrap();
    session.submit_player_action("Dagger", None).await.unwrap();

    let mut rages = 0;
    while let Ok(event) = narrative.try_recv() {
        if let Event::Narrative(NarrativeEvent::RageTriggered { combatant, .. }) = event {
            assert_eq!(combatant, CombatantId(1));
            rages += 1;
        }
    }
    assert_eq!(rages, 1);
    assert!(session.roster().enemies()[0].in_rage_mode);
    assert_eq!(session.roster().party()[0].hp(), 19);
}

#[tokio::test]
async fn cleanup_and_force_end_return_to_idle() {
    let mut session = session(Arc::new(InMemoryStore::new()), ScriptedRng::constant(0.5));
    session
        .start(Encounter::solo(hero(), vec![goblin(7)]))
        .await
        .unwrap();
    assert!(session.cleanup());
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert!(session.roster().is_empty());

    session
        .start(Encounter::solo(hero(), vec![goblin(7)]))
        .await
        .unwrap();
    session.force_end();
    assert_eq!(session.phase(), SessionPhase::Idle);
}
