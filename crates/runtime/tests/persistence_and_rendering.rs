mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::{BrokenStore, DefeatMode, RecordingRenderer, goblin, hero};
use gauntlet_core::{PcgRng, ScriptedRng};
use gauntlet_runtime::{
    CharacterRepository, CombatSession, Encounter, Event, FileStore, InMemoryStore, KeyValueStore,
    LootStaging, NarrativeEvent, Resolution, SessionConfig, SessionStatus, Topic,
};
use tempfile::TempDir;

#[tokio::test]
async fn grudges_survive_a_new_session_on_disk() {
    let dir = TempDir::new().unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(dir.path()).unwrap());

    let mut first = common::session(store.clone(), ScriptedRng::constant(0.99));
    let recorded = first.loot_mut().track_loot("Goblin", 42, Vec::new());
    drop(first);

    let raw = std::fs::read_to_string(dir.path().join("gauntlet.grudges.json")).unwrap();
    assert!(raw.contains("\"enemyType\""), "{raw}");
    assert!(raw.contains("\"encounterChance\""), "{raw}");

    let reopened: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(dir.path()).unwrap());
    let mut second = common::session(reopened, ScriptedRng::constant(0.99));
    let ledger = second.loot_mut().ledger();
    assert_eq!(ledger.records(), std::slice::from_ref(&recorded));
}

#[tokio::test]
async fn staged_loot_is_claimed_between_encounters() {
    let dir = TempDir::new().unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(dir.path()).unwrap());
    let mut session = common::session(store.clone(), PcgRng::new(11));

    session
        .start(Encounter::solo(hero(), vec![goblin(7)]))
        .await
        .unwrap();
    let status = session
        .submit_player_action("Longsword", None)
        .await
        .unwrap();
    let SessionStatus::Resolved(Resolution::Victory { loot, .. }) = status else {
        panic!("expected victory, got {status:?}");
    };

    let characters = CharacterRepository::new(store.clone());
    let staging = LootStaging::new(store);
    let mut sheet = characters.load("hero").unwrap().unwrap();
    let claimed = staging.claim(&mut sheet, &characters).unwrap();

    assert_eq!(claimed, loot);
    assert_eq!(sheet.gold, 30 + loot.gold);
    assert!(staging.staged("hero").unwrap().is_empty());
}

#[tokio::test]
async fn broken_storage_does_not_stop_play() {
    let mut session = common::session(Arc::new(BrokenStore), ScriptedRng::constant(0.0));
    let mut narrative = session.subscribe(Topic::Narrative);

    session
        .start(Encounter::solo(hero(), vec![goblin(7)]))
        .await
        .unwrap();
    let status = session
        .submit_player_action("Longsword", None)
        .await
        .unwrap();
    assert!(matches!(
        status,
        SessionStatus::Resolved(Resolution::Victory { .. })
    ));

    let missing = std::iter::from_fn(|| narrative.try_recv().ok())
        .any(|event| matches!(event, Event::Narrative(NarrativeEvent::MissingData { .. })));
    assert!(missing);
}

#[tokio::test]
async fn grudge_cache_covers_a_failing_store() {
    let mut session = common::session(Arc::new(BrokenStore), ScriptedRng::constant(0.0));
    session.loot_mut().track_loot("Goblin", 5, Vec::new());

    session
        .start(Encounter::solo(hero(), vec![goblin(7)]))
        .await
        .unwrap();
    assert!(session.loot().active_revenge().is_some());
}

#[tokio::test]
async fn victory_waits_for_the_defeat_animation() {
    let renderer = RecordingRenderer::new(DefeatMode::Timed);
    let mut session = CombatSession::builder()
        .config(SessionConfig {
            defeat_animation: Duration::from_millis(30),
            ..SessionConfig::instant()
        })
        .store(Arc::new(InMemoryStore::new()))
        .renderer(renderer.clone())
        .rng(ScriptedRng::constant(0.5))
        .build();

    session
        .start(Encounter::solo(hero(), vec![goblin(7)]))
        .await
        .unwrap();
    let started = Instant::now();
    let status = session
        .submit_player_action("Longsword", None)
        .await
        .unwrap();

    assert!(started.elapsed() >= Duration::from_millis(30));
    assert!(matches!(
        status,
        SessionStatus::Resolved(Resolution::Victory { .. })
    ));
    let calls = renderer.calls();
    assert!(calls.contains(&"add_enemy Snik".to_string()));
    assert!(calls.contains(&"number #1 7".to_string()), "{calls:?}");
    assert!(calls.contains(&"defeat #1".to_string()), "{calls:?}");
}

#[tokio::test]
async fn dropped_animation_still_reaches_victory() {
    let renderer = RecordingRenderer::new(DefeatMode::Dropped);
    let mut session = CombatSession::builder()
        .config(SessionConfig::instant())
        .renderer(renderer.clone())
        .rng(ScriptedRng::constant(0.5))
        .build();

    session
        .start(Encounter::solo(hero(), vec![goblin(7)]))
        .await
        .unwrap();
    let status = session
        .submit_player_action("Longsword", None)
        .await
        .unwrap();
    assert!(matches!(
        status,
        SessionStatus::Resolved(Resolution::Victory { .. })
    ));
}
