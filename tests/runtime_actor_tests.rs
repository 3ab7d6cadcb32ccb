//! Тесты асинхронной обвязки: актор стола и реестр столов.
//!
//! Время в тестах на паузе (`start_paused`), tokio сам доматывает его до ближайшего таймера.

use std::time::Duration;

use holdem_engine::api::{Command, RejectReason};
use holdem_engine::domain::chips::Chips;
use holdem_engine::domain::hand::Phase;
use holdem_engine::domain::table::TableConfig;
use holdem_engine::engine::{HandEvent, HandEventKind, ManagerError};
use holdem_engine::infra::rng::DeterministicRng;
use holdem_engine::runtime::{TableDirectory, TableHandle};
use holdem_engine::time_ctrl::TimeRules;
use tokio::sync::broadcast;

async fn open_heads_up(directory: &TableDirectory) -> (TableHandle, u64, u64) {
    let handle = directory
        .open_with_rng(
            "actor",
            TableConfig::default(),
            TimeRules::standard(),
            Box::new(DeterministicRng::from_seed(9)),
        )
        .await
        .expect("valid config");
    let first = directory.next_player_id();
    let second = directory.next_player_id();
    handle.seat(first, "First").await.unwrap();
    handle.seat(second, "Second").await.unwrap();
    (handle, first, second)
}

fn drain(rx: &mut broadcast::Receiver<HandEvent>) -> Vec<HandEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test(start_paused = true)]
async fn commands_go_through_the_actor_and_events_are_broadcast() {
    let directory = TableDirectory::new();
    let (handle, first, second) = open_heads_up(&directory).await;
    let mut events = handle.subscribe();

    handle.start_game().await.unwrap();
    let view = handle.view(Some(second)).await.unwrap();
    assert_eq!(view.phase, Phase::Preflop);
    assert_eq!(view.current_player_id, Some(second));
    assert!(view.players.iter().find(|p| p.player_id == second).unwrap().hole_cards.is_some());
    assert!(view.players.iter().find(|p| p.player_id == first).unwrap().hole_cards.is_none());

    let received = drain(&mut events);
    assert!(matches!(received[0].kind, HandEventKind::HandStarted { hand_id: 1, .. }));
    assert!(
        received.windows(2).all(|w| w[0].index < w[1].index),
        "Номера событий растут"
    );

    let view = handle.command(second, Command::Call).await.unwrap();
    assert_eq!(view.current_player_id, Some(first));
    assert_eq!(view.pot, Chips(40));
}

#[tokio::test(start_paused = true)]
async fn rejected_command_reports_reason() {
    let directory = TableDirectory::new();
    let (handle, first, _) = open_heads_up(&directory).await;
    handle.start_game().await.unwrap();

    let err = handle.command(first, Command::Check).await.unwrap_err();
    assert_eq!(err.reason(), Some(RejectReason::NotYourTurn));

    let err = handle.start_game().await.unwrap_err();
    assert_eq!(err.reason(), Some(RejectReason::HandAlreadyInProgress));
}

#[tokio::test(start_paused = true)]
async fn turn_timer_fires_inside_the_actor() {
    let directory = TableDirectory::new();
    let (handle, first, second) = open_heads_up(&directory).await;
    let mut events = handle.subscribe();
    handle.start_game().await.unwrap();
    handle.command(second, Command::Call).await.unwrap();

    // Ход у большого блайнда, никто ничего не делает.
    tokio::time::sleep(Duration::from_secs(16)).await;

    let view = handle.view(None).await.unwrap();
    assert_eq!(view.phase, Phase::Flop, "Авто-чек по таймауту открыл флоп");
    assert_eq!(view.current_player_id, Some(second));

    let auto_checked = drain(&mut events).into_iter().any(|e| {
        matches!(
            e.kind,
            HandEventKind::ActionApplied {
                player_id,
                source: holdem_engine::engine::ActionSource::Timeout,
                ..
            } if player_id == first
        )
    });
    assert!(auto_checked);
}

#[tokio::test(start_paused = true)]
async fn directory_opens_and_closes_tables() {
    let directory = TableDirectory::new();
    let (a, _, _) = open_heads_up(&directory).await;
    let (b, _, _) = open_heads_up(&directory).await;
    assert_ne!(a.table_id(), b.table_id());
    assert_eq!(directory.table_ids().await, vec![a.table_id(), b.table_id()]);

    let bad = TableConfig {
        small_blind: Chips(50),
        big_blind: Chips(20),
        ..TableConfig::default()
    };
    let err = directory.open("bad", bad, TimeRules::standard()).await;
    assert!(matches!(err, Err(ManagerError::Config(_))));

    directory.close(a.table_id()).await.unwrap();
    assert!(directory.get(a.table_id()).await.is_none());
    assert!(matches!(
        directory.close(a.table_id()).await,
        Err(ManagerError::TableNotFound(_))
    ));

    let err = a.view(None).await.unwrap_err();
    assert_eq!(err.reason(), Some(RejectReason::TableNotFound));

    // Второй стол живёт дальше.
    assert!(directory.get(b.table_id()).await.is_some());
    assert_eq!(b.view(None).await.unwrap().phase, Phase::Waiting);
}
