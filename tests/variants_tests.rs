//! Тесты вариантов стола: бомб-пот и run-it-twice.
//!
//! Здесь проверяем:
//! - голосование за бомб-пот (большинство, таймаут, проверка фишек);
//! - раздачу бомб-пота: ставки, пропускающие, улицы по таймеру;
//! - отмену бомб-пота, когда участников меньше двух;
//! - голосование за run-it-twice (единогласие) и розыгрыш на двух бордах.

use holdem_engine::domain::card::{parse_cards, Card};
use holdem_engine::domain::chips::Chips;
use holdem_engine::domain::hand::Phase;
use holdem_engine::domain::table::TableConfig;
use holdem_engine::domain::PlayerId;
use holdem_engine::engine::{EndReason, EngineError, HandEventKind, PlayerActionKind, TableEngine};
use holdem_engine::infra::rng::{DeterministicRng, PresetDeck};
use holdem_engine::time_ctrl::TimeRules;
use holdem_engine::variants::VoteKind;

fn cards(s: &str) -> Vec<Card> {
    parse_cards(s).expect("valid cards")
}

fn hole(s: &str) -> [Card; 2] {
    let c = cards(s);
    [c[0], c[1]]
}

/// Стол с игроками 1..=n и стартовыми стеками.
fn table_with(n: u64, config: TableConfig, rules: TimeRules) -> TableEngine {
    let mut engine = TableEngine::with_rng(1, "variants", config, rules, Box::new(DeterministicRng::from_seed(3)))
        .expect("valid config");
    for id in 1..=n {
        engine.seat_player(id, format!("P{id}")).unwrap();
    }
    engine
}

fn instant() -> TimeRules {
    TimeRules {
        run_out_card_delay_ms: 0,
        bomb_pot_street_delay_ms: 0,
        ..TimeRules::standard()
    }
}

fn chips_of(engine: &TableEngine, id: PlayerId) -> Chips {
    engine.round().player(id).map(|p| p.chips).unwrap_or(Chips::ZERO)
}

//
// ====================== БОМБ-ПОТ: ГОЛОСОВАНИЕ ======================
//

#[test]
fn bomb_pot_approved_by_majority() {
    let mut engine = table_with(4, TableConfig::default(), TimeRules::standard());

    engine.start_bomb_pot_vote(1, Chips(50), 0).unwrap();
    assert_eq!(engine.bomb_pot_offer(), Some(Chips(50)));
    engine.cast_vote(2, VoteKind::BombPot, true, 100).unwrap();
    engine.cast_vote(3, VoteKind::BombPot, true, 200).unwrap();
    assert!(engine.vote(VoteKind::BombPot).is_some(), "Ждём последнего голоса");
    engine.cast_vote(4, VoteKind::BombPot, false, 300).unwrap();

    assert!(engine.vote(VoteKind::BombPot).is_none());
    let scheduled = engine.scheduled_bomb_pot().expect("bomb pot scheduled");
    assert_eq!(scheduled.stake, Chips(50));
    assert_eq!(scheduled.approved, vec![1, 2, 3]);
}

#[test]
fn bomb_pot_majority_is_counted_on_timeout() {
    let mut engine = table_with(4, TableConfig::default(), TimeRules::standard());

    engine.start_bomb_pot_vote(1, Chips(50), 0).unwrap();
    engine.cast_vote(2, VoteKind::BombPot, true, 100).unwrap();
    engine.cast_vote(3, VoteKind::BombPot, true, 200).unwrap();

    engine.tick(29_999).unwrap();
    assert!(engine.scheduled_bomb_pot().is_none());

    engine.tick(30_000).unwrap();
    let scheduled = engine.scheduled_bomb_pot().expect("3 из 4 — большинство");
    assert_eq!(scheduled.approved, vec![1, 2, 3]);
}

#[test]
fn bomb_pot_offer_is_validated() {
    let mut engine = table_with(3, TableConfig::default(), TimeRules::standard());

    assert_eq!(
        engine.start_bomb_pot_vote(1, Chips(10), 0),
        Err(EngineError::InvalidStake(Chips(10)))
    );
    assert_eq!(
        engine.start_bomb_pot_vote(1, Chips(5000), 0),
        Err(EngineError::InsufficientChips)
    );
    assert_eq!(
        engine.start_bomb_pot_vote(9, Chips(50), 0),
        Err(EngineError::PlayerNotFound(9))
    );

    engine.start_bomb_pot_vote(1, Chips(50), 0).unwrap();
    assert_eq!(
        engine.start_bomb_pot_vote(2, Chips(50), 0),
        Err(EngineError::VoteAlreadyRunning)
    );

    engine.cast_vote(2, VoteKind::BombPot, true, 100).unwrap();
    engine.cast_vote(3, VoteKind::BombPot, true, 200).unwrap();
    assert_eq!(
        engine.start_bomb_pot_vote(2, Chips(50), 300),
        Err(EngineError::BombPotAlreadyScheduled)
    );

    let disabled = TableConfig {
        bomb_pot_enabled: false,
        ..TableConfig::default()
    };
    let mut engine = table_with(3, disabled, TimeRules::standard());
    assert_eq!(
        engine.start_bomb_pot_vote(1, Chips(50), 0),
        Err(EngineError::VariantDisabled)
    );
}

#[test]
fn yes_vote_requires_enough_chips() {
    let mut engine = table_with(2, TableConfig::default(), TimeRules::standard());
    engine.seat_player_with_chips(3, "Short", Chips(30)).unwrap();

    engine.start_bomb_pot_vote(1, Chips(50), 0).unwrap();
    assert_eq!(
        engine.cast_vote(3, VoteKind::BombPot, true, 100),
        Err(EngineError::InsufficientChips)
    );
    engine.cast_vote(3, VoteKind::BombPot, false, 100).unwrap();

    assert_eq!(
        engine.cast_vote(3, VoteKind::BombPot, false, 200),
        Err(EngineError::AlreadyVoted(3))
    );
    assert_eq!(
        engine.cast_vote(9, VoteKind::BombPot, false, 200),
        Err(EngineError::NotEligibleToVote(9))
    );
    assert_eq!(
        engine.cast_vote(2, VoteKind::RunItTwice, true, 200),
        Err(EngineError::NoVoteRunning)
    );
}

#[test]
fn leaving_player_is_dropped_from_the_vote() {
    let mut engine = table_with(3, TableConfig::default(), TimeRules::standard());

    engine.start_bomb_pot_vote(1, Chips(50), 0).unwrap();
    engine.cast_vote(2, VoteKind::BombPot, true, 100).unwrap();
    assert!(engine.vote(VoteKind::BombPot).is_some());

    // Ушёл единственный, кто не голосовал: все оставшиеся проголосовали "за".
    engine.remove_player(3, 200).unwrap();

    assert!(engine.vote(VoteKind::BombPot).is_none());
    assert_eq!(engine.scheduled_bomb_pot().map(|s| s.approved.clone()), Some(vec![1, 2]));
}

//
// ====================== БОМБ-ПОТ: РАЗДАЧА ======================
//

#[test]
fn bomb_pot_hand_posts_stakes_and_deals_streets_by_timer() {
    let mut engine = table_with(4, TableConfig::default(), TimeRules::standard());
    engine.start_bomb_pot_vote(1, Chips(50), 0).unwrap();
    engine.cast_vote(2, VoteKind::BombPot, true, 100).unwrap();
    engine.cast_vote(3, VoteKind::BombPot, true, 200).unwrap();
    engine.cast_vote(4, VoteKind::BombPot, false, 300).unwrap();
    engine.drain_events();

    engine.start_game(1_000).unwrap();

    let round = engine.round();
    assert_eq!(round.pot.total, Chips(150));
    for id in [1, 2, 3] {
        assert_eq!(chips_of(&engine, id), Chips(950));
        assert!(round.player(id).unwrap().hole_cards.is_some());
    }
    let skipper = round.player(4).unwrap();
    assert!(skipper.folded, "Не согласившийся пропускает раздачу");
    assert!(skipper.hole_cards.is_none());
    assert_eq!(skipper.chips, Chips(1000));

    assert_eq!(round.current_player_index, None, "Торговли нет");
    assert_eq!(round.small_blind_index, None);
    assert!(engine.turn_timer().is_none());
    assert!(engine.scheduled_bomb_pot().is_none(), "Бомб-пот израсходован");
    assert_eq!(
        engine.act(1, PlayerActionKind::Check, 1_500),
        Err(EngineError::NotYourTurn(1))
    );

    let started = engine.drain_events().into_iter().find_map(|e| match e.kind {
        HandEventKind::BombPotStarted { stake, participants } => Some((stake, participants)),
        _ => None,
    });
    assert_eq!(started, Some((Chips(50), vec![1, 2, 3])));

    // Улицы открываются по одной через паузу.
    engine.tick(3_000).unwrap();
    assert_eq!(engine.round().community_cards.len(), 3);
    engine.tick(5_000).unwrap();
    assert_eq!(engine.round().community_cards.len(), 4);
    engine.tick(7_000).unwrap();

    let round = engine.round();
    assert_eq!(round.community_cards.len(), 5);
    assert_eq!(round.phase, Phase::Showdown);
    assert_eq!(engine.last_outcome().map(|o| o.reason), Some(EndReason::BombPot));
    assert_eq!(round.chips_in_play(), Chips(4000));
    assert_eq!(chips_of(&engine, 4), Chips(1000));
}

#[test]
fn bomb_pot_is_cancelled_without_two_participants() {
    let mut engine = table_with(3, TableConfig::default(), instant());
    engine.start_bomb_pot_vote(1, Chips(50), 0).unwrap();
    engine.cast_vote(2, VoteKind::BombPot, true, 100).unwrap();
    engine.cast_vote(3, VoteKind::BombPot, false, 200).unwrap();
    assert!(engine.scheduled_bomb_pot().is_some());

    // Один из согласившихся ушёл до раздачи.
    engine.remove_player(2, 300).unwrap();
    engine.drain_events();
    engine.start_game(400).unwrap();

    let events: Vec<HandEventKind> = engine.drain_events().into_iter().map(|e| e.kind).collect();
    assert!(events.contains(&HandEventKind::BombPotCancelled { stake: Chips(50) }));
    assert!(events
        .iter()
        .any(|e| matches!(e, HandEventKind::HandStarted { bomb_pot: false, .. })));
    assert!(engine.round().bomb_pot.is_none());
    assert!(engine.round().big_blind_index.is_some(), "Обычная раздача с блайндами");
}

//
// ====================== RUN IT TWICE ======================
//

/// Хедз-ап: игрок 2 с тузами, игрок 1 с королями. Оба олл-ин префлоп.
fn heads_up_all_in(config: TableConfig) -> TableEngine {
    let mut board = cards("2c 7d 9h Jc 3s");
    board.extend(cards("Kh 4d 8s 5c Tc"));
    let deck = PresetDeck::for_hands(&[hole("As Ad"), hole("Ks Kd")], &board);
    let mut engine = TableEngine::with_rng(1, "rit", config, instant(), Box::new(deck)).expect("valid config");
    engine.seat_player(1, "P1").unwrap();
    engine.seat_player(2, "P2").unwrap();
    engine.start_game(0).unwrap();

    engine.act(2, PlayerActionKind::Bet(Chips(1000)), 1_000).unwrap();
    engine.act(1, PlayerActionKind::Call, 2_000).unwrap();
    engine
}

#[test]
fn run_it_twice_is_offered_on_all_in() {
    let mut engine = heads_up_all_in(TableConfig::default());

    let round = engine.round();
    assert!(round.all_in_showdown);
    assert!(round.community_cards.is_empty(), "Борд ждёт голосования");
    let vote = engine.vote(VoteKind::RunItTwice).expect("vote offered");
    assert_eq!(vote.kind, VoteKind::RunItTwice);
    assert_eq!(vote.eligible, vec![1, 2]);

    let offered = engine
        .drain_events()
        .into_iter()
        .any(|e| matches!(e.kind, HandEventKind::VoteStarted { kind: VoteKind::RunItTwice, .. }));
    assert!(offered);
}

#[test]
fn unanimous_run_it_twice_splits_the_pot_between_boards() {
    let mut engine = heads_up_all_in(TableConfig::default());
    engine.drain_events();

    engine.cast_vote(1, VoteKind::RunItTwice, true, 3_000).unwrap();
    assert!(engine.last_outcome().is_none());
    engine.cast_vote(2, VoteKind::RunItTwice, true, 3_500).unwrap();

    let round = engine.round();
    assert_eq!(round.phase, Phase::Showdown);
    let dual = round.dual_board.as_ref().expect("two boards dealt");
    assert_eq!(dual.first, cards("2c 7d 9h Jc 3s"));
    assert_eq!(dual.second, cards("Kh 4d 8s 5c Tc"));

    // Тузы держат первый борд, сет королей забирает второй.
    assert_eq!(chips_of(&engine, 1), Chips(1000));
    assert_eq!(chips_of(&engine, 2), Chips(1000));
    assert_eq!(engine.last_outcome().map(|o| o.reason), Some(EndReason::RunItTwice));

    let boards: Vec<u8> = engine
        .drain_events()
        .into_iter()
        .filter_map(|e| match e.kind {
            HandEventKind::PhaseAdvanced { board, .. } => Some(board),
            _ => None,
        })
        .collect();
    assert_eq!(boards, vec![1, 2]);
}

#[test]
fn single_no_runs_one_board() {
    let mut engine = heads_up_all_in(TableConfig::default());

    engine.cast_vote(2, VoteKind::RunItTwice, false, 3_000).unwrap();

    let round = engine.round();
    assert_eq!(round.phase, Phase::Showdown);
    assert!(round.dual_board.is_none());
    assert_eq!(round.community_cards, cards("2c 7d 9h Jc 3s"));
    assert_eq!(chips_of(&engine, 2), Chips(2000), "Тузы выиграли единственный борд");
    assert_eq!(chips_of(&engine, 1), Chips::ZERO);
}

#[test]
fn only_players_in_the_hand_vote_for_run_it_twice() {
    let mut engine = heads_up_all_in(TableConfig::default());
    // Севший посреди раздачи в ней не участвует.
    engine.seat_player(3, "Late").unwrap();

    assert_eq!(
        engine.cast_vote(3, VoteKind::RunItTwice, true, 3_000),
        Err(EngineError::NotEligibleToVote(3))
    );
    assert_eq!(
        engine.cast_vote(1, VoteKind::BombPot, true, 3_000),
        Err(EngineError::NoVoteRunning)
    );

    // Голосование за бомб-пот на следующую раздачу идёт параллельно.
    engine.start_bomb_pot_vote(3, Chips(50), 3_000).unwrap();
    assert_eq!(engine.votes().count(), 2);
    assert_eq!(
        engine.start_bomb_pot_vote(3, Chips(50), 3_100),
        Err(EngineError::VoteAlreadyRunning)
    );
    assert_eq!(engine.vote(VoteKind::BombPot).map(|v| v.eligible.clone()), Some(vec![1, 2, 3]));
}

#[test]
fn run_it_twice_is_offered_while_bomb_pot_vote_runs() {
    let mut engine = table_with(3, TableConfig::default(), instant());
    engine.start_game(0).unwrap();

    // Голосование за бомб-пот открыто посреди раздачи.
    engine.start_bomb_pot_vote(1, Chips(50), 500).unwrap();

    // Дилер 1 ходит первым: олл-ин, SB отвечает, BB сбрасывает.
    engine.act(1, PlayerActionKind::Bet(Chips(1000)), 1_000).unwrap();
    engine.act(2, PlayerActionKind::Call, 2_000).unwrap();
    engine.act(3, PlayerActionKind::Fold, 3_000).unwrap();

    assert!(engine.round().all_in_showdown);
    assert!(engine.round().community_cards.is_empty(), "Борд ждёт голосования");
    let rit = engine.vote(VoteKind::RunItTwice).expect("run-it-twice offered");
    assert_eq!(rit.eligible, vec![1, 2]);
    assert!(engine.vote(VoteKind::BombPot).is_some());
    assert_eq!(engine.votes().count(), 2);

    engine.cast_vote(1, VoteKind::RunItTwice, true, 3_200).unwrap();
    engine.cast_vote(2, VoteKind::RunItTwice, true, 3_400).unwrap();

    assert_eq!(engine.last_outcome().map(|o| o.reason), Some(EndReason::RunItTwice));
    assert_eq!(engine.round().chips_in_play(), Chips(3000));
    let bomb = engine.vote(VoteKind::BombPot).expect("bomb pot vote still running");
    assert_eq!(bomb.yes_count(), 1);
    assert_eq!(engine.bomb_pot_offer(), Some(Chips(50)));
}

#[test]
fn run_it_twice_disabled_runs_out_immediately() {
    let config = TableConfig {
        run_it_twice_enabled: false,
        ..TableConfig::default()
    };
    let engine = heads_up_all_in(config);

    assert!(engine.vote(VoteKind::RunItTwice).is_none());
    assert_eq!(engine.round().phase, Phase::Showdown);
    assert_eq!(engine.last_outcome().map(|o| o.reason), Some(EndReason::Showdown));
}
