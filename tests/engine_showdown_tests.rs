//! Тесты розыгрыша банка.
//!
//! Здесь проверяем:
//! - сплит с нечётной фишкой (по порядку мест после дилера);
//! - победу фолдом без сравнения карт;
//! - добровольное открытие карт и rabbit hunt;
//! - деление банка между двумя бордами run-it-twice.

use holdem_engine::domain::card::{parse_cards, Card};
use holdem_engine::domain::chips::Chips;
use holdem_engine::domain::hand::Phase;
use holdem_engine::domain::player::Player;
use holdem_engine::domain::round::Round;
use holdem_engine::domain::table::TableConfig;
use holdem_engine::domain::PlayerId;
use holdem_engine::engine::showdown::{resolve_run_it_twice, resolve_single_board};
use holdem_engine::engine::{EndReason, EngineError, HandEventKind, PlayerActionKind, TableEngine};
use holdem_engine::infra::rng::PresetDeck;
use holdem_engine::time_ctrl::TimeRules;
use holdem_engine::variants::run_it_twice::{split_for_boards, DualBoard};

fn cards(s: &str) -> Vec<Card> {
    parse_cards(s).expect("valid cards")
}

fn hole(s: &str) -> [Card; 2] {
    let c = cards(s);
    [c[0], c[1]]
}

/// Игрок с картами и вкладом, стек после вклада.
fn showdown_player(id: PlayerId, hand: &str, contribution: u64, folded: bool) -> Player {
    let mut p = Player::new(id, format!("P{id}"), Chips(500));
    p.hole_cards = Some(hole(hand));
    p.total_contribution = Chips(contribution);
    p.folded = folded;
    p
}

/// Раунд на ривере с заданными игроками и бордом.
fn river_round(players: Vec<Player>, board: &str) -> Round {
    let pot: Chips = players.iter().map(|p| p.total_contribution).sum();
    let mut round = Round::waiting(players, Chips(20));
    round.hand_id = 1;
    round.phase = Phase::River;
    round.community_cards = cards(board);
    round.pot.add(pot);
    round.dealer_index = 0;
    round
}

/// Хедз-ап стол с заряженной колодой. Порядок раздачи: игрок 2, игрок 1.
fn heads_up(p2: &str, p1: &str, board: &str) -> TableEngine {
    let deck = PresetDeck::for_hands(&[hole(p2), hole(p1)], &cards(board));
    let mut engine = TableEngine::with_rng(
        1,
        "showdown",
        TableConfig::default(),
        TimeRules::standard(),
        Box::new(deck),
    )
    .expect("valid config");
    engine.seat_player(1, "P1").unwrap();
    engine.seat_player(2, "P2").unwrap();
    engine
}

//
// ====================== СПЛИТ ======================
//

#[test]
fn odd_chip_goes_to_first_winner_after_dealer() {
    // Оба оставшихся играют стрит с борда, игрок 3 сфолдил.
    let players = vec![
        showdown_player(1, "2c 3c", 15, false),
        showdown_player(2, "4h 5h", 15, false),
        showdown_player(3, "6d 7d", 15, true),
    ];
    let mut round = river_round(players, "Ac Kd Qh Js Td");

    let outcome = resolve_single_board(&mut round, EndReason::Showdown).unwrap();

    assert_eq!(outcome.pot, Chips(45));
    assert_eq!(outcome.tiers.len(), 1);
    assert_eq!(outcome.tiers[0].winners, vec![2, 1], "Порядок мест начинается после дилера");
    assert_eq!(outcome.won_by(2), Chips(23), "Лишняя фишка первому после дилера");
    assert_eq!(outcome.won_by(1), Chips(22));
    assert_eq!(outcome.won_by(3), Chips::ZERO);
    assert!(round.pot.total.is_zero());
    assert_eq!(round.player(2).unwrap().chips, Chips(523));
}

#[test]
fn folded_hand_is_ranked_but_never_paid() {
    // У сфолдившего лучшая рука, но банк уходит оставшемуся.
    let players = vec![
        showdown_player(1, "As Ah", 40, true),
        showdown_player(2, "7c 2d", 40, false),
        showdown_player(3, "8c 3d", 40, false),
    ];
    let mut round = river_round(players, "Ac Kd 9h 5s 4d");

    let outcome = resolve_single_board(&mut round, EndReason::Showdown).unwrap();

    assert_eq!(outcome.won_by(1), Chips::ZERO);
    assert_eq!(outcome.won_by(3), Chips(120), "Восьмёрка-старшая бьёт семёрку");
    let folded = outcome.results.iter().find(|r| r.player_id == 1).unwrap();
    assert!(folded.folded);
    assert!(folded.rank.is_some(), "Ранг есть для показа");
}

//
// ====================== ПОБЕДА ФОЛДОМ ======================
//

#[test]
fn fold_win_pays_without_comparing_hands() {
    let mut engine = heads_up("As Ad", "7c 2d", "Kh Qh Jh Th 9h");
    engine.start_game(0).unwrap();

    engine.act(2, PlayerActionKind::Fold, 1_000).unwrap();

    let round = engine.round();
    assert_eq!(round.phase, Phase::Showdown);
    assert!(round.won_by_fold);
    assert!(round.community_cards.is_empty(), "Борд не докладывается");
    assert_eq!(round.player(1).unwrap().chips, Chips(1010));

    let outcome = engine.last_outcome().unwrap();
    assert_eq!(outcome.reason, EndReason::FoldWin);
    assert!(outcome.results.iter().all(|r| r.rank.is_none()), "Карты не сравниваются");

    let events = engine.drain_events();
    assert!(
        !events.iter().any(|e| matches!(e.kind, HandEventKind::CardsShown { .. })),
        "Никто не открывает карты сам по себе"
    );
}

//
// ====================== REVEAL И RABBIT HUNT ======================
//

#[test]
fn reveal_is_allowed_only_after_the_hand() {
    let mut engine = heads_up("As Ad", "7c 2d", "Kh Qh Jh Th 9h");
    engine.start_game(0).unwrap();

    assert_eq!(engine.request_reveal(1, 500), Err(EngineError::RevealNotAllowed));

    engine.act(2, PlayerActionKind::Fold, 1_000).unwrap();
    engine.drain_events();

    engine.request_reveal(1, 1_500).unwrap();
    engine.request_reveal(1, 1_600).unwrap();

    let shown: Vec<[Card; 2]> = engine
        .drain_events()
        .into_iter()
        .filter_map(|e| match e.kind {
            HandEventKind::CardsShown { player_id: 1, cards } => Some(cards),
            _ => None,
        })
        .collect();
    assert_eq!(shown, vec![hole("7c 2d")], "Повторное открытие не дублирует событие");
    assert_eq!(engine.round().shown, vec![1]);
}

#[test]
fn rabbit_hunt_peeks_at_the_missing_board() {
    let mut engine = heads_up("As Ad", "7c 2d", "Kh Qh Jh Th 9h");
    engine.start_game(0).unwrap();
    assert_eq!(
        engine.request_rabbit_hunt(2, 500),
        Err(EngineError::RabbitHuntNotAllowed)
    );

    engine.act(2, PlayerActionKind::Fold, 1_000).unwrap();
    engine.drain_events();

    engine.request_rabbit_hunt(2, 1_500).unwrap();
    engine.request_rabbit_hunt(1, 1_600).unwrap();

    let round = engine.round();
    assert_eq!(round.rabbit_cards, cards("Kh Qh Jh Th 9h"));
    assert!(round.community_cards.is_empty(), "Rabbit hunt не трогает борд");
    assert_eq!(round.player(1).unwrap().chips, Chips(1010), "И не трогает выплаты");

    let hunts = engine
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e.kind, HandEventKind::RabbitHunt { .. }))
        .count();
    assert_eq!(hunts, 1);
    assert_eq!(
        engine.request_rabbit_hunt(9, 1_700),
        Err(EngineError::PlayerNotFound(9))
    );
}

#[test]
fn rabbit_hunt_is_refused_after_a_real_showdown() {
    let mut engine = heads_up("As Ad", "7c 2d", "Kh Qh Jh Th 9h");
    engine.start_game(0).unwrap();
    engine.act(2, PlayerActionKind::Call, 1_000).unwrap();

    // Дальше все чекают до ривера включительно.
    for step in 0..7u64 {
        let id = engine.round().current_player().map(|p| p.id).expect("someone to act");
        engine.act(id, PlayerActionKind::Check, 2_000 + step * 100).unwrap();
    }

    assert_eq!(engine.round().phase, Phase::Showdown);
    assert!(!engine.round().won_by_fold);
    assert_eq!(
        engine.request_rabbit_hunt(1, 3_000),
        Err(EngineError::RabbitHuntNotAllowed)
    );
}

//
// ====================== RUN IT TWICE ======================
//

#[test]
fn run_it_twice_splits_every_tier_between_boards() {
    // Вклады 50 и 51: основной слой 100 и лишняя фишка игрока 2.
    let players = vec![
        showdown_player(1, "As Ad", 50, false),
        showdown_player(2, "Ks Kd", 51, false),
    ];
    let mut round = river_round(players, "2c 7d 9h");
    let dual = DualBoard {
        first: cards("2c 7d 9h Jc 3s"),
        second: cards("2c 7d 9h Kh 4d"),
    };

    let outcome = resolve_run_it_twice(&mut round, &dual).unwrap();

    assert_eq!(outcome.reason, EndReason::RunItTwice);
    assert_eq!(outcome.pot, Chips(101));

    let on_board = |board: u8| -> Chips {
        outcome
            .tiers
            .iter()
            .filter(|t| t.board == board)
            .map(|t| t.amount)
            .sum()
    };
    assert_eq!(on_board(1), Chips(51), "Первому борду большая половина");
    assert_eq!(on_board(2), Chips(50));

    // Первый борд: тузы. Второй: сет королей.
    assert_eq!(outcome.won_by(1), Chips(50));
    assert_eq!(outcome.won_by(2), Chips(51));
    let p2 = outcome.results.iter().find(|r| r.player_id == 2).unwrap();
    assert!(p2.second_rank.is_some());
    assert!(round.pot.total.is_zero());
}

#[test]
fn run_it_twice_halves_differ_by_at_most_one_chip() {
    // Вклады 1/2/3: три нечётных слоя (3, 2, 1), банк 6.
    let players = vec![
        showdown_player(1, "As Ad", 1, false),
        showdown_player(2, "Ks Kd", 2, false),
        showdown_player(3, "Qs Qd", 3, false),
    ];
    let mut round = river_round(players, "2c 7d 9h");
    let dual = DualBoard {
        first: cards("2c 7d 9h Jc 3s"),
        second: cards("2c 7d 9h 4h 5c"),
    };

    let outcome = resolve_run_it_twice(&mut round, &dual).unwrap();

    let on_board = |board: u8| -> Chips {
        outcome
            .tiers
            .iter()
            .filter(|t| t.board == board)
            .map(|t| t.amount)
            .sum()
    };
    assert_eq!(outcome.tiers.len(), 6);
    assert_eq!(on_board(1), Chips(3), "Банк делится пополам целиком, а не слой за слоем");
    assert_eq!(on_board(2), Chips(3));

    // Тузы берут общий слой на обоих бордах, короли средний, дамы свой остаток.
    assert_eq!(outcome.won_by(1), Chips(3));
    assert_eq!(outcome.won_by(2), Chips(2));
    assert_eq!(outcome.won_by(3), Chips(1));
    assert!(round.pot.total.is_zero());
}

#[test]
fn board_halves_always_cover_the_amount() {
    for amount in 0..200u64 {
        let (first, second) = split_for_boards(Chips(amount));
        assert_eq!(first + second, Chips(amount));
        assert!(first >= second);
        assert!(first.0 - second.0 <= 1);
    }
}
