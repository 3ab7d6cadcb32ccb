//! Машина состояний торговли: блайнды, очередь хода, действия, переход улиц,
//! обнаружение олл-ин шоудауна.
//!
//! Функции работают над одной `Round` и пишут события в `HandHistory`.
//! Таймеры и варианты стола — забота `TableEngine`, сюда они не попадают.

use crate::domain::chips::Chips;
use crate::domain::hand::Phase;
use crate::domain::round::Round;
use crate::domain::table::TableConfig;
use crate::domain::SeatIndex;
use crate::engine::actions::{ActionSource, PlayerAction, PlayerActionKind};
use crate::engine::errors::EngineError;
use crate::engine::hand_history::{HandEventKind, HandHistory};
use crate::engine::positions::{blind_positions, next_index_where};
use crate::engine::pot::commit;
use crate::engine::validation::{diff_to_call, validate_action};

/// Что должно произойти после мутации раунда.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    /// Ход за игроком с этим индексом.
    AwaitingAction { index: usize },
    /// Ставок больше не будет, борд надо доложить.
    AllInShowdown,
    /// Остался один игрок.
    FoldWin,
    /// Торговля на ривере закончена.
    Showdown,
}

/// Блайнды и анте большого блайнда.
///
/// SB — первый после дилера, BB — следующий. Анте BB платит до блайнда,
/// оно идёт во вклад, но не в ставку улицы.
pub fn post_blinds(round: &mut Round, config: &TableConfig, history: &mut HandHistory) -> Result<(), EngineError> {
    let (sb, bb) = blind_positions(round.players.len(), round.dealer_index)
        .ok_or(EngineError::NotEnoughPlayers)?;

    let Round { players, pot, .. } = &mut *round;

    let ante = if config.bb_ante_enabled && !config.bb_ante_amount.is_zero() {
        let paid = commit(&mut players[bb], pot, config.bb_ante_amount, false);
        Some((players[bb].id, paid))
    } else {
        None
    };

    let sb_paid = commit(&mut players[sb], pot, config.small_blind, true);
    let bb_paid = commit(&mut players[bb], pot, config.big_blind, true);

    let sb_id = players[sb].id;
    let bb_id = players[bb].id;

    round.small_blind_index = Some(sb);
    round.big_blind_index = Some(bb);
    round.betting.current_bet = config.big_blind;
    round.betting.min_raise = config.big_blind;

    history.push(
        round.hand_id,
        HandEventKind::BlindsPosted {
            small_blind: Some((sb_id, sb_paid)),
            big_blind: Some((bb_id, bb_paid)),
            ante,
        },
    );
    Ok(())
}

/// По две карманные карты всем, кто в раздаче, начиная с первого после дилера.
pub fn deal_hole_cards(round: &mut Round) -> Result<(), EngineError> {
    let n = round.players.len();
    let order: Vec<usize> = (1..=n)
        .map(|step| (round.dealer_index + step) % n)
        .filter(|&idx| round.players[idx].is_in_hand())
        .collect();

    let mut first = Vec::with_capacity(order.len());
    for _ in &order {
        first.push(round.deck.draw()?);
    }
    for (i, &idx) in order.iter().enumerate() {
        let second = round.deck.draw()?;
        round.players[idx].hole_cards = Some([first[i], second]);
    }
    Ok(())
}

/// Проверить действие, ничего не меняя: чей ход и допустимо ли оно.
pub fn check_action(round: &Round, config: &TableConfig, action: &PlayerAction) -> Result<usize, EngineError> {
    if !round.phase.is_live() || round.all_in_showdown {
        return Err(EngineError::NoActiveRound);
    }
    let idx = round
        .player_index(action.player_id)
        .ok_or(EngineError::PlayerNotFound(action.player_id))?;
    if round.current_player_index != Some(idx) {
        return Err(EngineError::NotYourTurn(action.player_id));
    }
    validate_action(&round.players[idx], &action.kind, &round.betting, config.big_blind)?;
    Ok(idx)
}

/// Применить действие игрока и продвинуть раунд.
///
/// При ошибке раунд не меняется.
pub fn apply_action(
    round: &mut Round,
    config: &TableConfig,
    action: PlayerAction,
    source: ActionSource,
    history: &mut HandHistory,
) -> Result<Progress, EngineError> {
    let idx = check_action(round, config, &action)?;

    let moved = {
        let Round {
            players,
            pot,
            betting,
            ..
        } = &mut *round;

        let moved = match action.kind {
            PlayerActionKind::Fold => {
                players[idx].folded = true;
                Chips::ZERO
            }
            PlayerActionKind::Check => Chips::ZERO,
            PlayerActionKind::Call => {
                let gap = diff_to_call(&players[idx], betting);
                commit(&mut players[idx], pot, gap, true)
            }
            PlayerActionKind::Bet(total) => {
                let add = total - players[idx].current_bet;
                let moved = commit(&mut players[idx], pot, add, true);
                let new_bet = players[idx].current_bet;

                if new_bet > betting.current_bet {
                    if new_bet - betting.current_bet >= betting.min_raise {
                        // Полный рейз: остальные должны ответить заново.
                        betting.on_full_raise(action.player_id, new_bet);
                        for (i, other) in players.iter_mut().enumerate() {
                            if i != idx && other.can_act() {
                                other.has_acted = false;
                            }
                        }
                    } else {
                        // Неполный олл-ин не переоткрывает торговлю.
                        betting.on_short_all_in(new_bet);
                    }
                }
                moved
            }
        };
        players[idx].has_acted = true;
        moved
    };

    history.push(
        round.hand_id,
        HandEventKind::ActionApplied {
            seat: idx as SeatIndex,
            player_id: action.player_id,
            action: action.kind,
            amount: moved,
            source,
        },
    );

    progress_from(round, config, idx, history)
}

/// Олл-ин шоудаун: минимум двое в раздаче, кто-то в олл-ине,
/// и торговаться больше некому (или единственный оставшийся уже уравнял).
pub fn is_all_in_showdown(round: &Round) -> bool {
    if round.in_hand_count() < 2 {
        return false;
    }
    let anyone_all_in = round
        .players_in_hand()
        .any(|p| p.is_all_in || p.chips.is_zero());
    if !anyone_all_in {
        return false;
    }

    let max_bet = round
        .players_in_hand()
        .map(|p| p.current_bet)
        .max()
        .unwrap_or(Chips::ZERO);
    let mut can_act = round.players.iter().filter(|p| p.can_act());

    match (can_act.next(), can_act.next()) {
        (None, _) => true,
        (Some(lone), None) => lone.current_bet >= max_bet && (lone.has_acted || max_bet.is_zero()),
        _ => false,
    }
}

/// Найти следующего, кто должен ходить, начиная после `from`.
/// Если таких нет — открыть следующую улицу (или сообщить о шоудауне).
pub fn progress_from(
    round: &mut Round,
    config: &TableConfig,
    from: usize,
    history: &mut HandHistory,
) -> Result<Progress, EngineError> {
    let mut from = from;
    loop {
        if round.in_hand_count() <= 1 {
            round.current_player_index = None;
            return Ok(Progress::FoldWin);
        }
        if is_all_in_showdown(round) {
            round.current_player_index = None;
            return Ok(Progress::AllInShowdown);
        }

        // Ходит тот, кто ещё не действовал после последнего полного рейза или не уравнял.
        let current_bet = round.betting.current_bet;
        let next = next_index_where(&round.players, from, |p| {
            p.can_act() && (!p.has_acted || p.current_bet < current_bet)
        });

        match next {
            Some(index) => {
                round.current_player_index = Some(index);
                return Ok(Progress::AwaitingAction { index });
            }
            None if round.phase == Phase::River => {
                round.current_player_index = None;
                return Ok(Progress::Showdown);
            }
            None => {
                deal_next_street(round, history)?;
                reset_street(round, config);
                from = round.dealer_index;
            }
        }
    }
}

/// Открыть следующую улицу (флоп — 3 карты, тёрн и ривер — по одной).
pub fn deal_next_street(round: &mut Round, history: &mut HandHistory) -> Result<Phase, EngineError> {
    let (next, count) = round
        .phase
        .next_street()
        .ok_or(EngineError::Internal("no street after river"))?;

    let cards = round.deck.draw_n(count)?;
    round.community_cards.extend(cards);
    round.phase = next;

    history.push(
        round.hand_id,
        HandEventKind::PhaseAdvanced {
            phase: next,
            community_cards: round.community_cards.clone(),
            board: 1,
        },
    );
    Ok(next)
}

/// Новая улица: ставки улицы обнуляются, минимальный рейз = BB.
pub fn reset_street(round: &mut Round, config: &TableConfig) {
    for p in round.players.iter_mut() {
        p.reset_for_street();
    }
    round.betting.reset_for_street(config.big_blind);
    round.current_player_index = None;
}
