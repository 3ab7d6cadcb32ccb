//! Проекция состояния стола для конкретного наблюдателя.
//!
//! Только чтение: результат уходит клиентам и обратно в движок не попадает.

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::Phase;
use crate::domain::player::Player;
use crate::domain::round::Round;
use crate::domain::PlayerId;
use crate::engine::side_pots::live_side_pots;
use crate::engine::TableEngine;
use crate::eval::best_hand;
use crate::variants::vote::VoteKind;

use super::dto::{
    DualBoardDto, OutcomeDto, PlayerViewDto, SidePotDto, TableViewDto, TurnTimerDto, VoteDto,
};

/// Видит ли `observer` карманные карты `player`.
///
/// Свои — всегда. Чужие — на шоудауне (не после фолда), при олл-ин шоудауне
/// и если владелец открыл их сам. Карты участников бомб-пота видят все сидящие
/// за столом, но не зрители.
pub fn can_see_hole_cards(round: &Round, player: &Player, observer: Option<PlayerId>) -> bool {
    if observer == Some(player.id) {
        return true;
    }
    if round.shown.contains(&player.id) {
        return true;
    }
    if player.folded {
        return false;
    }
    let seated = observer.map_or(false, |id| round.player(id).is_some());
    if seated && round.is_bomb_pot_participant(player.id) {
        return true;
    }
    (round.phase == Phase::Showdown && !round.won_by_fold) || round.all_in_showdown
}

/// Сформировать DTO стола глазами `observer` (None — зритель).
pub fn build_table_view(engine: &TableEngine, observer: Option<PlayerId>) -> TableViewDto {
    let round = engine.round();
    let config = engine.config();

    // Для подсветки берём первый борд, если раздача шла в два.
    let board: &[Card] = match &round.dual_board {
        Some(dual) => &dual.first,
        None => &round.community_cards,
    };

    let players = round
        .players
        .iter()
        .enumerate()
        .map(|(idx, p)| build_player_dto(round, idx, p, observer, board))
        .collect();

    let min_bet = if round.betting.current_bet.is_zero() {
        config.big_blind
    } else {
        round.betting.current_bet + round.betting.min_raise
    };

    let (can_check, call_amount) = match observer.and_then(|id| round.player(id)) {
        Some(me) if me.can_act() && round.phase.is_live() => {
            let gap = round.betting.current_bet.saturating_sub(me.current_bet);
            (gap.is_zero(), gap.min(me.chips))
        }
        _ => (false, Chips::ZERO),
    };

    let side_pots = live_side_pots(&round.players, round.pot.total)
        .into_iter()
        .map(|t| SidePotDto {
            amount: t.amount,
            eligible: t.eligible,
        })
        .collect();

    let turn_timer = engine.turn_timer().and_then(|t| {
        t.subject.map(|player_id| TurnTimerDto {
            player_id,
            expires_at: t.expires_at,
        })
    });

    let votes = engine
        .votes()
        .map(|v| VoteDto {
            kind: v.kind,
            eligible: v.eligible.clone(),
            yes: v.yes_count(),
            no: v.no_count(),
            expires_at: v.expires_at,
            stake: match v.kind {
                VoteKind::BombPot => engine.bomb_pot_offer(),
                VoteKind::RunItTwice => None,
            },
            my_vote: observer.and_then(|id| v.cast.get(&id).copied()),
        })
        .collect();

    let last_outcome = round.outcome.as_ref().map(|o| OutcomeDto {
        reason: o.reason,
        pot: o.pot,
        winners: o.awards(),
        pots: o
            .tiers
            .iter()
            .map(|t| SidePotDto {
                amount: t.amount,
                eligible: t.eligible.clone(),
            })
            .collect(),
    });

    TableViewDto {
        table_id: engine.table_id(),
        name: engine.name().to_string(),
        hand_id: round.hand_id,
        phase: round.phase,
        small_blind: config.small_blind,
        big_blind: config.big_blind,
        pot: round.pot.total,
        community_cards: round.community_cards.clone(),
        players,
        current_player_id: round.current_player().map(|p| p.id),
        current_bet: round.betting.current_bet,
        min_raise: round.betting.min_raise,
        can_check,
        call_amount,
        min_bet,
        side_pots,
        turn_timer,
        votes,
        bomb_pot: round.bomb_pot.is_some(),
        all_in_showdown: round.all_in_showdown,
        won_by_fold: round.won_by_fold,
        dual_board: round.dual_board.as_ref().map(|d| DualBoardDto {
            first: d.first.clone(),
            second: d.second.clone(),
        }),
        rabbit_cards: round.rabbit_cards.clone(),
        last_outcome,
    }
}

fn build_player_dto(
    round: &Round,
    idx: usize,
    player: &Player,
    observer: Option<PlayerId>,
    board: &[Card],
) -> PlayerViewDto {
    let hole_cards = player
        .hole_cards
        .filter(|_| can_see_hole_cards(round, player, observer));

    let (hand_category, forming_cards) = match hole_cards {
        Some(hole) if board.len() >= 3 => {
            let rank = best_hand(&hole, board);
            (Some(rank.category), rank.forming_cards)
        }
        _ => (None, Vec::new()),
    };

    let live = round.phase != Phase::Waiting;
    PlayerViewDto {
        player_id: player.id,
        name: player.name.clone(),
        seat_index: idx as u8,
        chips: player.chips,
        current_bet: player.current_bet,
        total_contribution: player.total_contribution,
        folded: player.folded,
        is_all_in: player.is_all_in,
        is_dealer: live && round.dealer_index == idx,
        is_small_blind: round.small_blind_index == Some(idx),
        is_big_blind: round.big_blind_index == Some(idx),
        is_current: round.current_player_index == Some(idx),
        hole_cards,
        hand_category,
        forming_cards,
    }
}
