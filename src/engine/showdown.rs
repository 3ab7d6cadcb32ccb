//! Розыгрыш банка: победа фолдом, обычный шоудаун, два борда (run-it-twice).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::player::Player;
use crate::domain::round::Round;
use crate::domain::PlayerId;
use crate::engine::errors::EngineError;
use crate::engine::side_pots::{derive_tiers, PotTier};
use crate::eval::{best_hand, HandRank};
use crate::variants::run_it_twice::{split_tiers_for_boards, DualBoard};

/// Почему раздача закончилась.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum EndReason {
    FoldWin,
    Showdown,
    RunItTwice,
    BombPot,
}

/// Как разыгран один слой банка на одном борде.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TierResult {
    /// 1 или 2.
    pub board: u8,
    pub amount: Chips,
    pub eligible: Vec<PlayerId>,
    pub winners: Vec<PlayerId>,
}

/// Итог игрока в раздаче. Для сфолдивших ранги только для показа.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerResult {
    pub player_id: PlayerId,
    pub folded: bool,
    pub rank: Option<HandRank>,
    /// Ранг на втором борде (run-it-twice).
    pub second_rank: Option<HandRank>,
    pub won: Chips,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundOutcome {
    pub reason: EndReason,
    pub pot: Chips,
    pub tiers: Vec<TierResult>,
    pub results: Vec<PlayerResult>,
}

impl RoundOutcome {
    /// Выигрыши (только ненулевые), в порядке мест.
    pub fn awards(&self) -> Vec<(PlayerId, Chips)> {
        self.results
            .iter()
            .filter(|r| !r.won.is_zero())
            .map(|r| (r.player_id, r.won))
            .collect()
    }

    pub fn won_by(&self, id: PlayerId) -> Chips {
        self.results
            .iter()
            .find(|r| r.player_id == id)
            .map(|r| r.won)
            .unwrap_or(Chips::ZERO)
    }
}

/// Остался один игрок: весь банк ему, карты не сравниваются и не открываются.
pub fn resolve_fold_win(round: &mut Round) -> Result<RoundOutcome, EngineError> {
    let winner_idx = round
        .players
        .iter()
        .position(|p| p.is_in_hand())
        .ok_or(EngineError::Internal("fold win without a survivor"))?;

    let pot = round.pot.take_all();
    let winner = &mut round.players[winner_idx];
    winner.chips += pot;
    let winner_id = winner.id;

    let results = round
        .players
        .iter()
        .map(|p| PlayerResult {
            player_id: p.id,
            folded: p.folded,
            rank: None,
            second_rank: None,
            won: if p.id == winner_id { pot } else { Chips::ZERO },
        })
        .collect();

    Ok(RoundOutcome {
        reason: EndReason::FoldWin,
        pot,
        tiers: vec![TierResult {
            board: 1,
            amount: pot,
            eligible: vec![winner_id],
            winners: vec![winner_id],
        }],
        results,
    })
}

/// Обычный шоудаун на одном борде (`round.community_cards`, 5 карт).
pub fn resolve_single_board(round: &mut Round, reason: EndReason) -> Result<RoundOutcome, EngineError> {
    let board = round.community_cards.clone();
    let ranks = rank_players(&round.players, &board);
    let tiers = derive_tiers(&round.players, round.pot.total);
    let order = settlement_order(round);

    let mut won: HashMap<PlayerId, Chips> = HashMap::new();
    let mut tier_results = Vec::with_capacity(tiers.len());
    for tier in &tiers {
        tier_results.push(award_tier(tier, tier.amount, 1, &ranks, &order, &mut won));
    }

    finish(round, reason, tier_results, won, ranks, HashMap::new())
}

/// Run-it-twice: банк делится пополам (первому борду большая половина) по слоям,
/// половины разыгрываются на своих бордах, выигрыши суммируются.
pub fn resolve_run_it_twice(round: &mut Round, dual: &DualBoard) -> Result<RoundOutcome, EngineError> {
    let first_ranks = rank_players(&round.players, &dual.first);
    let second_ranks = rank_players(&round.players, &dual.second);
    let tiers = derive_tiers(&round.players, round.pot.total);
    let order = settlement_order(round);

    let mut won: HashMap<PlayerId, Chips> = HashMap::new();
    let amounts: Vec<Chips> = tiers.iter().map(|t| t.amount).collect();
    let halves = split_tiers_for_boards(&amounts);

    let mut tier_results = Vec::with_capacity(tiers.len() * 2);
    for (tier, (first_half, second_half)) in tiers.iter().zip(halves) {
        tier_results.push(award_tier(tier, first_half, 1, &first_ranks, &order, &mut won));
        tier_results.push(award_tier(tier, second_half, 2, &second_ranks, &order, &mut won));
    }

    finish(
        round,
        EndReason::RunItTwice,
        tier_results,
        won,
        first_ranks,
        second_ranks,
    )
}

/// Ранги всех, у кого есть карты (включая сфолдивших — для показа).
fn rank_players(players: &[Player], board: &[Card]) -> HashMap<PlayerId, HandRank> {
    players
        .iter()
        .filter_map(|p| p.hole_cards.map(|hole| (p.id, best_hand(&hole, board))))
        .collect()
}

/// Порядок мест, начиная с первого после дилера. По нему раздаются лишние фишки сплита.
fn settlement_order(round: &Round) -> Vec<PlayerId> {
    let n = round.players.len();
    (1..=n)
        .map(|step| round.players[(round.dealer_index + step) % n].id)
        .collect()
}

fn award_tier(
    tier: &PotTier,
    amount: Chips,
    board: u8,
    ranks: &HashMap<PlayerId, HandRank>,
    order: &[PlayerId],
    won: &mut HashMap<PlayerId, Chips>,
) -> TierResult {
    let mut best: Option<&HandRank> = None;
    for id in &tier.eligible {
        if let Some(rank) = ranks.get(id) {
            if best.map_or(true, |b| rank.beats(b)) {
                best = Some(rank);
            }
        }
    }

    let mut winners: Vec<PlayerId> = match best {
        Some(best) => order
            .iter()
            .copied()
            .filter(|id| tier.eligible.contains(id))
            .filter(|id| ranks.get(id).map_or(false, |r| r.ties(best)))
            .collect(),
        // Ни у кого нет карт (не должно случаться): слой делят все претенденты.
        None => order
            .iter()
            .copied()
            .filter(|id| tier.eligible.contains(id))
            .collect(),
    };
    if winners.is_empty() {
        winners = tier.eligible.clone();
    }

    let (share, remainder) = amount.split(winners.len());
    for (i, id) in winners.iter().enumerate() {
        let extra = if (i as u64) < remainder.0 {
            Chips(1)
        } else {
            Chips::ZERO
        };
        *won.entry(*id).or_insert(Chips::ZERO) += share + extra;
    }

    TierResult {
        board,
        amount,
        eligible: tier.eligible.clone(),
        winners,
    }
}

fn finish(
    round: &mut Round,
    reason: EndReason,
    tiers: Vec<TierResult>,
    won: HashMap<PlayerId, Chips>,
    mut first_ranks: HashMap<PlayerId, HandRank>,
    mut second_ranks: HashMap<PlayerId, HandRank>,
) -> Result<RoundOutcome, EngineError> {
    let paid: Chips = won.values().copied().sum();
    if paid != round.pot.total {
        return Err(EngineError::Internal("showdown payout does not match the pot"));
    }
    let pot = round.pot.take_all();

    let mut results = Vec::with_capacity(round.players.len());
    for player in round.players.iter_mut() {
        let amount = won.get(&player.id).copied().unwrap_or(Chips::ZERO);
        player.chips += amount;
        results.push(PlayerResult {
            player_id: player.id,
            folded: player.folded,
            rank: first_ranks.remove(&player.id),
            second_rank: second_ranks.remove(&player.id),
            won: amount,
        });
    }

    Ok(RoundOutcome {
        reason,
        pot,
        tiers,
        results,
    })
}
