use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::Phase;
use crate::domain::{HandId, PlayerId, TableId};
use crate::engine::showdown::EndReason;
use crate::eval::HandCategory;
use crate::variants::vote::VoteKind;

/// DTO игрока за столом (уже с учётом того, кто смотрит).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerViewDto {
    pub player_id: PlayerId,
    pub name: String,
    pub seat_index: u8,
    pub chips: Chips,
    pub current_bet: Chips,
    pub total_contribution: Chips,
    pub folded: bool,
    pub is_all_in: bool,
    pub is_dealer: bool,
    pub is_small_blind: bool,
    pub is_big_blind: bool,
    pub is_current: bool,
    /// Карманные карты — только если наблюдателю их можно видеть.
    pub hole_cards: Option<[Card; 2]>,
    /// Категория руки и карты для подсветки (при ≥3 картах на борде).
    pub hand_category: Option<HandCategory>,
    pub forming_cards: Vec<Card>,
}

/// Таймер хода.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TurnTimerDto {
    pub player_id: PlayerId,
    pub expires_at: u64,
}

/// Идущее голосование.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteDto {
    pub kind: VoteKind,
    pub eligible: Vec<PlayerId>,
    pub yes: usize,
    pub no: usize,
    pub expires_at: u64,
    /// Ставка бомб-пота, за которую голосуют.
    pub stake: Option<Chips>,
    /// Голос наблюдателя, если он уже проголосовал.
    pub my_vote: Option<bool>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SidePotDto {
    pub amount: Chips,
    pub eligible: Vec<PlayerId>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DualBoardDto {
    pub first: Vec<Card>,
    pub second: Vec<Card>,
}

/// Итог последней раздачи.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutcomeDto {
    pub reason: EndReason,
    pub pot: Chips,
    pub winners: Vec<(PlayerId, Chips)>,
    pub pots: Vec<SidePotDto>,
}

/// DTO стола глазами конкретного наблюдателя.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableViewDto {
    pub table_id: TableId,
    pub name: String,
    pub hand_id: HandId,
    pub phase: Phase,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub pot: Chips,
    pub community_cards: Vec<Card>,
    pub players: Vec<PlayerViewDto>,
    pub current_player_id: Option<PlayerId>,
    pub current_bet: Chips,
    pub min_raise: Chips,
    /// Подсказки для наблюдателя, если сейчас его ход.
    pub can_check: bool,
    pub call_amount: Chips,
    pub min_bet: Chips,
    pub side_pots: Vec<SidePotDto>,
    pub turn_timer: Option<TurnTimerDto>,
    /// Идущие голосования, не больше одного каждого вида.
    pub votes: Vec<VoteDto>,
    pub bomb_pot: bool,
    pub all_in_showdown: bool,
    pub won_by_fold: bool,
    pub dual_board: Option<DualBoardDto>,
    pub rabbit_cards: Vec<Card>,
    pub last_outcome: Option<OutcomeDto>,
}
