use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::PlayerId;

/// Игрок за столом.
///
/// Стек (`chips`) живёт между раздачами, остальные поля сбрасываются
/// в начале каждой раздачи (`reset_for_hand`) или улицы (`reset_for_street`).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Текущий стек за столом.
    pub chips: Chips,
    /// Карманные карты. None — игрок не получил карт в этой раздаче.
    pub hole_cards: Option<[Card; 2]>,
    /// Ставка на текущей улице.
    pub current_bet: Chips,
    /// Сколько всего внесено в банк за раздачу (блайнды, анте, ставки).
    pub total_contribution: Chips,
    pub folded: bool,
    pub is_all_in: bool,
    /// Сделал ли игрок действие после последнего полного рейза.
    pub has_acted: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, chips: Chips) -> Self {
        Self {
            id,
            name: name.into(),
            chips,
            hole_cards: None,
            current_bet: Chips::ZERO,
            total_contribution: Chips::ZERO,
            folded: false,
            is_all_in: false,
            has_acted: false,
        }
    }

    /// Всё ещё претендует на банк.
    pub fn is_in_hand(&self) -> bool {
        !self.folded
    }

    /// Может делать ставки: в раздаче, не в олл-ине и есть фишки.
    pub fn can_act(&self) -> bool {
        !self.folded && !self.is_all_in && !self.chips.is_zero()
    }

    pub fn reset_for_hand(&mut self) {
        self.hole_cards = None;
        self.current_bet = Chips::ZERO;
        self.total_contribution = Chips::ZERO;
        self.folded = false;
        self.is_all_in = false;
        self.has_acted = false;
    }

    pub fn reset_for_street(&mut self) {
        self.current_bet = Chips::ZERO;
        self.has_acted = false;
    }
}
