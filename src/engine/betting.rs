use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::PlayerId;

/// Состояние торговли на текущей улице.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BettingState {
    /// Текущая ставка, до которой должны дотянуться игроки.
    pub current_bet: Chips,
    /// Минимальный размер повышающей части рейза.
    pub min_raise: Chips,
    /// Последний, кто сделал полный bet/raise.
    pub last_aggressor: Option<PlayerId>,
}

impl BettingState {
    pub fn new(big_blind: Chips) -> Self {
        Self {
            current_bet: Chips::ZERO,
            min_raise: big_blind,
            last_aggressor: None,
        }
    }

    /// Новая улица: ставок нет, минимальный рейз снова равен BB.
    pub fn reset_for_street(&mut self, big_blind: Chips) {
        self.current_bet = Chips::ZERO;
        self.min_raise = big_blind;
        self.last_aggressor = None;
    }

    /// Минимальная допустимая итоговая ставка для bet/raise.
    pub fn min_total_bet(&self) -> Chips {
        self.current_bet + self.min_raise
    }

    /// Полный рейз: новый уровень и новый минимальный шаг.
    pub fn on_full_raise(&mut self, player_id: PlayerId, new_bet: Chips) {
        self.min_raise = new_bet - self.current_bet;
        self.current_bet = new_bet;
        self.last_aggressor = Some(player_id);
    }

    /// Неполный олл-ин поверх ставки: уровень растёт, шаг рейза прежний.
    pub fn on_short_all_in(&mut self, new_bet: Chips) {
        if new_bet > self.current_bet {
            self.current_bet = new_bet;
        }
    }
}
