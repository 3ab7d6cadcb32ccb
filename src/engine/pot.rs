use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::player::Player;

/// Общий банк раздачи. Деление на слои — в `side_pots`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pot {
    pub total: Chips,
}

impl Pot {
    pub fn new() -> Self {
        Self { total: Chips::ZERO }
    }

    pub fn add(&mut self, amount: Chips) {
        self.total += amount;
    }

    /// Забрать весь банк (при выплате).
    pub fn take_all(&mut self) -> Chips {
        let total = self.total;
        self.total = Chips::ZERO;
        total
    }
}

/// Перенести до `amount` фишек из стека игрока в банк.
///
/// Стек, вклад игрока и банк меняются одним шагом.
/// `to_street_bet` — засчитывать ли в ставку улицы (анте и бомб-пот не засчитываются).
/// Возвращает реально перенесённую сумму.
pub fn commit(player: &mut Player, pot: &mut Pot, amount: Chips, to_street_bet: bool) -> Chips {
    let moved = if player.chips < amount {
        player.chips
    } else {
        amount
    };
    if moved.is_zero() {
        return moved;
    }

    player.chips -= moved;
    player.total_contribution += moved;
    if to_street_bet {
        player.current_bet += moved;
    }
    pot.add(moved);

    if player.chips.is_zero() {
        player.is_all_in = true;
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_caps_at_stack_and_marks_all_in() {
        let mut p = Player::new(1, "p1", Chips(30));
        let mut pot = Pot::new();

        let moved = commit(&mut p, &mut pot, Chips(50), true);

        assert_eq!(moved, Chips(30));
        assert!(p.is_all_in);
        assert_eq!(p.current_bet, Chips(30));
        assert_eq!(p.total_contribution, Chips(30));
        assert_eq!(pot.total, Chips(30));
    }

    #[test]
    fn ante_does_not_count_as_street_bet() {
        let mut p = Player::new(1, "p1", Chips(100));
        let mut pot = Pot::new();

        commit(&mut p, &mut pot, Chips(20), false);

        assert_eq!(p.current_bet, Chips::ZERO);
        assert_eq!(p.total_contribution, Chips(20));
        assert!(!p.is_all_in);
    }
}
