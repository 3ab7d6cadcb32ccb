use core::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{Chips, PlayerId};

/// Тип действия игрока.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerActionKind {
    Fold,
    Check,
    Call,
    /// Bet/raise: сумма — итоговая ставка игрока на улице ("до скольких").
    Bet(Chips),
}

impl fmt::Display for PlayerActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerActionKind::Fold => f.write_str("fold"),
            PlayerActionKind::Check => f.write_str("check"),
            PlayerActionKind::Call => f.write_str("call"),
            PlayerActionKind::Bet(amount) => write!(f, "bet {amount}"),
        }
    }
}

/// Кто инициировал действие: сам игрок или истёкший таймер.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActionSource {
    Manual,
    Timeout,
}

/// Конкретное действие игрока.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerAction {
    pub player_id: PlayerId,
    pub kind: PlayerActionKind,
}

impl PlayerAction {
    pub fn new(player_id: PlayerId, kind: PlayerActionKind) -> Self {
        Self { player_id, kind }
    }
}
