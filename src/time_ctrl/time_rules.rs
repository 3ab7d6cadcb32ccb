// src/time_ctrl/time_rules.rs
//! Задержки стола, не зависящие от игроков: голосования и "анимационные" шаги дилера.
//!
//! Время хода задаётся в `TableConfig::turn_timeout_secs`.

use serde::{Deserialize, Serialize};

use crate::engine::errors::ConfigError;

/// Правила тайминга стола (всё в миллисекундах).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimeRules {
    /// Сколько длится голосование за бомб-пот.
    pub bomb_pot_vote_ms: u64,
    /// Сколько длится голосование за run-it-twice.
    pub run_it_twice_vote_ms: u64,
    /// Пауза между улицами при докладке олл-ин шоудауна.
    pub run_out_card_delay_ms: u64,
    /// Пауза между улицами бомб-пота.
    pub bomb_pot_street_delay_ms: u64,
    /// Пауза между концом раздачи и началом следующей.
    pub next_hand_delay_ms: u64,
}

impl TimeRules {
    /// Стандартный профиль: 30 с / 15 с на голосования, 1.5 с на карту, 2 с на улицу бомб-пота, 5 с между раздачами.
    pub const fn standard() -> Self {
        Self {
            bomb_pot_vote_ms: 30_000,
            run_it_twice_vote_ms: 15_000,
            run_out_card_delay_ms: 1_500,
            bomb_pot_street_delay_ms: 2_000,
            next_hand_delay_ms: 5_000,
        }
    }

    /// Нулевые задержки шагов дилера (удобно для тестов и симуляций).
    pub const fn instant_dealer() -> Self {
        Self {
            bomb_pot_vote_ms: 30_000,
            run_it_twice_vote_ms: 15_000,
            run_out_card_delay_ms: 0,
            bomb_pot_street_delay_ms: 0,
            next_hand_delay_ms: 0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bomb_pot_vote_ms == 0 || self.run_it_twice_vote_ms == 0 {
            return Err(ConfigError::BadTimeRules("vote windows must be positive"));
        }
        Ok(())
    }
}

impl Default for TimeRules {
    fn default() -> Self {
        Self::standard()
    }
}
