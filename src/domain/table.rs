use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::engine::errors::ConfigError;

/// Индекс места за столом (порядок посадки).
pub type SeatIndex = u8;

/// Конфиг стола. Движок его только читает.
///
/// Любое поле можно опустить в JSON — подставится значение по умолчанию.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TableConfig {
    pub small_blind: Chips,
    pub big_blind: Chips,
    /// Стек, с которым игрок садится за стол.
    pub starting_chips: Chips,
    /// Сколько секунд даётся на ход.
    pub turn_timeout_secs: u64,
    /// Анте большого блайнда: BB платит его за весь стол.
    pub bb_ante_enabled: bool,
    pub bb_ante_amount: Chips,
    pub bomb_pot_enabled: bool,
    pub run_it_twice_enabled: bool,
    /// Меньше игроков — раздача не стартует.
    pub min_players: usize,
    pub max_players: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            small_blind: Chips(10),
            big_blind: Chips(20),
            starting_chips: Chips(1000),
            turn_timeout_secs: 15,
            bb_ante_enabled: false,
            bb_ante_amount: Chips(20),
            bomb_pot_enabled: true,
            run_it_twice_enabled: true,
            min_players: 2,
            max_players: 8,
        }
    }
}

impl TableConfig {
    /// Прочитать конфиг из JSON и сразу проверить.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: TableConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.small_blind.is_zero() || self.big_blind.is_zero() {
            return Err(ConfigError::ZeroBlind);
        }
        if self.small_blind > self.big_blind {
            return Err(ConfigError::SmallBlindAboveBigBlind {
                small: self.small_blind,
                big: self.big_blind,
            });
        }
        if self.starting_chips < self.big_blind {
            return Err(ConfigError::StartingStackTooSmall(self.starting_chips));
        }
        if self.turn_timeout_secs == 0 {
            return Err(ConfigError::ZeroTurnTimeout);
        }
        if self.min_players < 2 || self.min_players > self.max_players {
            return Err(ConfigError::BadPlayerLimits {
                min: self.min_players,
                max: self.max_players,
            });
        }
        // 2 карманные на игрока + 5 на борде, плюс второй борд при run-it-twice.
        if self.max_players * 2 + 10 > 52 {
            return Err(ConfigError::BadPlayerLimits {
                min: self.min_players,
                max: self.max_players,
            });
        }
        Ok(())
    }

    pub fn turn_timeout_ms(&self) -> u64 {
        self.turn_timeout_secs * 1000
    }
}
