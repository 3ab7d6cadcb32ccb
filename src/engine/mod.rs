//! Покерный движок: ставки, переход улиц, сайд-поты, шоудаун, таймеры стола.
//!
//! Высокоуровневый объект: `TableEngine` (один стол).
//! Основные операции:
//!   - `start_game` – запустить первую раздачу
//!   - `act` – применить действие игрока
//!   - `cast_vote` / `start_bomb_pot_vote` – голосования вариантов
//!   - `tick` / `on_timer` – срабатывание таймеров
//!
//! `TableManager` держит много независимых столов.

pub mod actions;
pub mod betting;
pub mod errors;
pub mod game_loop;
pub mod hand_history;
pub mod positions;
pub mod pot;
pub mod showdown;
pub mod side_pots;
pub mod table_engine;
pub mod table_manager;
pub mod validation;

use crate::domain::card::Card;

pub use actions::{ActionSource, PlayerAction, PlayerActionKind};
pub use errors::{ConfigError, EngineError, ErrorKind};
pub use game_loop::Progress;
pub use hand_history::{HandEvent, HandEventKind, HandHistory};
pub use pot::Pot;
pub use showdown::{EndReason, RoundOutcome};
pub use side_pots::{derive_tiers, live_side_pots, PotTier};
pub use table_engine::TableEngine;
pub use table_manager::{ManagerError, TableManager};

/// Источник перестановки колоды. Реализации — в `infra::rng`.
pub trait RandomSource {
    fn shuffle(&mut self, cards: &mut [Card]);
}
