//! Оценка силы покерных рук (Texas Hold'em).
//!
//! Основная функция:
//!   `best_hand(hole, community) -> HandRank`

pub mod evaluator;
pub mod hand_rank;
pub mod lookup_tables;

pub use evaluator::best_hand;
pub use hand_rank::{HandCategory, HandRank};
