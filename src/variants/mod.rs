//! Варианты стола поверх обычной торговли: бомб-пот и run-it-twice.
//! Оба запускаются голосованием (`vote`).

pub mod bomb_pot;
pub mod run_it_twice;
pub mod vote;

pub use bomb_pot::{BombPotHand, ScheduledBombPot};
pub use run_it_twice::DualBoard;
pub use vote::{Vote, VoteKind, VoteRule, VoteStatus};
