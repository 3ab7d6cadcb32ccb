//! Асинхронная обвязка: актор на каждый стол поверх синхронного `TableEngine`.
//!
//! Команды и срабатывания таймеров идут через одну очередь актора,
//! поэтому движок видит их строго по очереди.

pub mod actor;
pub mod directory;

pub use actor::{TableActor, TableHandle, TableMessage};
pub use directory::TableDirectory;
