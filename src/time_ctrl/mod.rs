// src/time_ctrl/mod.rs
//! Контроль времени стола.
//!
//! Здесь собираем:
//! - правила задержек (`TimeRules`);
//! - планировщик таймеров с токенами (`TimerScheduler`).
//!
//! Время везде — миллисекунды `u64` от произвольной точки отсчёта (её задаёт владелец стола).

pub mod time_rules;
pub mod timers;

pub use time_rules::TimeRules;
pub use timers::{ArmedTimer, DealerStep, TimerKind, TimerScheduler, TimerToken};
