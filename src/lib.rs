//! Движок No-Limit Hold'em на много столов.
//!
//! Слои:
//! - `domain` — карты, фишки, игроки, раздача, конфиг стола;
//! - `eval` — оценка рук;
//! - `engine` — торговля, банк и сайд-поты, шоудаун, стол целиком (`TableEngine`);
//! - `variants` — бомб-пот и run-it-twice с голосованиями;
//! - `time_ctrl` — таймеры хода, голосований и шагов дилера;
//! - `api` — команды, DTO, маскированный вид стола;
//! - `runtime` — tokio-актор на каждый стол;
//! - `infra` — RNG и генерация ID.

pub mod api;
pub mod domain;
pub mod engine;
pub mod eval;
pub mod infra;
pub mod runtime;
pub mod time_ctrl;
pub mod variants;
