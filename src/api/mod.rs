//! Внешний API движка.
//!
//! Здесь описываются:
//! - команды (commands.rs) — всё, что игрок может сделать за столом;
//! - запросы (queries.rs) — маскированный снимок стола для наблюдателя;
//! - DTO (dto.rs) — структуры для клиента;
//! - ошибки (errors.rs) — то, что видит клиент.

pub mod commands;
pub mod dto;
pub mod errors;
pub mod queries;

pub use commands::*;
pub use dto::*;
pub use errors::*;
pub use queries::*;
