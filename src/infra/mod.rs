//! Инфраструктурный слой вокруг движка:
//! - генерация ID;
//! - RNG-реализации для колоды.

pub mod ids;
pub mod rng;

pub use ids::*;
pub use rng::*;
