use core::fmt;

use serde::{Deserialize, Serialize};

/// Фаза раздачи.
///
/// `Waiting` — стол ждёт игроков или паузы между раздачами,
/// `Showdown` — раздача решена, банк разыгран.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Waiting,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Phase {
    /// Идёт ли торговля/раскладка (раздача ещё не решена).
    pub fn is_live(self) -> bool {
        matches!(self, Phase::Preflop | Phase::Flop | Phase::Turn | Phase::River)
    }

    /// Следующая улица и сколько общих карт на ней открывается.
    pub fn next_street(self) -> Option<(Phase, usize)> {
        match self {
            Phase::Preflop => Some((Phase::Flop, 3)),
            Phase::Flop => Some((Phase::Turn, 1)),
            Phase::Turn => Some((Phase::River, 1)),
            _ => None,
        }
    }

    /// Фаза, соответствующая количеству открытых общих карт.
    pub fn for_board_len(len: usize) -> Phase {
        match len {
            0..=2 => Phase::Preflop,
            3 => Phase::Flop,
            4 => Phase::Turn,
            _ => Phase::River,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Waiting => "waiting",
            Phase::Preflop => "preflop",
            Phase::Flop => "flop",
            Phase::Turn => "turn",
            Phase::River => "river",
            Phase::Showdown => "showdown",
        };
        f.write_str(s)
    }
}
