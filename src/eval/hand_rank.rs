use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::domain::card::Card;

/// Категория покерной руки по силе (1 — старшая карта, 10 — роял-флеш).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandCategory {
    HighCard = 1,
    OnePair = 2,
    TwoPair = 3,
    ThreeOfAKind = 4,
    Straight = 5,
    Flush = 6,
    FullHouse = 7,
    FourOfAKind = 8,
    StraightFlush = 9,
    RoyalFlush = 10,
}

impl HandCategory {
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            HandCategory::HighCard => "High card",
            HandCategory::OnePair => "One pair",
            HandCategory::TwoPair => "Two pair",
            HandCategory::ThreeOfAKind => "Three of a kind",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full house",
            HandCategory::FourOfAKind => "Four of a kind",
            HandCategory::StraightFlush => "Straight flush",
            HandCategory::RoyalFlush => "Royal flush",
        }
    }
}

/// Результат оценки руки.
///
/// `tiebreak` — веса рангов (2..14) по убыванию значимости.
/// `forming_cards` — карты, образующие категорию (для подсветки в UI),
/// в сравнении не участвуют.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandRank {
    pub category: HandCategory,
    pub tiebreak: Vec<u8>,
    pub forming_cards: Vec<Card>,
}

impl HandRank {
    /// Сравнение силы: сначала категория, затем тай-брейк поэлементно.
    /// `Equal` — сплит.
    pub fn compare(&self, other: &HandRank) -> Ordering {
        self.category
            .cmp(&other.category)
            .then_with(|| self.tiebreak.cmp(&other.tiebreak))
    }

    pub fn beats(&self, other: &HandRank) -> bool {
        self.compare(other) == Ordering::Greater
    }

    pub fn ties(&self, other: &HandRank) -> bool {
        self.compare(other) == Ordering::Equal
    }

    /// Человеческое описание: "Full house", "One pair" и т.п.
    pub fn describe(&self) -> String {
        self.category.name().to_string()
    }
}
