use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::domain::card::Card;
use crate::engine::RandomSource;

/// Боевой RNG: перемешивание Фишера–Йейтса на `thread_rng`.
#[derive(Clone, Debug, Default)]
pub struct SystemRng;

impl RandomSource for SystemRng {
    fn shuffle(&mut self, cards: &mut [Card]) {
        cards.shuffle(&mut rand::thread_rng());
    }
}

/// Детерминированный RNG для тестов и реплея.
/// Позволяет воспроизводить одни и те же раздачи при одинаковом seed.
#[derive(Clone, Debug)]
pub struct DeterministicRng {
    inner: StdRng,
}

impl DeterministicRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for DeterministicRng {
    fn shuffle(&mut self, cards: &mut [Card]) {
        cards.shuffle(&mut self.inner);
    }
}

/// "Заряженная" колода: заданные карты выходят первыми и в заданном порядке,
/// остальные лежат под ними в исходном порядке.
///
/// Одна и та же раскладка применяется к каждой новой колоде.
#[derive(Clone, Debug, Default)]
pub struct PresetDeck {
    top: Vec<Card>,
}

impl PresetDeck {
    /// Карты в порядке выдачи.
    pub fn new(top: Vec<Card>) -> Self {
        Self { top }
    }

    /// Раскладка под раздачу: `hands` — карманные карты в порядке раздачи
    /// (с первого после дилера), `board` — следующие карты колоды.
    pub fn for_hands(hands: &[[Card; 2]], board: &[Card]) -> Self {
        let mut top: Vec<Card> = hands.iter().map(|h| h[0]).collect();
        top.extend(hands.iter().map(|h| h[1]));
        top.extend_from_slice(board);
        Self { top }
    }
}

impl RandomSource for PresetDeck {
    fn shuffle(&mut self, cards: &mut [Card]) {
        let mut arranged: Vec<Card> = cards
            .iter()
            .copied()
            .filter(|c| !self.top.contains(c))
            .collect();
        // Колода раздаётся с конца.
        arranged.extend(self.top.iter().rev().copied().filter(|c| cards.contains(c)));
        if arranged.len() == cards.len() {
            cards.copy_from_slice(&arranged);
        }
    }
}
