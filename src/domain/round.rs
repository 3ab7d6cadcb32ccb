use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::deck::Deck;
use crate::domain::hand::Phase;
use crate::domain::player::Player;
use crate::domain::{HandId, PlayerId};
use crate::engine::betting::BettingState;
use crate::engine::pot::Pot;
use crate::engine::showdown::RoundOutcome;
use crate::variants::bomb_pot::BombPotHand;
use crate::variants::run_it_twice::DualBoard;

/// Одна раздача.
///
/// Порядок `players` фиксирован на всю раздачу; индексы (дилер, блайнды,
/// текущий игрок) ссылаются на этот вектор.
/// Инвариант: `pot.total == Σ players.total_contribution`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Round {
    pub hand_id: HandId,
    pub players: Vec<Player>,
    /// Оставшиеся (не розданные) карты.
    pub deck: Deck,
    pub community_cards: Vec<Card>,
    pub pot: Pot,
    pub phase: Phase,
    pub betting: BettingState,
    pub current_player_index: Option<usize>,
    pub dealer_index: usize,
    pub small_blind_index: Option<usize>,
    pub big_blind_index: Option<usize>,
    /// Все, кроме одного, сбросили карты.
    pub won_by_fold: bool,
    /// Торговля закончилась досрочно, борд докладывается без ставок.
    pub all_in_showdown: bool,
    pub bomb_pot: Option<BombPotHand>,
    pub dual_board: Option<DualBoard>,
    pub outcome: Option<RoundOutcome>,
    /// Игроки, добровольно открывшие карты после раздачи.
    pub shown: Vec<PlayerId>,
    /// Карты, которые "вышли бы" после победы фолдом (только для показа).
    pub rabbit_cards: Vec<Card>,
}

impl Round {
    /// Пустой раунд в ожидании: игроки сидят, карт нет.
    pub fn waiting(players: Vec<Player>, big_blind: Chips) -> Self {
        Self {
            hand_id: 0,
            players,
            deck: Deck { cards: Vec::new() },
            community_cards: Vec::new(),
            pot: Pot::new(),
            phase: Phase::Waiting,
            betting: BettingState::new(big_blind),
            current_player_index: None,
            dealer_index: 0,
            small_blind_index: None,
            big_blind_index: None,
            won_by_fold: false,
            all_in_showdown: false,
            bomb_pot: None,
            dual_board: None,
            outcome: None,
            shown: Vec::new(),
            rabbit_cards: Vec::new(),
        }
    }

    pub fn player_index(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.current_player_index.and_then(|i| self.players.get(i))
    }

    /// Игроки, ещё претендующие на банк.
    pub fn players_in_hand(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_in_hand())
    }

    pub fn in_hand_count(&self) -> usize {
        self.players_in_hand().count()
    }

    pub fn can_act_count(&self) -> usize {
        self.players.iter().filter(|p| p.can_act()).count()
    }

    /// Сумма всех вкладов за раздачу (должна совпадать с `pot.total`).
    pub fn contributed_total(&self) -> Chips {
        self.players.iter().map(|p| p.total_contribution).sum()
    }

    /// Фишки на столе: стеки плюс банк.
    pub fn chips_in_play(&self) -> Chips {
        self.players.iter().map(|p| p.chips).sum::<Chips>() + self.pot.total
    }

    pub fn is_bomb_pot_participant(&self, id: PlayerId) -> bool {
        self.bomb_pot
            .as_ref()
            .map(|b| b.participants.contains(&id))
            .unwrap_or(false)
    }
}
