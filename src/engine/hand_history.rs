use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::Phase;
use crate::domain::{HandId, PlayerId, SeatIndex};
use crate::engine::actions::{ActionSource, PlayerActionKind};
use crate::engine::showdown::EndReason;
use crate::variants::vote::VoteKind;

/// Событие стола. Уходит подписчикам после каждой принятой мутации или срабатывания таймера.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum HandEventKind {
    /// Новая раздача началась.
    HandStarted {
        hand_id: HandId,
        dealer: PlayerId,
        bomb_pot: bool,
    },

    /// Блайнды и анте.
    BlindsPosted {
        small_blind: Option<(PlayerId, Chips)>,
        big_blind: Option<(PlayerId, Chips)>,
        ante: Option<(PlayerId, Chips)>,
    },

    /// Принятое действие игрока (ручное или по таймауту).
    ActionApplied {
        seat: SeatIndex,
        player_id: PlayerId,
        action: PlayerActionKind,
        /// Сколько фишек реально ушло в банк этим действием.
        amount: Chips,
        source: ActionSource,
    },

    /// Открыта новая улица. `board` = 1 или 2 (второй борд run-it-twice).
    PhaseAdvanced {
        phase: Phase,
        community_cards: Vec<Card>,
        board: u8,
    },

    TimerArmed {
        seat: SeatIndex,
        player_id: PlayerId,
        expires_at: u64,
    },

    TimerCleared {
        player_id: PlayerId,
    },

    /// Торговля закончена, борд докладывается без ставок.
    AllInShowdown,

    VoteStarted {
        kind: VoteKind,
        eligible: Vec<PlayerId>,
        expires_at: u64,
    },

    VoteUpdated {
        kind: VoteKind,
        voter: PlayerId,
        choice: bool,
        yes: usize,
        no: usize,
    },

    VoteResolved {
        kind: VoteKind,
        approved: bool,
    },

    BombPotStarted {
        stake: Chips,
        participants: Vec<PlayerId>,
    },

    BombPotCancelled {
        stake: Chips,
    },

    /// Раздача решена: кто сколько выиграл и какие были слои банка.
    RoundEnded {
        winners: Vec<(PlayerId, Chips)>,
        pots: Vec<Chips>,
        reason: EndReason,
    },

    CardsShown {
        player_id: PlayerId,
        cards: [Card; 2],
    },

    RabbitHunt {
        cards: Vec<Card>,
    },

    PlayerBusted {
        player_id: PlayerId,
    },

    /// Игроков меньше минимума — игра остановлена.
    GameOver {
        remaining: Vec<PlayerId>,
    },
}

/// Событие с порядковым номером (сквозным для стола) и номером раздачи.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandEvent {
    pub index: u64,
    pub hand_id: HandId,
    pub kind: HandEventKind,
}

/// Очередь событий стола: движок пишет, владелец стола забирает через `drain`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandHistory {
    next_index: u64,
    pub events: Vec<HandEvent>,
}

impl HandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, hand_id: HandId, kind: HandEventKind) {
        let index = self.next_index;
        self.next_index += 1;
        self.events.push(HandEvent {
            index,
            hand_id,
            kind,
        });
    }

    /// Забрать накопленные события. Нумерация при этом не сбрасывается.
    pub fn drain(&mut self) -> Vec<HandEvent> {
        std::mem::take(&mut self.events)
    }
}
