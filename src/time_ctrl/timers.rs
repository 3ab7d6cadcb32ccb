// src/time_ctrl/timers.rs
//! Таймеры стола: ход игрока, голосования (своё для каждого варианта), шаги дилера.
//!
//! В каждом слоте не больше одного таймера. У каждого взведённого таймера свой токен;
//! срабатывание принимается, только если токен всё ещё лежит в слоте.
//! Отмена идемпотентна и делается синхронно с мутацией, которая делает таймер устаревшим.

use serde::{Deserialize, Serialize};

use crate::domain::PlayerId;
use crate::variants::vote::VoteKind;

/// Уникальный (в пределах стола) идентификатор взведённого таймера.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(pub u64);

/// Шаги дилера без участия игроков.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum DealerStep {
    /// Открыть следующую улицу олл-ин шоудауна.
    RunOut,
    /// Открыть следующую улицу бомб-пота.
    BombPotStreet,
    /// Начать следующую раздачу.
    NextHand,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimerKind {
    Turn,
    Vote(VoteKind),
    Dealer(DealerStep),
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArmedTimer {
    pub token: TimerToken,
    pub kind: TimerKind,
    /// Для таймера хода — чей ход.
    pub subject: Option<PlayerId>,
    pub expires_at: u64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TimerScheduler {
    next_token: u64,
    turn: Option<ArmedTimer>,
    bomb_pot_vote: Option<ArmedTimer>,
    run_it_twice_vote: Option<ArmedTimer>,
    dealer: Option<ArmedTimer>,
}

impl TimerScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn issue(&mut self, kind: TimerKind, subject: Option<PlayerId>, expires_at: u64) -> ArmedTimer {
        self.next_token += 1;
        ArmedTimer {
            token: TimerToken(self.next_token),
            kind,
            subject,
            expires_at,
        }
    }

    /// Взвести таймер хода. Предыдущий (если был) вытесняется.
    pub fn arm_turn(&mut self, subject: PlayerId, expires_at: u64) -> ArmedTimer {
        let timer = self.issue(TimerKind::Turn, Some(subject), expires_at);
        self.turn = Some(timer);
        timer
    }

    pub fn cancel_turn(&mut self) -> Option<ArmedTimer> {
        self.turn.take()
    }

    fn vote_slot(&mut self, kind: VoteKind) -> &mut Option<ArmedTimer> {
        match kind {
            VoteKind::BombPot => &mut self.bomb_pot_vote,
            VoteKind::RunItTwice => &mut self.run_it_twice_vote,
        }
    }

    /// Взвести таймер голосования своего вида. Голосования разных видов не мешают друг другу.
    pub fn arm_vote(&mut self, kind: VoteKind, expires_at: u64) -> ArmedTimer {
        let timer = self.issue(TimerKind::Vote(kind), None, expires_at);
        *self.vote_slot(kind) = Some(timer);
        timer
    }

    pub fn cancel_vote(&mut self, kind: VoteKind) -> Option<ArmedTimer> {
        self.vote_slot(kind).take()
    }

    pub fn arm_dealer(&mut self, step: DealerStep, expires_at: u64) -> ArmedTimer {
        let timer = self.issue(TimerKind::Dealer(step), None, expires_at);
        self.dealer = Some(timer);
        timer
    }

    pub fn cancel_dealer(&mut self) -> Option<ArmedTimer> {
        self.dealer.take()
    }

    pub fn cancel_all(&mut self) {
        self.turn = None;
        self.bomb_pot_vote = None;
        self.run_it_twice_vote = None;
        self.dealer = None;
    }

    pub fn turn(&self) -> Option<&ArmedTimer> {
        self.turn.as_ref()
    }

    pub fn vote(&self, kind: VoteKind) -> Option<&ArmedTimer> {
        match kind {
            VoteKind::BombPot => self.bomb_pot_vote.as_ref(),
            VoteKind::RunItTwice => self.run_it_twice_vote.as_ref(),
        }
    }

    pub fn dealer(&self) -> Option<&ArmedTimer> {
        self.dealer.as_ref()
    }

    /// Все взведённые таймеры.
    pub fn armed(&self) -> Vec<ArmedTimer> {
        [self.turn, self.bomb_pot_vote, self.run_it_twice_vote, self.dealer]
            .into_iter()
            .flatten()
            .collect()
    }

    /// Ближайший дедлайн среди взведённых таймеров.
    pub fn next_deadline(&self) -> Option<u64> {
        self.armed().iter().map(|t| t.expires_at).min()
    }

    /// Самый ранний просроченный на момент `now` таймер (не снимая его).
    pub fn due(&self, now: u64) -> Option<ArmedTimer> {
        self.armed()
            .into_iter()
            .filter(|t| t.expires_at <= now)
            .min_by_key(|t| (t.expires_at, t.token))
    }

    /// Снять таймер по токену. None — таймер уже отменён или заменён.
    pub fn take(&mut self, token: TimerToken) -> Option<ArmedTimer> {
        let slots = [
            &mut self.turn,
            &mut self.bomb_pot_vote,
            &mut self.run_it_twice_vote,
            &mut self.dealer,
        ];
        for slot in slots {
            if slot.map(|t| t.token) == Some(token) {
                return slot.take();
            }
        }
        None
    }
}
