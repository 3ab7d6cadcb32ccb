use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::PlayerId;
use crate::engine::errors::EngineError;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum VoteKind {
    BombPot,
    RunItTwice,
}

/// Правило подсчёта голосов.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum VoteRule {
    /// "За" больше половины всех имеющих право голоса (не поданных голосов).
    Majority,
    /// Все "за"; первое "против" сразу отклоняет.
    Unanimous,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum VoteStatus {
    Pending,
    Approved,
    Rejected,
}

/// Голосование за вариант стола. Живёт до решения или до таймаута.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vote {
    pub kind: VoteKind,
    pub rule: VoteRule,
    pub eligible: Vec<PlayerId>,
    pub cast: BTreeMap<PlayerId, bool>,
    pub expires_at: u64,
}

impl Vote {
    pub fn new(kind: VoteKind, rule: VoteRule, eligible: Vec<PlayerId>, expires_at: u64) -> Self {
        Self {
            kind,
            rule,
            eligible,
            cast: BTreeMap::new(),
            expires_at,
        }
    }

    /// Принять голос. Повторный голос и чужаки отклоняются.
    pub fn cast(&mut self, voter: PlayerId, choice: bool) -> Result<VoteStatus, EngineError> {
        if !self.eligible.contains(&voter) {
            return Err(EngineError::NotEligibleToVote(voter));
        }
        if self.cast.contains_key(&voter) {
            return Err(EngineError::AlreadyVoted(voter));
        }
        self.cast.insert(voter, choice);
        Ok(self.status())
    }

    pub fn yes_count(&self) -> usize {
        self.cast.values().filter(|v| **v).count()
    }

    pub fn no_count(&self) -> usize {
        self.cast.values().filter(|v| !**v).count()
    }

    pub fn all_voted(&self) -> bool {
        self.eligible.iter().all(|id| self.cast.contains_key(id))
    }

    /// Текущее состояние без учёта времени.
    pub fn status(&self) -> VoteStatus {
        match self.rule {
            VoteRule::Majority => {
                if self.all_voted() {
                    self.majority_verdict()
                } else {
                    VoteStatus::Pending
                }
            }
            VoteRule::Unanimous => {
                if self.no_count() > 0 {
                    VoteStatus::Rejected
                } else if self.all_voted() {
                    VoteStatus::Approved
                } else {
                    VoteStatus::Pending
                }
            }
        }
    }

    /// Итог по истечении времени: неподанные голоса не считаются "за".
    pub fn resolve_on_timeout(&self) -> VoteStatus {
        match self.rule {
            VoteRule::Majority => self.majority_verdict(),
            VoteRule::Unanimous => VoteStatus::Rejected,
        }
    }

    /// Проголосовавшие "за", в порядке мест.
    pub fn yes_voters(&self) -> Vec<PlayerId> {
        self.eligible
            .iter()
            .copied()
            .filter(|id| self.cast.get(id).copied().unwrap_or(false))
            .collect()
    }

    fn majority_verdict(&self) -> VoteStatus {
        if self.yes_count() * 2 > self.eligible.len() {
            VoteStatus::Approved
        } else {
            VoteStatus::Rejected
        }
    }
}
