use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::player::Player;
use crate::domain::round::Round;
use crate::domain::table::TableConfig;
use crate::domain::PlayerId;
use crate::engine::errors::EngineError;
use crate::engine::pot::commit;
use crate::variants::vote::{Vote, VoteKind, VoteRule};

/// Одобренный бомб-пот, ждущий следующей раздачи.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduledBombPot {
    pub stake: Chips,
    /// Проголосовавшие "за".
    pub approved: Vec<PlayerId>,
}

/// Бомб-пот в текущей раздаче.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BombPotHand {
    pub stake: Chips,
    pub participants: Vec<PlayerId>,
}

/// Проверить предложение бомб-пота от игрока.
pub fn validate_offer(config: &TableConfig, initiator: &Player, stake: Chips) -> Result<(), EngineError> {
    if !config.bomb_pot_enabled {
        return Err(EngineError::VariantDisabled);
    }
    if stake < config.big_blind {
        return Err(EngineError::InvalidStake(stake));
    }
    if stake > initiator.chips {
        return Err(EngineError::InsufficientChips);
    }
    Ok(())
}

/// Открыть голосование: голосуют все сидящие, инициатор сразу "за".
pub fn open_vote(seated: &[Player], initiator: PlayerId, expires_at: u64) -> Result<Vote, EngineError> {
    let eligible = seated.iter().map(|p| p.id).collect();
    let mut vote = Vote::new(VoteKind::BombPot, VoteRule::Majority, eligible, expires_at);
    vote.cast(initiator, true)?;
    Ok(vote)
}

/// Участники: проголосовавшие "за", у кого на момент раздачи хватает фишек.
pub fn select_participants(players: &[Player], scheduled: &ScheduledBombPot) -> Vec<PlayerId> {
    players
        .iter()
        .filter(|p| scheduled.approved.contains(&p.id) && p.chips >= scheduled.stake)
        .map(|p| p.id)
        .collect()
}

/// Участники вносят ставку, остальные пропускают раздачу (сброшены).
pub fn post_stakes(round: &mut Round, bomb: &BombPotHand) {
    let Round { players, pot, .. } = round;
    for player in players.iter_mut() {
        if bomb.participants.contains(&player.id) {
            commit(player, pot, bomb.stake, false);
        } else {
            player.folded = true;
        }
    }
}
