use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::PlayerId;
use crate::engine::actions::PlayerActionKind;
use crate::engine::TableEngine;
use crate::variants::vote::VoteKind;

use super::dto::TableViewDto;
use super::errors::ApiError;
use super::queries::build_table_view;

/// Команда игрока к столу.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Command {
    Fold,
    Check,
    Call,
    /// Итоговая ставка на улице ("до скольких").
    Bet { amount: Chips },
    CastVote { kind: VoteKind, choice: bool },
    /// Открыть свои карты после раздачи.
    RequestReveal,
    /// Предложить бомб-пот на следующую раздачу.
    StartBombPotVote { stake: Chips },
    /// Посмотреть несыгранный борд после победы фолдом.
    RequestRabbitHunt,
}

impl Command {
    /// Разобрать команду из JSON (клиентский формат).
    pub fn from_json(raw: &str) -> Result<Self, ApiError> {
        serde_json::from_str(raw).map_err(|e| ApiError::BadRequest(e.to_string()))
    }

    fn as_action(&self) -> Option<PlayerActionKind> {
        match self {
            Command::Fold => Some(PlayerActionKind::Fold),
            Command::Check => Some(PlayerActionKind::Check),
            Command::Call => Some(PlayerActionKind::Call),
            Command::Bet { amount } => Some(PlayerActionKind::Bet(*amount)),
            _ => None,
        }
    }
}

/// Выполнить команду игрока и вернуть стол глазами этого игрока.
pub fn execute(
    engine: &mut TableEngine,
    player_id: PlayerId,
    command: Command,
    now: u64,
) -> Result<TableViewDto, ApiError> {
    if let Some(kind) = command.as_action() {
        engine.act(player_id, kind, now)?;
    } else {
        match command {
            Command::CastVote { kind, choice } => engine.cast_vote(player_id, kind, choice, now)?,
            Command::RequestReveal => engine.request_reveal(player_id, now)?,
            Command::StartBombPotVote { stake } => engine.start_bomb_pot_vote(player_id, stake, now)?,
            Command::RequestRabbitHunt => engine.request_rabbit_hunt(player_id, now)?,
            Command::Fold | Command::Check | Command::Call | Command::Bet { .. } => {}
        }
    }

    Ok(build_table_view(engine, Some(player_id)))
}
