use serde::{Deserialize, Serialize};

use crate::domain::{Chips, PlayerId, TableId};
use crate::engine::{EngineError, ManagerError};

/// Стабильная причина отказа. Клиент может на неё ветвиться,
/// текст сообщения при этом может меняться.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum RejectReason {
    TableNotFound,
    PlayerNotFound,
    PlayerAlreadySeated,
    TableFull,
    NotEnoughPlayers,
    HandAlreadyInProgress,
    NoActiveRound,
    NotYourTurn,
    CannotCheck,
    CannotCall,
    BelowMinimumRaise,
    RaiseNotReopened,
    InsufficientChips,
    VariantDisabled,
    VoteAlreadyRunning,
    NoVoteRunning,
    NotEligibleToVote,
    AlreadyVoted,
    InvalidStake,
    BombPotAlreadyScheduled,
    RevealNotAllowed,
    RabbitHuntNotAllowed,
}

/// Ошибки внешнего API (то, что отдаём клиенту).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApiError {
    /// Неправильные входные данные (например, битый JSON).
    BadRequest(String),

    /// Команда отклонена, состояние стола не изменилось.
    Rejected {
        reason: RejectReason,
        /// Для `BelowMinimumRaise` — минимально допустимая ставка.
        min_amount: Option<Chips>,
        player_id: Option<PlayerId>,
        message: String,
    },

    /// Стол не найден.
    TableNotFound(TableId),

    /// Раздача прервана (кончилась колода или нарушен инвариант).
    Internal(String),
}

impl ApiError {
    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            ApiError::Rejected { reason, .. } => Some(*reason),
            ApiError::TableNotFound(_) => Some(RejectReason::TableNotFound),
            _ => None,
        }
    }
}

fn rejected(reason: RejectReason, err: &EngineError) -> ApiError {
    let player_id = match err {
        EngineError::PlayerNotFound(id)
        | EngineError::PlayerAlreadySeated(id)
        | EngineError::NotYourTurn(id)
        | EngineError::NotEligibleToVote(id)
        | EngineError::AlreadyVoted(id) => Some(*id),
        _ => None,
    };
    let min_amount = match err {
        EngineError::BelowMinimumRaise { min } => Some(*min),
        EngineError::InvalidStake(stake) => Some(*stake),
        _ => None,
    };
    ApiError::Rejected {
        reason,
        min_amount,
        player_id,
        message: err.to_string(),
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        use RejectReason as R;

        let reason = match &err {
            EngineError::TableNotFound(id) => return ApiError::TableNotFound(*id),
            EngineError::DeckExhausted | EngineError::Internal(_) => {
                return ApiError::Internal(err.to_string())
            }
            EngineError::PlayerNotFound(_) => R::PlayerNotFound,
            EngineError::PlayerAlreadySeated(_) => R::PlayerAlreadySeated,
            EngineError::TableFull => R::TableFull,
            EngineError::NotEnoughPlayers => R::NotEnoughPlayers,
            EngineError::HandAlreadyInProgress => R::HandAlreadyInProgress,
            EngineError::NoActiveRound => R::NoActiveRound,
            EngineError::NotYourTurn(_) => R::NotYourTurn,
            EngineError::CannotCheck => R::CannotCheck,
            EngineError::CannotCall => R::CannotCall,
            EngineError::BelowMinimumRaise { .. } => R::BelowMinimumRaise,
            EngineError::RaiseNotReopened => R::RaiseNotReopened,
            EngineError::InsufficientChips => R::InsufficientChips,
            EngineError::VariantDisabled => R::VariantDisabled,
            EngineError::VoteAlreadyRunning => R::VoteAlreadyRunning,
            EngineError::NoVoteRunning => R::NoVoteRunning,
            EngineError::NotEligibleToVote(_) => R::NotEligibleToVote,
            EngineError::AlreadyVoted(_) => R::AlreadyVoted,
            EngineError::InvalidStake(_) => R::InvalidStake,
            EngineError::BombPotAlreadyScheduled => R::BombPotAlreadyScheduled,
            EngineError::RevealNotAllowed => R::RevealNotAllowed,
            EngineError::RabbitHuntNotAllowed => R::RabbitHuntNotAllowed,
        };
        rejected(reason, &err)
    }
}

impl From<ManagerError> for ApiError {
    fn from(err: ManagerError) -> Self {
        match err {
            ManagerError::TableNotFound(id) => ApiError::TableNotFound(id),
            ManagerError::Config(e) => ApiError::BadRequest(e.to_string()),
            ManagerError::Engine(e) => e.into(),
        }
    }
}
