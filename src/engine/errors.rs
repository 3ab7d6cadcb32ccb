use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Chips, PlayerId, TableId};

/// Класс ошибки: что с ней делать вызывающему коду.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorKind {
    /// Недопустимое действие. Состояние не тронуто, можно просто отказать клиенту.
    Validation,
    /// Кончилась колода. Раунд дальше продолжать нельзя.
    ResourceExhaustion,
    /// Нарушен внутренний инвариант.
    Internal,
}

/// Ошибки движка покера.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Стол {0} не найден")]
    TableNotFound(TableId),

    #[error("Игрок {0} не найден за столом")]
    PlayerNotFound(PlayerId),

    #[error("Игрок {0} уже сидит за столом")]
    PlayerAlreadySeated(PlayerId),

    #[error("Все места за столом заняты")]
    TableFull,

    #[error("Недостаточно игроков для раздачи")]
    NotEnoughPlayers,

    #[error("Раздача уже идёт")]
    HandAlreadyInProgress,

    #[error("Нет активной раздачи")]
    NoActiveRound,

    #[error("Сейчас не ход игрока с id={0}")]
    NotYourTurn(PlayerId),

    #[error("Невозможно выполнить check – нужно хотя бы уравнять ставку")]
    CannotCheck,

    #[error("Невозможно выполнить call – нет ставки для уравнивания")]
    CannotCall,

    #[error("Ставка меньше минимального рейза (минимум {min})")]
    BelowMinimumRaise { min: Chips },

    #[error("Недостаточно фишек для этой ставки")]
    InsufficientChips,

    #[error("После неполного олл-ина можно только уравнять или сбросить")]
    RaiseNotReopened,

    #[error("Колода закончилась")]
    DeckExhausted,

    #[error("Вариант стола выключен в конфиге")]
    VariantDisabled,

    #[error("Голосование уже идёт")]
    VoteAlreadyRunning,

    #[error("Нет активного голосования такого типа")]
    NoVoteRunning,

    #[error("Игрок {0} не участвует в голосовании")]
    NotEligibleToVote(PlayerId),

    #[error("Игрок {0} уже проголосовал")]
    AlreadyVoted(PlayerId),

    #[error("Недопустимый размер ставки бомб-пота: {0}")]
    InvalidStake(Chips),

    #[error("Бомб-пот уже назначен на следующую раздачу")]
    BombPotAlreadyScheduled,

    #[error("Открыть карты сейчас нельзя")]
    RevealNotAllowed,

    #[error("Rabbit hunt доступен только после победы фолдом")]
    RabbitHuntNotAllowed,

    #[error("Внутренняя ошибка: {0}")]
    Internal(&'static str),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::DeckExhausted => ErrorKind::ResourceExhaustion,
            EngineError::Internal(_) => ErrorKind::Internal,
            _ => ErrorKind::Validation,
        }
    }
}

/// Ошибки конфигурации стола.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Не удалось разобрать конфиг: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Блайнды должны быть больше нуля")]
    ZeroBlind,

    #[error("Малый блайнд {small} больше большого {big}")]
    SmallBlindAboveBigBlind { small: Chips, big: Chips },

    #[error("Стартовый стек {0} меньше большого блайнда")]
    StartingStackTooSmall(Chips),

    #[error("Время на ход должно быть больше нуля")]
    ZeroTurnTimeout,

    #[error("Некорректные лимиты игроков: min={min}, max={max}")]
    BadPlayerLimits { min: usize, max: usize },

    #[error("Некорректные задержки таймеров: {0}")]
    BadTimeRules(&'static str),
}
