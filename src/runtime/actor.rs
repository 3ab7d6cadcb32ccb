use std::collections::HashSet;
use std::time::Duration;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender, WeakUnboundedSender};
use tokio::sync::{broadcast, oneshot};
use tokio::time::Instant;

use crate::api::commands::{execute, Command};
use crate::api::dto::TableViewDto;
use crate::api::errors::ApiError;
use crate::api::queries::build_table_view;
use crate::domain::{PlayerId, TableId};
use crate::engine::hand_history::HandEvent;
use crate::engine::TableEngine;
use crate::time_ctrl::TimerToken;

/// Сколько событий держит канал рассылки для медленных подписчиков.
const EVENT_BUFFER: usize = 256;

type Reply<T> = oneshot::Sender<Result<T, ApiError>>;

/// Сообщения во входящую очередь стола.
/// Срабатывания таймеров приходят в ту же очередь, что и команды игроков.
pub enum TableMessage {
    Command {
        player_id: PlayerId,
        command: Command,
        respond: Reply<TableViewDto>,
    },
    Seat {
        player_id: PlayerId,
        name: String,
        respond: Reply<()>,
    },
    Leave {
        player_id: PlayerId,
        respond: Reply<()>,
    },
    StartGame {
        respond: Reply<()>,
    },
    View {
        observer: Option<PlayerId>,
        respond: oneshot::Sender<TableViewDto>,
    },
    TimerFired(TimerToken),
    Shutdown,
}

/// Задача, которая владеет одним `TableEngine`.
///
/// - принимает сообщения по одному, каждое — один шаг движка;
/// - взводит tokio-таймеры под таймеры движка;
/// - рассылает события подписчикам.
pub struct TableActor {
    engine: TableEngine,
    inbox: UnboundedReceiver<TableMessage>,
    outbox: WeakUnboundedSender<TableMessage>,
    events: broadcast::Sender<HandEvent>,
    started: Instant,
    scheduled: HashSet<TimerToken>,
}

impl TableActor {
    /// Запустить актор стола и вернуть его handle.
    pub fn spawn(engine: TableEngine) -> TableHandle {
        let table_id = engine.table_id();
        let (tx, rx) = unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        let actor = Self {
            engine,
            inbox: rx,
            outbox: tx.downgrade(),
            events: events.clone(),
            started: Instant::now(),
            scheduled: HashSet::new(),
        };
        tokio::spawn(actor.run());
        log::info!("[table {}] actor started", table_id);
        TableHandle { table_id, tx, events }
    }

    async fn run(mut self) {
        while let Some(message) = self.inbox.recv().await {
            if matches!(message, TableMessage::Shutdown) {
                break;
            }
            self.handle(message);
            self.publish();
            self.schedule_timers();
        }
        log::info!("[table {}] actor stopped", self.engine.table_id());
    }

    /// Миллисекунды с запуска актора — часы движка.
    fn now(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn handle(&mut self, message: TableMessage) {
        let now = self.now();
        match message {
            TableMessage::Command {
                player_id,
                command,
                respond,
            } => {
                let _ = respond.send(execute(&mut self.engine, player_id, command, now));
            }
            TableMessage::Seat {
                player_id,
                name,
                respond,
            } => {
                let result = self.engine.seat_player(player_id, name).map_err(ApiError::from);
                let _ = respond.send(result);
            }
            TableMessage::Leave { player_id, respond } => {
                let result = self
                    .engine
                    .remove_player(player_id, now)
                    .map(|_| ())
                    .map_err(ApiError::from);
                let _ = respond.send(result);
            }
            TableMessage::StartGame { respond } => {
                let _ = respond.send(self.engine.start_game(now).map_err(ApiError::from));
            }
            TableMessage::View { observer, respond } => {
                let _ = respond.send(build_table_view(&self.engine, observer));
            }
            TableMessage::TimerFired(token) => {
                self.scheduled.remove(&token);
                let fired = self
                    .engine
                    .on_timer(token, now)
                    .and_then(|fired| self.engine.tick(now).map(|_| fired));
                match fired {
                    Ok(true) => log::debug!("[table {}] timer {:?} fired", self.engine.table_id(), token),
                    Ok(false) => {}
                    Err(e) => log::warn!("[table {}] timer {:?} failed: {}", self.engine.table_id(), token, e),
                }
            }
            TableMessage::Shutdown => {}
        }
    }

    /// Разослать накопленные события. Нет подписчиков — не страшно.
    fn publish(&mut self) {
        for event in self.engine.drain_events() {
            let _ = self.events.send(event);
        }
    }

    /// Поставить tokio-таймер под каждый новый таймер движка.
    /// Отменённые таймеры не снимаем: их срабатывание движок отбросит по токену.
    fn schedule_timers(&mut self) {
        let armed = self.engine.armed_timers();
        self.scheduled.retain(|token| armed.iter().any(|t| t.token == *token));

        for timer in armed {
            if !self.scheduled.insert(timer.token) {
                continue;
            }
            let deadline = self.started + Duration::from_millis(timer.expires_at);
            let outbox = self.outbox.clone();
            tokio::spawn(async move {
                tokio::time::sleep_until(deadline).await;
                if let Some(tx) = outbox.upgrade() {
                    let _ = tx.send(TableMessage::TimerFired(timer.token));
                }
            });
        }
    }
}

/// Handle стола: отправка команд и подписка на события.
#[derive(Clone)]
pub struct TableHandle {
    table_id: TableId,
    tx: UnboundedSender<TableMessage>,
    events: broadcast::Sender<HandEvent>,
}

impl TableHandle {
    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    /// Подписаться на события стола (с этого момента).
    pub fn subscribe(&self) -> broadcast::Receiver<HandEvent> {
        self.events.subscribe()
    }

    async fn request<T>(&self, make: impl FnOnce(Reply<T>) -> TableMessage) -> Result<T, ApiError> {
        let (respond, rx) = oneshot::channel();
        self.tx
            .send(make(respond))
            .map_err(|_| ApiError::TableNotFound(self.table_id))?;
        rx.await.map_err(|_| ApiError::TableNotFound(self.table_id))?
    }

    pub async fn command(&self, player_id: PlayerId, command: Command) -> Result<TableViewDto, ApiError> {
        self.request(|respond| TableMessage::Command {
            player_id,
            command,
            respond,
        })
        .await
    }

    pub async fn seat(&self, player_id: PlayerId, name: impl Into<String>) -> Result<(), ApiError> {
        let name = name.into();
        self.request(|respond| TableMessage::Seat {
            player_id,
            name,
            respond,
        })
        .await
    }

    pub async fn leave(&self, player_id: PlayerId) -> Result<(), ApiError> {
        self.request(|respond| TableMessage::Leave { player_id, respond })
            .await
    }

    pub async fn start_game(&self) -> Result<(), ApiError> {
        self.request(|respond| TableMessage::StartGame { respond }).await
    }

    pub async fn view(&self, observer: Option<PlayerId>) -> Result<TableViewDto, ApiError> {
        let (respond, rx) = oneshot::channel();
        self.tx
            .send(TableMessage::View { observer, respond })
            .map_err(|_| ApiError::TableNotFound(self.table_id))?;
        rx.await.map_err(|_| ApiError::TableNotFound(self.table_id))
    }

    pub fn shutdown(&self) {
        let _ = self.tx.send(TableMessage::Shutdown);
    }
}
