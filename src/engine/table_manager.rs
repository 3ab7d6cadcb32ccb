// src/engine/table_manager.rs

use std::collections::HashMap;

use thiserror::Error;

use crate::api::commands::{execute, Command};
use crate::api::dto::TableViewDto;
use crate::api::errors::ApiError;
use crate::api::queries::build_table_view;
use crate::domain::table::TableConfig;
use crate::domain::{PlayerId, TableId};
use crate::engine::errors::{ConfigError, EngineError};
use crate::engine::hand_history::HandEvent;
use crate::engine::table_engine::TableEngine;
use crate::engine::RandomSource;
use crate::infra::ids::IdGenerator;
use crate::time_ctrl::TimeRules;

/// Ошибки уровня менеджера столов (над движком одного стола).
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Стол {0} не найден")]
    TableNotFound(TableId),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Менеджер столов:
/// - хранит несколько независимых столов по TableId;
/// - раздаёт ID столам и игрокам;
/// - прокидывает команды и тики времени в нужный стол.
///
/// Однопоточный: для асинхронного рантайма см. `runtime::TableDirectory`.
pub struct TableManager {
    tables: HashMap<TableId, TableEngine>,
    ids: IdGenerator,
}

impl TableManager {
    /// Создать пустой менеджер.
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
            ids: IdGenerator::new(),
        }
    }

    /// Создать стол с системным RNG.
    pub fn create_table(
        &mut self,
        name: impl Into<String>,
        config: TableConfig,
        rules: TimeRules,
    ) -> Result<TableId, ManagerError> {
        let table_id = self.ids.next_table_id();
        let engine = TableEngine::new(table_id, name, config, rules)?;
        self.tables.insert(table_id, engine);
        log::info!("[manager] table {} created", table_id);
        Ok(table_id)
    }

    /// Создать стол со своим источником перемешивания (тесты, реплей).
    pub fn create_table_with_rng(
        &mut self,
        name: impl Into<String>,
        config: TableConfig,
        rules: TimeRules,
        rng: Box<dyn RandomSource + Send>,
    ) -> Result<TableId, ManagerError> {
        let table_id = self.ids.next_table_id();
        let engine = TableEngine::with_rng(table_id, name, config, rules, rng)?;
        self.tables.insert(table_id, engine);
        Ok(table_id)
    }

    pub fn remove_table(&mut self, table_id: TableId) -> Option<TableEngine> {
        self.tables.remove(&table_id)
    }

    /// Есть ли стол с таким id.
    pub fn has_table(&self, table_id: TableId) -> bool {
        self.tables.contains_key(&table_id)
    }

    pub fn table_ids(&self) -> Vec<TableId> {
        let mut ids: Vec<TableId> = self.tables.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn table(&self, table_id: TableId) -> Option<&TableEngine> {
        self.tables.get(&table_id)
    }

    pub fn table_mut(&mut self, table_id: TableId) -> Option<&mut TableEngine> {
        self.tables.get_mut(&table_id)
    }

    fn engine_mut(&mut self, table_id: TableId) -> Result<&mut TableEngine, ManagerError> {
        self.tables
            .get_mut(&table_id)
            .ok_or(ManagerError::TableNotFound(table_id))
    }

    /// Посадить нового игрока (ID выдаёт менеджер).
    pub fn seat_new_player(&mut self, table_id: TableId, name: impl Into<String>) -> Result<PlayerId, ManagerError> {
        let player_id = self.ids.next_player_id();
        self.engine_mut(table_id)?.seat_player(player_id, name)?;
        Ok(player_id)
    }

    pub fn start_game(&mut self, table_id: TableId, now: u64) -> Result<(), ManagerError> {
        self.engine_mut(table_id)?.start_game(now)?;
        Ok(())
    }

    /// Выполнить команду игрока на конкретном столе.
    pub fn handle(
        &mut self,
        table_id: TableId,
        player_id: PlayerId,
        command: Command,
        now: u64,
    ) -> Result<TableViewDto, ApiError> {
        let engine = self
            .tables
            .get_mut(&table_id)
            .ok_or(ApiError::TableNotFound(table_id))?;
        execute(engine, player_id, command, now)
    }

    /// Снимок стола глазами наблюдателя.
    pub fn view(&self, table_id: TableId, observer: Option<PlayerId>) -> Option<TableViewDto> {
        self.tables.get(&table_id).map(|e| build_table_view(e, observer))
    }

    /// Прокрутить время на всех столах. Ошибка одного стола не мешает остальным.
    pub fn tick_all(&mut self, now: u64) -> Vec<(TableId, EngineError)> {
        let mut failures = Vec::new();
        for (table_id, engine) in self.tables.iter_mut() {
            if let Err(e) = engine.tick(now) {
                log::warn!("[manager] table {} tick failed: {}", table_id, e);
                failures.push((*table_id, e));
            }
        }
        failures
    }

    /// Ближайший дедлайн среди всех столов.
    pub fn next_deadline(&self) -> Option<u64> {
        self.tables.values().filter_map(|e| e.next_deadline()).min()
    }

    /// Забрать события стола.
    pub fn drain_events(&mut self, table_id: TableId) -> Vec<HandEvent> {
        self.tables
            .get_mut(&table_id)
            .map(|e| e.drain_events())
            .unwrap_or_default()
    }
}

impl Default for TableManager {
    fn default() -> Self {
        Self::new()
    }
}
