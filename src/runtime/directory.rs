use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::domain::table::TableConfig;
use crate::domain::{PlayerId, TableId};
use crate::engine::{ManagerError, RandomSource, TableEngine};
use crate::infra::ids::IdGenerator;
use crate::time_ctrl::TimeRules;

use super::actor::{TableActor, TableHandle};

/// Реестр живых столов: по актору на стол.
pub struct TableDirectory {
    tables: RwLock<HashMap<TableId, TableHandle>>,
    ids: IdGenerator,
}

impl Default for TableDirectory {
    fn default() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            ids: IdGenerator::new(),
        }
    }
}

impl TableDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Открыть стол с системным RNG.
    pub async fn open(
        &self,
        name: impl Into<String>,
        config: TableConfig,
        rules: TimeRules,
    ) -> Result<TableHandle, ManagerError> {
        let table_id = self.ids.next_table_id();
        let engine = TableEngine::new(table_id, name, config, rules)?;
        Ok(self.register(engine).await)
    }

    /// Открыть стол со своим источником перемешивания.
    pub async fn open_with_rng(
        &self,
        name: impl Into<String>,
        config: TableConfig,
        rules: TimeRules,
        rng: Box<dyn RandomSource + Send>,
    ) -> Result<TableHandle, ManagerError> {
        let table_id = self.ids.next_table_id();
        let engine = TableEngine::with_rng(table_id, name, config, rules, rng)?;
        Ok(self.register(engine).await)
    }

    async fn register(&self, engine: TableEngine) -> TableHandle {
        let table_id = engine.table_id();
        let handle = TableActor::spawn(engine);
        self.tables.write().await.insert(table_id, handle.clone());
        log::info!("opened table {}", table_id);
        handle
    }

    pub async fn get(&self, table_id: TableId) -> Option<TableHandle> {
        self.tables.read().await.get(&table_id).cloned()
    }

    pub async fn table_ids(&self) -> Vec<TableId> {
        let mut ids: Vec<TableId> = self.tables.read().await.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Закрыть стол: актор доработает уже принятые сообщения и остановится.
    pub async fn close(&self, table_id: TableId) -> Result<(), ManagerError> {
        self.tables
            .write()
            .await
            .remove(&table_id)
            .map(|handle| {
                handle.shutdown();
                log::info!("closed table {}", table_id);
            })
            .ok_or(ManagerError::TableNotFound(table_id))
    }

    /// Новый ID игрока (общий для всех столов реестра).
    pub fn next_player_id(&self) -> PlayerId {
        self.ids.next_player_id()
    }
}
