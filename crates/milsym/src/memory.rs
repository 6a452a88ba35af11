//! In-process unit store.

use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use model::{
    feature::{UnitFeature, UnitFeaturePatch},
    WithId,
};
use tokio::sync::RwLock;
use utility::id::Id;
use uuid::Uuid;

use crate::database::{
    Database, DatabaseAutocommit, DatabaseError, DeleteResult, Result, UnitRepo,
};

type Units = Arc<RwLock<IndexMap<Uuid, UnitFeature>>>;

/// Keeps units in insertion order in memory. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    units: Units,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

pub struct MemoryDatabaseAutocommit {
    units: Units,
}

impl DatabaseAutocommit for MemoryDatabaseAutocommit {}

#[async_trait]
impl Database for MemoryDatabase {
    type Autocommit = MemoryDatabaseAutocommit;

    fn auto(&self) -> Self::Autocommit {
        MemoryDatabaseAutocommit {
            units: self.units.clone(),
        }
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn close(&self) {}
}

fn stored(id: Uuid, unit: UnitFeature) -> WithId<UnitFeature> {
    WithId::new(Id::new(id), unit)
}

#[async_trait]
impl UnitRepo for MemoryDatabaseAutocommit {
    async fn insert(&mut self, unit: UnitFeature) -> Result<WithId<UnitFeature>> {
        let id = Uuid::new_v4();
        self.units.write().await.insert(id, unit.clone());
        Ok(stored(id, unit))
    }

    async fn get(&mut self, id: &Id<UnitFeature>) -> Result<WithId<UnitFeature>> {
        self.units
            .read()
            .await
            .get(&id.raw())
            .cloned()
            .map(|unit| stored(id.raw(), unit))
            .ok_or(DatabaseError::NotFound)
    }

    async fn get_all(&mut self) -> Result<Vec<WithId<UnitFeature>>> {
        Ok(self
            .units
            .read()
            .await
            .iter()
            .map(|(id, unit)| stored(*id, unit.clone()))
            .collect())
    }

    async fn get_page(
        &mut self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<WithId<UnitFeature>>> {
        Ok(self
            .units
            .read()
            .await
            .iter()
            .skip(offset)
            .take(limit)
            .map(|(id, unit)| stored(*id, unit.clone()))
            .collect())
    }

    async fn update(
        &mut self,
        id: &Id<UnitFeature>,
        patch: UnitFeaturePatch,
    ) -> Result<WithId<UnitFeature>> {
        let mut units = self.units.write().await;
        let unit = units.get_mut(&id.raw()).ok_or(DatabaseError::NotFound)?;
        patch.apply_to(unit);
        Ok(stored(id.raw(), unit.clone()))
    }

    async fn delete(&mut self, id: &Id<UnitFeature>) -> Result<DeleteResult> {
        let removed = self.units.write().await.shift_remove(&id.raw());
        Ok(DeleteResult {
            deleted_count: removed.map_or(0, |_| 1),
        })
    }
}
