use crate::core::session::SessionContext;
use crate::domain::model::{GroupKind, WeightedEntity};
use crate::domain::ports::WeightStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Groups {
    next_id: u64,
    by_kind: HashMap<GroupKind, Vec<WeightedEntity>>,
}

/// 離線模式與測試用的儲存，行為比照後端：替未存檔的項目配發 id
#[derive(Debug, Clone, Default)]
pub struct InMemoryWeightStore {
    groups: Arc<Mutex<Groups>>,
}

impl InMemoryWeightStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, kind: GroupKind, entities: Vec<WeightedEntity>) {
        let mut groups = self.groups.lock().await;
        let highest = entities.iter().filter_map(|e| e.id).max().unwrap_or(0);
        groups.next_id = groups.next_id.max(highest);
        groups.by_kind.insert(kind, entities);
    }

    pub async fn snapshot(&self, kind: GroupKind) -> Vec<WeightedEntity> {
        let groups = self.groups.lock().await;
        groups.by_kind.get(&kind).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl WeightStore for InMemoryWeightStore {
    async fn fetch(
        &self,
        kind: GroupKind,
        _session: &SessionContext,
    ) -> Result<Vec<WeightedEntity>> {
        Ok(self.snapshot(kind).await)
    }

    async fn persist(
        &self,
        kind: GroupKind,
        entities: &[WeightedEntity],
        _session: &SessionContext,
    ) -> Result<Vec<WeightedEntity>> {
        let mut groups = self.groups.lock().await;

        let highest = entities.iter().filter_map(|e| e.id).max().unwrap_or(0);
        groups.next_id = groups.next_id.max(highest);

        let mut confirmed = Vec::with_capacity(entities.len());
        for entity in entities {
            let mut entity = entity.clone();
            if entity.id.is_none() {
                groups.next_id += 1;
                entity.id = Some(groups.next_id);
            }
            confirmed.push(entity);
        }

        groups.by_kind.insert(kind, confirmed.clone());
        Ok(confirmed)
    }
}
