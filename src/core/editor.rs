use crate::core::allocator::PercentageAllocator;
use crate::core::session::SessionContext;
use crate::domain::model::{EntityId, GroupBalance, GroupKind, WeightedEntity};
use crate::domain::ports::WeightStore;
use crate::utils::error::{Result, WeightError};

#[derive(Debug, Clone, PartialEq)]
pub enum WeightCommand {
    SetWeight { id: EntityId, weight: f64 },
    SetWeightAt { index: usize, weight: f64 },
    DistributeEqually,
    Reorder { from: usize, to: usize },
    Add { name: Option<String> },
    Remove { index: usize },
}

/// Single-writer state holder for one sibling group.
///
/// Every command produces a fresh list from the allocator which replaces the
/// held one wholesale. Saving replaces it again with what the server confirmed.
#[derive(Debug, Clone)]
pub struct WeightGroupEditor {
    kind: GroupKind,
    allocator: PercentageAllocator,
    entities: Vec<WeightedEntity>,
    dirty: bool,
}

impl WeightGroupEditor {
    pub fn new(
        kind: GroupKind,
        allocator: PercentageAllocator,
        entities: Vec<WeightedEntity>,
    ) -> Self {
        Self {
            kind,
            allocator,
            entities: allocator.normalize_order(&entities),
            dirty: false,
        }
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    pub fn entities(&self) -> &[WeightedEntity] {
        &self.entities
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn balance(&self) -> GroupBalance {
        self.allocator.balance(&self.entities)
    }

    pub fn apply(&mut self, command: WeightCommand) -> Result<&[WeightedEntity]> {
        tracing::debug!("{}: applying {:?}", self.kind, command);

        let next = match command {
            WeightCommand::SetWeight { id, weight } => {
                self.allocator.set_weight(&self.entities, id, weight)?
            }
            WeightCommand::SetWeightAt { index, weight } => {
                self.allocator.set_weight_at(&self.entities, index, weight)?
            }
            WeightCommand::DistributeEqually => self.allocator.distribute_equally(&self.entities),
            WeightCommand::Reorder { from, to } => self.allocator.reorder(&self.entities, from, to),
            WeightCommand::Add { name } => self.allocator.append_new(&self.entities, name),
            WeightCommand::Remove { index } => self.allocator.remove(&self.entities, index),
        };

        if next != self.entities {
            self.entities = next;
            self.dirty = true;
        }
        Ok(&self.entities)
    }

    pub fn validate(&self) -> Result<()> {
        match self.allocator.balance(&self.entities) {
            GroupBalance::Balanced => Ok(()),
            GroupBalance::Unbalanced {
                sum, non_positive, ..
            } => Err(WeightError::ValidationFailed {
                sum,
                invalid_ids: non_positive,
            }),
        }
    }

    /// Validates, persists and adopts the server-confirmed list.
    pub async fn save<S>(
        &mut self,
        store: &S,
        session: &SessionContext,
    ) -> Result<&[WeightedEntity]>
    where
        S: WeightStore + ?Sized,
    {
        if !session.can_manage_templates() {
            tracing::warn!(
                "{} ({}) tried to save {}",
                session.username(),
                session.role(),
                self.kind
            );
            return Err(WeightError::PermissionDenied);
        }

        if let Err(e) = self.validate() {
            tracing::warn!("Refusing to save {}: {}", self.kind, e);
            return Err(e);
        }

        let confirmed = store.persist(self.kind, &self.entities, session).await?;
        self.entities = self.allocator.normalize_order(&confirmed);
        self.dirty = false;

        tracing::info!("💾 Saved {} ({} entries)", self.kind, self.entities.len());
        Ok(&self.entities)
    }

    /// Discards local edits and adopts the remote list.
    pub async fn refresh<S>(
        &mut self,
        store: &S,
        session: &SessionContext,
    ) -> Result<&[WeightedEntity]>
    where
        S: WeightStore + ?Sized,
    {
        let remote = store.fetch(self.kind, session).await?;
        self.entities = self.allocator.normalize_order(&remote);
        self.dirty = false;

        tracing::debug!("Refreshed {} ({} entries)", self.kind, self.entities.len());
        Ok(&self.entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryWeightStore;
    use crate::core::session::Role;

    const KIND: GroupKind = GroupKind::Sections { checklist_id: 10 };

    fn editor(weights: &[f64]) -> WeightGroupEditor {
        let entities = weights
            .iter()
            .enumerate()
            .map(|(i, w)| WeightedEntity::new(i as u64 + 1, *w, i as i32))
            .collect();
        WeightGroupEditor::new(KIND, PercentageAllocator::default(), entities)
    }

    fn admin() -> SessionContext {
        SessionContext::new("admin", "token", Role::Admin)
    }

    #[test]
    fn test_rejected_command_keeps_state() {
        let mut editor = editor(&[40.0, 60.0]);
        let before = editor.entities().to_vec();

        let result = editor.apply(WeightCommand::SetWeight { id: 1, weight: -1.0 });
        assert!(matches!(result, Err(WeightError::InvalidWeight { .. })));
        assert_eq!(editor.entities(), before.as_slice());
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_commands_mark_dirty() {
        let mut editor = editor(&[40.0, 35.0, 20.0]);
        assert!(editor.validate().is_err());

        editor
            .apply(WeightCommand::SetWeight { id: 3, weight: 25.0 })
            .unwrap();
        assert!(editor.is_dirty());
        assert!(editor.validate().is_ok());

        editor.apply(WeightCommand::Add { name: None }).unwrap();
        assert_eq!(editor.entities().len(), 4);
        editor.apply(WeightCommand::DistributeEqually).unwrap();
        assert!(editor.entities().iter().all(|e| e.weight == 25.0));

        editor.apply(WeightCommand::Remove { index: 3 }).unwrap();
        assert!(matches!(
            editor.validate(),
            Err(WeightError::ValidationFailed { sum, .. }) if sum == 75.0
        ));
    }

    #[tokio::test]
    async fn test_save_adopts_server_list() {
        let store = InMemoryWeightStore::new();
        let mut editor = editor(&[]);
        editor.apply(WeightCommand::Add { name: Some("Front".into()) }).unwrap();
        editor.apply(WeightCommand::Add { name: Some("Back".into()) }).unwrap();
        editor.apply(WeightCommand::DistributeEqually).unwrap();

        let saved = editor.save(&store, &admin()).await.unwrap().to_vec();
        assert!(saved.iter().all(|e| e.id.is_some()));
        assert!(!editor.is_dirty());

        assert_eq!(store.snapshot(KIND).await, saved);
    }

    #[tokio::test]
    async fn test_save_refuses_unbalanced_group() {
        let store = InMemoryWeightStore::new();
        let mut editor = editor(&[40.0, 35.0, 20.0]);

        let err = editor.save(&store, &admin()).await.unwrap_err();
        assert!(matches!(err, WeightError::ValidationFailed { .. }));
        assert!(store.snapshot(KIND).await.is_empty());
    }

    #[tokio::test]
    async fn test_auditor_cannot_save() {
        let store = InMemoryWeightStore::new();
        let mut editor = editor(&[50.0, 50.0]);
        let auditor = SessionContext::new("cy", "token", Role::Auditor);

        let err = editor.save(&store, &auditor).await.unwrap_err();
        assert!(matches!(err, WeightError::PermissionDenied));
    }

    #[tokio::test]
    async fn test_refresh_discards_local_edits() {
        let store = InMemoryWeightStore::new();
        let mut editor = editor(&[50.0, 50.0]);
        editor.save(&store, &admin()).await.unwrap();

        editor.apply(WeightCommand::SetWeight { id: 1, weight: 90.0 }).unwrap();
        assert!(editor.is_dirty());

        editor.refresh(&store, &admin()).await.unwrap();
        assert!(!editor.is_dirty());
        assert_eq!(editor.entities()[0].weight, 50.0);
    }
}
