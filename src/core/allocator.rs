use crate::domain::model::{EntityId, GroupBalance, WeightedEntity};
use crate::utils::error::{Result, WeightError};
use std::collections::BTreeSet;

pub const TOTAL_PERCENT: f64 = 100.0;
pub const DEFAULT_TOLERANCE: f64 = 0.01;

// 0.01 的容差在十進位輸入 (例如 99.99) 上會因浮點誤差落在邊界外
const BOUNDARY_SLACK: f64 = 1e-9;

/// 區段/題目百分比的驗證與分配。
///
/// 所有操作都是純函式：輸入一份清單，回傳新的清單，不修改呼叫端的資料。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentageAllocator {
    tolerance: f64,
}

impl Default for PercentageAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl PercentageAllocator {
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance: tolerance.abs(),
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn sum(&self, entities: &[WeightedEntity]) -> f64 {
        entities.iter().map(|e| e.weight).sum()
    }

    pub fn remaining(&self, entities: &[WeightedEntity]) -> f64 {
        TOTAL_PERCENT - self.sum(entities)
    }

    pub fn is_valid(&self, entities: &[WeightedEntity]) -> bool {
        self.sum_within_tolerance(self.sum(entities)) && entities.iter().all(|e| e.weight > 0.0)
    }

    fn sum_within_tolerance(&self, sum: f64) -> bool {
        (sum - TOTAL_PERCENT).abs() <= self.tolerance + BOUNDARY_SLACK
    }

    /// Ids of entities whose weight is zero or below. Unsaved entities have no id
    /// and are left out.
    pub fn invalid_ids(&self, entities: &[WeightedEntity]) -> BTreeSet<EntityId> {
        entities
            .iter()
            .filter(|e| e.weight <= 0.0)
            .filter_map(|e| e.id)
            .collect()
    }

    pub fn balance(&self, entities: &[WeightedEntity]) -> GroupBalance {
        if self.is_valid(entities) {
            return GroupBalance::Balanced;
        }

        let sum = self.sum(entities);
        GroupBalance::Unbalanced {
            sum,
            difference: TOTAL_PERCENT - sum,
            non_positive: self.invalid_ids(entities).into_iter().collect(),
        }
    }

    pub fn distribute_equally(&self, entities: &[WeightedEntity]) -> Vec<WeightedEntity> {
        if entities.is_empty() {
            tracing::debug!("Distribution requested over an empty group, nothing to do");
            return Vec::new();
        }

        let share = TOTAL_PERCENT / entities.len() as f64;
        entities
            .iter()
            .map(|e| WeightedEntity {
                weight: share,
                ..e.clone()
            })
            .collect()
    }

    /// Replaces one weight. Siblings are never renormalised here.
    pub fn set_weight(
        &self,
        entities: &[WeightedEntity],
        id: EntityId,
        new_weight: f64,
    ) -> Result<Vec<WeightedEntity>> {
        check_weight(new_weight)?;

        if !entities.iter().any(|e| e.id == Some(id)) {
            tracing::debug!("No entity with id {} in group, weights unchanged", id);
        }

        Ok(entities
            .iter()
            .map(|e| {
                if e.id == Some(id) {
                    WeightedEntity {
                        weight: new_weight,
                        ..e.clone()
                    }
                } else {
                    e.clone()
                }
            })
            .collect())
    }

    /// Positional variant of [`set_weight`](Self::set_weight) for entities that
    /// have not been persisted yet.
    pub fn set_weight_at(
        &self,
        entities: &[WeightedEntity],
        index: usize,
        new_weight: f64,
    ) -> Result<Vec<WeightedEntity>> {
        check_weight(new_weight)?;

        let mut updated = entities.to_vec();
        if let Some(entity) = updated.get_mut(index) {
            entity.weight = new_weight;
        }
        Ok(updated)
    }

    pub fn reorder(
        &self,
        entities: &[WeightedEntity],
        from_index: usize,
        to_index: usize,
    ) -> Vec<WeightedEntity> {
        let len = entities.len();
        if from_index == to_index || from_index >= len || to_index >= len {
            return entities.to_vec();
        }

        let mut reordered = entities.to_vec();
        let moved = reordered.remove(from_index);
        reordered.insert(to_index, moved);
        renumber(&mut reordered);
        reordered
    }

    /// Adds a new, unsaved entity at the end with a weight of 0.
    pub fn append_new(
        &self,
        entities: &[WeightedEntity],
        name: Option<String>,
    ) -> Vec<WeightedEntity> {
        let mut extended = entities.to_vec();
        extended.push(WeightedEntity::unsaved(name, entities.len() as i32));
        extended
    }

    /// Deleting leaves the group unbalanced until the caller redistributes.
    pub fn remove(&self, entities: &[WeightedEntity], index: usize) -> Vec<WeightedEntity> {
        if index >= entities.len() {
            return entities.to_vec();
        }

        let mut remaining = entities.to_vec();
        remaining.remove(index);
        renumber(&mut remaining);
        remaining
    }

    /// Sorts by the stored `order` (stable) and rewrites it as 0..n.
    pub fn normalize_order(&self, entities: &[WeightedEntity]) -> Vec<WeightedEntity> {
        let mut sorted = entities.to_vec();
        sorted.sort_by_key(|e| e.order);
        renumber(&mut sorted);
        sorted
    }
}

/// Rejects negative, NaN and infinite percentages.
pub fn check_weight(weight: f64) -> Result<()> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(WeightError::InvalidWeight { weight });
    }
    Ok(())
}

fn renumber(entities: &mut [WeightedEntity]) {
    for (position, entity) in entities.iter_mut().enumerate() {
        entity.order = position as i32;
    }
}

/// 僅供顯示使用，儲存的值永遠保留完整精度
pub fn format_percent(weight: f64) -> String {
    format!("{:.2}%", weight)
}
