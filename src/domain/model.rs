use serde::{Deserialize, Serialize};
use std::fmt;

pub type EntityId = u64;

/// 一個帶百分比權重的區段或題目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedEntity {
    /// 尚未存到後端的項目沒有 id
    pub id: Option<EntityId>,
    #[serde(default)]
    pub name: Option<String>,
    pub weight: f64,
    pub order: i32,
}

impl WeightedEntity {
    pub fn new(id: EntityId, weight: f64, order: i32) -> Self {
        Self {
            id: Some(id),
            name: None,
            weight,
            order,
        }
    }

    pub fn unsaved(name: Option<String>, order: i32) -> Self {
        Self {
            id: None,
            name,
            weight: 0.0,
            order,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn label(&self) -> String {
        match (&self.name, self.id) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => format!("#{}", id),
            (None, None) => "(new)".to_string(),
        }
    }
}

/// Which sibling group a list of weights belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    Sections { checklist_id: EntityId },
    Items { section_id: EntityId },
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKind::Sections { checklist_id } => {
                write!(f, "sections of checklist {}", checklist_id)
            }
            GroupKind::Items { section_id } => write!(f, "items of section {}", section_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GroupBalance {
    Balanced,
    Unbalanced {
        sum: f64,
        /// 100 - sum，正值代表還有剩餘百分比
        difference: f64,
        non_positive: Vec<EntityId>,
    },
}

impl GroupBalance {
    pub fn is_balanced(&self) -> bool {
        matches!(self, GroupBalance::Balanced)
    }
}
