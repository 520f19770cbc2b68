pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::TomlConfig;

pub use crate::adapters::{http::RestWeightStore, memory::InMemoryWeightStore};
pub use crate::core::{
    allocator::PercentageAllocator,
    editor::{WeightCommand, WeightGroupEditor},
    session::{Role, SessionContext},
};
pub use crate::domain::model::{EntityId, GroupBalance, GroupKind, WeightedEntity};
pub use crate::utils::error::{Result, WeightError};
