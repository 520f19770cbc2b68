pub mod allocator;
pub mod editor;
pub mod session;

pub use crate::domain::model::{EntityId, GroupBalance, GroupKind, WeightedEntity};
pub use crate::domain::ports::{AuthGateway, ConfigProvider, WeightStore};
pub use crate::utils::error::Result;
