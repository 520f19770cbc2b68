use crate::core::session::SessionContext;
use crate::domain::model::{GroupKind, WeightedEntity};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn tolerance(&self) -> f64;
    fn timeout_seconds(&self) -> u64;
}

/// Remote persistence for one sibling group of weights.
#[async_trait]
pub trait WeightStore: Send + Sync {
    async fn fetch(&self, kind: GroupKind, session: &SessionContext) -> Result<Vec<WeightedEntity>>;

    /// Returns the server-confirmed list, which replaces the caller's copy.
    async fn persist(
        &self,
        kind: GroupKind,
        entities: &[WeightedEntity],
        session: &SessionContext,
    ) -> Result<Vec<WeightedEntity>>;
}

#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<SessionContext>;
    async fn logout(&self, session: SessionContext) -> Result<()>;
}
