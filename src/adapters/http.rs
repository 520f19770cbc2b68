use crate::core::session::{Role, SessionContext};
use crate::domain::model::{GroupKind, WeightedEntity};
use crate::domain::ports::{AuthGateway, ConfigProvider, WeightStore};
use crate::utils::error::{Result, WeightError};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 後端傳輸格式：百分比欄位叫 `percentage`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PercentageDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    percentage: f64,
    order: i32,
}

impl From<&WeightedEntity> for PercentageDto {
    fn from(entity: &WeightedEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name.clone(),
            percentage: entity.weight,
            order: entity.order,
        }
    }
}

impl From<PercentageDto> for WeightedEntity {
    fn from(dto: PercentageDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            weight: dto.percentage,
            order: dto.order,
        }
    }
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    role: String,
    #[serde(default)]
    username: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RestWeightStore {
    base_url: String,
    client: Client,
}

impl RestWeightStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .build()?;

        Ok(Self {
            base_url: config.api_base_url().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn group_url(&self, kind: GroupKind) -> String {
        match kind {
            GroupKind::Sections { checklist_id } => {
                format!("{}/checklists/{}/sections/percentages", self.base_url, checklist_id)
            }
            GroupKind::Items { section_id } => {
                format!("{}/sections/{}/items/percentages", self.base_url, section_id)
            }
        }
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        match status {
            s if s.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED => Err(WeightError::Unauthorized),
            StatusCode::FORBIDDEN => Err(WeightError::PermissionDenied),
            s => {
                let body = response.text().await.unwrap_or_default();
                let message = if body.trim().is_empty() {
                    s.canonical_reason().unwrap_or("unexpected response").to_string()
                } else {
                    body
                };
                Err(WeightError::Remote {
                    status: s.as_u16(),
                    message,
                })
            }
        }
    }

    async fn read_group(response: Response) -> Result<Vec<WeightedEntity>> {
        let body = Self::check_status(response).await?.text().await?;
        let dtos: Vec<PercentageDto> = serde_json::from_str(&body)?;
        Ok(dtos.into_iter().map(WeightedEntity::from).collect())
    }
}

#[async_trait]
impl WeightStore for RestWeightStore {
    async fn fetch(
        &self,
        kind: GroupKind,
        session: &SessionContext,
    ) -> Result<Vec<WeightedEntity>> {
        let url = self.group_url(kind);
        tracing::debug!("Fetching {} from {}", kind, url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", session.bearer())
            .send()
            .await?;

        Self::read_group(response).await
    }

    async fn persist(
        &self,
        kind: GroupKind,
        entities: &[WeightedEntity],
        session: &SessionContext,
    ) -> Result<Vec<WeightedEntity>> {
        let url = self.group_url(kind);
        let body: Vec<PercentageDto> = entities.iter().map(PercentageDto::from).collect();
        tracing::debug!("Persisting {} entries of {} to {}", body.len(), kind, url);

        let response = self
            .client
            .put(&url)
            .header("Authorization", session.bearer())
            .json(&body)
            .send()
            .await?;

        Self::read_group(response).await
    }
}

#[async_trait]
impl AuthGateway for RestWeightStore {
    async fn login(&self, username: &str, password: &str) -> Result<SessionContext> {
        let url = format!("{}/auth/login", self.base_url);
        tracing::debug!("Logging in {} at {}", username, url);

        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let body = Self::check_status(response).await?.text().await?;
        let login: LoginResponse = serde_json::from_str(&body)?;
        let role = Role::from_server(&login.role);

        tracing::info!("🔑 Logged in as {} ({})", username, role);
        Ok(SessionContext::new(
            login.username.unwrap_or_else(|| username.to_string()),
            login.token,
            role,
        ))
    }

    async fn logout(&self, session: SessionContext) -> Result<()> {
        let url = format!("{}/auth/logout", self.base_url);
        let bearer = session.bearer();
        let username = session.username().to_string();
        session.logout();

        let response = self
            .client
            .post(&url)
            .header("Authorization", bearer)
            .send()
            .await?;
        Self::check_status(response).await?;

        tracing::info!("👋 Logged out {}", username);
        Ok(())
    }
}
