use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Supervisor,
    Auditor,
}

impl Role {
    /// 後端回傳的角色字串，未知角色一律視為一般稽核員
    pub fn from_server(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" | "administrator" => Role::Admin,
            "supervisor" | "manager" => Role::Supervisor,
            _ => Role::Auditor,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Admin => "admin",
            Role::Supervisor => "supervisor",
            Role::Auditor => "auditor",
        };
        f.write_str(name)
    }
}

/// An authenticated session. Created by [`AuthGateway::login`] and consumed
/// by [`AuthGateway::logout`]; every remote call takes it explicitly.
///
/// [`AuthGateway::login`]: crate::domain::ports::AuthGateway::login
/// [`AuthGateway::logout`]: crate::domain::ports::AuthGateway::logout
#[derive(Clone, PartialEq, Eq)]
pub struct SessionContext {
    username: String,
    token: String,
    role: Role,
    created_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(username: impl Into<String>, token: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
            role,
            created_at: Utc::now(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    pub fn can_manage_templates(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Supervisor)
    }

    /// Ends the session locally. Returns the token so a gateway can revoke it.
    pub fn logout(self) -> String {
        tracing::debug!("Session for {} ended", self.username);
        self.token
    }
}

// token 不寫進日誌
impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("username", &self.username)
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}
