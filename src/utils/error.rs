use thiserror::Error;

use crate::domain::model::EntityId;

#[derive(Error, Debug)]
pub enum WeightError {
    #[error("Invalid weight: {weight} (percentages must be finite and non-negative)")]
    InvalidWeight { weight: f64 },

    #[error(
        "Weights do not balance: sum is {sum:.2}%, {} entity(ies) at or below 0%",
        .invalid_ids.len()
    )]
    ValidationFailed { sum: f64, invalid_ids: Vec<EntityId> },

    #[error("Current role is not allowed to manage checklist weights")]
    PermissionDenied,

    #[error("Session rejected by server")]
    Unauthorized,

    #[error("Server returned {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("API request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl WeightError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            WeightError::InvalidWeight { .. } | WeightError::ValidationFailed { .. } => {
                ErrorSeverity::High
            }
            WeightError::HttpError(_) | WeightError::Remote { .. } => ErrorSeverity::Medium,
            WeightError::PermissionDenied | WeightError::Unauthorized => ErrorSeverity::High,
            WeightError::CsvError(_) | WeightError::SerializationError(_) => ErrorSeverity::High,
            WeightError::IoError(_)
            | WeightError::ConfigError { .. }
            | WeightError::InvalidConfigValueError { .. }
            | WeightError::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            WeightError::InvalidWeight { weight } => {
                format!("{} is not a valid percentage", weight)
            }
            WeightError::ValidationFailed { sum, .. } => format!(
                "Percentages must add up to 100% and each must be above 0% (currently {:.2}%)",
                sum
            ),
            WeightError::PermissionDenied => {
                "Your role cannot change checklist percentages".to_string()
            }
            WeightError::Unauthorized => {
                "Your session has expired, please log in again".to_string()
            }
            WeightError::Remote { message, .. } => message.clone(),
            WeightError::HttpError(_) => "Could not reach the checklist server".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            WeightError::InvalidWeight { .. } => "Enter a value of 0 or more",
            WeightError::ValidationFailed { .. } => {
                "Adjust the percentages or run `distribute` to split them equally"
            }
            WeightError::PermissionDenied => "Log in with an administrator or supervisor account",
            WeightError::Unauthorized => "Check the username and password",
            WeightError::Remote { .. } | WeightError::HttpError(_) => {
                "Check the api.base_url setting and retry"
            }
            WeightError::CsvError(_) => "Sheets need the header id,name,weight,order",
            WeightError::SerializationError(_) => "The server response was not valid JSON",
            WeightError::IoError(_) => "Check that the file exists and is readable",
            WeightError::ConfigError { .. }
            | WeightError::InvalidConfigValueError { .. }
            | WeightError::MissingConfigError { .. } => "Fix the configuration file and retry",
        }
    }
}

pub type Result<T> = std::result::Result<T, WeightError>;
