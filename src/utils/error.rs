use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FnOrderError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid file pattern: {0}")]
    PatternError(#[from] glob::PatternError),

    #[error("Failed to read {path}: {source}")]
    ExtractionError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Chat API returned {status}: {body}")]
    ChatApiError { status: u16, body: String },

    #[error("Webhook returned {status}: {body}")]
    WebhookStatusError { status: u16, body: String },

    #[error("Configuration field '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    Io,
    Network,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FnOrderError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) | Self::ChatApiError { .. } | Self::WebhookStatusError { .. } => {
                ErrorCategory::Network
            }
            Self::IoError(_) | Self::ExtractionError { .. } => ErrorCategory::Io,
            Self::SerializationError(_) => ErrorCategory::Processing,
            Self::PatternError(_)
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Config,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // a failed delivery can be retried on the next run
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Config => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ApiError(_) => "Check network connectivity and the configured service URLs",
            Self::ChatApiError { .. } => {
                "Check telegram.tg_token and that the bot may write to the recipients"
            }
            Self::WebhookStatusError { .. } => {
                "Check bitrix.url_start, bitrix.webhook and bitrix.url_finish"
            }
            Self::IoError(_) | Self::ExtractionError { .. } => {
                "Check that local.path and the output directory are readable and writable"
            }
            Self::SerializationError(_) => "Report this as a bug together with the log file",
            Self::PatternError(_) => "Report this as a bug together with the log file",
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Fix the configuration file and run again",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Config => format!("Configuration problem: {}", self),
            ErrorCategory::Io => format!("File system problem: {}", self),
            ErrorCategory::Network => format!("External service problem: {}", self),
            ErrorCategory::Processing => format!("Processing problem: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, FnOrderError>;
