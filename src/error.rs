use std::path::PathBuf;

/// 提交内容未通过结构检查，消息直接返回给前端
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("At least one account must be configured")]
    MissingAccounts,

    #[error("At least one platform must be configured")]
    MissingPlatforms,

    #[error("Invalid cookies format")]
    InvalidFormat,

    #[error("Cookies appear to be invalid. Make sure they contain account_id and cookie_token.")]
    MissingMarkers,

    #[error("Configuration contains values that cannot be stored: {0}")]
    Unstorable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum WebUiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("page not found: {}", .0.display())]
    PageMissing(PathBuf),

    #[error("default config template unusable: {0}")]
    DefaultTemplate(String),

    #[error("failed to persist config: {0}")]
    Persistence(std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("failed to bind listener: {0}")]
    Bind(std::io::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WebUiError>;
