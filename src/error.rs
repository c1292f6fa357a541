use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Access forbidden")]
    Forbidden,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Referential integrity: {0}")]
    Referential(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl AppError {
    /// Message shown to the user at the shell boundary.
    ///
    /// Internal faults are logged here and replaced by a generic notice so
    /// that no operation ever surfaces a raw IO or serialization error.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Unauthorized => "You must log in first.".to_string(),
            AppError::Forbidden => "Access denied. Admins only.".to_string(),
            AppError::InvalidCredentials => {
                "Invalid email or password, or the account is not verified.".to_string()
            }
            AppError::NotFound(msg) => format!("Not found: {}", msg),
            AppError::Conflict(msg) => msg.clone(),
            AppError::Referential(msg) => msg.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Io(err) => {
                tracing::error!("IO error: {}", err);
                "Internal storage error".to_string()
            }
            AppError::Json(err) => {
                tracing::error!("JSON error: {}", err);
                "Internal storage error".to_string()
            }
            AppError::Config(msg) => {
                tracing::error!("Config error: {}", msg);
                "Configuration error".to_string()
            }
        }
    }
}

/// Result type alias for application
pub type AppResult<T> = Result<T, AppError>;

/// Helper trait for converting Option to AppError::NotFound
pub trait OptionExt<T> {
    fn ok_or_not_found(self, msg: impl Into<String>) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, msg: impl Into<String>) -> AppResult<T> {
        self.ok_or_else(|| AppError::NotFound(msg.into()))
    }
}

/// Helper to convert anyhow errors to AppError
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Config(err.to_string())
    }
}
