use std::process::ExitCode;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Credentials error: {0}")]
    Credentials(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Configuration and credential problems are detected before the store is touched.
    pub fn is_configuration(&self) -> bool {
        matches!(self, AppError::Config(_) | AppError::Credentials(_))
    }

    /// Every failure ends the run with status 1.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(1)
    }

    /// Logs the failure and hands back the process status.
    pub fn report(&self) -> ExitCode {
        let stage = if self.is_configuration() { "startup" } else { "run" };
        tracing::error!("Aborting during {}: {}", stage, self);
        eprintln!("{}", self);

        self.exit_code()
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON error: {}", err))
    }
}
