use thiserror::Error;

/// Centralized error types for the application
///
/// Uses `thiserror` for automatic error conversion and display formatting.
///
/// Provider failures deliberately do NOT live here: inside an adapter every
/// transport problem is folded into a plain-text failure reason that the
/// fallback chain aggregates for the user. `AppError` covers the message
/// pipeline itself, where a Telegram or HTTP failure is a real error.
#[derive(Error, Debug)]
pub enum AppError {
    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// HTTP/Fetch errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
