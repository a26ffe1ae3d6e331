//! Result alias used across handlers and repositories

use super::AppError;

/// Application result type
pub type AppResult<T> = Result<T, AppError>;
