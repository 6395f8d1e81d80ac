//! REST API module.
//!
//! Serves the in-memory employee store in server key convention.

mod employees;

pub use employees::*;

use axum::Json;

/// Handler result: the JSON body, or an error rendered as `{"detail": ...}`.
pub type ApiResult<T> = Result<Json<T>, crate::errors::AppError>;
