//! Employee API endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ApiResult;
use crate::casing::RawRecord;
use crate::errors::AppError;
use crate::models::EmployeeId;
use crate::repository::EmployeeRepository;
use crate::AppState;

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// 1-based page number (default: 1).
    #[serde(default = "default_page")]
    pub page: usize,
    /// Page size (default: the configured page size).
    #[serde(default)]
    pub size: Option<usize>,
}

fn default_page() -> usize {
    1
}

/// One page of employees.
#[derive(Debug, Serialize)]
pub struct EmployeePage {
    pub items: Vec<RawRecord>,
    pub page: usize,
    pub size: usize,
    pub total: usize,
}

/// GET /api/employees - List one page of employees.
pub async fn list_employees(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<EmployeePage> {
    let size = query.size.unwrap_or(state.config.page_size);
    if query.page == 0 || size == 0 {
        return Err(AppError::BadRequest(
            "page and size must be positive".to_string(),
        ));
    }

    let items = state.repo.list_page(query.page, size).await;
    let total = state.repo.len().await;

    Ok(Json(EmployeePage {
        items,
        page: query.page,
        size,
        total,
    }))
}

/// POST /api/employees - Create a new employee.
pub async fn create_employee(
    State(state): State<AppState>,
    Json(request): Json<RawRecord>,
) -> Result<(StatusCode, Json<RawRecord>), AppError> {
    validate(&request)?;

    let created = state.repo.create(without_id(request)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/employees/:id - Replace an employee's fields.
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<RawRecord>,
) -> ApiResult<RawRecord> {
    validate(&request)?;

    let updated = state.repo.update(EmployeeId(id), without_id(request)).await?;
    Ok(Json(updated))
}

/// Employee number must be an integer, sent as a number or as digits.
fn validate(request: &RawRecord) -> Result<(), AppError> {
    let valid = match request.get("employee_number") {
        Some(Value::Number(n)) => n.is_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().is_ok(),
        _ => false,
    };

    if !valid {
        return Err(AppError::Validation(
            "employee_number must be an integer".to_string(),
        ));
    }
    Ok(())
}

/// The store owns ids; a client-sent id is ignored.
fn without_id(mut request: RawRecord) -> RawRecord {
    request.remove("id");
    request
}
