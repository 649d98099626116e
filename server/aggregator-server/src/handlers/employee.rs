//! `/employees` handlers

use super::client::ContactNumberQuery;
use crate::error::{ApiResponse, ApiResult};
use crate::middleware::{AppJson, AppPath, AppQuery, AuthContext};
use crate::server::AppState;
use axum::extract::State;
use database_layer::models::{Employee, EmployeeUpdate, NewEmployee};

pub async fn list_employees(
    State(state): State<AppState>,
    _auth: AuthContext,
) -> ApiResult<ApiResponse<Vec<Employee>>> {
    let employees = state.employees.list().await?;
    let count = employees.len();
    Ok(ApiResponse::ok(employees).extra("count", count))
}

pub async fn get_employee(
    State(state): State<AppState>,
    AppPath(uid): AppPath<i64>,
    _auth: AuthContext,
) -> ApiResult<ApiResponse<Employee>> {
    Ok(ApiResponse::ok(state.employees.get(uid).await?))
}

/// `GET /employees/search?contactNumber=`
pub async fn search_employee(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ContactNumberQuery>,
    _auth: AuthContext,
) -> ApiResult<ApiResponse<Employee>> {
    Ok(ApiResponse::ok(
        state
            .employees
            .search_by_mobile_number(&query.contact_number)
            .await?,
    ))
}

pub async fn create_employee(
    State(state): State<AppState>,
    auth: AuthContext,
    AppJson(employee): AppJson<NewEmployee>,
) -> ApiResult<ApiResponse<Employee>> {
    let created = state.employees.create(employee, auth.user_id).await?;
    Ok(ApiResponse::created(created).message("Employee created successfully"))
}

pub async fn update_employee(
    State(state): State<AppState>,
    AppPath(uid): AppPath<i64>,
    auth: AuthContext,
    AppJson(update): AppJson<EmployeeUpdate>,
) -> ApiResult<ApiResponse<Employee>> {
    let updated = state.employees.update(uid, update, auth.user_id).await?;
    Ok(ApiResponse::ok(updated).message("Employee updated successfully"))
}

pub async fn delete_employee(
    State(state): State<AppState>,
    AppPath(uid): AppPath<i64>,
    _auth: AuthContext,
) -> ApiResult<ApiResponse<()>> {
    state.employees.delete(uid).await?;
    Ok(ApiResponse::message_only("Employee deleted successfully"))
}
