//! `/labs` handlers

use super::client::{ContactNumberQuery, DirectoryListQuery};
use crate::error::{ApiResponse, ApiResult};
use crate::middleware::{AppJson, AppPath, AppQuery, AuthContext};
use crate::server::AppState;
use crate::types::{PageInfo, PaginationParams, DIRECTORY_PAGE_SIZE};
use axum::extract::State;
use database_layer::models::{Lab, LabUpdate, NewLab};
use database_layer::LabListFilter;

pub async fn list_labs(
    State(state): State<AppState>,
    AppQuery(pagination): AppQuery<PaginationParams>,
    AppQuery(query): AppQuery<DirectoryListQuery>,
    _auth: AuthContext,
) -> ApiResult<ApiResponse<Vec<Lab>>> {
    let filter = LabListFilter {
        params: pagination.to_list_params(DIRECTORY_PAGE_SIZE),
        city_id: query.city_id,
        state_id: query.state_id,
        is_active: query.is_active,
    };

    let (labs, total) = state.labs.list(&filter).await?;
    let page = PageInfo::new(labs.len(), &filter.params, total);
    Ok(ApiResponse::ok(labs).with_page(page))
}

pub async fn get_lab(
    State(state): State<AppState>,
    AppPath(lab_id): AppPath<i64>,
    _auth: AuthContext,
) -> ApiResult<ApiResponse<Lab>> {
    Ok(ApiResponse::ok(state.labs.get(lab_id).await?))
}

pub async fn get_lab_by_contact(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ContactNumberQuery>,
    _auth: AuthContext,
) -> ApiResult<ApiResponse<Lab>> {
    Ok(ApiResponse::ok(
        state.labs.get_by_contact_number(&query.contact_number).await?,
    ))
}

pub async fn create_lab(
    State(state): State<AppState>,
    auth: AuthContext,
    AppJson(lab): AppJson<NewLab>,
) -> ApiResult<ApiResponse<Lab>> {
    let created = state.labs.create(lab, auth.user_id).await?;
    Ok(ApiResponse::created(created).message("Lab created successfully"))
}

pub async fn update_lab(
    State(state): State<AppState>,
    AppPath(lab_id): AppPath<i64>,
    auth: AuthContext,
    AppJson(update): AppJson<LabUpdate>,
) -> ApiResult<ApiResponse<Lab>> {
    let updated = state.labs.update(lab_id, update, auth.user_id).await?;
    Ok(ApiResponse::ok(updated).message("Lab updated successfully"))
}

pub async fn delete_lab(
    State(state): State<AppState>,
    AppPath(lab_id): AppPath<i64>,
    _auth: AuthContext,
) -> ApiResult<ApiResponse<()>> {
    state.labs.delete(lab_id).await?;
    Ok(ApiResponse::message_only("Lab deleted successfully"))
}
