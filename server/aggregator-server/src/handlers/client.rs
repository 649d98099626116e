//! `/clients` handlers

use crate::error::{ApiResponse, ApiResult};
use crate::middleware::{AppJson, AppPath, AppQuery, AuthContext};
use crate::server::AppState;
use crate::types::{PageInfo, PaginationParams, DIRECTORY_PAGE_SIZE};
use axum::extract::State;
use database_layer::models::{Client, ClientUpdate, NewClient};
use database_layer::ClientListFilter;
use serde::Deserialize;

/// `?cityId=&stateId=&isActive=`, shared with `/labs`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryListQuery {
    pub city_id: Option<i16>,
    pub state_id: Option<i16>,
    pub is_active: Option<bool>,
}

/// `?contactNumber=`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactNumberQuery {
    #[serde(default)]
    pub contact_number: String,
}

pub async fn list_clients(
    State(state): State<AppState>,
    AppQuery(pagination): AppQuery<PaginationParams>,
    AppQuery(query): AppQuery<DirectoryListQuery>,
    _auth: AuthContext,
) -> ApiResult<ApiResponse<Vec<Client>>> {
    let filter = ClientListFilter {
        params: pagination.to_list_params(DIRECTORY_PAGE_SIZE),
        city_id: query.city_id,
        state_id: query.state_id,
        is_active: query.is_active,
    };

    let (clients, total) = state.clients.list(&filter).await?;
    let page = PageInfo::new(clients.len(), &filter.params, total);
    Ok(ApiResponse::ok(clients).with_page(page))
}

pub async fn get_client(
    State(state): State<AppState>,
    AppPath(client_id): AppPath<i64>,
    _auth: AuthContext,
) -> ApiResult<ApiResponse<Client>> {
    Ok(ApiResponse::ok(state.clients.get(client_id).await?))
}

pub async fn get_client_by_contact(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ContactNumberQuery>,
    _auth: AuthContext,
) -> ApiResult<ApiResponse<Client>> {
    Ok(ApiResponse::ok(
        state.clients.get_by_contact_number(&query.contact_number).await?,
    ))
}

pub async fn create_client(
    State(state): State<AppState>,
    auth: AuthContext,
    AppJson(client): AppJson<NewClient>,
) -> ApiResult<ApiResponse<Client>> {
    let created = state.clients.create(client, auth.user_id).await?;
    Ok(ApiResponse::created(created).message("Client created successfully"))
}

pub async fn update_client(
    State(state): State<AppState>,
    AppPath(client_id): AppPath<i64>,
    auth: AuthContext,
    AppJson(update): AppJson<ClientUpdate>,
) -> ApiResult<ApiResponse<Client>> {
    let updated = state.clients.update(client_id, update, auth.user_id).await?;
    Ok(ApiResponse::ok(updated).message("Client updated successfully"))
}

pub async fn delete_client(
    State(state): State<AppState>,
    AppPath(client_id): AppPath<i64>,
    _auth: AuthContext,
) -> ApiResult<ApiResponse<()>> {
    state.clients.delete(client_id).await?;
    Ok(ApiResponse::message_only("Client deleted successfully"))
}
