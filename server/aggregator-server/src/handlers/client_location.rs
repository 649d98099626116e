//! `/client/:client_id/locations` handlers

use crate::error::{ApiResponse, ApiResult};
use crate::middleware::{AppJson, AppPath, AuthContext};
use crate::server::AppState;
use axum::extract::State;
use database_layer::models::{ClientLocation, ClientLocationUpdate, NewClientLocation};

pub async fn list_locations(
    State(state): State<AppState>,
    AppPath(client_id): AppPath<i64>,
    _auth: AuthContext,
) -> ApiResult<ApiResponse<Vec<ClientLocation>>> {
    let locations = state.client_locations.list(client_id).await?;
    let count = locations.len();
    Ok(ApiResponse::ok(locations).extra("count", count))
}

pub async fn get_location(
    State(state): State<AppState>,
    AppPath((client_id, location_id)): AppPath<(i64, i64)>,
    _auth: AuthContext,
) -> ApiResult<ApiResponse<ClientLocation>> {
    Ok(ApiResponse::ok(
        state.client_locations.get(client_id, location_id).await?,
    ))
}

pub async fn create_location(
    State(state): State<AppState>,
    AppPath(client_id): AppPath<i64>,
    auth: AuthContext,
    AppJson(location): AppJson<NewClientLocation>,
) -> ApiResult<ApiResponse<ClientLocation>> {
    let created = state
        .client_locations
        .create(client_id, location, auth.user_id)
        .await?;
    Ok(ApiResponse::created(created).message("Client location created successfully"))
}

pub async fn update_location(
    State(state): State<AppState>,
    AppPath((client_id, location_id)): AppPath<(i64, i64)>,
    auth: AuthContext,
    AppJson(update): AppJson<ClientLocationUpdate>,
) -> ApiResult<ApiResponse<ClientLocation>> {
    let updated = state
        .client_locations
        .update(client_id, location_id, update, auth.user_id)
        .await?;
    Ok(ApiResponse::ok(updated).message("Client location updated successfully"))
}

pub async fn delete_location(
    State(state): State<AppState>,
    AppPath((client_id, location_id)): AppPath<(i64, i64)>,
    _auth: AuthContext,
) -> ApiResult<ApiResponse<()>> {
    state
        .client_locations
        .delete(client_id, location_id)
        .await?;
    Ok(ApiResponse::message_only("Client location deleted successfully"))
}
