//! `/packages` handlers: package CRUD, test bundles, status cascade and the
//! client/lab price mappings

use crate::error::{ApiResponse, ApiResult};
use crate::middleware::{AppJson, AppPath, AppQuery, AuthContext};
use crate::server::AppState;
use crate::services::package::{PackageWithTestIds, PackageWithTests};
use crate::types::{PageInfo, PaginationParams};
use axum::extract::State;
use axum::http::StatusCode;
use database_layer::models::{NewPackage, Package, PackageClientMapping, PackageLabMapping};
use database_layer::PackageListFilter;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageListQuery {
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

/// Package body; `IsActive` defaults to true
#[derive(Debug, Clone, Deserialize)]
pub struct PackageRequest {
    #[serde(rename = "PackageName")]
    pub package_name: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "IsActive", default)]
    pub is_active: Option<bool>,
}

impl PackageRequest {
    pub fn into_new_package(self, created_by: i64) -> NewPackage {
        NewPackage {
            package_name: self.package_name,
            description: self.description,
            is_active: self.is_active.unwrap_or(true),
            created_by,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePackageWithTestsRequest {
    #[serde(flatten)]
    pub package: PackageRequest,
    #[serde(rename = "testIds", alias = "TestIDs")]
    pub test_ids: Vec<i32>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StatusRequest {
    #[serde(rename = "IsActive")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientMappingRequest {
    #[serde(rename = "PackageID")]
    pub package_id: i32,
    #[serde(rename = "ClientID")]
    pub client_id: i64,
    #[serde(rename = "Price", default)]
    pub price: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabMappingRequest {
    #[serde(rename = "PackageID")]
    pub package_id: i32,
    #[serde(rename = "LabID")]
    pub lab_id: i64,
    #[serde(rename = "Price", default)]
    pub price: f64,
}

pub async fn list_packages(
    State(state): State<AppState>,
    AppQuery(pagination): AppQuery<PaginationParams>,
    AppQuery(query): AppQuery<PackageListQuery>,
    _auth: AuthContext,
) -> ApiResult<ApiResponse<Vec<Package>>> {
    let filter = PackageListFilter {
        params: pagination.to_default_list_params(),
        is_active: query.is_active,
        search: query.search.filter(|s| !s.trim().is_empty()),
    };

    let (packages, total) = state.packages.list(&filter).await?;
    let page = PageInfo::new(packages.len(), &filter.params, total);
    Ok(ApiResponse::ok(packages).with_page(page))
}

pub async fn get_package(
    State(state): State<AppState>,
    AppPath(package_id): AppPath<i32>,
    _auth: AuthContext,
) -> ApiResult<ApiResponse<Package>> {
    Ok(ApiResponse::ok(state.packages.get(package_id).await?))
}

pub async fn create_package(
    State(state): State<AppState>,
    auth: AuthContext,
    AppJson(request): AppJson<PackageRequest>,
) -> ApiResult<ApiResponse<Package>> {
    let created = state
        .packages
        .create(request.into_new_package(auth.user_id))
        .await?;
    Ok(ApiResponse::created(created).message("Package created successfully"))
}

pub async fn delete_package(
    State(state): State<AppState>,
    AppPath(package_id): AppPath<i32>,
    _auth: AuthContext,
) -> ApiResult<ApiResponse<()>> {
    state.packages.delete(package_id).await?;
    Ok(ApiResponse::message_only("Package deleted successfully"))
}

/// 201 for a new package, 200 when the same test set already exists
pub async fn create_package_with_tests(
    State(state): State<AppState>,
    auth: AuthContext,
    AppJson(request): AppJson<CreatePackageWithTestsRequest>,
) -> ApiResult<ApiResponse<PackageWithTestIds>> {
    let outcome = state
        .packages
        .create_with_tests(request.package.into_new_package(auth.user_id), &request.test_ids)
        .await?;

    let status = if outcome.is_existing() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok(ApiResponse::ok(outcome.package)
        .status(status)
        .message(outcome.message))
}

pub async fn list_packages_with_tests(
    State(state): State<AppState>,
    _auth: AuthContext,
) -> ApiResult<ApiResponse<Vec<PackageWithTests>>> {
    let packages = state.packages.list_with_test_details().await?;
    let count = packages.len();
    Ok(ApiResponse::ok(packages)
        .message("Packages retrieved successfully with test details")
        .extra("count", count))
}

pub async fn update_package_status(
    State(state): State<AppState>,
    AppPath(package_id): AppPath<i32>,
    auth: AuthContext,
    AppJson(request): AppJson<StatusRequest>,
) -> ApiResult<ApiResponse<Package>> {
    let outcome = state
        .packages
        .update_status(package_id, request.is_active, auth.user_id)
        .await?;
    let message = outcome.message();
    Ok(ApiResponse::ok(outcome.package).message(message))
}

pub async fn list_client_mappings(
    State(state): State<AppState>,
    _auth: AuthContext,
) -> ApiResult<ApiResponse<Vec<PackageClientMapping>>> {
    let mappings = state.packages.list_client_mappings().await?;
    let count = mappings.len();
    Ok(ApiResponse::ok(mappings)
        .message("Package-Client mappings retrieved successfully")
        .extra("count", count))
}

pub async fn create_client_mapping(
    State(state): State<AppState>,
    auth: AuthContext,
    AppJson(request): AppJson<ClientMappingRequest>,
) -> ApiResult<ApiResponse<PackageClientMapping>> {
    let outcome = state
        .packages
        .create_client_mapping(request.package_id, request.client_id, request.price, auth.user_id)
        .await?;

    let status = if outcome.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok(ApiResponse::ok(outcome.mapping)
        .status(status)
        .message(outcome.message))
}

/// Blocked activations still answer 200 with the unchanged mapping
pub async fn update_client_mapping_status(
    State(state): State<AppState>,
    AppPath(mapping_id): AppPath<i32>,
    auth: AuthContext,
    AppJson(request): AppJson<StatusRequest>,
) -> ApiResult<ApiResponse<PackageClientMapping>> {
    let outcome = state
        .packages
        .update_client_mapping_status(mapping_id, request.is_active, auth.user_id)
        .await?;
    Ok(ApiResponse::ok(outcome.mapping).message(outcome.message))
}

pub async fn list_lab_mappings(
    State(state): State<AppState>,
    _auth: AuthContext,
) -> ApiResult<ApiResponse<Vec<PackageLabMapping>>> {
    let mappings = state.packages.list_lab_mappings().await?;
    let count = mappings.len();
    Ok(ApiResponse::ok(mappings)
        .message("Package-Lab mappings retrieved successfully")
        .extra("count", count))
}

pub async fn create_lab_mapping(
    State(state): State<AppState>,
    auth: AuthContext,
    AppJson(request): AppJson<LabMappingRequest>,
) -> ApiResult<ApiResponse<PackageLabMapping>> {
    let outcome = state
        .packages
        .create_lab_mapping(request.package_id, request.lab_id, request.price, auth.user_id)
        .await?;

    let status = if outcome.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok(ApiResponse::ok(outcome.mapping)
        .status(status)
        .message(outcome.message))
}

pub async fn update_lab_mapping_status(
    State(state): State<AppState>,
    AppPath(mapping_id): AppPath<i32>,
    auth: AuthContext,
    AppJson(request): AppJson<StatusRequest>,
) -> ApiResult<ApiResponse<PackageLabMapping>> {
    let outcome = state
        .packages
        .update_lab_mapping_status(mapping_id, request.is_active, auth.user_id)
        .await?;
    Ok(ApiResponse::ok(outcome.mapping).message(outcome.message))
}
