//! `/leads` handlers, including bulk status updates and CSV import

use crate::error::{ApiError, ApiResponse, ApiResult};
use crate::middleware::{AppJson, AppPath, AppQuery, AuthContext};
use crate::server::AppState;
use crate::services::CsvImportError;
use crate::types::{PageInfo, PaginationParams};
use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use database_layer::models::{Lead, LeadUpdate, LeadWithNames, NewLead};
use database_layer::LeadListFilter;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// `GET /leads` filters
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadListQuery {
    pub client_id: Option<i64>,
    pub status_id: Option<i16>,
    pub package_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkStatusRequest {
    pub lead_ids: Vec<i64>,
    pub lead_status_id: i16,
    /// Defaults to the authenticated user
    #[serde(default)]
    pub last_updated_by: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkStatusResponse {
    pub updated_count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvImportResponse {
    pub inserted_count: u64,
}

pub async fn list_leads(
    State(state): State<AppState>,
    AppQuery(pagination): AppQuery<PaginationParams>,
    AppQuery(query): AppQuery<LeadListQuery>,
    _auth: AuthContext,
) -> ApiResult<ApiResponse<Vec<Lead>>> {
    let filter = LeadListFilter {
        params: pagination.to_default_list_params(),
        client_id: query.client_id,
        status_id: query.status_id,
        package_id: query.package_id,
    };

    let (leads, total) = state.leads.list(&filter).await?;
    let page = PageInfo::new(leads.len(), &filter.params, total);
    Ok(ApiResponse::ok(leads).with_page(page))
}

pub async fn get_lead(
    State(state): State<AppState>,
    AppPath(lead_id): AppPath<i64>,
    _auth: AuthContext,
) -> ApiResult<ApiResponse<LeadWithNames>> {
    Ok(ApiResponse::ok(state.leads.get(lead_id).await?))
}

pub async fn create_lead(
    State(state): State<AppState>,
    auth: AuthContext,
    AppJson(lead): AppJson<NewLead>,
) -> ApiResult<ApiResponse<Lead>> {
    let created = state.leads.create(lead, auth.user_id).await?;
    Ok(ApiResponse::created(created).message("Lead created successfully"))
}

pub async fn update_lead(
    State(state): State<AppState>,
    AppPath(lead_id): AppPath<i64>,
    auth: AuthContext,
    AppJson(update): AppJson<LeadUpdate>,
) -> ApiResult<ApiResponse<Lead>> {
    let updated = state.leads.update(lead_id, update, auth.user_id).await?;
    Ok(ApiResponse::ok(updated).message("Lead updated successfully"))
}

pub async fn delete_lead(
    State(state): State<AppState>,
    AppPath(lead_id): AppPath<i64>,
    auth: AuthContext,
) -> ApiResult<ApiResponse<()>> {
    state.leads.delete(lead_id, auth.user_id).await?;
    Ok(ApiResponse::message_only("Lead deleted successfully"))
}

pub async fn bulk_update_status(
    State(state): State<AppState>,
    auth: AuthContext,
    AppJson(request): AppJson<BulkStatusRequest>,
) -> ApiResult<ApiResponse<BulkStatusResponse>> {
    let actor = request
        .last_updated_by
        .filter(|id| *id > 0)
        .unwrap_or(auth.user_id);

    let updated_count = state
        .leads
        .bulk_update_status(request.lead_ids, request.lead_status_id, actor)
        .await?;

    Ok(ApiResponse::ok(BulkStatusResponse { updated_count })
        .message("Lead statuses updated successfully"))
}

/// Positive integer form field
fn positive_id(value: Option<&str>) -> Option<i64> {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|id| *id > 0)
}

impl From<ApiError> for CsvImportError {
    fn from(source: ApiError) -> Self {
        Self {
            inserted: 0,
            source,
        }
    }
}

/// Rows before the failing one stay committed; the envelope reports how many
impl IntoResponse for CsvImportError {
    fn into_response(self) -> Response {
        warn!(
            inserted = self.inserted,
            error = %self.source.message(),
            "CSV import stopped"
        );
        let mut extra = Map::new();
        extra.insert("insertedCount".to_string(), Value::from(self.inserted));
        self.source.into_response_with(extra)
    }
}

pub async fn bulk_import_csv(
    State(state): State<AppState>,
    auth: AuthContext,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ApiResponse<CsvImportResponse>, CsvImportError> {
    let mut multipart = multipart.map_err(ApiError::from)?;

    let mut file: Option<Vec<u8>> = None;
    let mut client_id: Option<String> = None;
    let mut package_id: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(ApiError::from)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => file = Some(field.bytes().await.map_err(ApiError::from)?.to_vec()),
            Some("ClientID") => client_id = Some(field.text().await.map_err(ApiError::from)?),
            Some("PackageID") => package_id = Some(field.text().await.map_err(ApiError::from)?),
            _ => {}
        }
    }

    let file = file.ok_or_else(|| ApiError::bad_request("CSV file is required"))?;

    let client_id = client_id.filter(|v| !v.trim().is_empty());
    let package_id = package_id.filter(|v| !v.trim().is_empty());
    if client_id.is_none() || package_id.is_none() {
        return Err(
            ApiError::bad_request("ClientID and PackageID are required in the request body").into(),
        );
    }

    let client_id = positive_id(client_id.as_deref());
    let package_id = positive_id(package_id.as_deref()).and_then(|id| i32::try_from(id).ok());
    let (Some(client_id), Some(package_id)) = (client_id, package_id) else {
        return Err(
            ApiError::bad_request("ClientID and PackageID must be positive integers").into(),
        );
    };

    let inserted_count = state
        .leads
        .import_csv(&file, client_id, package_id, auth.user_id)
        .await?;

    Ok(ApiResponse::created(CsvImportResponse { inserted_count })
        .message("Leads imported successfully"))
}
