//! Client collection addresses. Every call is scoped to one client: a
//! location id that belongs to another client is reported as not found.

use crate::error::{ApiError, ApiResult};
use database_layer::models::{ClientLocation, ClientLocationUpdate, NewClientLocation};
use database_layer::{ClientLocationRepository, ClientRepository, PgPool};
use tracing::info;

const LOCATION_NOT_FOUND: &str = "Client location not found";

#[derive(Debug, Clone)]
pub struct ClientLocationService {
    locations: ClientLocationRepository,
    clients: ClientRepository,
}

impl ClientLocationService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            locations: ClientLocationRepository::new(pool.clone()),
            clients: ClientRepository::new(pool),
        }
    }

    async fn ensure_client(&self, client_id: i64) -> ApiResult<()> {
        if self.clients.exists(client_id).await? {
            Ok(())
        } else {
            Err(ApiError::not_found("Client not found"))
        }
    }

    pub async fn list(&self, client_id: i64) -> ApiResult<Vec<ClientLocation>> {
        Ok(self.locations.find_by_client(client_id).await?)
    }

    pub async fn get(&self, client_id: i64, location_id: i64) -> ApiResult<ClientLocation> {
        self.locations
            .find(client_id, location_id)
            .await?
            .ok_or_else(|| ApiError::not_found(LOCATION_NOT_FOUND))
    }

    pub async fn create(
        &self,
        client_id: i64,
        location: NewClientLocation,
        created_by: i64,
    ) -> ApiResult<ClientLocation> {
        self.ensure_client(client_id).await?;
        let created = self.locations.create(client_id, &location, created_by).await?;
        info!(
            client_id,
            client_location_id = created.client_location_id,
            "Client location created"
        );
        Ok(created)
    }

    pub async fn update(
        &self,
        client_id: i64,
        location_id: i64,
        update: ClientLocationUpdate,
        last_updated_by: i64,
    ) -> ApiResult<ClientLocation> {
        let mut location = self.get(client_id, location_id).await?;
        update.apply_to(&mut location);
        location.last_updated_by = last_updated_by;

        self.locations
            .update(&location)
            .await?
            .ok_or_else(|| ApiError::not_found(LOCATION_NOT_FOUND))
    }

    pub async fn delete(&self, client_id: i64, location_id: i64) -> ApiResult<()> {
        if self.locations.delete(client_id, location_id).await? == 0 {
            return Err(ApiError::not_found(LOCATION_NOT_FOUND));
        }
        info!(client_id, client_location_id = location_id, "Client location deleted");
        Ok(())
    }
}
