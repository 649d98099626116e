//! Client directory.

use crate::error::{ApiError, ApiResult};
use database_layer::models::{Client, ClientUpdate, NewClient};
use database_layer::{ClientListFilter, ClientRepository, PgPool};
use tracing::info;

#[derive(Debug, Clone)]
pub struct ClientService {
    clients: ClientRepository,
}

impl ClientService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            clients: ClientRepository::new(pool),
        }
    }

    pub async fn list(&self, filter: &ClientListFilter) -> ApiResult<(Vec<Client>, i64)> {
        Ok(self.clients.list(filter).await?)
    }

    pub async fn get(&self, client_id: i64) -> ApiResult<Client> {
        self.clients
            .find_by_id(client_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Client not found"))
    }

    /// Match on either contact person's number
    pub async fn get_by_contact_number(&self, contact_number: &str) -> ApiResult<Client> {
        let contact_number = contact_number.trim();
        if contact_number.is_empty() {
            return Err(ApiError::bad_request("contactNumber is required"));
        }
        self.clients
            .find_by_contact_number(contact_number)
            .await?
            .ok_or_else(|| ApiError::not_found("Client not found"))
    }

    pub async fn create(&self, client: NewClient, created_by: i64) -> ApiResult<Client> {
        let created = self.clients.create(&client, created_by).await?;
        info!(client_id = created.client_id, "Client created");
        Ok(created)
    }

    /// Merge the present fields into the stored client
    pub async fn update(&self, client_id: i64, update: ClientUpdate, last_updated_by: i64) -> ApiResult<Client> {
        let mut client = self.get(client_id).await?;
        update.apply_to(&mut client);
        client.last_updated_by = last_updated_by;

        self.clients
            .update(&client)
            .await?
            .ok_or_else(|| ApiError::not_found("Client not found"))
    }

    pub async fn delete(&self, client_id: i64) -> ApiResult<()> {
        if !self.clients.exists(client_id).await? {
            return Err(ApiError::not_found("Client not found"));
        }
        self.clients.delete(client_id).await?;
        info!(client_id, "Client deleted");
        Ok(())
    }
}
