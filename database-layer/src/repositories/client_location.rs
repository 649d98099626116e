use crate::error::DatabaseResult;
use crate::models::{ClientLocation, NewClientLocation};
use sqlx::PgPool;

/// Repository for `client_locations`; every lookup is scoped to its client
#[derive(Debug, Clone)]
pub struct ClientLocationRepository {
    pool: PgPool,
}

impl ClientLocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_client(&self, client_id: i64) -> DatabaseResult<Vec<ClientLocation>> {
        let locations = sqlx::query_as::<_, ClientLocation>(
            "SELECT * FROM client_locations WHERE client_id = $1 ORDER BY client_location_id",
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(locations)
    }

    pub async fn find(
        &self,
        client_id: i64,
        location_id: i64,
    ) -> DatabaseResult<Option<ClientLocation>> {
        let location = sqlx::query_as::<_, ClientLocation>(
            "SELECT * FROM client_locations WHERE client_location_id = $1 AND client_id = $2",
        )
        .bind(location_id)
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(location)
    }

    pub async fn create(
        &self,
        client_id: i64,
        location: &NewClientLocation,
        created_by: i64,
    ) -> DatabaseResult<ClientLocation> {
        let created = sqlx::query_as::<_, ClientLocation>(
            r#"
            INSERT INTO client_locations (
                client_id, address, pincode, city_id, state_id, is_active,
                created_by, created_on, last_updated_by, last_updated_on
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), $7, NOW())
            RETURNING *
            "#,
        )
        .bind(client_id)
        .bind(&location.address)
        .bind(&location.pincode)
        .bind(location.city_id)
        .bind(location.state_id)
        .bind(location.is_active)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn update(&self, location: &ClientLocation) -> DatabaseResult<Option<ClientLocation>> {
        let updated = sqlx::query_as::<_, ClientLocation>(
            r#"
            UPDATE client_locations SET
                address = $3, pincode = $4, city_id = $5, state_id = $6, is_active = $7,
                last_updated_by = $8, last_updated_on = NOW()
            WHERE client_location_id = $1 AND client_id = $2
            RETURNING *
            "#,
        )
        .bind(location.client_location_id)
        .bind(location.client_id)
        .bind(&location.address)
        .bind(&location.pincode)
        .bind(location.city_id)
        .bind(location.state_id)
        .bind(location.is_active)
        .bind(location.last_updated_by)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn delete(&self, client_id: i64, location_id: i64) -> DatabaseResult<u64> {
        let result = sqlx::query(
            "DELETE FROM client_locations WHERE client_location_id = $1 AND client_id = $2",
        )
        .bind(location_id)
        .bind(client_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
