use crate::error::DatabaseResult;
use crate::models::{Client, NewClient};
use crate::query::{ListParams, ListQuery};
use sqlx::PgPool;

/// Filters accepted by `GET /clients`
#[derive(Debug, Clone, Default)]
pub struct ClientListFilter {
    pub params: ListParams,
    pub city_id: Option<i16>,
    pub state_id: Option<i16>,
    pub is_active: Option<bool>,
}

fn client_sort_column(sort_by: &str) -> &'static str {
    match sort_by {
        "name" => "client_name",
        "createdOn" => "created_on",
        _ => "client_id",
    }
}

impl ClientListFilter {
    pub fn to_query(&self) -> ListQuery {
        let mut query = ListQuery::new();
        query
            .filter_eq("city_id", self.city_id)
            .filter_eq("state_id", self.state_id)
            .filter_eq("is_active", self.is_active)
            .order_by(client_sort_column(&self.params.sort_by), self.params.sort_order)
            .paginate(self.params.page, self.params.page_size);
        query
    }
}

/// Repository for `clients`
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: &ClientListFilter) -> DatabaseResult<(Vec<Client>, i64)> {
        let query = filter.to_query();

        let total: i64 = query
            .count_query("clients")
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let clients = query
            .select_query("SELECT * FROM clients")
            .build_query_as::<Client>()
            .fetch_all(&self.pool)
            .await?;

        Ok((clients, total))
    }

    pub async fn find_by_id(&self, client_id: i64) -> DatabaseResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE client_id = $1")
            .bind(client_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(client)
    }

    /// Match on either contact person's number
    pub async fn find_by_contact_number(&self, number: &str) -> DatabaseResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT * FROM clients
            WHERE contact_person1_number = $1 OR contact_person2_number = $1
            ORDER BY client_id
            LIMIT 1
            "#,
        )
        .bind(number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    pub async fn exists(&self, client_id: i64) -> DatabaseResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM clients WHERE client_id = $1)")
                .bind(client_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    pub async fn create(&self, client: &NewClient, created_by: i64) -> DatabaseResult<Client> {
        let created = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (
                client_name, address, city_id, state_id, pincode,
                contact_person1_name, contact_person1_number, contact_person1_email_id, contact_person1_designation,
                contact_person2_name, contact_person2_number, contact_person2_email_id, contact_person2_designation,
                category_id, gstin_uin, pan_number, business_vertical,
                billing_name, billing_address, billing_pincode, is_active,
                created_by, created_on, last_updated_by, last_updated_on
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                    $18, $19, $20, $21, $22, NOW(), $22, NOW())
            RETURNING *
            "#,
        )
        .bind(&client.client_name)
        .bind(&client.address)
        .bind(client.city_id)
        .bind(client.state_id)
        .bind(&client.pincode)
        .bind(&client.contact_person1_name)
        .bind(&client.contact_person1_number)
        .bind(&client.contact_person1_email_id)
        .bind(&client.contact_person1_designation)
        .bind(&client.contact_person2_name)
        .bind(&client.contact_person2_number)
        .bind(&client.contact_person2_email_id)
        .bind(&client.contact_person2_designation)
        .bind(client.category_id)
        .bind(&client.gstin_uin)
        .bind(&client.pan_number)
        .bind(&client.business_vertical)
        .bind(&client.billing_name)
        .bind(&client.billing_address)
        .bind(&client.billing_pincode)
        .bind(client.is_active)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Persist every mutable column of `client`
    pub async fn update(&self, client: &Client) -> DatabaseResult<Option<Client>> {
        let updated = sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients SET
                client_name = $2, address = $3, city_id = $4, state_id = $5, pincode = $6,
                contact_person1_name = $7, contact_person1_number = $8,
                contact_person1_email_id = $9, contact_person1_designation = $10,
                contact_person2_name = $11, contact_person2_number = $12,
                contact_person2_email_id = $13, contact_person2_designation = $14,
                category_id = $15, gstin_uin = $16, pan_number = $17, business_vertical = $18,
                billing_name = $19, billing_address = $20, billing_pincode = $21, is_active = $22,
                last_updated_by = $23, last_updated_on = NOW()
            WHERE client_id = $1
            RETURNING *
            "#,
        )
        .bind(client.client_id)
        .bind(&client.client_name)
        .bind(&client.address)
        .bind(client.city_id)
        .bind(client.state_id)
        .bind(&client.pincode)
        .bind(&client.contact_person1_name)
        .bind(&client.contact_person1_number)
        .bind(&client.contact_person1_email_id)
        .bind(&client.contact_person1_designation)
        .bind(&client.contact_person2_name)
        .bind(&client.contact_person2_number)
        .bind(&client.contact_person2_email_id)
        .bind(&client.contact_person2_designation)
        .bind(client.category_id)
        .bind(&client.gstin_uin)
        .bind(&client.pan_number)
        .bind(&client.business_vertical)
        .bind(&client.billing_name)
        .bind(&client.billing_address)
        .bind(&client.billing_pincode)
        .bind(client.is_active)
        .bind(client.last_updated_by)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn delete(&self, client_id: i64) -> DatabaseResult<u64> {
        let result = sqlx::query("DELETE FROM clients WHERE client_id = $1")
            .bind(client_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_filter_query() {
        let filter = ClientListFilter {
            params: ListParams {
                page_size: 500,
                sort_by: "name".to_string(),
                ..Default::default()
            },
            city_id: Some(3),
            state_id: None,
            is_active: Some(true),
        };

        assert_eq!(
            filter.to_query().select_query("SELECT * FROM clients").sql(),
            "SELECT * FROM clients WHERE 1=1 AND city_id = $1 AND is_active = $2 \
             ORDER BY client_name ASC LIMIT $3 OFFSET $4"
        );
        assert_eq!(client_sort_column("unknown"), "client_id");
    }
}
