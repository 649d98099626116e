use crate::error::DatabaseResult;
use crate::models::{Lead, LeadWithNames, NewLead};
use crate::query::{ListParams, ListQuery};
use sqlx::{PgConnection, PgPool};

/// Filters accepted by `GET /leads`
#[derive(Debug, Clone, Default)]
pub struct LeadListFilter {
    pub params: ListParams,
    pub client_id: Option<i64>,
    pub status_id: Option<i16>,
    pub package_id: Option<i32>,
}

fn lead_sort_column(sort_by: &str) -> &'static str {
    match sort_by {
        "patientName" => "patient_name",
        "clientId" => "client_id",
        "statusId" => "lead_status_id",
        "createdOn" => "created_on",
        _ => "lead_id",
    }
}

impl LeadListFilter {
    pub fn to_query(&self) -> ListQuery {
        let mut query = ListQuery::new();
        query
            .filter_eq("client_id", self.client_id)
            .filter_eq("lead_status_id", self.status_id)
            .filter_eq("package_id", self.package_id)
            .order_by(lead_sort_column(&self.params.sort_by), self.params.sort_order)
            .paginate(self.params.page, self.params.page_size);
        query
    }
}

/// Read side of the `leads` table
#[derive(Debug, Clone)]
pub struct LeadRepository {
    pool: PgPool,
}

impl LeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One page of leads plus the total matching the filter
    pub async fn list(&self, filter: &LeadListFilter) -> DatabaseResult<(Vec<Lead>, i64)> {
        let query = filter.to_query();

        let total: i64 = query
            .count_query("leads")
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let leads = query
            .select_query("SELECT * FROM leads")
            .build_query_as::<Lead>()
            .fetch_all(&self.pool)
            .await?;

        Ok((leads, total))
    }

    pub async fn find_by_id(&self, lead_id: i64) -> DatabaseResult<Option<Lead>> {
        let lead = sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE lead_id = $1")
            .bind(lead_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(lead)
    }

    /// Lead joined with client and package names; missing parents give ""
    pub async fn find_with_names(&self, lead_id: i64) -> DatabaseResult<Option<LeadWithNames>> {
        let lead = sqlx::query_as::<_, LeadWithNames>(
            r#"
            SELECT l.*,
                   COALESCE(c.client_name, '') AS client_name,
                   COALESCE(p.package_name, '') AS package_name
            FROM leads l
            LEFT JOIN clients c ON c.client_id = l.client_id
            LEFT JOIN packages p ON p.package_id = l.package_id
            WHERE l.lead_id = $1
            "#,
        )
        .bind(lead_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(lead)
    }

    pub async fn exists(&self, lead_id: i64) -> DatabaseResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM leads WHERE lead_id = $1)")
                .bind(lead_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}

/// Lead writes bound to an open transaction
pub struct LeadWriter<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> LeadWriter<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(&mut self, lead: &NewLead) -> DatabaseResult<Lead> {
        let created = sqlx::query_as::<_, Lead>(
            r#"
            INSERT INTO leads (
                client_id, patient_id, patient_name, age, gender, package_id,
                contact_number, emailid, address, city_id, state_id, pincode,
                lead_status_id, created_by, created_on, last_updated_by, last_updated_on
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, NOW(), $14, NOW())
            RETURNING *
            "#,
        )
        .bind(lead.client_id)
        .bind(&lead.patient_id)
        .bind(&lead.patient_name)
        .bind(lead.age)
        .bind(&lead.gender)
        .bind(lead.package_id)
        .bind(&lead.contact_number)
        .bind(&lead.emailid)
        .bind(&lead.address)
        .bind(lead.city_id)
        .bind(lead.state_id)
        .bind(&lead.pincode)
        .bind(lead.lead_status_id)
        .bind(lead.created_by)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(created)
    }

    /// Overwrite every mutable column of `lead`; `None` when the row is gone
    pub async fn update(&mut self, lead: &Lead) -> DatabaseResult<Option<Lead>> {
        let updated = sqlx::query_as::<_, Lead>(
            r#"
            UPDATE leads SET
                client_id = $2, patient_id = $3, patient_name = $4, age = $5,
                gender = $6, package_id = $7, contact_number = $8, emailid = $9,
                address = $10, city_id = $11, state_id = $12, pincode = $13,
                lead_status_id = $14, last_updated_by = $15, last_updated_on = NOW()
            WHERE lead_id = $1
            RETURNING *
            "#,
        )
        .bind(lead.lead_id)
        .bind(lead.client_id)
        .bind(&lead.patient_id)
        .bind(&lead.patient_name)
        .bind(lead.age)
        .bind(&lead.gender)
        .bind(lead.package_id)
        .bind(&lead.contact_number)
        .bind(&lead.emailid)
        .bind(&lead.address)
        .bind(lead.city_id)
        .bind(lead.state_id)
        .bind(&lead.pincode)
        .bind(lead.lead_status_id)
        .bind(lead.last_updated_by)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(updated)
    }

    pub async fn delete(&mut self, lead_id: i64) -> DatabaseResult<u64> {
        let result = sqlx::query("DELETE FROM leads WHERE lead_id = $1")
            .bind(lead_id)
            .execute(&mut *self.conn)
            .await?;

        Ok(result.rows_affected())
    }

    /// Set the status of every listed lead in one statement
    pub async fn update_status_for_ids(
        &mut self,
        lead_ids: &[i64],
        status_id: i16,
        last_updated_by: i64,
    ) -> DatabaseResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE leads
            SET lead_status_id = $2, last_updated_by = $3, last_updated_on = NOW()
            WHERE lead_id = ANY($1)
            "#,
        )
        .bind(lead_ids)
        .bind(status_id)
        .bind(last_updated_by)
        .execute(&mut *self.conn)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SortOrder;

    #[test]
    fn test_sort_columns() {
        assert_eq!(lead_sort_column("patientName"), "patient_name");
        assert_eq!(lead_sort_column("statusId"), "lead_status_id");
        assert_eq!(lead_sort_column("createdOn"), "created_on");
        assert_eq!(lead_sort_column("anything"), "lead_id");
        assert_eq!(lead_sort_column(""), "lead_id");
    }

    #[test]
    fn test_filter_query() {
        let filter = LeadListFilter {
            params: ListParams {
                page: 2,
                page_size: 10,
                sort_by: "clientId".to_string(),
                sort_order: SortOrder::Desc,
            },
            client_id: Some(4),
            status_id: None,
            package_id: Some(9),
        };

        let query = filter.to_query();
        assert_eq!(
            query.select_query("SELECT * FROM leads").sql(),
            "SELECT * FROM leads WHERE 1=1 AND client_id = $1 AND package_id = $2 \
             ORDER BY client_id DESC LIMIT $3 OFFSET $4"
        );
        assert_eq!(query.offset(), 10);
    }
}
