use crate::error::DatabaseResult;
use crate::models::{Lab, LabUpdate};
use crate::query::{ListParams, ListQuery};
use sqlx::PgPool;

/// Filters accepted by `GET /labs`
#[derive(Debug, Clone, Default)]
pub struct LabListFilter {
    pub params: ListParams,
    pub city_id: Option<i16>,
    pub state_id: Option<i16>,
    pub is_active: Option<bool>,
}

fn lab_sort_column(sort_by: &str) -> &'static str {
    match sort_by {
        "name" => "lab_name",
        "createdOn" => "created_on",
        _ => "lab_id",
    }
}

impl LabListFilter {
    pub fn to_query(&self) -> ListQuery {
        let mut query = ListQuery::new();
        query
            .filter_eq("city_id", self.city_id)
            .filter_eq("state_id", self.state_id)
            .filter_eq("is_active", self.is_active)
            .order_by(lab_sort_column(&self.params.sort_by), self.params.sort_order)
            .paginate(self.params.page, self.params.page_size);
        query
    }
}

/// Repository for `labs`
#[derive(Debug, Clone)]
pub struct LabRepository {
    pool: PgPool,
}

impl LabRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: &LabListFilter) -> DatabaseResult<(Vec<Lab>, i64)> {
        let query = filter.to_query();

        let total: i64 = query
            .count_query("labs")
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let labs = query
            .select_query("SELECT * FROM labs")
            .build_query_as::<Lab>()
            .fetch_all(&self.pool)
            .await?;

        Ok((labs, total))
    }

    pub async fn find_by_id(&self, lab_id: i64) -> DatabaseResult<Option<Lab>> {
        let lab = sqlx::query_as::<_, Lab>("SELECT * FROM labs WHERE lab_id = $1")
            .bind(lab_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(lab)
    }

    /// Match on the primary contact number only
    pub async fn find_by_contact_number(&self, number: &str) -> DatabaseResult<Option<Lab>> {
        let lab = sqlx::query_as::<_, Lab>(
            "SELECT * FROM labs WHERE contact_person1_number = $1 ORDER BY lab_id LIMIT 1",
        )
        .bind(number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(lab)
    }

    pub async fn exists(&self, lab_id: i64) -> DatabaseResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM labs WHERE lab_id = $1)")
            .bind(lab_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    /// Insert a lab; unset activity defaults to active
    pub async fn create(
        &self,
        lab_name: &str,
        details: &LabUpdate,
        created_by: i64,
    ) -> DatabaseResult<Lab> {
        let created = sqlx::query_as::<_, Lab>(
            r#"
            INSERT INTO labs (
                lab_name, address, city_id, state_id, pincode,
                contact_person1_name, contact_person1_number, contact_person1_email_id, contact_person1_designation,
                contact_person2_name, contact_person2_number, contact_person2_email_id, contact_person2_designation,
                category_id, gstin_uin, pan_number, mou_start_date, mou_end_date, accreditation_id,
                collection_types, services_id, collection_pincodes, is_active,
                created_by, created_on, last_updated_by, last_updated_on
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19,
                    $20, $21, $22, $23, $24, NOW(), $24, NOW())
            RETURNING *
            "#,
        )
        .bind(lab_name)
        .bind(&details.address)
        .bind(details.city_id)
        .bind(details.state_id)
        .bind(&details.pincode)
        .bind(&details.contact_person1_name)
        .bind(&details.contact_person1_number)
        .bind(&details.contact_person1_email_id)
        .bind(&details.contact_person1_designation)
        .bind(&details.contact_person2_name)
        .bind(&details.contact_person2_number)
        .bind(&details.contact_person2_email_id)
        .bind(&details.contact_person2_designation)
        .bind(details.category_id)
        .bind(&details.gstin_uin)
        .bind(&details.pan_number)
        .bind(details.mou_start_date)
        .bind(details.mou_end_date)
        .bind(details.accreditation_id)
        .bind(&details.collection_types)
        .bind(&details.services_id)
        .bind(&details.collection_pincodes)
        .bind(details.is_active.unwrap_or(true))
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Persist every mutable column of `lab`
    pub async fn update(&self, lab: &Lab) -> DatabaseResult<Option<Lab>> {
        let updated = sqlx::query_as::<_, Lab>(
            r#"
            UPDATE labs SET
                lab_name = $2, address = $3, city_id = $4, state_id = $5, pincode = $6,
                contact_person1_name = $7, contact_person1_number = $8,
                contact_person1_email_id = $9, contact_person1_designation = $10,
                contact_person2_name = $11, contact_person2_number = $12,
                contact_person2_email_id = $13, contact_person2_designation = $14,
                category_id = $15, gstin_uin = $16, pan_number = $17,
                mou_start_date = $18, mou_end_date = $19, accreditation_id = $20,
                collection_types = $21, services_id = $22, collection_pincodes = $23,
                is_active = $24, last_updated_by = $25, last_updated_on = NOW()
            WHERE lab_id = $1
            RETURNING *
            "#,
        )
        .bind(lab.lab_id)
        .bind(&lab.lab_name)
        .bind(&lab.address)
        .bind(lab.city_id)
        .bind(lab.state_id)
        .bind(&lab.pincode)
        .bind(&lab.contact_person1_name)
        .bind(&lab.contact_person1_number)
        .bind(&lab.contact_person1_email_id)
        .bind(&lab.contact_person1_designation)
        .bind(&lab.contact_person2_name)
        .bind(&lab.contact_person2_number)
        .bind(&lab.contact_person2_email_id)
        .bind(&lab.contact_person2_designation)
        .bind(lab.category_id)
        .bind(&lab.gstin_uin)
        .bind(&lab.pan_number)
        .bind(lab.mou_start_date)
        .bind(lab.mou_end_date)
        .bind(lab.accreditation_id)
        .bind(&lab.collection_types)
        .bind(&lab.services_id)
        .bind(&lab.collection_pincodes)
        .bind(lab.is_active)
        .bind(lab.last_updated_by)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn delete(&self, lab_id: i64) -> DatabaseResult<u64> {
        let result = sqlx::query("DELETE FROM labs WHERE lab_id = $1")
            .bind(lab_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
