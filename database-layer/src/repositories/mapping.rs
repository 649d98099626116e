use crate::error::DatabaseResult;
use crate::models::{PackageClientMapping, PackageLabMapping, PackageTestMapping};
use sqlx::PgPool;

/// Repository for `package_test_mappings`
#[derive(Debug, Clone)]
pub struct PackageTestMappingRepository {
    pool: PgPool,
}

impl PackageTestMappingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> DatabaseResult<Vec<PackageTestMapping>> {
        let rows = sqlx::query_as::<_, PackageTestMapping>(
            "SELECT * FROM package_test_mappings ORDER BY package_id, test_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Active test ids per package, sorted and de-duplicated, oldest package first
    pub async fn active_test_sets(&self) -> DatabaseResult<Vec<(i32, Vec<i32>)>> {
        let rows: Vec<(i32, Vec<i32>)> = sqlx::query_as(
            r#"
            SELECT package_id, ARRAY_AGG(DISTINCT test_id ORDER BY test_id) AS test_ids
            FROM package_test_mappings
            WHERE is_active = TRUE
            GROUP BY package_id
            ORDER BY package_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

/// Repository for `package_client_mappings`
#[derive(Debug, Clone)]
pub struct PackageClientMappingRepository {
    pool: PgPool,
}

impl PackageClientMappingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> DatabaseResult<Vec<PackageClientMapping>> {
        let rows = sqlx::query_as::<_, PackageClientMapping>(
            "SELECT * FROM package_client_mappings ORDER BY package_client_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn find_by_id(&self, id: i32) -> DatabaseResult<Option<PackageClientMapping>> {
        let row = sqlx::query_as::<_, PackageClientMapping>(
            "SELECT * FROM package_client_mappings WHERE package_client_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Active mapping for the pair, if any
    pub async fn find_active_pair(
        &self,
        package_id: i32,
        client_id: i64,
    ) -> DatabaseResult<Option<PackageClientMapping>> {
        let row = sqlx::query_as::<_, PackageClientMapping>(
            r#"
            SELECT * FROM package_client_mappings
            WHERE package_id = $1 AND client_id = $2 AND is_active = TRUE
            ORDER BY package_client_id
            LIMIT 1
            "#,
        )
        .bind(package_id)
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn create(
        &self,
        package_id: i32,
        client_id: i64,
        price: f64,
        created_by: i64,
    ) -> DatabaseResult<PackageClientMapping> {
        let row = sqlx::query_as::<_, PackageClientMapping>(
            r#"
            INSERT INTO package_client_mappings
                (package_id, client_id, price, is_active, created_by, created_on, last_updated_by, last_updated_on)
            VALUES ($1, $2, $3, TRUE, $4, NOW(), $4, NOW())
            RETURNING *
            "#,
        )
        .bind(package_id)
        .bind(client_id)
        .bind(price)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn update_status(
        &self,
        id: i32,
        is_active: bool,
        last_updated_by: i64,
    ) -> DatabaseResult<Option<PackageClientMapping>> {
        let row = sqlx::query_as::<_, PackageClientMapping>(
            r#"
            UPDATE package_client_mappings
            SET is_active = $2, last_updated_by = $3, last_updated_on = NOW()
            WHERE package_client_id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(is_active)
        .bind(last_updated_by)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}

/// Repository for `package_lab_mappings`
#[derive(Debug, Clone)]
pub struct PackageLabMappingRepository {
    pool: PgPool,
}

impl PackageLabMappingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> DatabaseResult<Vec<PackageLabMapping>> {
        let rows = sqlx::query_as::<_, PackageLabMapping>(
            "SELECT * FROM package_lab_mappings ORDER BY package_lab_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn find_by_id(&self, id: i32) -> DatabaseResult<Option<PackageLabMapping>> {
        let row = sqlx::query_as::<_, PackageLabMapping>(
            "SELECT * FROM package_lab_mappings WHERE package_lab_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn find_active_pair(
        &self,
        package_id: i32,
        lab_id: i64,
    ) -> DatabaseResult<Option<PackageLabMapping>> {
        let row = sqlx::query_as::<_, PackageLabMapping>(
            r#"
            SELECT * FROM package_lab_mappings
            WHERE package_id = $1 AND lab_id = $2 AND is_active = TRUE
            ORDER BY package_lab_id
            LIMIT 1
            "#,
        )
        .bind(package_id)
        .bind(lab_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn create(
        &self,
        package_id: i32,
        lab_id: i64,
        price: f64,
        created_by: i64,
    ) -> DatabaseResult<PackageLabMapping> {
        let row = sqlx::query_as::<_, PackageLabMapping>(
            r#"
            INSERT INTO package_lab_mappings
                (package_id, lab_id, price, is_active, created_by, created_on, last_updated_by, last_updated_on)
            VALUES ($1, $2, $3, TRUE, $4, NOW(), $4, NOW())
            RETURNING *
            "#,
        )
        .bind(package_id)
        .bind(lab_id)
        .bind(price)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn update_status(
        &self,
        id: i32,
        is_active: bool,
        last_updated_by: i64,
    ) -> DatabaseResult<Option<PackageLabMapping>> {
        let row = sqlx::query_as::<_, PackageLabMapping>(
            r#"
            UPDATE package_lab_mappings
            SET is_active = $2, last_updated_by = $3, last_updated_on = NOW()
            WHERE package_lab_id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(is_active)
        .bind(last_updated_by)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
