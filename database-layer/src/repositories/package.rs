use crate::error::DatabaseResult;
use crate::models::{NewPackage, Package};
use crate::query::{ListParams, ListQuery};
use crate::transaction::TransactionManager;
use sqlx::{PgExecutor, PgPool};
use tracing::debug;

/// Filters accepted by `GET /packages`
#[derive(Debug, Clone, Default)]
pub struct PackageListFilter {
    pub params: ListParams,
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

fn package_sort_column(sort_by: &str) -> &'static str {
    match sort_by {
        "name" => "package_name",
        "createdOn" => "created_on",
        _ => "package_id",
    }
}

impl PackageListFilter {
    pub fn to_query(&self) -> ListQuery {
        let mut query = ListQuery::new();
        query
            .filter_eq("is_active", self.is_active)
            .filter_contains("package_name", self.search.as_deref())
            .order_by(package_sort_column(&self.params.sort_by), self.params.sort_order)
            .paginate(self.params.page, self.params.page_size);
        query
    }
}

/// Mapping rows touched by a package status change
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeCounts {
    pub test_mappings: u64,
    pub client_mappings: u64,
    pub lab_mappings: u64,
}

impl CascadeCounts {
    pub fn total(&self) -> u64 {
        self.test_mappings + self.client_mappings + self.lab_mappings
    }
}

/// Repository for `packages`, including the multi-table package writes
#[derive(Debug, Clone)]
pub struct PackageRepository {
    pool: PgPool,
    transactions: TransactionManager,
}

impl PackageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            transactions: TransactionManager::new(pool.clone()),
            pool,
        }
    }

    pub async fn list(&self, filter: &PackageListFilter) -> DatabaseResult<(Vec<Package>, i64)> {
        let query = filter.to_query();

        let total: i64 = query
            .count_query("packages")
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let packages = query
            .select_query("SELECT * FROM packages")
            .build_query_as::<Package>()
            .fetch_all(&self.pool)
            .await?;

        Ok((packages, total))
    }

    pub async fn find_all(&self) -> DatabaseResult<Vec<Package>> {
        let packages = sqlx::query_as::<_, Package>("SELECT * FROM packages ORDER BY package_id")
            .fetch_all(&self.pool)
            .await?;

        Ok(packages)
    }

    pub async fn find_by_id(&self, package_id: i32) -> DatabaseResult<Option<Package>> {
        let package = sqlx::query_as::<_, Package>("SELECT * FROM packages WHERE package_id = $1")
            .bind(package_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(package)
    }

    pub async fn create(&self, package: &NewPackage) -> DatabaseResult<Package> {
        insert_package(&self.pool, package).await
    }

    /// Insert the package and one active test mapping per id atomically
    pub async fn create_with_tests(
        &self,
        package: &NewPackage,
        test_ids: &[i32],
    ) -> DatabaseResult<Package> {
        let mut tx = self.transactions.begin().await?;

        let created = match insert_package(&mut *tx, package).await {
            Ok(created) => created,
            Err(e) => {
                TransactionManager::rollback(tx).await;
                return Err(e);
            }
        };

        let mapped = sqlx::query(
            r#"
            INSERT INTO package_test_mappings
                (package_id, test_id, is_active, created_by, created_on, last_updated_by, last_updated_on)
            SELECT $1, test_id, TRUE, $3, NOW(), $3, NOW()
            FROM UNNEST($2::INTEGER[]) AS t(test_id)
            "#,
        )
        .bind(created.package_id)
        .bind(test_ids)
        .bind(package.created_by)
        .execute(&mut *tx)
        .await;

        if let Err(e) = mapped {
            TransactionManager::rollback(tx).await;
            return Err(e.into());
        }

        TransactionManager::commit(tx).await?;
        debug!(package_id = created.package_id, tests = test_ids.len(), "Package created with tests");
        Ok(created)
    }

    /// Set `is_active` on the package and every mapping that references it.
    ///
    /// Returns `None` when the package does not exist; nothing is written then.
    pub async fn update_status_cascade(
        &self,
        package_id: i32,
        is_active: bool,
        last_updated_by: i64,
    ) -> DatabaseResult<Option<(Package, CascadeCounts)>> {
        let mut tx = self.transactions.begin().await?;

        let outcome = async {
            let package = sqlx::query_as::<_, Package>(
                r#"
                UPDATE packages
                SET is_active = $2, last_updated_by = $3, last_updated_on = NOW()
                WHERE package_id = $1
                RETURNING *
                "#,
            )
            .bind(package_id)
            .bind(is_active)
            .bind(last_updated_by)
            .fetch_optional(&mut *tx)
            .await?;

            let Some(package) = package else {
                return Ok::<_, sqlx::Error>(None);
            };

            let mut counts = CascadeCounts::default();
            for (table, slot) in [
                ("package_test_mappings", &mut counts.test_mappings),
                ("package_client_mappings", &mut counts.client_mappings),
                ("package_lab_mappings", &mut counts.lab_mappings),
            ] {
                let result = sqlx::query(&format!(
                    "UPDATE {} SET is_active = $2, last_updated_by = $3, last_updated_on = NOW() \
                     WHERE package_id = $1",
                    table
                ))
                .bind(package_id)
                .bind(is_active)
                .bind(last_updated_by)
                .execute(&mut *tx)
                .await?;
                *slot = result.rows_affected();
            }

            Ok(Some((package, counts)))
        }
        .await;

        match outcome {
            Ok(Some(updated)) => {
                TransactionManager::commit(tx).await?;
                Ok(Some(updated))
            }
            Ok(None) => {
                TransactionManager::rollback(tx).await;
                Ok(None)
            }
            Err(e) => {
                TransactionManager::rollback(tx).await;
                Err(e.into())
            }
        }
    }

    /// Remove the package together with its mapping rows; false if absent
    pub async fn delete(&self, package_id: i32) -> DatabaseResult<bool> {
        let mut tx = self.transactions.begin().await?;

        let outcome = async {
            for table in [
                "package_test_mappings",
                "package_client_mappings",
                "package_lab_mappings",
            ] {
                sqlx::query(&format!("DELETE FROM {} WHERE package_id = $1", table))
                    .bind(package_id)
                    .execute(&mut *tx)
                    .await?;
            }

            sqlx::query("DELETE FROM packages WHERE package_id = $1")
                .bind(package_id)
                .execute(&mut *tx)
                .await
        }
        .await;

        match outcome {
            Ok(result) if result.rows_affected() > 0 => {
                TransactionManager::commit(tx).await?;
                Ok(true)
            }
            Ok(_) => {
                TransactionManager::rollback(tx).await;
                Ok(false)
            }
            Err(e) => {
                TransactionManager::rollback(tx).await;
                Err(e.into())
            }
        }
    }
}

async fn insert_package<'e, E>(executor: E, package: &NewPackage) -> DatabaseResult<Package>
where
    E: PgExecutor<'e>,
{
    let created = sqlx::query_as::<_, Package>(
        r#"
        INSERT INTO packages
            (package_name, description, is_active, created_by, created_on, last_updated_by, last_updated_on)
        VALUES ($1, $2, $3, $4, NOW(), $4, NOW())
        RETURNING *
        "#,
    )
    .bind(&package.package_name)
    .bind(&package.description)
    .bind(package.is_active)
    .bind(package.created_by)
    .fetch_one(executor)
    .await?;

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_columns() {
        assert_eq!(package_sort_column("name"), "package_name");
        assert_eq!(package_sort_column("createdOn"), "created_on");
        assert_eq!(package_sort_column("price"), "package_id");
    }

    #[test]
    fn test_search_filter() {
        let filter = PackageListFilter {
            params: ListParams::default(),
            is_active: Some(true),
            search: Some("lipid".to_string()),
        };
        assert_eq!(
            filter.to_query().count_query("packages").sql(),
            "SELECT COUNT(*) FROM packages WHERE 1=1 AND is_active = $1 AND package_name ILIKE $2"
        );
    }

    #[test]
    fn test_cascade_total() {
        let counts = CascadeCounts {
            test_mappings: 3,
            client_mappings: 2,
            lab_mappings: 1,
        };
        assert_eq!(counts.total(), 6);
    }
}
