use crate::error::DatabaseResult;
use crate::models::Test;
use sqlx::PgPool;

/// Repository for the `tests` catalogue
#[derive(Debug, Clone)]
pub struct TestRepository {
    pool: PgPool,
}

impl TestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> DatabaseResult<Vec<Test>> {
        let tests = sqlx::query_as::<_, Test>("SELECT * FROM tests ORDER BY test_id")
            .fetch_all(&self.pool)
            .await?;

        Ok(tests)
    }

    pub async fn find_active(&self) -> DatabaseResult<Vec<Test>> {
        let tests =
            sqlx::query_as::<_, Test>("SELECT * FROM tests WHERE is_active = TRUE ORDER BY test_id")
                .fetch_all(&self.pool)
                .await?;

        Ok(tests)
    }

    pub async fn find_by_id(&self, test_id: i32) -> DatabaseResult<Option<Test>> {
        let test = sqlx::query_as::<_, Test>("SELECT * FROM tests WHERE test_id = $1")
            .bind(test_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(test)
    }

    /// Which of `test_ids` exist
    pub async fn existing_ids(&self, test_ids: &[i32]) -> DatabaseResult<Vec<i32>> {
        let ids: Vec<i32> =
            sqlx::query_scalar("SELECT test_id FROM tests WHERE test_id = ANY($1) ORDER BY test_id")
                .bind(test_ids)
                .fetch_all(&self.pool)
                .await?;

        Ok(ids)
    }
}
