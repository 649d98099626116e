use crate::error::DatabaseResult;
use crate::models::{LeadAction, LeadHistory};
use sqlx::{PgConnection, PgPool};

/// Read side of `lead_history`
#[derive(Debug, Clone)]
pub struct LeadHistoryRepository {
    pool: PgPool,
}

impl LeadHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Newest first
    pub async fn find_by_lead_id(&self, lead_id: i64) -> DatabaseResult<Vec<LeadHistory>> {
        let rows = sqlx::query_as::<_, LeadHistory>(
            "SELECT * FROM lead_history WHERE lead_id = $1 ORDER BY created_on DESC, uid DESC",
        )
        .bind(lead_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

/// History writes bound to an open transaction
pub struct LeadHistoryWriter<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> LeadHistoryWriter<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn log_action(
        &mut self,
        lead_id: i64,
        action: LeadAction,
        created_by: i64,
    ) -> DatabaseResult<LeadHistory> {
        let row = sqlx::query_as::<_, LeadHistory>(
            r#"
            INSERT INTO lead_history (lead_id, action, created_by, created_on)
            VALUES ($1, $2, $3, NOW())
            RETURNING *
            "#,
        )
        .bind(lead_id)
        .bind(action.as_str())
        .bind(created_by)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(row)
    }

    /// One row per id, in a single statement
    pub async fn bulk_log_actions(
        &mut self,
        lead_ids: &[i64],
        action: LeadAction,
        created_by: i64,
    ) -> DatabaseResult<u64> {
        if lead_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO lead_history (lead_id, action, created_by, created_on)
            SELECT id, $2, $3, NOW() FROM UNNEST($1::BIGINT[]) AS t(id)
            "#,
        )
        .bind(lead_ids)
        .bind(action.as_str())
        .bind(created_by)
        .execute(&mut *self.conn)
        .await?;

        Ok(result.rows_affected())
    }
}
