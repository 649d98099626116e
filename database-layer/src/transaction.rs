// Transaction management
use crate::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, warn};

/// Begins, commits and rolls back transactions on the shared pool
#[derive(Debug, Clone)]
pub struct TransactionManager {
    pool: PgPool,
}

impl TransactionManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a new transaction
    pub async fn begin(&self) -> DatabaseResult<Transaction<'static, Postgres>> {
        debug!("Beginning transaction");

        self.pool
            .begin()
            .await
            .map_err(|e| DatabaseError::QueryFailed(format!("Failed to begin transaction: {}", e)))
    }

    /// Commit `tx`
    pub async fn commit(tx: Transaction<'static, Postgres>) -> DatabaseResult<()> {
        debug!("Committing transaction");

        tx.commit()
            .await
            .map_err(|e| DatabaseError::QueryFailed(format!("Failed to commit transaction: {}", e)))
    }

    /// Roll `tx` back, logging instead of failing when the rollback itself errors
    pub async fn rollback(tx: Transaction<'static, Postgres>) {
        debug!("Rolling back transaction");

        if let Err(e) = tx.rollback().await {
            warn!(error = %e, "Transaction rollback failed");
        }
    }
}
