//! Unit of work for lead writes.
//!
//! Every lead mutation and the history rows that describe it commit or roll
//! back together.

use crate::error::DatabaseError;
use crate::repositories::{LeadHistoryWriter, LeadWriter};
use crate::transaction::TransactionManager;
use futures::future::BoxFuture;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

/// An open transaction scoped to lead and history writers
pub struct LeadTransaction {
    tx: Transaction<'static, Postgres>,
}

impl LeadTransaction {
    pub fn leads(&mut self) -> LeadWriter<'_> {
        LeadWriter::new(&mut self.tx)
    }

    pub fn history(&mut self) -> LeadHistoryWriter<'_> {
        LeadHistoryWriter::new(&mut self.tx)
    }
}

#[derive(Debug, Clone)]
pub struct LeadUnitOfWork {
    transactions: TransactionManager,
}

impl LeadUnitOfWork {
    pub fn new(pool: PgPool) -> Self {
        Self {
            transactions: TransactionManager::new(pool),
        }
    }

    /// Run `work` inside one transaction.
    ///
    /// Commits when `work` returns `Ok`, rolls back on `Err`. The closure must
    /// own everything it captures.
    pub async fn within_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: for<'s> FnOnce(&'s mut LeadTransaction) -> BoxFuture<'s, Result<T, E>>,
        E: From<DatabaseError>,
    {
        let tx = self.transactions.begin().await.map_err(E::from)?;
        let mut scope = LeadTransaction { tx };

        match work(&mut scope).await {
            Ok(value) => {
                TransactionManager::commit(scope.tx).await.map_err(E::from)?;
                Ok(value)
            }
            Err(e) => {
                debug!("Lead unit of work failed; rolling back");
                TransactionManager::rollback(scope.tx).await;
                Err(e)
            }
        }
    }
}
