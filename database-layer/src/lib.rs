//! Postgres persistence for the diagnostic aggregator.
//!
//! Provides the connection pool, typed row models, list-query building with
//! pagination, one repository per table family and the lead unit of work that
//! keeps lead writes and their history rows in a single transaction.
//!
//! ```rust,no_run
//! use database_layer::{DatabaseConfig, DatabasePool, LeadRepository};
//!
//! # async fn run() -> database_layer::DatabaseResult<()> {
//! let db = DatabasePool::connect(&DatabaseConfig::default()).await?;
//! let leads = LeadRepository::new(db.pool().clone());
//! let lead = leads.find_by_id(1).await?;
//! # let _ = lead;
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod error;
pub mod lead_uow;
pub mod models;
pub mod query;
pub mod repositories;
pub mod transaction;

pub use connection::{DatabaseConfig, DatabasePool};
pub use error::{DatabaseError, DatabaseResult};
pub use lead_uow::{LeadTransaction, LeadUnitOfWork};
pub use query::{FilterValue, ListParams, ListQuery, SortOrder, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use repositories::*;
pub use transaction::TransactionManager;

pub use sqlx::PgPool;
