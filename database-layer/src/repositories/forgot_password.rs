use super::login::set_password;
use crate::error::DatabaseResult;
use crate::models::ForgotPassword;
use crate::transaction::TransactionManager;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Repository for `forgot_passwords`
#[derive(Debug, Clone)]
pub struct ForgotPasswordRepository {
    pool: PgPool,
    transactions: TransactionManager,
}

impl ForgotPasswordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            transactions: TransactionManager::new(pool.clone()),
            pool,
        }
    }

    pub async fn create(
        &self,
        user_id: i64,
        user_type: &str,
        key: &str,
        created_on: DateTime<Utc>,
        expiry: DateTime<Utc>,
    ) -> DatabaseResult<ForgotPassword> {
        let record = sqlx::query_as::<_, ForgotPassword>(
            r#"
            INSERT INTO forgot_passwords
                (user_id, user_type, forget_password_key, created_on, expiry_timestamp, is_password_changed)
            VALUES ($1, $2, $3, $4, $5, FALSE)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(user_type)
        .bind(key)
        .bind(created_on)
        .bind(expiry)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Newest unconsumed key that is still valid at `now`
    pub async fn find_latest_valid(
        &self,
        user_id: i64,
        user_type: &str,
        now: DateTime<Utc>,
    ) -> DatabaseResult<Option<ForgotPassword>> {
        let record = sqlx::query_as::<_, ForgotPassword>(
            r#"
            SELECT * FROM forgot_passwords
            WHERE user_id = $1 AND user_type = $2
              AND expiry_timestamp > $3 AND is_password_changed = FALSE
            ORDER BY created_on DESC, uid DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(user_type)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// The record holding exactly `key`, if it is still valid at `now`
    pub async fn find_valid_by_key(
        &self,
        key: &str,
        user_id: i64,
        user_type: &str,
        now: DateTime<Utc>,
    ) -> DatabaseResult<Option<ForgotPassword>> {
        let record = sqlx::query_as::<_, ForgotPassword>(
            r#"
            SELECT * FROM forgot_passwords
            WHERE forget_password_key = $1 AND user_id = $2 AND user_type = $3
              AND expiry_timestamp > $4 AND is_password_changed = FALSE
            LIMIT 1
            "#,
        )
        .bind(key)
        .bind(user_id)
        .bind(user_type)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Overwrite the login password and consume the key atomically.
    ///
    /// Returns false when the key was consumed concurrently; nothing is written then.
    pub async fn consume_and_set_password(
        &self,
        record_uid: i64,
        user_id: i64,
        encrypted_password: &str,
    ) -> DatabaseResult<bool> {
        let mut tx = self.transactions.begin().await?;

        let consumed = sqlx::query(
            r#"
            UPDATE forgot_passwords
            SET is_password_changed = TRUE, is_password_updated_on = NOW()
            WHERE uid = $1 AND is_password_changed = FALSE
            "#,
        )
        .bind(record_uid)
        .execute(&mut *tx)
        .await;

        let consumed = match consumed {
            Ok(result) => result.rows_affected() > 0,
            Err(e) => {
                TransactionManager::rollback(tx).await;
                return Err(e.into());
            }
        };

        if !consumed {
            TransactionManager::rollback(tx).await;
            return Ok(false);
        }

        if let Err(e) = set_password(&mut *tx, user_id, encrypted_password).await {
            TransactionManager::rollback(tx).await;
            return Err(e);
        }

        TransactionManager::commit(tx).await?;
        Ok(true)
    }
}
