use crate::error::DatabaseResult;
use crate::models::Login;
use sqlx::{PgExecutor, PgPool};

/// Repository for `logins`
#[derive(Debug, Clone)]
pub struct LoginRepository {
    pool: PgPool,
}

impl LoginRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user_id(&self, user_id: i64) -> DatabaseResult<Option<Login>> {
        let login = sqlx::query_as::<_, Login>("SELECT * FROM logins WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(login)
    }

    /// True when a row matches the id, stored ciphertext and type exactly
    pub async fn authenticate(
        &self,
        user_id: i64,
        encrypted_password: &str,
        user_type: &str,
    ) -> DatabaseResult<bool> {
        let matched: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM logins
                WHERE user_id = $1 AND pwd = $2 AND user_type = $3
            )
            "#,
        )
        .bind(user_id)
        .bind(encrypted_password)
        .bind(user_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(matched)
    }

    /// Replace the password only while the old ciphertext still matches
    pub async fn update_password_if_matches(
        &self,
        user_id: i64,
        old_encrypted: &str,
        new_encrypted: &str,
    ) -> DatabaseResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE logins SET pwd = $3, last_updated_on = NOW()
            WHERE user_id = $1 AND pwd = $2
            "#,
        )
        .bind(user_id)
        .bind(old_encrypted)
        .bind(new_encrypted)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

pub(crate) async fn set_password<'e, E>(
    executor: E,
    user_id: i64,
    encrypted_password: &str,
) -> DatabaseResult<u64>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("UPDATE logins SET pwd = $2, last_updated_on = NOW() WHERE user_id = $1")
        .bind(user_id)
        .bind(encrypted_password)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}
