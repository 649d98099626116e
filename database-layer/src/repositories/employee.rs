use crate::error::DatabaseResult;
use crate::models::{Employee, NewEmployee};
use sqlx::PgPool;

/// Repository for `employees`
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> DatabaseResult<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>("SELECT * FROM employees ORDER BY uid")
            .fetch_all(&self.pool)
            .await?;

        Ok(employees)
    }

    pub async fn find_by_id(&self, uid: i64) -> DatabaseResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE uid = $1")
            .bind(uid)
            .fetch_optional(&self.pool)
            .await?;

        Ok(employee)
    }

    pub async fn find_by_mobile_number(&self, number: &str) -> DatabaseResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees WHERE mobile_number = $1 ORDER BY uid LIMIT 1",
        )
        .bind(number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    pub async fn exists(&self, uid: i64) -> DatabaseResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM employees WHERE uid = $1)")
            .bind(uid)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    pub async fn create(&self, employee: &NewEmployee, created_by: i64) -> DatabaseResult<Employee> {
        let created = sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (
                full_name, address, city_id, state_id, pincode, mobile_number,
                company_email_id, designation, department,
                created_by, created_on, last_updated_by, last_updated_on
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW(), $10, NOW())
            RETURNING *
            "#,
        )
        .bind(&employee.full_name)
        .bind(&employee.address)
        .bind(employee.city_id)
        .bind(employee.state_id)
        .bind(&employee.pincode)
        .bind(&employee.mobile_number)
        .bind(&employee.company_email_id)
        .bind(&employee.designation)
        .bind(&employee.department)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn update(&self, employee: &Employee) -> DatabaseResult<Option<Employee>> {
        let updated = sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees SET
                full_name = $2, address = $3, city_id = $4, state_id = $5, pincode = $6,
                mobile_number = $7, company_email_id = $8, designation = $9, department = $10,
                last_updated_by = $11, last_updated_on = NOW()
            WHERE uid = $1
            RETURNING *
            "#,
        )
        .bind(employee.uid)
        .bind(&employee.full_name)
        .bind(&employee.address)
        .bind(employee.city_id)
        .bind(employee.state_id)
        .bind(&employee.pincode)
        .bind(&employee.mobile_number)
        .bind(&employee.company_email_id)
        .bind(&employee.designation)
        .bind(&employee.department)
        .bind(employee.last_updated_by)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn delete(&self, uid: i64) -> DatabaseResult<u64> {
        let result = sqlx::query("DELETE FROM employees WHERE uid = $1")
            .bind(uid)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
