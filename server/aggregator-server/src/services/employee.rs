//! Employee directory.

use crate::error::{ApiError, ApiResult};
use database_layer::models::{Employee, EmployeeUpdate, NewEmployee};
use database_layer::{EmployeeRepository, PgPool};
use tracing::info;

#[derive(Debug, Clone)]
pub struct EmployeeService {
    employees: EmployeeRepository,
}

impl EmployeeService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            employees: EmployeeRepository::new(pool),
        }
    }

    pub async fn list(&self) -> ApiResult<Vec<Employee>> {
        Ok(self.employees.find_all().await?)
    }

    pub async fn get(&self, uid: i64) -> ApiResult<Employee> {
        self.employees
            .find_by_id(uid)
            .await?
            .ok_or_else(|| ApiError::not_found("Employee not found"))
    }

    pub async fn search_by_mobile_number(&self, mobile_number: &str) -> ApiResult<Employee> {
        let mobile_number = mobile_number.trim();
        if mobile_number.is_empty() {
            return Err(ApiError::bad_request("contactNumber is required"));
        }
        self.employees
            .find_by_mobile_number(mobile_number)
            .await?
            .ok_or_else(|| ApiError::not_found("Employee not found"))
    }

    pub async fn create(&self, employee: NewEmployee, created_by: i64) -> ApiResult<Employee> {
        let created = self.employees.create(&employee, created_by).await?;
        info!(uid = created.uid, "Employee created");
        Ok(created)
    }

    pub async fn update(&self, uid: i64, update: EmployeeUpdate, last_updated_by: i64) -> ApiResult<Employee> {
        let mut employee = self.get(uid).await?;
        update.apply_to(&mut employee);
        employee.last_updated_by = last_updated_by;

        self.employees
            .update(&employee)
            .await?
            .ok_or_else(|| ApiError::not_found("Employee not found"))
    }

    pub async fn delete(&self, uid: i64) -> ApiResult<()> {
        if !self.employees.exists(uid).await? {
            return Err(ApiError::not_found("Employee not found"));
        }
        self.employees.delete(uid).await?;
        info!(uid, "Employee deleted");
        Ok(())
    }
}
