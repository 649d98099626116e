//! Lab directory.

use crate::error::{ApiError, ApiResult};
use database_layer::models::{Lab, LabUpdate, NewLab};
use database_layer::{LabListFilter, LabRepository, PgPool};
use tracing::info;

#[derive(Debug, Clone)]
pub struct LabService {
    labs: LabRepository,
}

impl LabService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            labs: LabRepository::new(pool),
        }
    }

    pub async fn list(&self, filter: &LabListFilter) -> ApiResult<(Vec<Lab>, i64)> {
        Ok(self.labs.list(filter).await?)
    }

    pub async fn get(&self, lab_id: i64) -> ApiResult<Lab> {
        self.labs
            .find_by_id(lab_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Lab not found"))
    }

    pub async fn get_by_contact_number(&self, contact_number: &str) -> ApiResult<Lab> {
        let contact_number = contact_number.trim();
        if contact_number.is_empty() {
            return Err(ApiError::bad_request("contactNumber is required"));
        }
        self.labs
            .find_by_contact_number(contact_number)
            .await?
            .ok_or_else(|| ApiError::not_found("Lab not found"))
    }

    pub async fn create(&self, lab: NewLab, created_by: i64) -> ApiResult<Lab> {
        if lab.lab_name.trim().is_empty() {
            return Err(ApiError::bad_request("LabName is required"));
        }
        let created = self.labs.create(&lab.lab_name, &lab.details, created_by).await?;
        info!(lab_id = created.lab_id, "Lab created");
        Ok(created)
    }

    pub async fn update(&self, lab_id: i64, update: LabUpdate, last_updated_by: i64) -> ApiResult<Lab> {
        let mut lab = self.get(lab_id).await?;
        update.apply_to(&mut lab);
        lab.last_updated_by = last_updated_by;

        self.labs
            .update(&lab)
            .await?
            .ok_or_else(|| ApiError::not_found("Lab not found"))
    }

    pub async fn delete(&self, lab_id: i64) -> ApiResult<()> {
        if !self.labs.exists(lab_id).await? {
            return Err(ApiError::not_found("Lab not found"));
        }
        self.labs.delete(lab_id).await?;
        info!(lab_id, "Lab deleted");
        Ok(())
    }
}
