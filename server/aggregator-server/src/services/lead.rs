//! Lead lifecycle.
//!
//! Every mutation runs through [`LeadUnitOfWork`] so the lead row and its
//! `lead_history` row commit together. `PatientID` is never taken from the
//! caller: it is derived from the patient name initials and contact number.

use crate::error::{ApiError, ApiResult};
use csv::{ReaderBuilder, StringRecord, Trim};
use database_layer::models::{Lead, LeadAction, LeadUpdate, LeadWithNames, NewLead};
use database_layer::{LeadListFilter, LeadRepository, LeadUnitOfWork, PgPool};
use std::str::FromStr;
use tracing::{debug, info};

/// Status given to every imported lead
pub const NEW_LEAD_STATUS: i16 = 1;

/// Uppercase initial of each whitespace-separated name token, then the raw
/// contact number: `"John Mary Doe"` + `"9876543210"` is `"JMD9876543210"`.
pub fn generate_patient_id(patient_name: &str, contact_number: &str) -> String {
    let mut id: String = patient_name
        .split_whitespace()
        .filter_map(|token| token.chars().next())
        .flat_map(char::to_uppercase)
        .collect();
    id.push_str(contact_number);
    id
}

/// CSV import failure with the number of rows committed before it
#[derive(Debug)]
pub struct CsvImportError {
    pub inserted: u64,
    pub source: ApiError,
}

impl CsvImportError {
    fn at(inserted: u64, source: ApiError) -> Self {
        Self { inserted, source }
    }
}

/// Column positions resolved from the header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CsvColumns {
    patient_name: usize,
    contact_number: usize,
    age: usize,
    gender: usize,
    emailid: usize,
    address: usize,
    city_id: usize,
    state_id: usize,
    pincode: usize,
}

impl CsvColumns {
    fn from_headers(headers: &StringRecord) -> ApiResult<Self> {
        let names: Vec<String> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_lowercase())
            .collect();

        let find = |column: &str| -> ApiResult<usize> {
            let wanted = column.to_lowercase();
            names
                .iter()
                .position(|name| *name == wanted)
                .ok_or_else(|| ApiError::bad_request(format!("Missing required column: {}", column)))
        };

        Ok(Self {
            patient_name: find("PatientName")?,
            contact_number: find("ContactNumber")?,
            age: find("Age")?,
            gender: find("Gender")?,
            emailid: find("Emailid")?,
            address: find("Address")?,
            city_id: find("CityID")?,
            state_id: find("StateID")?,
            pincode: find("Pincode")?,
        })
    }
}

/// Lead fields read from one CSV data row
#[derive(Debug, Clone, PartialEq, Eq)]
struct CsvLeadRow {
    patient_name: String,
    contact_number: String,
    age: i16,
    gender: String,
    emailid: String,
    address: String,
    city_id: i16,
    state_id: i16,
    pincode: String,
}

fn field(record: &StringRecord, index: usize) -> &str {
    record.get(index).map(str::trim).unwrap_or_default()
}

fn number<T: FromStr>(record: &StringRecord, index: usize, row: usize, column: &str) -> ApiResult<T> {
    field(record, index)
        .parse::<T>()
        .map_err(|_| ApiError::bad_request(format!("Row {}: {} must be a number", row, column)))
}

impl CsvLeadRow {
    /// `row` is the 1-based data row index used in error messages
    fn parse(columns: &CsvColumns, record: &StringRecord, row: usize) -> ApiResult<Self> {
        let patient_name = field(record, columns.patient_name);
        let contact_number = field(record, columns.contact_number);
        if patient_name.is_empty() || contact_number.is_empty() {
            return Err(ApiError::bad_request(format!(
                "Row {}: PatientName and ContactNumber are required",
                row
            )));
        }

        Ok(Self {
            patient_name: patient_name.to_string(),
            contact_number: contact_number.to_string(),
            age: number(record, columns.age, row, "Age")?,
            gender: field(record, columns.gender).to_string(),
            emailid: field(record, columns.emailid).to_string(),
            address: field(record, columns.address).to_string(),
            city_id: number(record, columns.city_id, row, "CityID")?,
            state_id: number(record, columns.state_id, row, "StateID")?,
            pincode: field(record, columns.pincode).to_string(),
        })
    }

    fn into_new_lead(self, client_id: i64, package_id: i32, created_by: i64) -> NewLead {
        NewLead {
            client_id,
            patient_id: generate_patient_id(&self.patient_name, &self.contact_number),
            patient_name: self.patient_name,
            age: self.age,
            gender: self.gender,
            package_id,
            contact_number: self.contact_number,
            emailid: self.emailid,
            address: self.address,
            city_id: self.city_id,
            state_id: self.state_id,
            pincode: self.pincode,
            lead_status_id: NEW_LEAD_STATUS,
            created_by,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LeadService {
    leads: LeadRepository,
    uow: LeadUnitOfWork,
}

impl LeadService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            leads: LeadRepository::new(pool.clone()),
            uow: LeadUnitOfWork::new(pool),
        }
    }

    pub async fn list(&self, filter: &LeadListFilter) -> ApiResult<(Vec<Lead>, i64)> {
        Ok(self.leads.list(filter).await?)
    }

    pub async fn get(&self, lead_id: i64) -> ApiResult<LeadWithNames> {
        self.leads
            .find_with_names(lead_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Lead not found"))
    }

    pub async fn create(&self, mut lead: NewLead, created_by: i64) -> ApiResult<Lead> {
        lead.patient_id = generate_patient_id(&lead.patient_name, &lead.contact_number);
        lead.created_by = created_by;

        let created = self
            .uow
            .within_transaction(move |tx| {
                Box::pin(async move {
                    let created = tx.leads().insert(&lead).await?;
                    tx.history()
                        .log_action(created.lead_id, LeadAction::Create, created_by)
                        .await?;
                    Ok::<_, ApiError>(created)
                })
            })
            .await?;

        info!(lead_id = created.lead_id, created_by, "Lead created");
        Ok(created)
    }

    pub async fn update(
        &self,
        lead_id: i64,
        update: LeadUpdate,
        last_updated_by: i64,
    ) -> ApiResult<Lead> {
        if update.is_empty() {
            return Err(ApiError::bad_request(
                "At least one field is required in the payload to update",
            ));
        }

        let mut lead = self
            .leads
            .find_by_id(lead_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Lead not found"))?;

        update.apply_to(&mut lead);
        if update.touches_patient_identity() {
            lead.patient_id = generate_patient_id(&lead.patient_name, &lead.contact_number);
        }
        lead.last_updated_by = last_updated_by;

        let updated = self
            .uow
            .within_transaction(move |tx| {
                Box::pin(async move {
                    let updated = tx
                        .leads()
                        .update(&lead)
                        .await?
                        .ok_or_else(|| ApiError::not_found("Lead not found"))?;
                    tx.history()
                        .log_action(updated.lead_id, LeadAction::Update, last_updated_by)
                        .await?;
                    Ok::<_, ApiError>(updated)
                })
            })
            .await?;

        info!(lead_id, last_updated_by, "Lead updated");
        Ok(updated)
    }

    pub async fn delete(&self, lead_id: i64, actor_id: i64) -> ApiResult<()> {
        if !self.leads.exists(lead_id).await? {
            return Err(ApiError::not_found("Lead not found"));
        }

        self.uow
            .within_transaction(move |tx| {
                Box::pin(async move {
                    tx.leads().delete(lead_id).await?;
                    tx.history()
                        .log_action(lead_id, LeadAction::Delete, actor_id)
                        .await?;
                    Ok::<_, ApiError>(())
                })
            })
            .await?;

        info!(lead_id, actor_id, "Lead deleted");
        Ok(())
    }

    /// Set one status on many leads; history is written for every requested id
    pub async fn bulk_update_status(
        &self,
        lead_ids: Vec<i64>,
        status_id: i16,
        last_updated_by: i64,
    ) -> ApiResult<u64> {
        if lead_ids.is_empty() {
            return Err(ApiError::bad_request("leadIds must contain at least one lead ID"));
        }

        let requested = lead_ids.len();
        let updated = self
            .uow
            .within_transaction(move |tx| {
                Box::pin(async move {
                    let updated = tx
                        .leads()
                        .update_status_for_ids(&lead_ids, status_id, last_updated_by)
                        .await?;
                    tx.history()
                        .bulk_log_actions(&lead_ids, LeadAction::StatusUpdate, last_updated_by)
                        .await?;
                    Ok::<_, ApiError>(updated)
                })
            })
            .await?;

        info!(requested, updated, status_id, "Lead statuses updated");
        Ok(updated)
    }

    /// Import leads from CSV text; each row commits on its own
    pub async fn import_csv(
        &self,
        content: &[u8],
        client_id: i64,
        package_id: i32,
        created_by: i64,
    ) -> Result<u64, CsvImportError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(content);

        let headers = reader
            .headers()
            .map_err(|e| CsvImportError::at(0, ApiError::bad_request(format!("Invalid CSV: {}", e))))?
            .clone();
        if headers.is_empty() || headers.iter().all(str::is_empty) {
            return Err(CsvImportError::at(0, ApiError::bad_request("CSV file is empty")));
        }
        let columns = CsvColumns::from_headers(&headers).map_err(|e| CsvImportError::at(0, e))?;

        let mut inserted = 0u64;
        for (index, record) in reader.records().enumerate() {
            let row = index + 1;
            let record = record.map_err(|e| {
                CsvImportError::at(
                    inserted,
                    ApiError::bad_request(format!("Row {}: invalid CSV record: {}", row, e)),
                )
            })?;
            if record.iter().all(str::is_empty) {
                continue;
            }

            let lead = CsvLeadRow::parse(&columns, &record, row)
                .map_err(|e| CsvImportError::at(inserted, e))?
                .into_new_lead(client_id, package_id, created_by);

            self.uow
                .within_transaction(move |tx| {
                    Box::pin(async move {
                        let created = tx.leads().insert(&lead).await?;
                        tx.history()
                            .log_action(created.lead_id, LeadAction::CsvImport, created_by)
                            .await?;
                        Ok::<_, ApiError>(created)
                    })
                })
                .await
                .map_err(|e| CsvImportError::at(inserted, e))?;

            inserted += 1;
            debug!(row, inserted, "CSV lead row imported");
        }

        info!(inserted, client_id, package_id, "CSV lead import finished");
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn reader(content: &str) -> csv::Reader<&[u8]> {
        ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::All)
            .from_reader(content.as_bytes())
    }

    #[test]
    fn test_patient_id_examples() {
        assert_eq!(generate_patient_id("John Mary Doe", "9876543210"), "JMD9876543210");
        assert_eq!(generate_patient_id("Asha K Rao", "9998887776"), "AKR9998887776");
        assert_eq!(generate_patient_id("  ravi   kumar ", "9000000001"), "RK9000000001");
        assert_eq!(generate_patient_id("", "9000000001"), "9000000001");
    }

    #[test]
    fn test_columns_case_insensitive() {
        let mut rdr = reader(
            "patientname,CONTACTNUMBER,age,gender,EmailId,address,cityid,stateid,PINCODE\n",
        );
        let columns = CsvColumns::from_headers(rdr.headers().unwrap()).unwrap();
        assert_eq!(columns.patient_name, 0);
        assert_eq!(columns.pincode, 8);
    }

    #[test]
    fn test_missing_column_named() {
        let mut rdr = reader("PatientName,ContactNumber,Age,Gender,Emailid,Address,CityID,Pincode\n");
        let err = CsvColumns::from_headers(rdr.headers().unwrap()).unwrap_err();
        assert_eq!(err.message(), "Missing required column: StateID");
    }

    #[test]
    fn test_row_parsing() {
        let mut rdr = reader(
            "PatientName,ContactNumber,Age,Gender,Emailid,Address,CityID,StateID,Pincode\n\
             Asha K Rao,9998887776,34,F,asha@example.com,12 MG Road,4,2,560001\n\
             ,9998887776,34,F,x@example.com,addr,4,2,560001\n\
             Ravi,9000000001,old,M,r@example.com,addr,4,2,560001\n",
        );
        let columns = CsvColumns::from_headers(rdr.headers().unwrap()).unwrap();
        let records: Vec<StringRecord> = rdr.records().map(Result::unwrap).collect();

        let first = CsvLeadRow::parse(&columns, &records[0], 1).unwrap();
        assert_eq!(first.age, 34);
        assert_eq!(first.city_id, 4);
        let lead = first.into_new_lead(10, 3, 77);
        assert_eq!(lead.patient_id, "AKR9998887776");
        assert_eq!(lead.lead_status_id, NEW_LEAD_STATUS);
        assert_eq!(lead.created_by, 77);

        let err = CsvLeadRow::parse(&columns, &records[1], 2).unwrap_err();
        assert_eq!(err.message(), "Row 2: PatientName and ContactNumber are required");

        let err = CsvLeadRow::parse(&columns, &records[2], 3).unwrap_err();
        assert_eq!(err.message(), "Row 3: Age must be a number");
    }

    #[test]
    fn test_columns_may_be_reordered() {
        let mut rdr = reader(
            "Pincode,StateID,CityID,Address,Emailid,Gender,Age,ContactNumber,PatientName,Notes\n\
             560001,2,4,addr,e@example.com,M,40,9876543210,John Doe,vip\n",
        );
        let columns = CsvColumns::from_headers(rdr.headers().unwrap()).unwrap();
        let record = rdr.records().next().unwrap().unwrap();
        let row = CsvLeadRow::parse(&columns, &record, 1).unwrap();
        assert_eq!(row.patient_name, "John Doe");
        assert_eq!(row.pincode, "560001");
    }

    proptest! {
        #[test]
        fn prop_patient_id_ends_with_contact(
            words in proptest::collection::vec("[a-z]{1,8}", 0..5),
            contact in "[0-9]{10}",
        ) {
            let name = words.join(" ");
            let id = generate_patient_id(&name, &contact);
            prop_assert!(id.ends_with(&contact));
            prop_assert_eq!(id.len(), words.len() + contact.len());
            let initials: String = words.iter().map(|w| w[..1].to_uppercase()).collect();
            prop_assert!(id.starts_with(&initials));
        }
    }
}
