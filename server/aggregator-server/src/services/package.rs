//! Packages, their test bundles and the client/lab price mappings.
//!
//! Two rules live here rather than in SQL: a package is identified by its set
//! of active tests (creating the same set twice returns the first package),
//! and a price mapping cannot be re-activated while its package is inactive.

use crate::error::{ApiError, ApiResult};
use database_layer::models::{
    NewPackage, Package, PackageClientMapping, PackageLabMapping, Test,
};
use database_layer::{
    CascadeCounts, ClientRepository, LabRepository, PackageClientMappingRepository,
    PackageLabMappingRepository, PackageListFilter, PackageRepository,
    PackageTestMappingRepository, PgPool, TestRepository,
};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use tracing::{info, warn};

/// Outcome code of an idempotent create: a new row was written
pub const RET_CREATED: i32 = 1;
/// Outcome code of an idempotent create: an equivalent row already existed
pub const RET_EXISTING: i32 = 2;

pub const MSG_PACKAGE_CREATED: &str = "Package created successfully";
pub const MSG_PACKAGE_EXISTS: &str = "Package already created with these tests";
pub const MSG_MAPPING_BLOCKED: &str = "Cannot activate mapping while the package is inactive";

/// Sorted, de-duplicated test ids
pub fn normalize_test_ids(test_ids: &[i32]) -> Vec<i32> {
    test_ids
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// First package whose active test set equals `wanted`; both sides sorted
pub fn find_matching_test_set(sets: &[(i32, Vec<i32>)], wanted: &[i32]) -> Option<i32> {
    sets.iter()
        .find(|(_, tests)| tests.as_slice() == wanted)
        .map(|(package_id, _)| *package_id)
}

/// Package returned from a create-with-tests call
#[derive(Debug, Clone, Serialize)]
pub struct PackageWithTestIds {
    #[serde(flatten)]
    pub package: Package,
    #[serde(rename = "TestCount")]
    pub test_count: usize,
    #[serde(rename = "TestIDs")]
    pub test_ids: Vec<i32>,
}

#[derive(Debug, Clone)]
pub struct CreateWithTestsOutcome {
    pub ret_val: i32,
    pub message: &'static str,
    pub package: PackageWithTestIds,
}

impl CreateWithTestsOutcome {
    pub fn is_existing(&self) -> bool {
        self.ret_val == RET_EXISTING
    }
}

/// Test summary embedded in the with-details listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestDetail {
    #[serde(rename = "TestID")]
    pub test_id: i32,
    #[serde(rename = "TestName")]
    pub test_name: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "IsActive")]
    pub is_active: bool,
}

impl From<&Test> for TestDetail {
    fn from(test: &Test) -> Self {
        Self {
            test_id: test.test_id,
            test_name: test.test_name.clone(),
            category: test.category.clone(),
            is_active: test.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PackageWithTests {
    #[serde(flatten)]
    pub package: Package,
    #[serde(rename = "TestIDs")]
    pub test_ids: Vec<i32>,
    #[serde(rename = "Tests")]
    pub tests: Vec<TestDetail>,
}

#[derive(Debug, Clone)]
pub struct StatusCascadeOutcome {
    pub package: Package,
    pub counts: CascadeCounts,
}

impl StatusCascadeOutcome {
    pub fn message(&self) -> String {
        format!(
            "Package status updated successfully. {} test mapping(s), {} client mapping(s), \
             {} lab mapping(s) also updated. Total: {} mapping(s).",
            self.counts.test_mappings,
            self.counts.client_mappings,
            self.counts.lab_mappings,
            self.counts.total()
        )
    }
}

/// Result of a mapping create or status change
#[derive(Debug, Clone)]
pub struct MappingOutcome<M> {
    pub ret_val: i32,
    pub message: String,
    pub mapping: M,
}

impl<M> MappingOutcome<M> {
    pub fn is_created(&self) -> bool {
        self.ret_val == RET_CREATED
    }
}

#[derive(Debug, Clone)]
pub struct PackageService {
    packages: PackageRepository,
    tests: TestRepository,
    test_mappings: PackageTestMappingRepository,
    client_mappings: PackageClientMappingRepository,
    lab_mappings: PackageLabMappingRepository,
    clients: ClientRepository,
    labs: LabRepository,
}

impl PackageService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            packages: PackageRepository::new(pool.clone()),
            tests: TestRepository::new(pool.clone()),
            test_mappings: PackageTestMappingRepository::new(pool.clone()),
            client_mappings: PackageClientMappingRepository::new(pool.clone()),
            lab_mappings: PackageLabMappingRepository::new(pool.clone()),
            clients: ClientRepository::new(pool.clone()),
            labs: LabRepository::new(pool),
        }
    }

    pub async fn list(&self, filter: &PackageListFilter) -> ApiResult<(Vec<Package>, i64)> {
        Ok(self.packages.list(filter).await?)
    }

    pub async fn get(&self, package_id: i32) -> ApiResult<Package> {
        self.packages
            .find_by_id(package_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Package not found"))
    }

    pub async fn create(&self, package: NewPackage) -> ApiResult<Package> {
        let created = self.packages.create(&package).await?;
        info!(package_id = created.package_id, "Package created");
        Ok(created)
    }

    /// Delete the package and its mappings
    pub async fn delete(&self, package_id: i32) -> ApiResult<()> {
        if !self.packages.delete(package_id).await? {
            return Err(ApiError::not_found("Package not found"));
        }
        info!(package_id, "Package deleted");
        Ok(())
    }

    pub async fn create_with_tests(
        &self,
        package: NewPackage,
        test_ids: &[i32],
    ) -> ApiResult<CreateWithTestsOutcome> {
        if test_ids.is_empty() {
            return Err(ApiError::bad_request("testIds must contain at least one test ID"));
        }

        let wanted = normalize_test_ids(test_ids);
        let existing = self.tests.existing_ids(&wanted).await?;
        if let Some(missing) = wanted.iter().find(|id| !existing.contains(id)) {
            return Err(ApiError::not_found(format!("Test not found: {}", missing)));
        }

        let sets = self.test_mappings.active_test_sets().await?;
        if let Some(package_id) = find_matching_test_set(&sets, &wanted) {
            let package = self.get(package_id).await?;
            info!(package_id, "Package with identical test set already exists");
            return Ok(CreateWithTestsOutcome {
                ret_val: RET_EXISTING,
                message: MSG_PACKAGE_EXISTS,
                package: PackageWithTestIds {
                    package,
                    test_count: wanted.len(),
                    test_ids: wanted,
                },
            });
        }

        let created = self.packages.create_with_tests(&package, &wanted).await?;
        info!(
            package_id = created.package_id,
            tests = wanted.len(),
            "Package created with tests"
        );

        Ok(CreateWithTestsOutcome {
            ret_val: RET_CREATED,
            message: MSG_PACKAGE_CREATED,
            package: PackageWithTestIds {
                package: created,
                test_count: wanted.len(),
                test_ids: wanted,
            },
        })
    }

    /// Cascade `is_active` to the package and all of its mappings
    pub async fn update_status(
        &self,
        package_id: i32,
        is_active: bool,
        last_updated_by: i64,
    ) -> ApiResult<StatusCascadeOutcome> {
        let (package, counts) = self
            .packages
            .update_status_cascade(package_id, is_active, last_updated_by)
            .await?
            .ok_or_else(|| ApiError::not_found("Package not found"))?;

        info!(
            package_id,
            is_active,
            total = counts.total(),
            "Package status cascaded"
        );
        Ok(StatusCascadeOutcome { package, counts })
    }

    /// Packages with their mapped tests, joined in memory
    pub async fn list_with_test_details(&self) -> ApiResult<Vec<PackageWithTests>> {
        let packages = self.packages.find_all().await?;
        let mappings = self.test_mappings.find_all().await?;
        let tests: HashMap<i32, Test> = self
            .tests
            .find_all()
            .await?
            .into_iter()
            .map(|test| (test.test_id, test))
            .collect();

        let mut by_package: HashMap<i32, BTreeSet<i32>> = HashMap::new();
        for mapping in &mappings {
            by_package
                .entry(mapping.package_id)
                .or_default()
                .insert(mapping.test_id);
        }

        Ok(packages
            .into_iter()
            .map(|package| {
                let test_ids: Vec<i32> = by_package
                    .remove(&package.package_id)
                    .map(|ids| ids.into_iter().collect())
                    .unwrap_or_default();
                let tests = test_ids
                    .iter()
                    .filter_map(|id| tests.get(id))
                    .map(TestDetail::from)
                    .collect();
                PackageWithTests {
                    package,
                    test_ids,
                    tests,
                }
            })
            .collect())
    }

    pub async fn list_client_mappings(&self) -> ApiResult<Vec<PackageClientMapping>> {
        Ok(self.client_mappings.find_all().await?)
    }

    pub async fn list_lab_mappings(&self) -> ApiResult<Vec<PackageLabMapping>> {
        Ok(self.lab_mappings.find_all().await?)
    }

    pub async fn create_client_mapping(
        &self,
        package_id: i32,
        client_id: i64,
        price: f64,
        created_by: i64,
    ) -> ApiResult<MappingOutcome<PackageClientMapping>> {
        self.get(package_id).await?;
        if !self.clients.exists(client_id).await? {
            return Err(ApiError::not_found("Client not found"));
        }

        if let Some(existing) = self.client_mappings.find_active_pair(package_id, client_id).await? {
            return Ok(MappingOutcome {
                ret_val: RET_EXISTING,
                message: "Package-Client mapping already exists".to_string(),
                mapping: existing,
            });
        }

        let mapping = self
            .client_mappings
            .create(package_id, client_id, price, created_by)
            .await?;
        info!(
            package_client_id = mapping.package_client_id,
            package_id,
            client_id,
            "Package-Client mapping created"
        );

        Ok(MappingOutcome {
            ret_val: RET_CREATED,
            message: "Package-Client mapping created successfully".to_string(),
            mapping,
        })
    }

    pub async fn create_lab_mapping(
        &self,
        package_id: i32,
        lab_id: i64,
        price: f64,
        created_by: i64,
    ) -> ApiResult<MappingOutcome<PackageLabMapping>> {
        self.get(package_id).await?;
        if !self.labs.exists(lab_id).await? {
            return Err(ApiError::not_found("Lab not found"));
        }

        if let Some(existing) = self.lab_mappings.find_active_pair(package_id, lab_id).await? {
            return Ok(MappingOutcome {
                ret_val: RET_EXISTING,
                message: "Package-Lab mapping already exists".to_string(),
                mapping: existing,
            });
        }

        let mapping = self
            .lab_mappings
            .create(package_id, lab_id, price, created_by)
            .await?;
        info!(
            package_lab_id = mapping.package_lab_id,
            package_id,
            lab_id,
            "Package-Lab mapping created"
        );

        Ok(MappingOutcome {
            ret_val: RET_CREATED,
            message: "Package-Lab mapping created successfully".to_string(),
            mapping,
        })
    }

    /// True when activation must be refused because the package is inactive
    async fn activation_blocked(&self, package_id: i32, is_active: bool) -> ApiResult<bool> {
        if !is_active {
            return Ok(false);
        }
        let package = self.packages.find_by_id(package_id).await?;
        Ok(!package.map(|p| p.is_active).unwrap_or(false))
    }

    pub async fn update_client_mapping_status(
        &self,
        id: i32,
        is_active: bool,
        last_updated_by: i64,
    ) -> ApiResult<MappingOutcome<PackageClientMapping>> {
        let mapping = self
            .client_mappings
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Package-Client mapping not found"))?;

        if self.activation_blocked(mapping.package_id, is_active).await? {
            warn!(package_client_id = id, package_id = mapping.package_id, "Mapping activation blocked");
            return Ok(MappingOutcome {
                ret_val: RET_EXISTING,
                message: MSG_MAPPING_BLOCKED.to_string(),
                mapping,
            });
        }

        let mapping = self
            .client_mappings
            .update_status(id, is_active, last_updated_by)
            .await?
            .ok_or_else(|| ApiError::not_found("Package-Client mapping not found"))?;

        Ok(MappingOutcome {
            ret_val: RET_CREATED,
            message: "Package-Client mapping status updated successfully".to_string(),
            mapping,
        })
    }

    pub async fn update_lab_mapping_status(
        &self,
        id: i32,
        is_active: bool,
        last_updated_by: i64,
    ) -> ApiResult<MappingOutcome<PackageLabMapping>> {
        let mapping = self
            .lab_mappings
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Package-Lab mapping not found"))?;

        if self.activation_blocked(mapping.package_id, is_active).await? {
            warn!(package_lab_id = id, package_id = mapping.package_id, "Mapping activation blocked");
            return Ok(MappingOutcome {
                ret_val: RET_EXISTING,
                message: MSG_MAPPING_BLOCKED.to_string(),
                mapping,
            });
        }

        let mapping = self
            .lab_mappings
            .update_status(id, is_active, last_updated_by)
            .await?
            .ok_or_else(|| ApiError::not_found("Package-Lab mapping not found"))?;

        Ok(MappingOutcome {
            ret_val: RET_CREATED,
            message: "Package-Lab mapping status updated successfully".to_string(),
            mapping,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_test_ids() {
        assert_eq!(normalize_test_ids(&[7, 5, 7, 1]), vec![1, 5, 7]);
        assert!(normalize_test_ids(&[]).is_empty());
    }

    #[test]
    fn test_first_matching_package_wins() {
        let sets = vec![(3, vec![1, 2]), (4, vec![5, 7]), (9, vec![5, 7])];
        assert_eq!(find_matching_test_set(&sets, &[5, 7]), Some(4));
        assert_eq!(find_matching_test_set(&sets, &[5]), None);
        assert_eq!(find_matching_test_set(&sets, &[1, 2, 5]), None);
    }

    #[test]
    fn test_cascade_message() {
        let now = Utc::now();
        let outcome = StatusCascadeOutcome {
            package: Package {
                package_id: 1,
                package_name: "Basic".to_string(),
                description: String::new(),
                is_active: false,
                created_by: 1,
                created_on: now,
                last_updated_by: 1,
                last_updated_on: now,
            },
            counts: CascadeCounts {
                test_mappings: 3,
                client_mappings: 2,
                lab_mappings: 1,
            },
        };
        assert_eq!(
            outcome.message(),
            "Package status updated successfully. 3 test mapping(s), 2 client mapping(s), \
             1 lab mapping(s) also updated. Total: 6 mapping(s)."
        );
    }

    #[test]
    fn test_with_test_ids_serialization() {
        let now = Utc::now();
        let value = serde_json::to_value(PackageWithTestIds {
            package: Package {
                package_id: 11,
                package_name: "Lipid".to_string(),
                description: "Lipid profile".to_string(),
                is_active: true,
                created_by: 1,
                created_on: now,
                last_updated_by: 1,
                last_updated_on: now,
            },
            test_count: 2,
            test_ids: vec![5, 7],
        })
        .unwrap();
        assert_eq!(value["PackageID"], 11);
        assert_eq!(value["TestCount"], 2);
        assert_eq!(value["TestIDs"], serde_json::json!([5, 7]));
    }

    proptest! {
        #[test]
        fn prop_test_set_match_ignores_order_and_duplicates(
            ids in proptest::collection::vec(1i32..50, 1..10),
            seed in any::<u64>(),
        ) {
            let stored = normalize_test_ids(&ids);
            let sets = vec![(42, stored.clone())];

            let mut shuffled = ids.clone();
            let len = shuffled.len();
            shuffled.rotate_left((seed as usize) % len);
            shuffled.extend(ids.iter().take(2));

            let wanted = normalize_test_ids(&shuffled);
            prop_assert_eq!(find_matching_test_set(&sets, &wanted), Some(42));
        }
    }
}
