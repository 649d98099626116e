// Integration tests against a live Postgres; run with
// DATABASE_URL=postgres://... cargo test -p database-layer -- --ignored
use database_layer::models::{LeadAction, NewLead, NewPackage};
use database_layer::{
    DatabaseConfig, DatabaseError, DatabasePool, LeadHistoryRepository, LeadRepository,
    LeadUnitOfWork, PackageRepository,
};

async fn setup() -> DatabasePool {
    let config = DatabaseConfig {
        url: std::env::var("DATABASE_URL").ok(),
        ..DatabaseConfig::default()
    };
    let db = DatabasePool::connect(&config).await.unwrap();
    db.migrate().await.unwrap();
    db
}

fn new_lead(name: &str) -> NewLead {
    NewLead {
        client_id: 1,
        patient_id: "PT-TEST".to_string(),
        patient_name: name.to_string(),
        age: 30,
        gender: "F".to_string(),
        package_id: 1,
        contact_number: "9876543210".to_string(),
        emailid: "patient@example.com".to_string(),
        address: "1 Test Street".to_string(),
        city_id: 1,
        state_id: 1,
        pincode: "560001".to_string(),
        lead_status_id: 1,
        created_by: 42,
    }
}

#[tokio::test]
#[ignore]
async fn test_create_writes_lead_and_history_together() {
    let db = setup().await;
    let uow = LeadUnitOfWork::new(db.pool().clone());
    let lead = new_lead("Committed Patient");

    let created = uow
        .within_transaction(move |tx| {
            Box::pin(async move {
                let created = tx.leads().insert(&lead).await?;
                tx.history()
                    .log_action(created.lead_id, LeadAction::Create, 42)
                    .await?;
                Ok::<_, DatabaseError>(created)
            })
        })
        .await
        .unwrap();

    assert_eq!(created.created_by, 42);
    assert_eq!(created.last_updated_by, 42);

    let history = LeadHistoryRepository::new(db.pool().clone())
        .find_by_lead_id(created.lead_id)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action, "CREATE");
}

#[tokio::test]
#[ignore]
async fn test_failed_work_rolls_back_lead_insert() {
    let db = setup().await;
    let uow = LeadUnitOfWork::new(db.pool().clone());
    let lead = new_lead("Rolled Back Patient");

    let result: Result<i64, DatabaseError> = uow
        .within_transaction(move |tx| {
            Box::pin(async move {
                let created = tx.leads().insert(&lead).await?;
                let _ = created;
                Err(DatabaseError::QueryFailed("history write failed".to_string()))
            })
        })
        .await;
    assert!(result.is_err());

    let leads = LeadRepository::new(db.pool().clone());
    let (page, _) = leads
        .list(&database_layer::LeadListFilter::default())
        .await
        .unwrap();
    assert!(page.iter().all(|l| l.patient_name != "Rolled Back Patient"));
}

#[tokio::test]
#[ignore]
async fn test_bulk_status_logs_one_row_per_id() {
    let db = setup().await;
    let uow = LeadUnitOfWork::new(db.pool().clone());
    let first = new_lead("Bulk One");
    let second = new_lead("Bulk Two");

    let ids = uow
        .within_transaction(move |tx| {
            Box::pin(async move {
                let a = tx.leads().insert(&first).await?;
                let b = tx.leads().insert(&second).await?;
                Ok::<_, DatabaseError>(vec![a.lead_id, b.lead_id])
            })
        })
        .await
        .unwrap();

    let requested = ids.clone();
    let (updated, logged) = uow
        .within_transaction(move |tx| {
            Box::pin(async move {
                let updated = tx.leads().update_status_for_ids(&requested, 3, 7).await?;
                let logged = tx
                    .history()
                    .bulk_log_actions(&requested, LeadAction::StatusUpdate, 7)
                    .await?;
                Ok::<_, DatabaseError>((updated, logged))
            })
        })
        .await
        .unwrap();

    assert_eq!(updated, 2);
    assert_eq!(logged, 2);

    let leads = LeadRepository::new(db.pool().clone());
    for id in ids {
        let lead = leads.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(lead.lead_status_id, 3);
        assert_eq!(lead.last_updated_by, 7);
    }
}

#[tokio::test]
#[ignore]
async fn test_package_status_cascade_and_delete() {
    let db = setup().await;
    let packages = PackageRepository::new(db.pool().clone());

    let package = packages
        .create(&NewPackage {
            package_name: "Cascade Package".to_string(),
            description: "integration".to_string(),
            is_active: true,
            created_by: 1,
        })
        .await
        .unwrap();

    let (updated, counts) = packages
        .update_status_cascade(package.package_id, false, 9)
        .await
        .unwrap()
        .unwrap();
    assert!(!updated.is_active);
    assert_eq!(counts.total(), 0);

    assert!(packages
        .update_status_cascade(i32::MAX, false, 9)
        .await
        .unwrap()
        .is_none());

    assert!(packages.delete(package.package_id).await.unwrap());
    assert!(packages.find_by_id(package.package_id).await.unwrap().is_none());
}
