//! Runs against a live MySQL when `TEST_DATABASE_URL` is set; skipped otherwise.

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use presensi::db::{ensure_schema, init_db};
use presensi::model::attendance::{AttendanceStatus, Mark};
use presensi::model::employee::Employee;
use presensi::store::{AttendanceStore, CredentialStore, MySqlStore, StoreError};

async fn store() -> Option<MySqlStore> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = init_db(&url).await.unwrap();
    ensure_schema(&pool).await.unwrap();
    Some(MySqlStore::new(pool))
}

/// Fresh key per run so repeated runs do not collide.
fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().to_simple())
}

fn mark(employee_id: &str, hour: u32, location: &str) -> Mark {
    Mark {
        employee_id: employee_id.to_string(),
        date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
        location: location.to_string(),
    }
}

#[actix_web::test]
async fn test_entry_upsert_and_exit() {
    let Some(store) = store().await else {
        return;
    };
    let id = unique("E");
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    assert!(!store.update_exit(&mark(&id, 17, "Office")).await.unwrap());
    assert!(store.find_record(&id, date).await.unwrap().is_none());

    store.upsert_entry(&mark(&id, 8, "Office")).await.unwrap();
    // same state written twice still reports the row as found
    assert!(store.update_exit(&mark(&id, 17, "Office")).await.unwrap());
    assert!(store.update_exit(&mark(&id, 17, "Office")).await.unwrap());
    store.upsert_entry(&mark(&id, 9, "Home")).await.unwrap();

    let record = store.find_record(&id, date).await.unwrap().unwrap();
    assert_eq!(record.entry_time, NaiveTime::from_hms_opt(9, 0, 0));
    assert_eq!(record.entry_location.as_deref(), Some("Home"));
    assert_eq!(record.exit_time, NaiveTime::from_hms_opt(17, 0, 0));
    assert_eq!(record.status, AttendanceStatus::Present);
}

#[actix_web::test]
async fn test_usernames_are_unique_and_case_sensitive() {
    let Some(store) = store().await else {
        return;
    };
    let username = unique("user");
    let employee = |employee_id: String, username: String| Employee {
        employee_id,
        full_name: "Test".to_string(),
        department: "QA".to_string(),
        username,
        password_hash: "hash".to_string(),
        photo_reference: None,
    };

    store
        .insert_employee(&employee(unique("E"), username.clone()))
        .await
        .unwrap();
    assert_eq!(
        store
            .insert_employee(&employee(unique("E"), username.clone()))
            .await,
        Err(StoreError::Duplicate)
    );

    let upper = username.to_uppercase();
    store
        .insert_employee(&employee(unique("E"), upper.clone()))
        .await
        .unwrap();
    let found = store.find_by_username(&upper).await.unwrap().unwrap();
    assert_eq!(found.username, upper);

    assert!(store.set_photo(&username, "abc.png").await.unwrap());
    let found = store.find_by_username(&username).await.unwrap().unwrap();
    assert_eq!(found.photo_reference.as_deref(), Some("abc.png"));
}
