//! In-process backend. Usernames and employee ids are unique and compared
//! exactly, matching the binary collation of the MySQL key columns.

use std::{
    collections::HashMap,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{AttendanceStore, CredentialStore, StoreError, StoreResult};
use crate::model::{
    attendance::{AttendanceRecord, AttendanceStatus, Mark},
    employee::Employee,
};

#[derive(Default)]
pub struct MemoryStore {
    /// keyed by employee id
    employees: RwLock<HashMap<String, Employee>>,
    attendance: RwLock<HashMap<(String, NaiveDate), AttendanceRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attendance rows, across all employees and days.
    pub fn attendance_len(&self) -> StoreResult<usize> {
        Ok(read(&self.attendance)?.len())
    }
}

fn read<T>(lock: &RwLock<T>) -> StoreResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| StoreError::Backend("memory store poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> StoreResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| StoreError::Backend("memory store poisoned".to_string()))
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn insert_employee(&self, employee: &Employee) -> StoreResult<()> {
        let mut employees = write(&self.employees)?;

        let taken = employees.contains_key(&employee.employee_id)
            || employees.values().any(|e| e.username == employee.username);
        if taken {
            return Err(StoreError::Duplicate);
        }

        employees.insert(employee.employee_id.clone(), employee.clone());
        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Employee>> {
        Ok(read(&self.employees)?
            .values()
            .find(|e| e.username == username)
            .cloned())
    }

    async fn set_photo(&self, username: &str, photo_reference: &str) -> StoreResult<bool> {
        let mut employees = write(&self.employees)?;

        match employees.values_mut().find(|e| e.username == username) {
            Some(employee) => {
                employee.photo_reference = Some(photo_reference.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn upsert_entry(&self, mark: &Mark) -> StoreResult<()> {
        let mut attendance = write(&self.attendance)?;

        let record = attendance
            .entry((mark.employee_id.clone(), mark.date))
            .or_insert_with(|| AttendanceRecord {
                employee_id: mark.employee_id.clone(),
                date: mark.date,
                entry_time: None,
                entry_location: None,
                exit_time: None,
                exit_location: None,
                status: AttendanceStatus::Present,
            });

        record.entry_time = Some(mark.time);
        record.entry_location = Some(mark.location.clone());
        record.status = AttendanceStatus::Present;
        Ok(())
    }

    async fn update_exit(&self, mark: &Mark) -> StoreResult<bool> {
        let mut attendance = write(&self.attendance)?;

        match attendance.get_mut(&(mark.employee_id.clone(), mark.date)) {
            Some(record) => {
                record.exit_time = Some(mark.time);
                record.exit_location = Some(mark.location.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_record(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> StoreResult<Option<AttendanceRecord>> {
        Ok(read(&self.attendance)?
            .get(&(employee_id.to_string(), date))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn employee(id: &str, username: &str) -> Employee {
        Employee {
            employee_id: id.to_string(),
            full_name: "Test".to_string(),
            department: "QA".to_string(),
            username: username.to_string(),
            password_hash: "hash".to_string(),
            photo_reference: None,
        }
    }

    fn mark(hour: u32, location: &str) -> Mark {
        Mark {
            employee_id: "E1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            location: location.to_string(),
        }
    }

    #[actix_web::test]
    async fn test_unique_username_and_employee_id() {
        let store = MemoryStore::new();
        store.insert_employee(&employee("E1", "alice")).await.unwrap();

        assert_eq!(
            store.insert_employee(&employee("E2", "alice")).await,
            Err(StoreError::Duplicate)
        );
        assert_eq!(
            store.insert_employee(&employee("E1", "bob")).await,
            Err(StoreError::Duplicate)
        );
    }

    #[actix_web::test]
    async fn test_keys_are_case_sensitive() {
        let store = MemoryStore::new();
        store.insert_employee(&employee("E1", "alice")).await.unwrap();
        store.insert_employee(&employee("e1", "Alice")).await.unwrap();

        let found = store.find_by_username("Alice").await.unwrap().unwrap();
        assert_eq!(found.employee_id, "e1");
    }

    #[actix_web::test]
    async fn test_upsert_keeps_exit_fields() {
        let store = MemoryStore::new();
        store.upsert_entry(&mark(8, "Office")).await.unwrap();
        assert!(store.update_exit(&mark(17, "Office")).await.unwrap());
        store.upsert_entry(&mark(9, "Home")).await.unwrap();

        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let record = store.find_record("E1", date).await.unwrap().unwrap();
        assert_eq!(record.entry_location.as_deref(), Some("Home"));
        assert_eq!(record.exit_time, NaiveTime::from_hms_opt(17, 0, 0));
        assert_eq!(store.attendance_len().unwrap(), 1);
    }

    #[actix_web::test]
    async fn test_exit_without_row() {
        let store = MemoryStore::new();
        assert!(!store.update_exit(&mark(17, "Office")).await.unwrap());
        assert_eq!(store.attendance_len().unwrap(), 0);
    }
}
