//! Persistence seams for credentials and attendance.
//!
//! Services hold these as `Arc<dyn ...>` so the MySQL backend and the
//! in-memory backend are interchangeable.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{
    attendance::{AttendanceRecord, Mark},
    employee::Employee,
};

pub mod memory;
pub mod mysql;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A unique key constraint rejected the write.
    #[error("duplicate key")]
    Duplicate,

    #[error("{0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some("23000") {
                return StoreError::Duplicate;
            }
        }
        StoreError::Backend(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Fails with `StoreError::Duplicate` if the username or employee id exists.
    async fn insert_employee(&self, employee: &Employee) -> StoreResult<()>;

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Employee>>;

    /// Returns false when no employee has that username.
    async fn set_photo(&self, username: &str, photo_reference: &str) -> StoreResult<bool>;
}

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Insert-or-update in one write: creates the day's record as present, or
    /// overwrites entry time and location and resets the status.
    async fn upsert_entry(&self, mark: &Mark) -> StoreResult<()>;

    /// Returns false when there is no record for the mark's day to update.
    async fn update_exit(&self, mark: &Mark) -> StoreResult<bool>;

    async fn find_record(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> StoreResult<Option<AttendanceRecord>>;
}
