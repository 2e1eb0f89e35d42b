use std::str::FromStr;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use sqlx::{FromRow, MySqlPool};
use tracing::error;

use super::{AttendanceStore, CredentialStore, StoreError, StoreResult};
use crate::model::{
    attendance::{AttendanceRecord, AttendanceStatus, Mark},
    employee::Employee,
};

#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct AttendanceRow {
    employee_id: String,
    date: NaiveDate,
    entry_time: Option<NaiveTime>,
    entry_location: Option<String>,
    exit_time: Option<NaiveTime>,
    exit_location: Option<String>,
    status: String,
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = StoreError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        let status = AttendanceStatus::from_str(&row.status).map_err(|e| {
            error!(status = %row.status, "Unknown attendance status in store");
            StoreError::Backend(e.to_string())
        })?;

        Ok(AttendanceRecord {
            employee_id: row.employee_id,
            date: row.date,
            entry_time: row.entry_time,
            entry_location: row.entry_location,
            exit_time: row.exit_time,
            exit_location: row.exit_location,
            status,
        })
    }
}

#[async_trait]
impl CredentialStore for MySqlStore {
    async fn insert_employee(&self, employee: &Employee) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO employees
            (employee_id, full_name, department, username, password_hash, photo_reference)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&employee.employee_id)
        .bind(&employee.full_name)
        .bind(&employee.department)
        .bind(&employee.username)
        .bind(&employee.password_hash)
        .bind(&employee.photo_reference)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT employee_id, full_name, department, username, password_hash, photo_reference
            FROM employees
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    async fn set_photo(&self, username: &str, photo_reference: &str) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE employees SET photo_reference = ? WHERE username = ?")
            .bind(photo_reference)
            .bind(username)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl AttendanceStore for MySqlStore {
    async fn upsert_entry(&self, mark: &Mark) -> StoreResult<()> {
        let status = AttendanceStatus::Present.as_ref();

        sqlx::query(
            r#"
            INSERT INTO attendance (employee_id, date, entry_time, entry_location, status)
            VALUES (?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                entry_time = VALUES(entry_time),
                entry_location = VALUES(entry_location),
                status = VALUES(status)
            "#,
        )
        .bind(&mark.employee_id)
        .bind(mark.date)
        .bind(mark.time)
        .bind(&mark.location)
        .bind(status)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_exit(&self, mark: &Mark) -> StoreResult<bool> {
        // sqlx connects with CLIENT_FOUND_ROWS, so a repeated identical exit
        // still reports the matched row.
        let result = sqlx::query(
            r#"
            UPDATE attendance
            SET exit_time = ?, exit_location = ?
            WHERE employee_id = ?
            AND date = ?
            "#,
        )
        .bind(mark.time)
        .bind(&mark.location)
        .bind(&mark.employee_id)
        .bind(mark.date)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_record(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> StoreResult<Option<AttendanceRecord>> {
        let row = sqlx::query_as::<_, AttendanceRow>(
            r#"
            SELECT employee_id, date, entry_time, entry_location, exit_time, exit_location, status
            FROM attendance
            WHERE employee_id = ? AND date = ?
            "#,
        )
        .bind(employee_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AttendanceRecord::try_from).transpose()
    }
}
