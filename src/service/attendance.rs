use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, instrument};

use crate::{
    error::{AppError, AppResult},
    model::attendance::{AttendanceRecord, Mark},
    store::AttendanceStore,
};

/// Per (employee_id, date): NoRecord -> Entered -> Exited. Entry may be
/// repeated at any point and overwrites; exit needs an existing record.
pub struct AttendanceService {
    store: Arc<dyn AttendanceStore>,
}

impl AttendanceService {
    pub fn new(store: Arc<dyn AttendanceStore>) -> Self {
        Self { store }
    }

    #[instrument(name = "attendance_entry", skip(self, mark), fields(employee_id = %mark.employee_id, date = %mark.date))]
    pub async fn record_entry(&self, mark: Mark) -> AppResult<()> {
        let mark = normalize(mark)?;
        self.store.upsert_entry(&mark).await?;

        info!("Entry recorded");
        Ok(())
    }

    #[instrument(name = "attendance_exit", skip(self, mark), fields(employee_id = %mark.employee_id, date = %mark.date))]
    pub async fn record_exit(&self, mark: Mark) -> AppResult<()> {
        let mark = normalize(mark)?;

        if !self.store.update_exit(&mark).await? {
            info!("Exit refused: no entry for the day");
            return Err(AppError::not_found(
                "No entry record found for the given date and employee id",
            ));
        }

        info!("Exit recorded");
        Ok(())
    }

    pub async fn get_record(&self, employee_id: &str, date: NaiveDate) -> AppResult<AttendanceRecord> {
        self.store
            .find_record(employee_id.trim(), date)
            .await?
            .ok_or_else(|| {
                AppError::not_found("No presence record found for the given date and employee id")
            })
    }
}

/// Trims the key and location so writes and `get_record` agree on the key.
fn normalize(mut mark: Mark) -> AppResult<Mark> {
    mark.employee_id = mark.employee_id.trim().to_string();
    mark.location = mark.location.trim().to_string();

    if mark.employee_id.is_empty() {
        return Err(AppError::validation("employee_id must not be empty"));
    }
    if mark.location.is_empty() {
        return Err(AppError::validation("location must not be empty"));
    }
    Ok(mark)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::attendance::AttendanceStatus, store::MemoryStore};
    use chrono::NaiveTime;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn mark(time: &str, location: &str) -> Mark {
        Mark {
            employee_id: "E1".into(),
            date: day(),
            time: crate::utils::clock::parse(time).unwrap(),
            location: location.into(),
        }
    }

    fn service() -> (Arc<MemoryStore>, AttendanceService) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), AttendanceService::new(store))
    }

    #[actix_web::test]
    async fn test_entry_then_exit() {
        let (_, attendance) = service();

        attendance.record_entry(mark("08:00", "Office")).await.unwrap();
        let record = attendance.get_record("E1", day()).await.unwrap();
        assert_eq!(record.status, AttendanceStatus::Present);
        assert_eq!(record.entry_time, NaiveTime::from_hms_opt(8, 0, 0));
        assert_eq!(record.exit_time, None);

        attendance.record_exit(mark("17:00", "Office")).await.unwrap();
        let record = attendance.get_record("E1", day()).await.unwrap();
        assert_eq!(record.exit_time, NaiveTime::from_hms_opt(17, 0, 0));
        assert_eq!(record.exit_location.as_deref(), Some("Office"));
    }

    #[actix_web::test]
    async fn test_exit_without_entry_is_not_found() {
        let (store, attendance) = service();

        assert!(matches!(
            attendance.record_exit(mark("17:00", "Office")).await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(store.attendance_len().unwrap(), 0);
    }

    #[actix_web::test]
    async fn test_repeated_entry_overwrites_single_record() {
        let (store, attendance) = service();

        attendance.record_entry(mark("08:00", "Office")).await.unwrap();
        attendance.record_entry(mark("08:30", "Home")).await.unwrap();

        assert_eq!(store.attendance_len().unwrap(), 1);
        let record = attendance.get_record("E1", day()).await.unwrap();
        assert_eq!(record.entry_time, NaiveTime::from_hms_opt(8, 30, 0));
        assert_eq!(record.entry_location.as_deref(), Some("Home"));
    }

    #[actix_web::test]
    async fn test_entry_after_exit_keeps_exit() {
        let (_, attendance) = service();

        attendance.record_entry(mark("08:00", "Office")).await.unwrap();
        attendance.record_exit(mark("17:00", "Office")).await.unwrap();
        attendance.record_entry(mark("18:00", "Office")).await.unwrap();

        let record = attendance.get_record("E1", day()).await.unwrap();
        assert_eq!(record.entry_time, NaiveTime::from_hms_opt(18, 0, 0));
        assert_eq!(record.exit_time, NaiveTime::from_hms_opt(17, 0, 0));
        assert_eq!(record.status, AttendanceStatus::Present);
    }

    #[actix_web::test]
    async fn test_padded_employee_id_uses_one_key() {
        let (store, attendance) = service();
        let padded = |time: &str| Mark {
            employee_id: " E1 ".into(),
            location: " Office ".into(),
            ..mark(time, "Office")
        };

        attendance.record_entry(padded("08:00")).await.unwrap();
        attendance.record_exit(padded("17:00")).await.unwrap();

        let record = attendance.get_record(" E1 ", day()).await.unwrap();
        assert_eq!(record.employee_id, "E1");
        assert_eq!(record.entry_location.as_deref(), Some("Office"));
        assert_eq!(record.exit_time, NaiveTime::from_hms_opt(17, 0, 0));
        assert!(attendance.get_record("E1", day()).await.is_ok());
        assert_eq!(store.attendance_len().unwrap(), 1);
    }

    #[actix_web::test]
    async fn test_missing_record_and_blank_fields() {
        let (_, attendance) = service();

        assert!(matches!(
            attendance.get_record("E1", day()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            attendance.record_entry(mark("08:00", " ")).await,
            Err(AppError::Validation(_))
        ));
    }
}
