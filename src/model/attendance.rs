use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use crate::utils::clock;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, AsRefStr, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
}

/// One employee's presence for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "employee_id": "E1",
        "date": "2024-01-01",
        "entry_time": "08:00",
        "entry_location": "Office",
        "exit_time": "17:00",
        "exit_location": "Office",
        "status": "present"
    })
)]
pub struct AttendanceRecord {
    pub employee_id: String,

    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,

    #[serde(with = "clock::option", default)]
    #[schema(value_type = Option<String>, example = "08:00")]
    pub entry_time: Option<NaiveTime>,

    pub entry_location: Option<String>,

    #[serde(with = "clock::option", default)]
    #[schema(value_type = Option<String>, example = "17:00")]
    pub exit_time: Option<NaiveTime>,

    pub exit_location: Option<String>,

    pub status: AttendanceStatus,
}

/// A timestamped, located attendance mark for a given employee and day.
#[derive(Debug, Clone)]
pub struct Mark {
    pub employee_id: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_round_trips_as_lowercase() {
        assert_eq!(AttendanceStatus::Present.as_ref(), "present");
        assert_eq!(
            AttendanceStatus::from_str("present").unwrap(),
            AttendanceStatus::Present
        );
        assert!(AttendanceStatus::from_str("H").is_err());
    }

    #[test]
    fn test_record_serializes_short_times() {
        let record = AttendanceRecord {
            employee_id: "E1".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            entry_time: NaiveTime::from_hms_opt(8, 0, 0),
            entry_location: Some("Office".into()),
            exit_time: None,
            exit_location: None,
            status: AttendanceStatus::Present,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["date"], "2024-01-01");
        assert_eq!(value["entry_time"], "08:00");
        assert_eq!(value["exit_time"], serde_json::Value::Null);
        assert_eq!(value["status"], "present");
    }
}
