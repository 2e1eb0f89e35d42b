//! Serde helpers for wall-clock times sent as `HH:MM` or `HH:MM:SS`.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serializer, de::Error};

pub fn parse(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

/// Seconds are dropped from the output when they are zero.
pub fn format(time: &NaiveTime) -> String {
    if time.second() == 0 {
        time.format("%H:%M").to_string()
    } else {
        time.format("%H:%M:%S").to_string()
    }
}

pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(time))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid time '{raw}', expected HH:MM")))
}

pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(
        time: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => serializer.serialize_some(&super::format(t)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => super::parse(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid time '{raw}', expected HH:MM"))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_both_forms() {
        assert_eq!(parse("08:00"), NaiveTime::from_hms_opt(8, 0, 0));
        assert_eq!(parse("17:30:15"), NaiveTime::from_hms_opt(17, 30, 15));
        assert_eq!(parse("25:00"), None);
        assert_eq!(parse("eight"), None);
    }

    #[test]
    fn test_format_drops_zero_seconds() {
        let t = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        assert_eq!(format(&t), "08:00");

        let t = NaiveTime::from_hms_opt(8, 0, 5).unwrap();
        assert_eq!(format(&t), "08:00:05");
    }
}
