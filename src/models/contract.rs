use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::scheduling::Minutes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub fn weekday(self) -> Weekday {
        match self {
            DayOfWeek::Monday => Weekday::Mon,
            DayOfWeek::Tuesday => Weekday::Tue,
            DayOfWeek::Wednesday => Weekday::Wed,
            DayOfWeek::Thursday => Weekday::Thu,
            DayOfWeek::Friday => Weekday::Fri,
            DayOfWeek::Saturday => Weekday::Sat,
            DayOfWeek::Sunday => Weekday::Sun,
        }
    }

    /// 0 for Monday through 6 for Sunday
    pub fn index(self) -> usize {
        self.weekday().num_days_from_monday() as usize
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        };
        f.write_str(name)
    }
}

/// One weekday entry of a contract's weekly schedule.
///
/// `start_time` and `duration_minutes` may be left out, in which case the
/// generation request's defaults apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDayTemplate {
    pub day: DayOfWeek,
    #[serde(default, with = "time_of_day")]
    #[schema(value_type = Option<String>, example = "09:00")]
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub duration_minutes: Option<Minutes>,
    #[serde(default)]
    pub tasks: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Draft,
    Active,
    Paused,
    Ended,
}

impl ContractStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ContractStatus::Draft => "draft",
            ContractStatus::Active => "active",
            ContractStatus::Paused => "paused",
            ContractStatus::Ended => "ended",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown contract status {0:?}")]
pub struct UnknownContractStatus(String);

impl FromStr for ContractStatus {
    type Err = UnknownContractStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ContractStatus::Draft),
            "active" => Ok(ContractStatus::Active),
            "paused" => Ok(ContractStatus::Paused),
            "ended" => Ok(ContractStatus::Ended),
            other => Err(UnknownContractStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for ContractStatus {
    type Error = UnknownContractStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: i32,
    pub organization_id: i32,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub status: ContractStatus,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[sqlx(json)]
    pub schedule_days: Vec<ScheduleDayTemplate>,
    pub employee_ids: Vec<i32>,
}

/// `HH:MM` (seconds accepted on input) for optional times of day
pub mod time_of_day {
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn parse(text: &str) -> Option<NaiveTime> {
        let text = text.trim();
        NaiveTime::parse_from_str(text, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
            .ok()
    }

    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_str(&time.format("%H:%M").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(text) if text.trim().is_empty() => Ok(None),
            Some(text) => parse(&text)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid time of day {text:?}, expected HH:MM"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_day_from_stored_json() {
        let day: ScheduleDayTemplate = serde_json::from_str(
            r#"{"day":"thursday","startTime":"14:00","durationMinutes":"1h30m","tasks":["Vacuum","Bins"]}"#,
        )
        .unwrap();

        assert_eq!(day.day, DayOfWeek::Thursday);
        assert_eq!(day.start_time, NaiveTime::from_hms_opt(14, 0, 0));
        assert_eq!(day.duration_minutes.map(Minutes::get), Some(90));
        assert_eq!(day.tasks, vec!["Vacuum", "Bins"]);
    }

    #[test]
    fn test_schedule_day_defaults_are_optional() {
        let day: ScheduleDayTemplate = serde_json::from_str(r#"{"day":"monday"}"#).unwrap();

        assert_eq!(day.start_time, None);
        assert_eq!(day.duration_minutes, None);
        assert!(day.tasks.is_empty());
    }

    #[test]
    fn test_schedule_day_rejects_bad_time() {
        let result = serde_json::from_str::<ScheduleDayTemplate>(r#"{"day":"monday","startTime":"9am"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_start_time_serializes_as_hours_and_minutes() {
        let day = ScheduleDayTemplate {
            day: DayOfWeek::Friday,
            start_time: NaiveTime::from_hms_opt(7, 30, 0),
            duration_minutes: Minutes::new(45),
            tasks: vec![],
        };
        let json = serde_json::to_value(&day).unwrap();

        assert_eq!(json["startTime"], "07:30");
        assert_eq!(json["durationMinutes"], 45);
        assert_eq!(json["day"], "friday");
    }

    #[test]
    fn test_contract_status_round_trips_through_text() {
        assert_eq!("active".parse::<ContractStatus>(), Ok(ContractStatus::Active));
        assert_eq!(ContractStatus::Paused.as_str(), "paused");
        assert!("archived".parse::<ContractStatus>().is_err());
    }
}
