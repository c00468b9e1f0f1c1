use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// A validated, strictly positive number of minutes.
///
/// Deserializes from either a JSON number (`90`) or a duration string
/// (`"90m"`, `"2h"`, `"1h30m"`), so booking forms and stored contract
/// schedules share one parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "DurationValue", into = "u32")]
pub struct Minutes(u32);

impl Minutes {
    pub fn new(minutes: u32) -> Option<Self> {
        (minutes > 0).then_some(Self(minutes))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn as_duration(self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.0))
    }
}

impl fmt::Display for Minutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.0)
    }
}

impl From<Minutes> for u32 {
    fn from(minutes: Minutes) -> Self {
        minutes.0
    }
}

impl TryFrom<i64> for Minutes {
    type Error = ParseDurationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value <= 0 {
            return Err(ParseDurationError::NotPositive);
        }
        u32::try_from(value)
            .map(Self)
            .map_err(|_| ParseDurationError::TooLarge)
    }
}

/// Raw wire form of a duration before validation
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Number(i64),
    Text(String),
}

impl TryFrom<DurationValue> for Minutes {
    type Error = ParseDurationError;

    fn try_from(value: DurationValue) -> Result<Self, Self::Error> {
        match value {
            DurationValue::Number(n) => Minutes::try_from(n),
            DurationValue::Text(text) => parse_duration_minutes(&text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseDurationError {
    #[error("duration is empty")]
    Empty,

    #[error("malformed duration {0:?}")]
    Malformed(String),

    #[error("duration {0:?} is missing a unit (use h or m)")]
    MissingUnit(String),

    #[error("unknown duration unit {0:?}")]
    UnknownUnit(String),

    #[error("duration must be greater than zero")]
    NotPositive,

    #[error("duration is too large")]
    TooLarge,
}

/// Parse free-text durations such as `"90"`, `"90m"`, `"2h"`, `"1.5 hours"`
/// or `"1h 30m"` into whole minutes.
///
/// A bare integer is read as minutes. Fractional minutes are rounded to the
/// nearest whole minute.
pub fn parse_duration_minutes(text: &str) -> Result<Minutes, ParseDurationError> {
    let normalized = text.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return Err(ParseDurationError::Empty);
    }

    if let Ok(minutes) = normalized.parse::<i64>() {
        return Minutes::try_from(minutes);
    }

    let mut total = 0.0_f64;
    let mut rest = normalized.as_str();

    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return Err(ParseDurationError::Malformed(text.trim().to_string()));
        }
        let value: f64 = rest[..number_len]
            .parse()
            .map_err(|_| ParseDurationError::Malformed(text.trim().to_string()))?;

        rest = rest[number_len..].trim_start();
        let unit_len = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());

        let factor = match &rest[..unit_len] {
            "h" | "hr" | "hrs" | "hour" | "hours" => 60.0,
            "m" | "min" | "mins" | "minute" | "minutes" => 1.0,
            "" => return Err(ParseDurationError::MissingUnit(text.trim().to_string())),
            other => return Err(ParseDurationError::UnknownUnit(other.to_string())),
        };

        total += value * factor;
        rest = rest[unit_len..].trim_start();
    }

    let rounded = total.round();
    if rounded < 1.0 {
        return Err(ParseDurationError::NotPositive);
    }
    if rounded > f64::from(u32::MAX) {
        return Err(ParseDurationError::TooLarge);
    }

    Ok(Minutes(rounded as u32))
}
