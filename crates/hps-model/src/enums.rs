//! Closed value sets used by dashboard records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A string did not name any member of a closed value set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a valid {kind}")]
pub struct ParseEnumError {
    /// Which value set was being parsed (e.g. "log type").
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Lifecycle state of a hall pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PassStatus {
    /// Student is out of the room.
    Active,
    /// Student came back and the pass was closed.
    Returned,
    /// Teacher granted extra time.
    Extended,
    /// Pass ran past its allowed time without a return.
    Expired,
}

impl PassStatus {
    pub const ALL: [Self; 4] = [Self::Active, Self::Returned, Self::Extended, Self::Expired];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Returned => "RETURNED",
            Self::Extended => "EXTENDED",
            Self::Expired => "EXPIRED",
        }
    }
}

impl FromStr for PassStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ACTIVE" => Ok(Self::Active),
            "RETURNED" => Ok(Self::Returned),
            "EXTENDED" => Ok(Self::Extended),
            "EXPIRED" => Ok(Self::Expired),
            other => Err(ParseEnumError::new("pass status", other)),
        }
    }
}

/// Kind of behavior log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogType {
    Pass,
    Return,
    Infraction,
    Incentive,
    Tardy,
}

impl LogType {
    pub const ALL: [Self; 5] = [
        Self::Pass,
        Self::Return,
        Self::Infraction,
        Self::Incentive,
        Self::Tardy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Return => "RETURN",
            Self::Infraction => "INFRACTION",
            Self::Incentive => "INCENTIVE",
            Self::Tardy => "TARDY",
        }
    }
}

impl FromStr for LogType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "PASS" => Ok(Self::Pass),
            "RETURN" => Ok(Self::Return),
            "INFRACTION" => Ok(Self::Infraction),
            "INCENTIVE" => Ok(Self::Incentive),
            "TARDY" => Ok(Self::Tardy),
            other => Err(ParseEnumError::new("log type", other)),
        }
    }
}

/// Broadcast urgency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Normal,
    Important,
    Urgent,
}

impl Priority {
    pub const ALL: [Self; 3] = [Self::Normal, Self::Important, Self::Urgent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Important => "important",
            Self::Urgent => "urgent",
        }
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "normal" => Ok(Self::Normal),
            "important" => Ok(Self::Important),
            "urgent" => Ok(Self::Urgent),
            other => Err(ParseEnumError::new("priority", other)),
        }
    }
}

/// How a parent was contacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactType {
    Phone,
    Email,
    Conference,
    Other,
}

impl ContactType {
    pub const ALL: [Self; 4] = [Self::Phone, Self::Email, Self::Conference, Self::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Conference => "conference",
            Self::Other => "other",
        }
    }
}

impl FromStr for ContactType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "phone" => Ok(Self::Phone),
            "email" => Ok(Self::Email),
            "conference" => Ok(Self::Conference),
            "other" => Ok(Self::Other),
            other => Err(ParseEnumError::new("contact type", other)),
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(PassStatus, LogType, Priority, ContactType);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_type_round_trips_through_str() {
        for kind in LogType::ALL {
            assert_eq!(kind.as_str().parse::<LogType>(), Ok(kind));
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("pass".parse::<LogType>().is_err());
        assert!("URGENT".parse::<Priority>().is_err());
    }

    #[test]
    fn test_parse_error_message() {
        let err = "LUNCH".parse::<LogType>().unwrap_err();
        assert_eq!(err.to_string(), "'LUNCH' is not a valid log type");
    }

    #[test]
    fn test_priority_default_is_normal() {
        assert_eq!(Priority::default(), Priority::Normal);
    }
}
