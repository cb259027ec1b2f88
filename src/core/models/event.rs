use std::fmt::{self, Display};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::Error;

pub const EVENT: &str = "event";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    Active,
    Cancelled,
    Completed,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Active => "active",
            EventStatus::Cancelled => "cancelled",
            EventStatus::Completed => "completed",
        }
    }
}

impl Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(EventStatus::Active),
            "cancelled" => Ok(EventStatus::Cancelled),
            "completed" => Ok(EventStatus::Completed),
            _ => Err(Error::InvalidRequestError(format!("invalid event status {:?}, expected active, cancelled or completed", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Event {
    pub id: i32,
    pub host_user_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub location: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Body of event create and update requests.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventInput {
    pub title: Option<String>,
    pub description: Option<String>,
    /// RFC 3339 timestamp or a plain `YYYY-MM-DD` date.
    #[serde(alias = "starts_at", alias = "startsAt")]
    pub date: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusInput {
    pub status: Option<String>,
}

/// Validated event fields, shared by insert and update.
#[derive(Debug, Clone, PartialEq)]
pub struct Fields {
    pub title: String,
    pub description: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub location: String,
    pub status: Option<EventStatus>,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub host_user_id: i32,
    pub fields: Fields,
}

pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

impl TryFrom<EventInput> for Fields {
    type Error = Error;

    fn try_from(input: EventInput) -> Result<Self, Self::Error> {
        let text = |v: Option<String>| v.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty());
        let title = text(input.title);
        let location = text(input.location);
        let starts_at = input.date.as_deref().and_then(parse_date);
        let mut missing = Vec::new();
        if title.is_none() {
            missing.push("title");
        }
        if starts_at.is_none() {
            missing.push("date");
        }
        if location.is_none() {
            missing.push("location");
        }
        let (Some(title), Some(starts_at), Some(location)) = (title, starts_at, location) else {
            return Err(Error::ValidationError(missing));
        };
        let status = match text(input.status) {
            Some(s) => Some(s.parse()?),
            None => None,
        };
        Ok(Fields {
            title,
            description: text(input.description),
            starts_at,
            location,
            status,
        })
    }
}
