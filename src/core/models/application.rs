use std::fmt::{self, Display};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;

use crate::error::Error;

pub const APPLICATION: &str = "host application";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Approved => "Approved",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    /// Stored statuses are free text, older rows may be upper-cased.
    pub fn matches(&self, raw: &str) -> bool {
        raw.trim().eq_ignore_ascii_case(self.as_str())
    }
}

impl Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An admin's verdict on a pending application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    pub fn target(&self) -> ApplicationStatus {
        match self {
            Decision::Approved => ApplicationStatus::Approved,
            Decision::Rejected => ApplicationStatus::Rejected,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approved => "APPROVED",
            Decision::Rejected => "REJECTED",
        }
    }
}

impl FromStr for Decision {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "APPROVED" => Ok(Decision::Approved),
            "REJECTED" => Ok(Decision::Rejected),
            _ => Err(Error::InvalidDecisionError(s.into())),
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct HostApplication {
    pub id: i32,
    pub applicant_user_id: i32,
    pub org_name: String,
    pub event_type: String,
    pub motivation: String,
    pub status: String,
    pub review_comment: Option<String>,
    pub reviewer_user_id: Option<i32>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ApplicationWithApplicant {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub application: HostApplication,
    pub applicant_name: Option<String>,
    pub applicant_email: Option<String>,
}

static ORG_NAME_KEYS: &[&str] = &["org_name", "orgName", "organization", "organisation", "society", "org"];
static EVENT_TYPE_KEYS: &[&str] = &["event_category", "eventCategory", "category", "type", "type_of_events", "typeOfEvents", "event_type", "eventType"];
static MOTIVATION_KEYS: &[&str] = &["motivation", "Motivation", "reason", "details", "detail"];
static SUMMARY_KEYS: &[&str] = &["proposed_event_summary", "summary"];

/// A host application form. Clients send several spellings of each field;
/// the first alias holding a non-blank string wins and other values are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct Submit {
    pub org_name: Option<String>,
    pub event_type: Option<String>,
    pub motivation: Option<String>,
}

fn first_text(body: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| body.get(*key).and_then(Value::as_str))
        .find(|v| !v.trim().is_empty())
        .map(|v| v.trim().to_owned())
}

/// Text after a `<label>:` marker, matched ignoring ASCII case.
fn after_label<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    let start = text.to_ascii_lowercase().find(&label.to_ascii_lowercase())? + label.len();
    Some(text[start..].trim_start())
}

impl From<Map<String, Value>> for Submit {
    fn from(body: Map<String, Value>) -> Self {
        let org_name = first_text(&body, ORG_NAME_KEYS);
        let mut event_type = first_text(&body, EVENT_TYPE_KEYS);
        let mut motivation = first_text(&body, MOTIVATION_KEYS).map(|m| match after_label(&m, "motivation:") {
            Some(rest) if !rest.trim().is_empty() => rest.trim().to_owned(),
            _ => m,
        });
        // legacy clients send "Category: X. Motivation: Y" as one summary
        if let Some(summary) = first_text(&body, SUMMARY_KEYS) {
            if event_type.is_none() {
                event_type = after_label(&summary, "category:")
                    .and_then(|rest| rest.split(['.', '\n']).next())
                    .map(|c| c.trim().to_owned())
                    .filter(|c| !c.is_empty());
            }
            if motivation.is_none() {
                motivation = after_label(&summary, "motivation:").map(|m| m.trim().to_owned()).filter(|m| !m.is_empty());
            }
        }
        Self {
            org_name,
            event_type,
            motivation,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub applicant_user_id: i32,
    pub org_name: String,
    pub event_type: String,
    pub motivation: String,
    pub status: ApplicationStatus,
}

#[derive(Debug, Clone)]
pub struct ReviewUpdate {
    pub status: ApplicationStatus,
    pub review_comment: Option<String>,
    pub reviewer_user_id: i32,
}

#[derive(Debug, Default)]
pub struct Query {
    pub applicant_user_id_eq: Option<i32>,
    pub status_eq: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Review {
    pub application_id: i32,
    pub reviewer_user_id: i32,
    pub decision: String,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReviewOutcome {
    pub ok: bool,
    pub changed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub pending_applications: i64,
    pub active_hosts: i64,
}
