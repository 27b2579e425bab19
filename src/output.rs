//! Output documents, matching the wire shapes the CLI prints.
//!
//! Every subcommand serializes exactly one of these to stdout; errors are
//! rendered as `{"error": ...}` by the process boundary instead.

use chrono::NaiveDate;
use serde::Serialize;

use crate::time::EventTimeSpec;

/// `gcal fetch`: one entry per configured calendar.
#[derive(Debug, Serialize)]
pub struct FetchOutput {
    pub date: NaiveDate,
    pub calendars: Vec<CalendarEntry>,
}

#[derive(Debug, Serialize)]
pub struct CalendarEntry {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub timezone: Option<String>,
    pub events: Vec<EventSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CalendarEntry {
    /// Entry for a calendar whose fetch failed. The failure is recorded in
    /// place of its contents so the other calendars still go through.
    pub fn failed(id: &str, error: String) -> Self {
        CalendarEntry {
            id: id.to_string(),
            summary: None,
            description: None,
            timezone: None,
            events: Vec::new(),
            error: Some(error),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventSummary {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub start: EventTimeSpec,
    pub end: EventTimeSpec,
}

/// `gcal create` / `gcal update`.
#[derive(Debug, Serialize)]
pub struct MutationOutput {
    pub success: bool,
    pub event: EventDetail,
}

#[derive(Debug, Serialize)]
pub struct EventDetail {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: EventTimeSpec,
    pub end: EventTimeSpec,
    pub html_link: Option<String>,
}

/// `gcal delete`.
#[derive(Debug, Serialize)]
pub struct DeleteOutput {
    pub success: bool,
    pub deleted_event_id: String,
}

/// `gcal auth`.
#[derive(Debug, Serialize)]
pub struct AuthOutput {
    pub success: bool,
    pub scope_mode: String,
    pub token_file: String,
}
