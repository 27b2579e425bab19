//! Google Calendar API operations: one function per remote call.
//!
//! Conversions between the SDK's wire types and this crate's records also
//! live here, so the rest of the crate never touches SDK types directly.

use chrono::{Duration, NaiveDate, TimeZone};
use chrono_tz::Asia::Tokyo;
use google_calendar::types::{EventDateTime, OrderBy, SendUpdates};
use google_calendar::Client;

use crate::error::{CliError, CliResult};
use crate::output::{CalendarEntry, EventDetail, EventSummary};
use crate::time::EventTimeSpec;

/// Validate a `send_updates` flag value. Anything outside
/// {all, externalOnly, none} is rejected before any API call is made.
pub fn parse_send_updates(value: Option<&str>) -> CliResult<SendUpdates> {
    match value {
        None | Some("none") => Ok(SendUpdates::None),
        Some("all") => Ok(SendUpdates::All),
        Some("externalOnly") => Ok(SendUpdates::ExternalOnly),
        Some(other) => Err(CliError::InvalidArgument(format!(
            "Invalid send_updates value '{}'. Expected one of: all, externalOnly, none",
            other
        ))),
    }
}

/// Fields for a new event. Start and end are both required; exclusive
/// all-day end dates are the caller's responsibility.
#[derive(Debug)]
pub struct EventDraft {
    pub summary: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: EventTimeSpec,
    pub end: EventTimeSpec,
}

/// Partial changes for an existing event; only provided fields end up in
/// the patch request body.
#[derive(Debug, Default)]
pub struct EventChanges {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: Option<EventTimeSpec>,
    pub end: Option<EventTimeSpec>,
}

impl EventChanges {
    fn to_request_body(&self) -> google_calendar::types::Event {
        google_calendar::types::Event {
            summary: self.summary.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
            location: self.location.clone().unwrap_or_default(),
            start: self.start.as_ref().map(event_time_to_google),
            end: self.end.as_ref().map(event_time_to_google),
            ..Default::default()
        }
    }
}

/// Fetch one calendar's metadata and its events for `day`.
pub async fn fetch_calendar(
    client: &Client,
    calendar_id: &str,
    day: NaiveDate,
) -> CliResult<CalendarEntry> {
    let calendar = client
        .calendars()
        .get(calendar_id)
        .await
        .map_err(|e| CliError::RemoteApi(e.to_string()))?
        .body;

    let (time_min, time_max) = day_bounds(day);

    let events = client
        .events()
        .list_all(
            calendar_id,
            "",                 // i_cal_uid
            0,                  // max_attendees
            OrderBy::StartTime, // order_by
            &[],                // private_extended_property
            "",                 // q (search query)
            &[],                // shared_extended_property
            false,              // show_deleted
            false,              // show_hidden_invitations
            true,               // single_events
            &time_max,
            &time_min,
            "",                 // time_zone
            "",                 // updated_min
        )
        .await
        .map_err(|e| CliError::RemoteApi(e.to_string()))?
        .body;

    let events = events
        .into_iter()
        .filter(|event| event.status != "cancelled" && !event.id.is_empty())
        .filter_map(event_summary)
        .collect();

    Ok(CalendarEntry {
        id: if calendar.id.is_empty() {
            calendar_id.to_string()
        } else {
            calendar.id
        },
        summary: non_empty(calendar.summary),
        description: non_empty(calendar.description),
        timezone: non_empty(calendar.time_zone),
        events,
        error: None,
    })
}

/// Create a new event.
pub async fn insert_event(
    client: &Client,
    calendar_id: &str,
    draft: &EventDraft,
    send_updates: SendUpdates,
) -> CliResult<EventDetail> {
    let body = google_calendar::types::Event {
        summary: draft.summary.clone(),
        description: draft.description.clone().unwrap_or_default(),
        location: draft.location.clone().unwrap_or_default(),
        start: Some(event_time_to_google(&draft.start)),
        end: Some(event_time_to_google(&draft.end)),
        ..Default::default()
    };

    let response = client
        .events()
        .insert(calendar_id, 0, 0, false, send_updates, false, &body)
        .await
        .map_err(|e| CliError::RemoteApi(e.to_string()))?;

    event_detail(response.body)
}

/// Apply partial changes to an existing event.
pub async fn patch_event(
    client: &Client,
    calendar_id: &str,
    event_id: &str,
    changes: &EventChanges,
    send_updates: SendUpdates,
) -> CliResult<EventDetail> {
    let body = changes.to_request_body();

    let response = client
        .events()
        .patch(calendar_id, event_id, 0, 0, false, send_updates, false, &body)
        .await
        .map_err(|e| CliError::RemoteApi(e.to_string()))?;

    event_detail(response.body)
}

/// Delete an event. An event that is already gone counts as deleted.
pub async fn delete_event(
    client: &Client,
    calendar_id: &str,
    event_id: &str,
    send_updates: SendUpdates,
) -> CliResult<()> {
    let result = client
        .events()
        .delete(calendar_id, event_id, false, send_updates)
        .await;

    match result {
        Ok(_) => Ok(()),
        Err(e) => {
            let message = e.to_string();
            if message.contains("410") || message.contains("Gone") {
                Ok(())
            } else {
                Err(CliError::RemoteApi(message))
            }
        }
    }
}

/// RFC 3339 bounds of `day` in the default zone: [00:00, next day 00:00).
fn day_bounds(day: NaiveDate) -> (String, String) {
    let start = Tokyo
        .from_local_datetime(&day.and_hms_opt(0, 0, 0).unwrap())
        .unwrap();
    let end = Tokyo
        .from_local_datetime(&(day + Duration::days(1)).and_hms_opt(0, 0, 0).unwrap())
        .unwrap();

    (start.to_rfc3339(), end.to_rfc3339())
}

fn event_summary(event: google_calendar::types::Event) -> Option<EventSummary> {
    // Events without usable endpoints are skipped rather than failing the
    // whole calendar
    let start = event.start.as_ref().and_then(event_time_from_google)?;
    let end = event.end.as_ref().and_then(event_time_from_google)?;

    Some(EventSummary {
        id: event.id,
        summary: non_empty(event.summary),
        description: non_empty(event.description),
        start,
        end,
    })
}

fn event_detail(event: google_calendar::types::Event) -> CliResult<EventDetail> {
    let start = event
        .start
        .as_ref()
        .and_then(event_time_from_google)
        .ok_or_else(|| CliError::RemoteApi("Event response has no start time".to_string()))?;
    let end = event
        .end
        .as_ref()
        .and_then(event_time_from_google)
        .ok_or_else(|| CliError::RemoteApi("Event response has no end time".to_string()))?;

    Ok(EventDetail {
        id: event.id,
        summary: non_empty(event.summary),
        description: non_empty(event.description),
        location: non_empty(event.location),
        start,
        end,
        html_link: non_empty(event.html_link),
    })
}

fn event_time_from_google(time: &EventDateTime) -> Option<EventTimeSpec> {
    if let Some(date) = time.date {
        Some(EventTimeSpec::AllDay { date })
    } else if let Some(date_time) = time.date_time {
        Some(EventTimeSpec::Timed {
            date_time: date_time.fixed_offset(),
            time_zone: non_empty(time.time_zone.clone()),
        })
    } else {
        None
    }
}

fn event_time_to_google(time: &EventTimeSpec) -> EventDateTime {
    match time {
        EventTimeSpec::AllDay { date } => EventDateTime {
            date: Some(*date),
            date_time: None,
            time_zone: String::new(),
        },
        EventTimeSpec::Timed {
            date_time,
            time_zone,
        } => EventDateTime {
            date: None,
            date_time: Some(date_time.with_timezone(&chrono::Utc)),
            time_zone: time_zone.clone().unwrap_or_default(),
        },
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
