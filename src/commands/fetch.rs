use chrono::{NaiveDate, Utc};
use chrono_tz::Asia::Tokyo;

use crate::config::Config;
use crate::error::{CliError, CliResult};
use crate::google;
use crate::output::{CalendarEntry, FetchOutput};
use crate::session::{ScopeMode, Session, TokenStore};

pub async fn run(
    config: &Config,
    date: Option<&str>,
    calendar: Option<&str>,
) -> CliResult<FetchOutput> {
    let day = parse_day(date)?;
    let calendar_ids = config.fetch_calendars(calendar)?;

    let session = Session::load_valid(config, &TokenStore::open()?, ScopeMode::ReadOnly).await?;
    let client = session.client();

    // One calendar at a time; a failing calendar is recorded in its own
    // entry instead of aborting the rest
    let mut calendars = Vec::with_capacity(calendar_ids.len());
    for id in &calendar_ids {
        match google::fetch_calendar(&client, id, day).await {
            Ok(entry) => calendars.push(entry),
            Err(e) => {
                log::warn!("fetching calendar {} failed: {}", id, e);
                calendars.push(CalendarEntry::failed(id, e.to_string()));
            }
        }
    }

    Ok(FetchOutput {
        date: day,
        calendars,
    })
}

fn parse_day(date: Option<&str>) -> CliResult<NaiveDate> {
    match date {
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| {
            CliError::InvalidArgument(format!("Invalid date '{}'. Expected YYYY-MM-DD", text))
        }),
        None => Ok(Utc::now().with_timezone(&Tokyo).date_naive()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_day_is_parsed() {
        assert_eq!(
            parse_day(Some("2025-01-15")).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
        );
    }

    #[test]
    fn malformed_day_is_an_invalid_argument() {
        assert!(matches!(
            parse_day(Some("15/01/2025")),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn missing_day_defaults_to_today() {
        // Just pin the fallback to the default zone's current date
        assert_eq!(
            parse_day(None).unwrap(),
            Utc::now().with_timezone(&Tokyo).date_naive()
        );
    }
}
