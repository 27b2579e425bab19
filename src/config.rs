//! Process configuration resolved from the environment.
//!
//! All environment access happens here, once, at startup. The resulting
//! struct is passed down explicitly; nothing else in the crate reads
//! environment variables.

use crate::error::{CliError, CliResult};

pub const CLIENT_ID_VAR: &str = "GOOGLE_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "GOOGLE_CLIENT_SECRET";
pub const CALENDAR_ID_VAR: &str = "GOOGLE_CALENDAR_ID";
pub const CALENDAR_IDS_VAR: &str = "GOOGLE_CALENDAR_IDS";

/// Google OAuth client credentials (user-provided).
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Everything a run needs from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    calendar_id: Option<String>,
    calendar_ids: Vec<String>,
}

impl Config {
    /// Resolve from the process environment. Missing client credentials are
    /// a fatal configuration error, raised before any network call.
    pub fn from_env() -> CliResult<Self> {
        Self::resolve(|key| std::env::var(key).ok())
    }

    fn resolve(get: impl Fn(&str) -> Option<String>) -> CliResult<Self> {
        let client_id = require(&get, CLIENT_ID_VAR)?;
        let client_secret = require(&get, CLIENT_SECRET_VAR)?;

        let calendar_id = get(CALENDAR_ID_VAR).filter(|value| !value.trim().is_empty());
        let calendar_ids = get(CALENDAR_IDS_VAR)
            .map(|value| {
                value
                    .split(',')
                    .map(|entry| entry.trim().to_string())
                    .filter(|entry| !entry.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Config {
            credentials: Credentials {
                client_id,
                client_secret,
            },
            calendar_id,
            calendar_ids,
        })
    }

    /// The single calendar a mutating command operates on.
    ///
    /// Priority: explicit argument, then `GOOGLE_CALENDAR_ID`, then the
    /// first entry of `GOOGLE_CALENDAR_IDS`.
    pub fn target_calendar(&self, explicit: Option<&str>) -> CliResult<String> {
        if let Some(id) = explicit {
            return Ok(id.to_string());
        }
        if let Some(id) = &self.calendar_id {
            return Ok(id.clone());
        }
        if let Some(id) = self.calendar_ids.first() {
            return Ok(id.clone());
        }

        Err(no_calendar_configured())
    }

    /// Every calendar a fetch run covers, in configured order.
    pub fn fetch_calendars(&self, explicit: Option<&str>) -> CliResult<Vec<String>> {
        if let Some(id) = explicit {
            return Ok(vec![id.to_string()]);
        }
        if let Some(id) = &self.calendar_id {
            return Ok(vec![id.clone()]);
        }
        if !self.calendar_ids.is_empty() {
            return Ok(self.calendar_ids.clone());
        }

        Err(no_calendar_configured())
    }
}

fn require(get: &impl Fn(&str) -> Option<String>, key: &str) -> CliResult<String> {
    get(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| CliError::Config(format!("Missing required environment variable {}", key)))
}

fn no_calendar_configured() -> CliError {
    CliError::Config(format!(
        "No calendar configured. Pass --calendar or set {} / {}.",
        CALENDAR_ID_VAR, CALENDAR_IDS_VAR
    ))
}
