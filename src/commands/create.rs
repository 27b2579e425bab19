use clap::Args;

use crate::config::Config;
use crate::error::CliResult;
use crate::google::{self, EventDraft};
use crate::output::MutationOutput;
use crate::session::{ScopeMode, Session, TokenStore};
use crate::time;

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Event title
    #[arg(long)]
    pub summary: String,

    /// Start date (YYYY-MM-DD) or date-time
    #[arg(long)]
    pub start: String,

    /// End date (exclusive for all-day events) or date-time
    #[arg(long)]
    pub end: String,

    /// Event description
    #[arg(long)]
    pub description: Option<String>,

    /// Event location
    #[arg(long)]
    pub location: Option<String>,

    /// Calendar id (overrides GOOGLE_CALENDAR_ID / GOOGLE_CALENDAR_IDS)
    #[arg(short, long)]
    pub calendar: Option<String>,

    /// Attendee notification policy (all, externalOnly, none)
    #[arg(long)]
    pub send_updates: Option<String>,
}

pub async fn run(config: &Config, args: CreateArgs) -> CliResult<MutationOutput> {
    let send_updates = google::parse_send_updates(args.send_updates.as_deref())?;
    let calendar_id = config.target_calendar(args.calendar.as_deref())?;

    let draft = EventDraft {
        summary: args.summary,
        description: args.description,
        location: args.location,
        start: time::normalize(&args.start)?,
        end: time::normalize(&args.end)?,
    };

    let session = Session::load_valid(config, &TokenStore::open()?, ScopeMode::ReadWrite).await?;
    let event = google::insert_event(&session.client(), &calendar_id, &draft, send_updates).await?;

    Ok(MutationOutput {
        success: true,
        event,
    })
}
