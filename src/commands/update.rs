use clap::Args;

use crate::config::Config;
use crate::error::CliResult;
use crate::google::{self, EventChanges};
use crate::output::MutationOutput;
use crate::session::{ScopeMode, Session, TokenStore};
use crate::time;

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Event id to update
    pub event_id: String,

    /// New title
    #[arg(long)]
    pub summary: Option<String>,

    /// New start date (YYYY-MM-DD) or date-time
    #[arg(long)]
    pub start: Option<String>,

    /// New end date or date-time
    #[arg(long)]
    pub end: Option<String>,

    /// New description
    #[arg(long)]
    pub description: Option<String>,

    /// New location
    #[arg(long)]
    pub location: Option<String>,

    /// Calendar id (overrides GOOGLE_CALENDAR_ID / GOOGLE_CALENDAR_IDS)
    #[arg(short, long)]
    pub calendar: Option<String>,

    /// Attendee notification policy (all, externalOnly, none)
    #[arg(long)]
    pub send_updates: Option<String>,
}

pub async fn run(config: &Config, args: UpdateArgs) -> CliResult<MutationOutput> {
    let send_updates = google::parse_send_updates(args.send_updates.as_deref())?;
    let calendar_id = config.target_calendar(args.calendar.as_deref())?;

    let changes = EventChanges {
        summary: args.summary,
        description: args.description,
        location: args.location,
        start: args.start.as_deref().map(time::normalize).transpose()?,
        end: args.end.as_deref().map(time::normalize).transpose()?,
    };

    let session = Session::load_valid(config, &TokenStore::open()?, ScopeMode::ReadWrite).await?;
    let event = google::patch_event(
        &session.client(),
        &calendar_id,
        &args.event_id,
        &changes,
        send_updates,
    )
    .await?;

    Ok(MutationOutput {
        success: true,
        event,
    })
}
