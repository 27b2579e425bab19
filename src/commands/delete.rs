use crate::config::Config;
use crate::error::CliResult;
use crate::google;
use crate::output::DeleteOutput;
use crate::session::{ScopeMode, Session, TokenStore};

pub async fn run(
    config: &Config,
    event_id: &str,
    calendar: Option<&str>,
    send_updates: Option<&str>,
) -> CliResult<DeleteOutput> {
    let send_updates = google::parse_send_updates(send_updates)?;
    let calendar_id = config.target_calendar(calendar)?;

    let session = Session::load_valid(config, &TokenStore::open()?, ScopeMode::ReadWrite).await?;
    google::delete_event(&session.client(), &calendar_id, event_id, send_updates).await?;

    Ok(DeleteOutput {
        success: true,
        deleted_event_id: event_id.to_string(),
    })
}
