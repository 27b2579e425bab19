//! gcal - a Google Calendar CLI.
//!
//! Each subcommand is a thin wrapper: parse flags, resolve configuration,
//! build one API request, print one JSON document. Errors of any kind
//! become `{"error": ...}` on stdout and exit code 1; this is the only place
//! in the crate where errors turn into text.

mod commands;
mod config;
mod error;
mod google;
mod output;
mod session;
mod time;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::config::Config;
use crate::error::CliResult;
use crate::session::ScopeMode;

#[derive(Parser)]
#[command(name = "gcal")]
#[command(about = "Fetch, create, update and delete Google Calendar events")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authorize calendar access and cache the token locally
    Auth {
        /// Scope tier to authorize
        #[arg(long, value_enum, default_value_t = ScopeMode::ReadWrite)]
        mode: ScopeMode,
    },
    /// List a day's events across the configured calendars
    Fetch {
        /// Day to fetch (YYYY-MM-DD, default today in Asia/Tokyo)
        #[arg(long)]
        date: Option<String>,

        /// Only this calendar id
        #[arg(short, long)]
        calendar: Option<String>,
    },
    /// Create an event
    Create(commands::create::CreateArgs),
    /// Update fields of an existing event
    Update(commands::update::UpdateArgs),
    /// Delete an event
    Delete {
        /// Event id to delete
        event_id: String,

        /// Calendar id (overrides GOOGLE_CALENDAR_ID / GOOGLE_CALENDAR_IDS)
        #[arg(short, long)]
        calendar: Option<String>,

        /// Attendee notification policy (all, externalOnly, none)
        #[arg(long)]
        send_updates: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(document) => println!("{}", document),
        Err(e) => {
            let document = serde_json::json!({ "error": e.to_string() });
            println!("{}", serde_json::to_string_pretty(&document).unwrap());
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> CliResult<String> {
    let config = Config::from_env()?;

    match cli.command {
        Commands::Auth { mode } => to_pretty(&commands::auth::run(&config, mode).await?),
        Commands::Fetch { date, calendar } => to_pretty(
            &commands::fetch::run(&config, date.as_deref(), calendar.as_deref()).await?,
        ),
        Commands::Create(args) => to_pretty(&commands::create::run(&config, args).await?),
        Commands::Update(args) => to_pretty(&commands::update::run(&config, args).await?),
        Commands::Delete {
            event_id,
            calendar,
            send_updates,
        } => to_pretty(
            &commands::delete::run(
                &config,
                &event_id,
                calendar.as_deref(),
                send_updates.as_deref(),
            )
            .await?,
        ),
    }
}

fn to_pretty<T: Serialize>(value: &T) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
