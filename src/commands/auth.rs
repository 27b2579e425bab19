use crate::config::Config;
use crate::error::CliResult;
use crate::output::AuthOutput;
use crate::session::{self, ScopeMode, TokenStore};

pub async fn run(config: &Config, mode: ScopeMode) -> CliResult<AuthOutput> {
    let store = TokenStore::open()?;

    let token_file = session::authorize(config, &store, mode, |url| open::that(url).is_ok()).await?;

    Ok(AuthOutput {
        success: true,
        scope_mode: mode.to_string(),
        token_file: token_file.display().to_string(),
    })
}
