//! Credential lifecycle: token storage, transparent refresh, and the
//! interactive authorization flow.
//!
//! Tokens are stored one file per scope tier:
//!   ~/.config/gcal-cli/tokens/readonly.json
//!   ~/.config/gcal-cli/tokens/readwrite.json
//!
//! Commands that share a tier share the file: `fetch` reads the read-only
//! token, while `create`/`update`/`delete` all use the read-write one.

use std::fmt;
use std::io::BufRead;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use clap::ValueEnum;
use google_calendar::Client;
use serde::{Deserialize, Serialize};

use crate::config::{Config, Credentials};
use crate::error::{CliError, CliResult};

/// Out-of-band redirect: Google shows the user a code to paste back into
/// the terminal, so no local callback server is needed.
const REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

/// Which OAuth grant tier a command runs under. Fixed per subcommand at
/// startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScopeMode {
    ReadOnly,
    ReadWrite,
}

impl ScopeMode {
    pub fn scope_url(&self) -> &'static str {
        match self {
            ScopeMode::ReadOnly => "https://www.googleapis.com/auth/calendar.readonly",
            ScopeMode::ReadWrite => "https://www.googleapis.com/auth/calendar",
        }
    }

    fn token_file(&self) -> &'static str {
        match self {
            ScopeMode::ReadOnly => "readonly.json",
            ScopeMode::ReadWrite => "readwrite.json",
        }
    }
}

impl fmt::Display for ScopeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeMode::ReadOnly => write!(f, "read-only"),
            ScopeMode::ReadWrite => write!(f, "read-write"),
        }
    }
}

/// A stored OAuth credential for one scope tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    pub scope: String,
}

impl SessionData {
    fn from_tokens(
        access_token: String,
        refresh_token: String,
        expires_in: i64,
        scope: String,
    ) -> Self {
        let expires_at = if expires_in > 0 {
            Some(Utc::now() + Duration::seconds(expires_in))
        } else {
            None
        };

        SessionData {
            access_token,
            refresh_token,
            expires_at,
            scope,
        }
    }

    /// A credential without a known expiry is treated as expired and
    /// refreshed before use.
    fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(at) => Utc::now() >= at,
            None => true,
        }
    }
}

/// On-disk token storage, one file per scope tier.
pub struct TokenStore {
    dir: PathBuf,
}

impl TokenStore {
    /// Store under the per-user config directory.
    pub fn open() -> CliResult<Self> {
        let dir = dirs::config_dir()
            .ok_or_else(|| CliError::Config("Could not determine config directory".to_string()))?
            .join("gcal-cli")
            .join("tokens");

        Ok(TokenStore { dir })
    }

    /// Store rooted at an explicit directory.
    pub fn at(dir: PathBuf) -> Self {
        TokenStore { dir }
    }

    pub fn path(&self, mode: ScopeMode) -> PathBuf {
        self.dir.join(mode.token_file())
    }

    /// Load the credential for a scope tier. An absent or unreadable file
    /// fails with `NoCredentials` before any network access.
    pub fn load(&self, mode: ScopeMode) -> CliResult<SessionData> {
        let path = self.path(mode);

        let contents =
            std::fs::read_to_string(&path).map_err(|_| CliError::NoCredentials { mode })?;

        let data: SessionData =
            serde_json::from_str(&contents).map_err(|_| CliError::NoCredentials { mode })?;

        Ok(data)
    }

    pub fn save(&self, mode: ScopeMode, data: &SessionData) -> CliResult<()> {
        let path = self.path(mode);

        std::fs::create_dir_all(&self.dir)?;

        let contents = serde_json::to_string_pretty(data)?;
        std::fs::write(&path, contents)?;

        // Owner-only (0600) since the file contains OAuth tokens
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }
}

/// A valid credential bound to one scope tier, ready to produce API
/// clients.
pub struct Session {
    credentials: Credentials,
    data: SessionData,
}

impl Session {
    /// Load the stored credential for `mode`, refreshing (and
    /// re-persisting) it when the access token has expired.
    pub async fn load_valid(
        config: &Config,
        store: &TokenStore,
        mode: ScopeMode,
    ) -> CliResult<Self> {
        let mut data = store.load(mode)?;

        if data.is_expired() {
            log::debug!("access token for {} scope expired, refreshing", mode);
            data = refresh(&config.credentials, &data).await?;
            store.save(mode, &data)?;
        }

        Ok(Session {
            credentials: config.credentials.clone(),
            data,
        })
    }

    pub fn client(&self) -> Client {
        Client::new(
            self.credentials.client_id.clone(),
            self.credentials.client_secret.clone(),
            REDIRECT_URI.to_string(),
            self.data.access_token.clone(),
            self.data.refresh_token.clone(),
        )
    }
}

async fn refresh(creds: &Credentials, data: &SessionData) -> CliResult<SessionData> {
    let client = Client::new(
        creds.client_id.clone(),
        creds.client_secret.clone(),
        REDIRECT_URI.to_string(),
        data.access_token.clone(),
        data.refresh_token.clone(),
    );

    let tokens = client
        .refresh_access_token()
        .await
        .map_err(|e| CliError::Auth(format!("Failed to refresh token: {}", e)))?;

    // Google typically doesn't return a new refresh_token on refresh
    let refresh_token = if tokens.refresh_token.is_empty() {
        data.refresh_token.clone()
    } else {
        tokens.refresh_token
    };

    Ok(SessionData::from_tokens(
        tokens.access_token,
        refresh_token,
        tokens.expires_in,
        data.scope.clone(),
    ))
}

/// Run the interactive authorization flow for `mode` and persist the
/// resulting credential. Only the `auth` subcommand calls this.
///
/// The consent URL is printed to stderr and handed to the injected
/// `open_url` capability; failing to open a browser is not fatal. The
/// one-time code is read from standard input. Returns the token file path.
pub async fn authorize(
    config: &Config,
    store: &TokenStore,
    mode: ScopeMode,
    open_url: impl Fn(&str) -> bool,
) -> CliResult<PathBuf> {
    let scopes = vec![mode.scope_url().to_string()];

    let mut client = Client::new(
        config.credentials.client_id.clone(),
        config.credentials.client_secret.clone(),
        REDIRECT_URI.to_string(),
        String::new(),
        String::new(),
    );

    let consent_url = client.user_consent_url(&scopes);

    eprintln!("\nOpen this URL in your browser to authorize {} access:\n", mode);
    eprintln!("{}\n", consent_url);

    if !open_url(&consent_url) {
        eprintln!("(Could not open browser automatically, please copy the URL above)");
    }

    eprint!("Paste the authorization code here: ");
    let code = read_code()?;

    let tokens = client
        .get_access_token(&code, "")
        .await
        .map_err(|e| CliError::Auth(format!("Failed to exchange code for tokens: {}", e)))?;

    let data = SessionData::from_tokens(
        tokens.access_token,
        tokens.refresh_token,
        tokens.expires_in,
        mode.scope_url().to_string(),
    );
    store.save(mode, &data)?;

    log::info!("stored {} credential at {}", mode, store.path(mode).display());

    Ok(store.path(mode))
}

fn read_code() -> CliResult<String> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;

    let code = line.trim();
    if code.is_empty() {
        return Err(CliError::Auth("Empty authorization code".to_string()));
    }

    Ok(code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample(scope: ScopeMode) -> SessionData {
        SessionData {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at: Some(Utc::now() + Duration::hours(1)),
            scope: scope.scope_url().to_string(),
        }
    }

    #[test]
    fn missing_token_file_is_no_credentials() {
        let dir = TempDir::new().unwrap();
        let store = TokenStore::at(dir.path().to_path_buf());

        match store.load(ScopeMode::ReadOnly) {
            Err(CliError::NoCredentials { mode }) => assert_eq!(mode, ScopeMode::ReadOnly),
            other => panic!("expected NoCredentials, got {:?}", other),
        }
    }

    #[test]
    fn corrupt_token_file_is_no_credentials() {
        let dir = TempDir::new().unwrap();
        let store = TokenStore::at(dir.path().to_path_buf());

        std::fs::create_dir_all(dir.path()).unwrap();
        std::fs::write(store.path(ScopeMode::ReadWrite), "not json").unwrap();

        match store.load(ScopeMode::ReadWrite) {
            Err(CliError::NoCredentials { mode }) => assert_eq!(mode, ScopeMode::ReadWrite),
            other => panic!("expected NoCredentials, got {:?}", other),
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = TokenStore::at(dir.path().to_path_buf());
        let data = sample(ScopeMode::ReadWrite);

        store.save(ScopeMode::ReadWrite, &data).unwrap();
        let loaded = store.load(ScopeMode::ReadWrite).unwrap();

        assert_eq!(loaded.access_token, data.access_token);
        assert_eq!(loaded.refresh_token, data.refresh_token);
        assert_eq!(loaded.expires_at, data.expires_at);
        assert_eq!(loaded.scope, data.scope);
    }

    #[test]
    fn scope_modes_use_separate_files() {
        let dir = TempDir::new().unwrap();
        let store = TokenStore::at(dir.path().to_path_buf());

        assert_ne!(
            store.path(ScopeMode::ReadOnly),
            store.path(ScopeMode::ReadWrite)
        );

        store.save(ScopeMode::ReadWrite, &sample(ScopeMode::ReadWrite)).unwrap();

        // The read-write token does not satisfy a read-only load
        assert!(matches!(
            store.load(ScopeMode::ReadOnly),
            Err(CliError::NoCredentials {
                mode: ScopeMode::ReadOnly
            })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = TokenStore::at(dir.path().to_path_buf());

        store.save(ScopeMode::ReadOnly, &sample(ScopeMode::ReadOnly)).unwrap();

        let mode = std::fs::metadata(store.path(ScopeMode::ReadOnly))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn expiry_checks() {
        let mut data = sample(ScopeMode::ReadOnly);
        assert!(!data.is_expired());

        data.expires_at = Some(Utc::now() - Duration::seconds(5));
        assert!(data.is_expired());

        data.expires_at = None;
        assert!(data.is_expired());
    }

    #[test]
    fn zero_expiry_means_unknown() {
        let data = SessionData::from_tokens(
            "access".to_string(),
            "refresh".to_string(),
            0,
            ScopeMode::ReadOnly.scope_url().to_string(),
        );

        assert_eq!(data.expires_at, None);
        assert!(data.is_expired());
    }
}
