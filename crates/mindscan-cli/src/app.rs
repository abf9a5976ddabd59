//! Application context for the Mindscan CLI.
//!
//! Bundles the parsed arguments with lazily-loaded configuration and
//! knows how to open the store and authenticate a user for one command.

use std::io::IsTerminal;
use std::path::PathBuf;

use dialoguer::Password;
use once_cell::unsync::OnceCell;

use mindscan_core::{Session, SqliteStore};

use crate::cli::{Cli, CredentialArgs};
use crate::config::{default_db_path, load_config, resolve_config_path, MindscanConfig};
use crate::constants::PASSWORD_ENV;
use crate::errors::CliError;

pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<MindscanConfig>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Get the configuration, loading it on first use.
    pub fn config(&self) -> anyhow::Result<&MindscanConfig> {
        self.config
            .get_or_try_init(|| load_config(&resolve_config_path()?))
    }

    /// Resolve the database path: `--db`/MINDSCAN_DB, then config, then XDG default.
    pub fn db_path(&self) -> anyhow::Result<PathBuf> {
        if let Some(path) = self.cli.db.as_deref() {
            return Ok(PathBuf::from(path));
        }
        if let Some(path) = self.config()?.storage.path.as_deref() {
            return Ok(PathBuf::from(path));
        }
        default_db_path()
    }

    /// Open the store, running the schema migration.
    pub fn open_store(&self) -> anyhow::Result<SqliteStore> {
        let path = self.db_path()?;
        let options = self.config()?.store_options();
        SqliteStore::open(&path, options).map_err(|e| {
            anyhow::anyhow!("Failed to open journal at {}: {}", path.display(), e)
        })
    }

    /// Authenticate the user named in `credentials`.
    pub fn authenticate(
        &self,
        store: &SqliteStore,
        credentials: &CredentialArgs,
    ) -> anyhow::Result<Session> {
        let password = resolve_password(credentials, false)?;
        Session::login(store, &credentials.user, &password)?.ok_or_else(|| {
            CliError::auth_failed_with_hint(
                "Invalid username or password.",
                "Hint: Run `mindscan signup --user <name>` to create an account.",
            )
            .into()
        })
    }
}

/// Password from `--password`, then MINDSCAN_PASSWORD, then a prompt.
///
/// `confirm` asks twice when prompting (signup).
pub fn resolve_password(credentials: &CredentialArgs, confirm: bool) -> anyhow::Result<String> {
    if let Some(password) = credentials.password.clone() {
        return Ok(password);
    }
    if let Ok(value) = std::env::var(PASSWORD_ENV) {
        if !value.is_empty() {
            return Ok(value);
        }
    }

    let interactive = std::io::stdin().is_terminal() && !credentials.no_input;
    if !interactive {
        return Err(CliError::invalid_input(format!(
            "No password provided and no TTY available. Use --password or set {}.",
            PASSWORD_ENV
        ))
        .into());
    }

    let prompt = Password::new().with_prompt("Password");
    let prompt = if confirm {
        prompt.with_confirmation("Confirm password", "Passwords do not match")
    } else {
        prompt
    };
    prompt
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}
