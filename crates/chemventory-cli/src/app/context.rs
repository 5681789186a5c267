//! Application context for the Chemventory CLI.
//!
//! Bundles the parsed arguments with lazily-loaded configuration and the
//! stores built from it, so handlers don't thread them around.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::unsync::OnceCell;
use tracing::debug;

use chemventory_core::ids::SystemClock;
use chemventory_core::{
    ChemicalStore, FileStore, KeyValueStore, RecordCache, Session, SessionManager, UserDirectory,
};

use crate::cli::Cli;
use crate::config::{read_config, ChemventoryConfig};
use crate::errors::CliError;
use crate::ui::UiContext;

use super::resolver::{resolve_config_path, resolve_data_dir};

pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<ChemventoryConfig>,
    data_dir: OnceCell<PathBuf>,
    slots: OnceCell<Arc<dyn KeyValueStore>>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
            data_dir: OnceCell::new(),
            slots: OnceCell::new(),
        }
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// `--data-dir` (or `CHEMVENTORY_DATA_DIR`) when given.
    pub fn cli_data_dir(&self) -> Option<&str> {
        self.cli.data_dir.as_deref().filter(|d| !d.trim().is_empty())
    }

    /// UI context for a command's `--json`/`--format` flags plus the global ones.
    pub fn ui_context(&self, json: bool, format: Option<&str>) -> UiContext {
        UiContext::from_env(json, format, self.cli.no_color, self.cli.ascii)
    }

    /// The config file, or defaults when there is none yet.
    pub fn config(&self) -> anyhow::Result<&ChemventoryConfig> {
        self.config.get_or_try_init(|| {
            let path = resolve_config_path()?;
            if path.exists() {
                debug!(path = %path.display(), "reading config");
                read_config(&path)
            } else {
                debug!(path = %path.display(), "no config file; using defaults");
                Ok(ChemventoryConfig::default())
            }
        })
    }

    pub fn data_dir(&self) -> anyhow::Result<&Path> {
        self.data_dir
            .get_or_try_init(|| resolve_data_dir(self.cli, self.config()?))
            .map(PathBuf::as_path)
    }

    /// Persisted key-value slots under the data directory.
    pub fn slots(&self) -> anyhow::Result<Arc<dyn KeyValueStore>> {
        let slots = self.slots.get_or_try_init(|| -> anyhow::Result<_> {
            let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(self.data_dir()?));
            Ok(store)
        })?;
        Ok(Arc::clone(slots))
    }

    /// The sync façade, remote-backed when a hosted backend is configured.
    pub fn store(&self) -> anyhow::Result<ChemicalStore> {
        let cache = RecordCache::new(self.slots()?);
        Ok(ChemicalStore::open(cache, self.config()?.remote_config()))
    }

    pub fn sessions(&self) -> anyhow::Result<SessionManager> {
        Ok(SessionManager::new(self.slots()?))
    }

    pub fn users(&self) -> anyhow::Result<UserDirectory> {
        Ok(UserDirectory::new(self.slots()?, Arc::new(SystemClock)))
    }

    /// The restored session, if it belongs to an admin.
    pub fn require_admin(&self) -> anyhow::Result<Session> {
        let session = self.sessions()?.restore();
        if !session.is_signed_in() {
            return Err(CliError::auth_failed_with_hint(
                "Not signed in",
                "Hint: Run `chemventory login <email>` first.",
            )
            .into());
        }
        if !session.is_admin(&self.config()?.admin_emails()) {
            return Err(CliError::auth_failed_with_hint(
                "Admin access required",
                "Hint: Sign in with an address listed in [auth] admin_emails or CHEMVENTORY_ADMIN_EMAILS.",
            )
            .into());
        }
        Ok(session)
    }
}
