use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use chemventory_core::session::parse_admin_emails;
use chemventory_core::RemoteConfig;

use crate::constants::{ADMIN_EMAILS_ENV, APP_DIR};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ChemventoryConfig {
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub remote: RemoteSection,
    #[serde(default)]
    pub auth: AuthSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StorageSection {
    pub data_dir: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RemoteSection {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub poll_interval_ms: Option<u64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AuthSection {
    #[serde(default)]
    pub admin_emails: Vec<String>,
}

impl ChemventoryConfig {
    pub fn new(data_dir: PathBuf, url: Option<String>, anon_key: Option<String>) -> Self {
        Self {
            storage: StorageSection {
                data_dir: Some(data_dir.to_string_lossy().to_string()),
            },
            remote: RemoteSection {
                url,
                anon_key,
                poll_interval_ms: None,
            },
            auth: AuthSection::default(),
        }
    }

    /// Hosted backend settings, `None` when the URL or key is missing.
    ///
    /// `SUPABASE_URL` and `SUPABASE_ANON_KEY` take precedence over the file.
    pub fn remote_config(&self) -> Option<RemoteConfig> {
        let url = env_value("SUPABASE_URL").or_else(|| self.remote.url.clone());
        let anon_key = env_value("SUPABASE_ANON_KEY").or_else(|| self.remote.anon_key.clone());
        let config = RemoteConfig::from_parts(url, anon_key)?;
        Some(match self.remote.poll_interval_ms {
            Some(ms) if ms > 0 => config.with_poll_interval(Duration::from_millis(ms)),
            _ => config,
        })
    }

    /// Admin emails from the environment, else from the file.
    pub fn admin_emails(&self) -> Vec<String> {
        match env_value(ADMIN_EMAILS_ENV) {
            Some(raw) => parse_admin_emails(&raw),
            None => self.auth.admin_emails.clone(),
        }
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_data_dir() -> anyhow::Result<PathBuf> {
    xdg_data_dir()
}

pub fn read_config(path: &Path) -> anyhow::Result<ChemventoryConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &ChemventoryConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join(APP_DIR));
        }
    }
    Ok(home_dir()?.join(".config").join(APP_DIR))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join(APP_DIR));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join(APP_DIR))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_parses_to_defaults() {
        let config: ChemventoryConfig = toml::from_str("").unwrap();
        assert!(config.storage.data_dir.is_none());
        assert!(config.remote.url.is_none());
        assert!(config.auth.admin_emails.is_empty());
    }

    #[test]
    fn test_full_file_parses() {
        let config: ChemventoryConfig = toml::from_str(
            r#"
[storage]
data_dir = "/tmp/chemventory"

[remote]
url = "https://xyz.supabase.co"
anon_key = "key"
poll_interval_ms = 750

[auth]
admin_emails = ["lab@example.com"]
"#,
        )
        .unwrap();
        assert_eq!(config.storage.data_dir.as_deref(), Some("/tmp/chemventory"));
        assert_eq!(config.remote.poll_interval_ms, Some(750));
        assert_eq!(config.auth.admin_emails, vec!["lab@example.com"]);
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = ChemventoryConfig::new(dir.path().join("data"), None, None);

        write_config(&path, &config).unwrap();
        let read = read_config(&path).unwrap();
        assert_eq!(read.storage.data_dir, config.storage.data_dir);
        assert!(read.remote.url.is_none());
    }
}
