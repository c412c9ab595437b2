//! Configuration loader with precedence
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Built-in defaults derived from the home directory
//! 2. Config file (`--config <path>` or `~/.config/tmca/config.yaml`)
//! 3. Environment variables (TMCA_* prefix)

use crate::config::TmcaConfig;
use crate::error::{Error, Result};
use crate::utils::get_home_dir;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::env;
use std::fs;
use tracing::debug;

/// Config file name inside `~/.config/tmca`
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// On-disk overlay; every field is optional
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigFile {
    pub klipper_dir: Option<String>,
    pub install_dir: Option<String>,
    pub repo_url: Option<String>,
    pub backup_dir: Option<String>,
    pub systemd_dir: Option<String>,
}

/// Builds a [`TmcaConfig`] from defaults, an optional file and the environment
pub struct ConfigLoader {
    home: Utf8PathBuf,
    default_path: Utf8PathBuf,
}

impl ConfigLoader {
    /// Create a loader rooted at the current user's home directory
    pub fn new() -> Result<Self> {
        Ok(Self::with_home(get_home_dir()?))
    }

    /// Create a loader with a custom home directory
    pub fn with_home(home: impl Into<Utf8PathBuf>) -> Self {
        let home = home.into();
        let default_path = home.join(".config").join("tmca").join(CONFIG_FILE_NAME);
        Self { home, default_path }
    }

    /// Path of the config file used when none is given explicitly
    pub fn default_path(&self) -> &Utf8Path {
        &self.default_path
    }

    /// Load the configuration
    ///
    /// An explicit `path` must exist; the default path is optional.
    pub fn load(&self, path: Option<&Utf8Path>) -> Result<TmcaConfig> {
        let mut config = TmcaConfig::with_home(&self.home);

        let file = match path {
            Some(p) => Some(self.read_file(p)?),
            None if self.default_path.exists() => Some(self.read_file(&self.default_path)?),
            None => None,
        };

        if let Some(file) = file {
            self.apply_file(&mut config, file);
        }

        self.apply_env_overrides(&mut config);
        Self::validate(&config)?;

        debug!("Resolved configuration: {:?}", config);
        Ok(config)
    }

    fn read_file(&self, path: &Utf8Path) -> Result<ConfigFile> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::config_not_found(path.as_str())
            } else {
                Error::Io(e)
            }
        })?;

        debug!("Loading configuration from {}", path);
        if content.trim().is_empty() {
            return Ok(ConfigFile::default());
        }
        Ok(serde_yaml_ng::from_str(&content)?)
    }

    fn apply_file(&self, config: &mut TmcaConfig, file: ConfigFile) {
        if let Some(v) = file.klipper_dir {
            config.klipper_dir = self.expand(&v);
        }
        if let Some(v) = file.install_dir {
            config.install_dir = self.expand(&v);
        }
        if let Some(v) = file.repo_url {
            config.repo_url = v;
        }
        if let Some(v) = file.backup_dir {
            config.backup_dir = self.expand(&v);
        }
        if let Some(v) = file.systemd_dir {
            config.systemd_dir = self.expand(&v);
        }
    }

    fn apply_env_overrides(&self, config: &mut TmcaConfig) {
        if let Ok(val) = env::var("TMCA_KLIPPER_DIR") {
            config.klipper_dir = self.expand(&val);
        }

        if let Ok(val) = env::var("TMCA_INSTALL_DIR") {
            config.install_dir = self.expand(&val);
        }

        if let Ok(val) = env::var("TMCA_REPO_URL") {
            config.repo_url = val;
        }

        if let Ok(val) = env::var("TMCA_BACKUP_DIR") {
            config.backup_dir = self.expand(&val);
        }

        if let Ok(val) = env::var("TMCA_SYSTEMD_DIR") {
            config.systemd_dir = self.expand(&val);
        }
    }

    /// Expand a leading `~/` against the loader's home directory
    fn expand(&self, value: &str) -> Utf8PathBuf {
        match value.strip_prefix("~/") {
            Some(rest) => self.home.join(rest),
            None if value == "~" => self.home.clone(),
            None => Utf8PathBuf::from(value),
        }
    }

    fn validate(config: &TmcaConfig) -> Result<()> {
        if config.repo_url.trim().is_empty() {
            return Err(Error::invalid_config("repo-url must not be empty"));
        }

        let paths = [
            ("klipper-dir", &config.klipper_dir),
            ("install-dir", &config.install_dir),
            ("backup-dir", &config.backup_dir),
            ("systemd-dir", &config.systemd_dir),
        ];
        for (key, path) in paths {
            if !path.is_absolute() {
                return Err(Error::invalid_config(format!(
                    "{} must be an absolute path, got '{}'",
                    key, path
                )));
            }
        }

        if config.install_dir == config.klipper_dir {
            return Err(Error::invalid_config(
                "install-dir must differ from klipper-dir",
            ));
        }

        Ok(())
    }
}
