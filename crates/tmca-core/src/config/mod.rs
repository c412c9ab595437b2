//! Process-wide path configuration
//!
//! Every filesystem location the installer touches lives in [`TmcaConfig`],
//! built once at startup by [`ConfigLoader`] and handed to the controller.

mod loader;

pub use loader::{ConfigFile, ConfigLoader, CONFIG_FILE_NAME};

use camino::{Utf8Path, Utf8PathBuf};

/// Upstream repository of the plugin
pub const DEFAULT_REPO_URL: &str = "https://github.com/andrewmcgr/klipper_tmc_autotune";

/// Default systemd unit directory scanned for service instances
pub const DEFAULT_SYSTEMD_DIR: &str = "/etc/systemd/system";

/// Resolved installer configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TmcaConfig {
    /// Home directory instance data dirs are resolved against
    pub home_dir: Utf8PathBuf,
    /// Klipper checkout (`~/klipper`)
    pub klipper_dir: Utf8PathBuf,
    /// Plugin checkout (`~/klipper_tmc_autotune`)
    pub install_dir: Utf8PathBuf,
    /// Plugin repository URL
    pub repo_url: String,
    /// Root of timestamped backups (`~/kiauh-backups`)
    pub backup_dir: Utf8PathBuf,
    /// Directory scanned for `klipper*.service` / `moonraker*.service`
    pub systemd_dir: Utf8PathBuf,
}

impl TmcaConfig {
    /// Built-in defaults relative to `home`
    pub fn with_home(home: &Utf8Path) -> Self {
        Self {
            home_dir: home.to_path_buf(),
            klipper_dir: home.join("klipper"),
            install_dir: home.join("klipper_tmc_autotune"),
            repo_url: DEFAULT_REPO_URL.to_string(),
            backup_dir: home.join("kiauh-backups"),
            systemd_dir: Utf8PathBuf::from(DEFAULT_SYSTEMD_DIR),
        }
    }

    /// Klipper's extension module directory
    pub fn klipper_extras_dir(&self) -> Utf8PathBuf {
        self.klipper_dir.join("klippy").join("extras")
    }
}
