//! Type definitions for the managed extension and the services it touches

use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;

use crate::config::TmcaConfig;

/// Human readable name used in every user-facing message
pub const DISPLAY_NAME: &str = "Klipper TMC Autotune";

/// Files the plugin links into Klipper's extras directory
pub const ARTIFACTS: [&str; 3] = ["autotune_tmc.py", "motor_constants.py", "motor_database.cfg"];

/// Name of the example config deployed into each printer's config directory
pub const EXAMPLE_CONFIG_NAME: &str = "autotune_tmc.cfg";

/// Example config shipped inside the plugin checkout, relative to the install dir
pub const EXAMPLE_CONFIG_TEMPLATE: &str = "docs/example.cfg";

/// Section added to each printer.cfg so Klipper loads the example config
pub const INCLUDE_SECTION: &str = "include autotune_tmc.cfg";

/// Section registered in each moonraker.conf
pub const UPDATER_SECTION: &str = "update_manager klipper_tmc_autotune";

/// Kinds of systemd-managed services the installer coordinates with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    /// The firmware host process
    Klipper,
    /// The API server hosting the update manager
    Moonraker,
}

impl ServiceKind {
    /// Unit name prefix, e.g. `klipper` for `klipper-voron.service`
    pub fn unit_prefix(&self) -> &'static str {
        match self {
            ServiceKind::Klipper => "klipper",
            ServiceKind::Moonraker => "moonraker",
        }
    }

    /// Primary config file inside the instance's config directory
    pub fn cfg_file_name(&self) -> &'static str {
        match self {
            ServiceKind::Klipper => "printer.cfg",
            ServiceKind::Moonraker => "moonraker.conf",
        }
    }

    /// Display name used in messages
    pub fn display_name(&self) -> &'static str {
        match self {
            ServiceKind::Klipper => "Klipper",
            ServiceKind::Moonraker => "Moonraker",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One installed copy of a managed service
///
/// Multi-printer hosts run several instances side by side, distinguished by
/// the unit suffix (`klipper-<suffix>.service`) and a matching data dir.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInstance {
    pub kind: ServiceKind,
    pub suffix: Option<String>,
    pub data_dir: Utf8PathBuf,
}

impl ServiceInstance {
    /// Create an instance using the standard data dir layout under `home`
    ///
    /// `~/printer_data` for the unsuffixed unit, `~/<suffix>_data` otherwise.
    pub fn new(kind: ServiceKind, suffix: Option<String>, home: &Utf8Path) -> Self {
        let data_dir = match &suffix {
            Some(s) => home.join(format!("{}_data", s)),
            None => home.join("printer_data"),
        };
        Self {
            kind,
            suffix,
            data_dir,
        }
    }

    /// Create an instance with an explicit data dir
    pub fn with_data_dir(
        kind: ServiceKind,
        suffix: Option<String>,
        data_dir: impl Into<Utf8PathBuf>,
    ) -> Self {
        Self {
            kind,
            suffix,
            data_dir: data_dir.into(),
        }
    }

    /// systemd unit name, e.g. `klipper-voron.service`
    pub fn unit_name(&self) -> String {
        match &self.suffix {
            Some(s) => format!("{}-{}.service", self.kind.unit_prefix(), s),
            None => format!("{}.service", self.kind.unit_prefix()),
        }
    }

    pub fn cfg_dir(&self) -> Utf8PathBuf {
        self.data_dir.join("config")
    }

    pub fn cfg_file(&self) -> Utf8PathBuf {
        self.cfg_dir().join(self.kind.cfg_file_name())
    }
}

impl fmt::Display for ServiceInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.suffix {
            Some(s) => write!(f, "{} ({})", self.kind, s),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// Installation state derived from the filesystem, never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallationState {
    /// Install dir and every link missing
    Absent,
    /// Install dir and every link present
    Installed,
    /// Some, but not all, of the above present
    Partial,
}

impl InstallationState {
    /// Classify from the install dir flag and one flag per artifact link
    pub fn from_presence(dir_exists: bool, links: &[bool]) -> Self {
        let all_links = links.iter().all(|l| *l);
        let any_link = links.iter().any(|l| *l);

        match (dir_exists, all_links, any_link) {
            (true, true, _) => InstallationState::Installed,
            (false, _, false) => InstallationState::Absent,
            _ => InstallationState::Partial,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, InstallationState::Absent)
    }
}

impl fmt::Display for InstallationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InstallationState::Absent => "absent",
            InstallationState::Installed => "installed",
            InstallationState::Partial => "partial",
        };
        f.write_str(s)
    }
}

/// The plugin being managed: where it comes from and where it lands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedExtension {
    pub name: String,
    pub repo_url: String,
    pub install_dir: Utf8PathBuf,
    pub klipper_dir: Utf8PathBuf,
    pub extras_dir: Utf8PathBuf,
}

impl ManagedExtension {
    pub fn from_config(config: &TmcaConfig) -> Self {
        Self {
            name: DISPLAY_NAME.to_string(),
            repo_url: config.repo_url.clone(),
            install_dir: config.install_dir.clone(),
            klipper_dir: config.klipper_dir.clone(),
            extras_dir: config.klipper_extras_dir(),
        }
    }

    pub fn artifacts(&self) -> &'static [&'static str] {
        &ARTIFACTS
    }

    /// (target inside the checkout, link inside Klipper's extras dir)
    pub fn link_pairs(&self) -> Vec<(Utf8PathBuf, Utf8PathBuf)> {
        ARTIFACTS
            .iter()
            .map(|a| (self.install_dir.join(a), self.extras_dir.join(a)))
            .collect()
    }

    pub fn example_config_template(&self) -> Utf8PathBuf {
        self.install_dir.join(EXAMPLE_CONFIG_TEMPLATE)
    }

    /// Origin URL as Moonraker expects it, always ending in `.git`
    pub fn origin_url(&self) -> String {
        let url = self.repo_url.trim_end_matches('/');
        if url.ends_with(".git") {
            url.to_string()
        } else {
            format!("{}.git", url)
        }
    }

    /// Options of the update manager section, in file order
    pub fn updater_options(&self) -> Vec<(String, String)> {
        vec![
            ("type".to_string(), "git_repo".to_string()),
            ("channel".to_string(), "dev".to_string()),
            ("path".to_string(), self.install_dir.to_string()),
            ("origin".to_string(), self.origin_url()),
            ("managed_services".to_string(), "klipper".to_string()),
            ("primary_branch".to_string(), "main".to_string()),
        ]
    }
}
