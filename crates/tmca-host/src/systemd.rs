//! systemd-backed service registry
//!
//! Instances are discovered by scanning the unit directory for
//! `<prefix>.service` and `<prefix>-<suffix>.service` files.

use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use std::fs;
use std::process::Command;
use tmca_core::{Error, Result, ServiceInstance, ServiceKind};
use tracing::{debug, info};

use crate::process;
use crate::traits::ServiceRegistry;

/// Suffixes that belong to unrelated services sharing the prefix
/// (`klipper-mcu.service` is the host MCU daemon, not a printer)
pub const SUFFIX_BLACKLIST: &[&str] = &["None", "mcu", "obico", "bambu", "companion"];

/// Service registry driving `systemctl`
pub struct SystemdRegistry {
    unit_dir: Utf8PathBuf,
    home: Utf8PathBuf,
    use_sudo: bool,
}

impl SystemdRegistry {
    pub fn new(unit_dir: impl Into<Utf8PathBuf>, home: impl Into<Utf8PathBuf>) -> Self {
        let use_sudo = std::env::var("USER").map(|u| u != "root").unwrap_or(true);
        Self {
            unit_dir: unit_dir.into(),
            home: home.into(),
            use_sudo,
        }
    }

    /// Run `systemctl` directly instead of through `sudo`
    pub fn without_sudo(mut self) -> Self {
        self.use_sudo = false;
        self
    }

    fn unit_pattern(kind: ServiceKind) -> Result<Regex> {
        let pattern = format!(r"^{}(?:-([\w.-]+))?\.service$", kind.unit_prefix());
        Regex::new(&pattern).map_err(|e| Error::invalid_config(e.to_string()))
    }

    /// Parse a unit file name into the instance suffix
    ///
    /// Returns `None` for names that do not belong to `kind`,
    /// `Some(None)` for the unsuffixed unit.
    fn parse_unit(pattern: &Regex, file_name: &str) -> Option<Option<String>> {
        let caps = pattern.captures(file_name)?;
        match caps.get(1) {
            Some(m) if SUFFIX_BLACKLIST.contains(&m.as_str()) => None,
            Some(m) => Some(Some(m.as_str().to_string())),
            None => Some(None),
        }
    }

    /// One `systemctl <verb>` over the whole set
    fn systemctl(&self, verb: &str, instances: &[ServiceInstance]) -> Result<()> {
        if instances.is_empty() {
            return Ok(());
        }
        let units: Vec<String> = instances.iter().map(|i| i.unit_name()).collect();
        info!("systemctl {} {}", verb, units.join(" "));

        let mut cmd = if self.use_sudo {
            process::require("sudo")?;
            let mut c = Command::new("sudo");
            c.arg("systemctl");
            c
        } else {
            process::require("systemctl")?;
            Command::new("systemctl")
        };
        cmd.arg(verb).args(&units);

        process::run(&mut cmd)?;
        Ok(())
    }

    pub fn unit_dir(&self) -> &Utf8Path {
        &self.unit_dir
    }
}

impl ServiceRegistry for SystemdRegistry {
    fn discover(&self, kind: ServiceKind) -> Result<Vec<ServiceInstance>> {
        if !self.unit_dir.is_dir() {
            debug!("Unit directory {} does not exist", self.unit_dir);
            return Ok(Vec::new());
        }

        let pattern = Self::unit_pattern(kind)?;
        let mut names: Vec<String> = fs::read_dir(&self.unit_dir)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();

        let instances: Vec<ServiceInstance> = names
            .iter()
            .filter_map(|name| Self::parse_unit(&pattern, name))
            .map(|suffix| ServiceInstance::new(kind, suffix, &self.home))
            .collect();

        debug!("Discovered {} {} instance(s)", instances.len(), kind);
        Ok(instances)
    }

    fn stop_all(&self, instances: &[ServiceInstance]) -> Result<()> {
        self.systemctl("stop", instances)
    }

    fn start_all(&self, instances: &[ServiceInstance]) -> Result<()> {
        self.systemctl("start", instances)
    }

    fn restart_all(&self, instances: &[ServiceInstance]) -> Result<()> {
        self.systemctl("restart", instances)
    }
}
