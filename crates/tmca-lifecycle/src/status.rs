//! Read-only inspection of the current installation

use camino::Utf8PathBuf;
use tmca_core::types::{INCLUDE_SECTION, UPDATER_SECTION};
use tmca_core::{InstallationState, Result, ServiceInstance, ServiceKind};

use crate::controller::ExtensionLifecycle;

/// State of one artifact link in Klipper's extras dir
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkStatus {
    pub link: Utf8PathBuf,
    pub target: Utf8PathBuf,
    pub present: bool,
}

/// A discovered instance and whether its primary config carries our section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceStatus {
    pub instance: ServiceInstance,
    pub section: &'static str,
    pub section_present: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub state: InstallationState,
    pub install_dir: Utf8PathBuf,
    pub links: Vec<LinkStatus>,
    pub klipper: Vec<InstanceStatus>,
    pub moonraker: Vec<InstanceStatus>,
}

impl ExtensionLifecycle {
    /// Collect a [`StatusReport`]; never prompts and never mutates
    pub fn status(&self) -> Result<StatusReport> {
        let links = self
            .extension
            .link_pairs()
            .into_iter()
            .map(|(target, link)| LinkStatus {
                present: self.host.fs.exists(&link),
                link,
                target,
            })
            .collect();

        Ok(StatusReport {
            state: self.installation_state(),
            install_dir: self.extension.install_dir.clone(),
            links,
            klipper: self.instance_status(ServiceKind::Klipper, INCLUDE_SECTION)?,
            moonraker: self.instance_status(ServiceKind::Moonraker, UPDATER_SECTION)?,
        })
    }

    fn instance_status(
        &self,
        kind: ServiceKind,
        section: &'static str,
    ) -> Result<Vec<InstanceStatus>> {
        self.host
            .services
            .discover(kind)?
            .into_iter()
            .map(|instance| {
                let section_present = self.host.editor.has_section(section, &instance)?;
                Ok(InstanceStatus {
                    instance,
                    section,
                    section_present,
                })
            })
            .collect()
    }
}
