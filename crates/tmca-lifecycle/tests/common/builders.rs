//! Builders for in-memory hosts in a known state

#![allow(dead_code)]

use camino::{Utf8Path, Utf8PathBuf};
use tmca_core::types::{ARTIFACTS, EXAMPLE_CONFIG_TEMPLATE};
use tmca_core::{ManagedExtension, ServiceInstance, ServiceKind, TmcaConfig};
use tmca_lifecycle::ExtensionLifecycle;

use super::mocks::MockHost;

pub const HOME: &str = "/home/pi";

pub const PRINTER_CFG: &str = "\
[mcu]
serial: /dev/serial/by-id/usb-Klipper

[printer]
kinematics: corexy
";

pub const MOONRAKER_CONF: &str = "\
[server]
host: 0.0.0.0

[update_manager]
";

pub const EXAMPLE_CFG: &str = "\
[autotune_tmc stepper_x]
motor: ldo-42sth48-2004mah
";

pub fn config() -> TmcaConfig {
    TmcaConfig::with_home(Utf8Path::new(HOME))
}

pub fn extension() -> ManagedExtension {
    ManagedExtension::from_config(&config())
}

pub fn instance(kind: ServiceKind, suffix: Option<&str>) -> ServiceInstance {
    ServiceInstance::new(kind, suffix.map(str::to_string), Utf8Path::new(HOME))
}

pub fn lifecycle(mock: &MockHost) -> ExtensionLifecycle {
    ExtensionLifecycle::new(&config(), mock.host())
}

/// Fluent setup of a [`MockHost`]
pub struct HostBuilder {
    klipper_dir: bool,
    installed: bool,
    missing_artifact: Option<usize>,
    klipper: Vec<Option<String>>,
    moonraker: Vec<Option<String>>,
    printer_cfg: Option<String>,
    existing_example: bool,
}

impl Default for HostBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HostBuilder {
    /// Klipper present, plugin absent, one Klipper and one Moonraker instance
    pub fn new() -> Self {
        Self {
            klipper_dir: true,
            installed: false,
            missing_artifact: None,
            klipper: vec![None],
            moonraker: vec![None],
            printer_cfg: Some(PRINTER_CFG.to_string()),
            existing_example: false,
        }
    }

    pub fn without_klipper(mut self) -> Self {
        self.klipper_dir = false;
        self
    }

    pub fn installed(mut self) -> Self {
        self.installed = true;
        self
    }

    /// Installed, except the link of artifact `index` is missing
    pub fn missing_link(mut self, index: usize) -> Self {
        self.installed = true;
        self.missing_artifact = Some(index);
        self
    }

    pub fn klipper_instances(mut self, suffixes: &[Option<&str>]) -> Self {
        self.klipper = suffixes.iter().map(|s| s.map(str::to_string)).collect();
        self
    }

    pub fn moonraker_instances(mut self, suffixes: &[Option<&str>]) -> Self {
        self.moonraker = suffixes.iter().map(|s| s.map(str::to_string)).collect();
        self
    }

    pub fn without_moonraker(self) -> Self {
        self.moonraker_instances(&[])
    }

    pub fn printer_cfg(mut self, content: &str) -> Self {
        self.printer_cfg = Some(content.to_string());
        self
    }

    pub fn without_printer_cfg(mut self) -> Self {
        self.printer_cfg = None;
        self
    }

    pub fn existing_example_config(mut self) -> Self {
        self.existing_example = true;
        self
    }

    pub fn build(self) -> MockHost {
        let mock = MockHost::new();
        let ext = extension();
        let home = Utf8PathBuf::from(HOME);

        for artifact in ARTIFACTS {
            mock.add_repo_file(artifact, "# plugin source\n");
        }
        mock.add_repo_file(EXAMPLE_CONFIG_TEMPLATE, EXAMPLE_CFG);

        if self.klipper_dir {
            mock.add_dir(ext.klipper_dir.clone());
            mock.add_dir(ext.extras_dir.clone());
        }

        if self.installed {
            mock.add_dir(ext.install_dir.clone());
            for artifact in ARTIFACTS {
                mock.add_file(ext.install_dir.join(artifact), "# plugin source\n");
            }
            mock.add_file(ext.example_config_template(), EXAMPLE_CFG);
            for (i, (target, link)) in ext.link_pairs().into_iter().enumerate() {
                if self.missing_artifact != Some(i) {
                    mock.add_link(link, target);
                }
            }
        }

        for suffix in self.klipper {
            let instance = ServiceInstance::new(ServiceKind::Klipper, suffix, &home);
            mock.add_dir(instance.cfg_dir());
            if let Some(content) = &self.printer_cfg {
                mock.add_file(instance.cfg_file(), content);
            }
            if self.existing_example {
                mock.add_file(instance.cfg_dir().join("autotune_tmc.cfg"), "# mine\n");
            }
            mock.add_instance(instance);
        }

        for suffix in self.moonraker {
            let instance = ServiceInstance::new(ServiceKind::Moonraker, suffix, &home);
            mock.add_dir(instance.cfg_dir());
            mock.add_file(instance.cfg_file(), MOONRAKER_CONF);
            mock.add_instance(instance);
        }

        mock
    }
}
