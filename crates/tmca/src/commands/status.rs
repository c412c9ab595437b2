//! Status command

use anyhow::{bail, Context, Result};
use tmca_core::InstallationState;
use tmca_lifecycle::{ExtensionLifecycle, InstanceStatus};

use crate::cli::StatusArgs;
use crate::output;

pub fn run(lifecycle: &ExtensionLifecycle, args: StatusArgs) -> Result<()> {
    let report = lifecycle.status().context("Failed to collect status")?;

    output::header(&format!("Status: {}", lifecycle.extension().name));
    output::kv("State", &report.state.to_string());
    output::kv("Install dir", report.install_dir.as_str());

    println!("\nLinks:");
    for link in &report.links {
        let mark = if link.present { "present" } else { "missing" };
        output::kv(link.link.as_str(), mark);
    }

    print_instances("Klipper instances", &report.klipper);
    print_instances("Moonraker instances", &report.moonraker);

    if args.check && report.state != InstallationState::Installed {
        bail!("{} is not fully installed ({})", lifecycle.extension().name, report.state);
    }
    Ok(())
}

fn print_instances(title: &str, instances: &[InstanceStatus]) {
    println!("\n{}:", title);
    if instances.is_empty() {
        output::kv("none", "no systemd units found");
        return;
    }
    for status in instances {
        let section = if status.section_present {
            format!("[{}] present", status.section)
        } else {
            format!("[{}] missing", status.section)
        };
        output::kv(
            &status.instance.unit_name(),
            &format!("{} ({})", status.instance.cfg_file(), section),
        );
    }
}
