use tmca_core::types::{EXAMPLE_CONFIG_NAME, INCLUDE_SECTION, UPDATER_SECTION};
use tmca_core::{Result, ServiceInstance, ServiceKind};
use tmca_host::MessageLevel;
use tracing::{debug, info};

use crate::controller::{ExtensionLifecycle, Flow};
use crate::journal::{Step, StepJournal};
use crate::outcome::{AbortReason, Operation, Outcome, SkipReason};

/// Choices collected before any instance is stopped
#[derive(Debug, Clone, Copy)]
struct InstallChoices {
    add_updater: bool,
    create_example: bool,
}

impl ExtensionLifecycle {
    /// Clone the plugin, link it into Klipper and optionally wire up configs
    pub fn install(&self) -> Result<Outcome> {
        let ext = &self.extension;
        if !self.host.fs.exists(&ext.klipper_dir) || !self.host.fs.exists(&ext.extras_dir) {
            self.say(
                MessageLevel::Warning,
                "No Klipper (or extras) directory found! Aborting.",
            );
            return Ok(Outcome::Skipped(SkipReason::HostNotFound));
        }

        let state = self.installation_state();
        debug!("Installation state: {}", state);
        if !state.is_absent()
            && !self.host.ui.confirm(
                "Extension seems to be installed already. Overwrite?",
                true,
                false,
            )?
        {
            self.say(
                MessageLevel::Warning,
                &format!("{} aborted due to user request.", Operation::Install.title()),
            );
            return Ok(Outcome::Aborted(
                AbortReason::OverwriteDeclined,
                StepJournal::new(),
            ));
        }

        let choices = InstallChoices {
            add_updater: self.host.ui.confirm(
                &format!("Add {} to Moonraker update manager?", ext.name),
                true,
                false,
            )?,
            create_example: self
                .host
                .ui
                .confirm("Create example config?", true, false)?,
        };

        let klipper = self.host.services.discover(ServiceKind::Klipper)?;
        if !self.interlock(&klipper, Operation::Install)? {
            return Ok(Outcome::Aborted(
                AbortReason::StopDeclined,
                StepJournal::new(),
            ));
        }

        let mut journal = StepJournal::new();
        let result = self.install_steps(&klipper, choices, &mut journal);
        self.finish(Operation::Install, &klipper, result, journal)
    }

    fn install_steps(
        &self,
        klipper: &[ServiceInstance],
        choices: InstallChoices,
        journal: &mut StepJournal,
    ) -> Result<Flow> {
        let ext = &self.extension;

        self.host
            .ui
            .with_progress(&format!("Cloning {}...", ext.name), &mut || {
                self.host
                    .fetcher
                    .clone_repo(&ext.repo_url, &ext.install_dir, true)
            })?;
        journal.record(Step::SourceCloned {
            path: ext.install_dir.clone(),
        });

        for (target, link) in ext.link_pairs() {
            self.host.fs.symlink(&target, &link)?;
            journal.record(Step::LinkCreated { path: link });
        }
        info!("Linked {} artifacts into {}", ext.artifacts().len(), ext.extras_dir);

        if choices.create_example {
            self.deploy_example_config(klipper, journal);
            self.backup_configs(klipper, journal)?;
            let edits = self.host.editor.add_section(INCLUDE_SECTION, klipper, &[])?;
            self.record_edits(INCLUDE_SECTION, edits, true, journal);
        }

        if choices.add_updater {
            let moonraker = self.host.services.discover(ServiceKind::Moonraker)?;
            if moonraker.is_empty() {
                self.say(
                    MessageLevel::Warning,
                    &format!(
                        "Moonraker not found! {} updates will NOT be available.",
                        ext.name
                    ),
                );
                if !self.host.ui.confirm("Continue anyway?", false, false)? {
                    return Ok(Flow::Abort(AbortReason::MissingUpdateManagerDeclined));
                }
            } else {
                self.backup_configs(&moonraker, journal)?;
                let edits = self.host.editor.add_section(
                    UPDATER_SECTION,
                    &moonraker,
                    &ext.updater_options(),
                )?;
                self.record_edits(UPDATER_SECTION, edits, true, journal);

                self.say(MessageLevel::Status, "Restarting Moonraker...");
                self.host.services.restart_all(&moonraker)?;
                journal.record(Step::ServicesRestarted {
                    kind: ServiceKind::Moonraker,
                });
            }
        }

        Ok(Flow::Done)
    }

    /// Copy the example config into each config dir that lacks one
    ///
    /// A failed copy is reported and the remaining instances still proceed.
    fn deploy_example_config(&self, instances: &[ServiceInstance], journal: &mut StepJournal) {
        let template = self.extension.example_config_template();

        for instance in instances {
            let dest = instance.cfg_dir().join(EXAMPLE_CONFIG_NAME);
            if self.host.fs.exists(&dest) {
                self.say(
                    MessageLevel::Info,
                    &format!("{} already exists, not overwriting", dest),
                );
                continue;
            }

            match self.host.fs.copy_file(&template, &dest) {
                Ok(()) => {
                    self.say(MessageLevel::Info, &format!("Example config copied to {}", dest));
                    journal.record(Step::ExampleConfigCopied { path: dest });
                }
                Err(e) => self.say(
                    MessageLevel::Error,
                    &format!("Unable to create example config for {}: {}", instance, e),
                ),
            }
        }
    }
}
