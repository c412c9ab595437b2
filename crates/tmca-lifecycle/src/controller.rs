//! Extension lifecycle controller and the stop-instances interlock

use tmca_core::{InstallationState, ManagedExtension, Result, ServiceInstance, TmcaConfig};
use tmca_host::{DialogKind, EditStatus, Host, MessageLevel, SectionEdit};
use tracing::{debug, warn};

use crate::journal::{Step, StepJournal};
use crate::outcome::{AbortReason, Failure, Operation, Outcome};

/// How the mutation phase of an operation ended, if it did not fault
pub(crate) enum Flow {
    Done,
    Abort(AbortReason),
}

/// Drives install, update and remove of the managed extension
///
/// All host access goes through the collaborators in [`Host`]; the
/// controller never stops services itself except through [`Self::interlock`].
pub struct ExtensionLifecycle {
    pub(crate) extension: ManagedExtension,
    pub(crate) host: Host,
}

impl ExtensionLifecycle {
    pub fn new(config: &TmcaConfig, host: Host) -> Self {
        Self {
            extension: ManagedExtension::from_config(config),
            host,
        }
    }

    pub fn extension(&self) -> &ManagedExtension {
        &self.extension
    }

    /// Whether update and remove have anything to work on
    pub fn is_installed(&self) -> bool {
        self.host.fs.exists(&self.extension.install_dir)
    }

    /// Derive the installation state from the install dir and artifact links
    pub fn installation_state(&self) -> InstallationState {
        let dir_exists = self.host.fs.exists(&self.extension.install_dir);
        let links: Vec<bool> = self
            .extension
            .link_pairs()
            .iter()
            .map(|(_, link)| self.host.fs.exists(link))
            .collect();

        InstallationState::from_presence(dir_exists, &links)
    }

    /// Ask before stopping `instances`; stops them on acceptance
    ///
    /// Returns `true` when the caller may proceed, which is immediately the
    /// case when there is nothing running to protect.
    pub fn interlock(&self, instances: &[ServiceInstance], operation: Operation) -> Result<bool> {
        if instances.is_empty() {
            return Ok(true);
        }

        self.host.ui.dialog(
            DialogKind::Attention,
            &[
                "Do NOT continue if there are ongoing prints running!".to_string(),
                format!(
                    "All Klipper instances will be restarted during the {} process and \
                     ongoing prints WILL FAIL.",
                    operation.noun()
                ),
            ],
        );

        let question = format!("Stop Klipper now and proceed with {}?", operation.noun());
        if !self.host.ui.confirm(&question, false, true)? {
            self.say(
                MessageLevel::Warning,
                &format!("{} aborted due to user request.", operation.title()),
            );
            return Ok(false);
        }

        self.host.services.stop_all(instances)?;
        debug!("Stopped {} instance(s)", instances.len());
        Ok(true)
    }

    pub(crate) fn say(&self, level: MessageLevel, message: &str) {
        self.host.ui.notify(level, message);
    }

    /// Close out an operation whose services were stopped by the interlock
    ///
    /// Every path through here restarts `stopped` exactly once.
    pub(crate) fn finish(
        &self,
        operation: Operation,
        stopped: &[ServiceInstance],
        result: Result<Flow>,
        journal: StepJournal,
    ) -> Result<Outcome> {
        match result {
            Ok(Flow::Done) => {
                self.resume(stopped)?;
                self.say(
                    MessageLevel::Success,
                    &format!("{} {} successfully!", self.extension.name, operation.past()),
                );
                Ok(Outcome::Completed(journal))
            }
            Ok(Flow::Abort(reason)) => {
                self.say(
                    MessageLevel::Warning,
                    &format!("{} aborted due to user request.", operation.title()),
                );
                self.report_journal(
                    "These steps completed before the abort and were kept:",
                    &journal,
                );
                self.resume(stopped)?;
                Ok(Outcome::Aborted(reason, journal))
            }
            Err(cause) => {
                self.say(
                    MessageLevel::Error,
                    &format!(
                        "Error during {} {}: {}",
                        self.extension.name,
                        operation.noun(),
                        cause
                    ),
                );
                self.report_journal(
                    "These steps completed before the error and were not reverted:",
                    &journal,
                );

                let restart_error = self.resume(stopped).err();
                if let Some(e) = &restart_error {
                    warn!("Restarting services failed: {}", e);
                    self.say(
                        MessageLevel::Error,
                        &format!("Failed to restart Klipper: {}", e),
                    );
                }

                Ok(Outcome::Failed(Failure {
                    operation,
                    cause,
                    restart_error,
                    journal,
                }))
            }
        }
    }

    fn report_journal(&self, heading: &str, journal: &StepJournal) {
        if journal.is_empty() {
            return;
        }
        self.say(MessageLevel::Info, heading);
        for step in journal.steps() {
            self.say(MessageLevel::Info, &format!("  - {}", step));
        }
    }

    /// Start previously stopped instances again
    fn resume(&self, stopped: &[ServiceInstance]) -> Result<()> {
        if stopped.is_empty() {
            return Ok(());
        }
        self.say(MessageLevel::Info, "Restarting Klipper...");
        self.host.services.start_all(stopped)
    }

    /// Back up each instance's primary config file before it is edited
    pub(crate) fn backup_configs(
        &self,
        instances: &[ServiceInstance],
        journal: &mut StepJournal,
    ) -> Result<()> {
        for instance in instances {
            let cfg = instance.cfg_file();
            if !self.host.fs.exists(&cfg) {
                continue;
            }

            let data_dir_name = instance.data_dir.file_name().unwrap_or("printer_data");
            let dest_dir = format!("{}/config", data_dir_name);
            let path = self
                .host
                .backup
                .backup_file(&cfg, &dest_dir, instance.kind.cfg_file_name())?;
            journal.record(Step::BackupCreated { path });
        }
        Ok(())
    }

    /// Report per-file results of a section edit and journal the changes
    pub(crate) fn record_edits(
        &self,
        section: &str,
        edits: Vec<SectionEdit>,
        added: bool,
        journal: &mut StepJournal,
    ) {
        for edit in edits {
            match edit.status {
                EditStatus::Changed if added => {
                    self.say(
                        MessageLevel::Info,
                        &format!("Added section [{}] to {}", section, edit.path),
                    );
                    journal.record(Step::SectionAdded {
                        section: section.to_string(),
                        path: edit.path,
                    });
                }
                EditStatus::Changed => {
                    self.say(
                        MessageLevel::Info,
                        &format!("Removed section [{}] from {}", section, edit.path),
                    );
                    journal.record(Step::SectionRemoved {
                        section: section.to_string(),
                        path: edit.path,
                    });
                }
                EditStatus::Unchanged if added => {
                    self.say(
                        MessageLevel::Info,
                        &format!("Section [{}] already present in {}", section, edit.path),
                    );
                }
                EditStatus::Unchanged => {
                    debug!("Section [{}] not present in {}", section, edit.path);
                }
                EditStatus::MissingFile => {
                    self.say(
                        MessageLevel::Warning,
                        &format!("{} not found, skipping [{}]", edit.path, section),
                    );
                }
            }
        }
    }
}
