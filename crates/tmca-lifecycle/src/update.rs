use tmca_core::{Result, ServiceKind};
use tmca_host::MessageLevel;

use crate::controller::{ExtensionLifecycle, Flow};
use crate::journal::{Step, StepJournal};
use crate::outcome::{AbortReason, Operation, Outcome, SkipReason};

/// Backup dir name for the plugin checkout
const BACKUP_NAME: &str = "klipper_tmc_autotune";

impl ExtensionLifecycle {
    /// Pull the latest plugin source; links and config sections stay untouched
    pub fn update(&self) -> Result<Outcome> {
        if !self.require_installed() {
            return Ok(Outcome::Skipped(SkipReason::NotInstalled));
        }

        let backup = self.host.ui.confirm(
            &format!("Backup {} directory before update?", self.extension.name),
            true,
            false,
        )?;

        let klipper = self.host.services.discover(ServiceKind::Klipper)?;
        if !self.interlock(&klipper, Operation::Update)? {
            return Ok(Outcome::Aborted(
                AbortReason::StopDeclined,
                StepJournal::new(),
            ));
        }

        let mut journal = StepJournal::new();
        let result = self.update_steps(backup, &mut journal);
        self.finish(Operation::Update, &klipper, result, journal)
    }

    fn update_steps(&self, backup: bool, journal: &mut StepJournal) -> Result<Flow> {
        let ext = &self.extension;

        if backup {
            let path = self
                .host
                .backup
                .backup_directory(&ext.install_dir, BACKUP_NAME)?;
            journal.record(Step::BackupCreated { path });
        }

        self.host
            .ui
            .with_progress(&format!("Updating {}...", ext.name), &mut || {
                self.host.fetcher.pull(&ext.install_dir)
            })?;
        journal.record(Step::SourcePulled {
            path: ext.install_dir.clone(),
        });

        Ok(Flow::Done)
    }

    /// Update and remove both need the checkout; emits the skip message if absent
    pub(crate) fn require_installed(&self) -> bool {
        if self.is_installed() {
            return true;
        }
        self.say(
            MessageLevel::Info,
            "Extension does not seem to be installed! Skipping ...",
        );
        false
    }
}
