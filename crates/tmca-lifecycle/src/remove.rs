use tmca_core::types::{EXAMPLE_CONFIG_NAME, INCLUDE_SECTION, UPDATER_SECTION};
use tmca_core::{Result, ServiceInstance, ServiceKind};
use tmca_host::{DialogKind, MessageLevel};
use tracing::debug;

use crate::controller::{ExtensionLifecycle, Flow};
use crate::journal::{Step, StepJournal};
use crate::outcome::{AbortReason, Operation, Outcome, SkipReason};

impl ExtensionLifecycle {
    /// Remove the checkout, its links and the config sections install added
    ///
    /// The deployed example config is left in place.
    pub fn remove(&self) -> Result<Outcome> {
        if !self.require_installed() {
            return Ok(Outcome::Skipped(SkipReason::NotInstalled));
        }

        let klipper = self.host.services.discover(ServiceKind::Klipper)?;
        if !self.interlock(&klipper, Operation::Remove)? {
            return Ok(Outcome::Aborted(
                AbortReason::StopDeclined,
                StepJournal::new(),
            ));
        }

        let mut journal = StepJournal::new();
        let result = self.remove_steps(&klipper, &mut journal);
        self.finish(Operation::Remove, &klipper, result, journal)
    }

    fn remove_steps(&self, klipper: &[ServiceInstance], journal: &mut StepJournal) -> Result<Flow> {
        let ext = &self.extension;

        self.say(MessageLevel::Status, &format!("Removing {}...", ext.name));
        self.host.fs.remove(&ext.install_dir)?;
        journal.record(Step::DirectoryRemoved {
            path: ext.install_dir.clone(),
        });

        self.remove_links(journal);

        let moonraker = self.host.services.discover(ServiceKind::Moonraker)?;
        if moonraker.is_empty() {
            debug!("No Moonraker instances, skipping update manager section");
        } else {
            self.backup_configs(&moonraker, journal)?;
            let edits = self.host.editor.remove_section(UPDATER_SECTION, &moonraker)?;
            self.record_edits(UPDATER_SECTION, edits, false, journal);
        }

        self.backup_configs(klipper, journal)?;
        let edits = self.host.editor.remove_section(INCLUDE_SECTION, klipper)?;
        self.record_edits(INCLUDE_SECTION, edits, false, journal);

        self.host.ui.dialog(
            DialogKind::Attention,
            &[
                format!(
                    "{} was removed, but {} was NOT deleted from your config directory.",
                    ext.name, EXAMPLE_CONFIG_NAME
                ),
                "Remove any leftover [autotune_tmc ...] sections from printer.cfg, \
                 otherwise Klipper will fail to start."
                    .to_string(),
            ],
        );

        Ok(Flow::Done)
    }

    /// Remove every known link on its own; one failure does not stop the rest
    fn remove_links(&self, journal: &mut StepJournal) {
        for (_, link) in self.extension.link_pairs() {
            if !self.host.fs.exists(&link) {
                debug!("Link {} already absent", link);
                continue;
            }

            match self.host.fs.remove(&link) {
                Ok(()) => journal.record(Step::LinkRemoved { path: link }),
                Err(e) => self.say(
                    MessageLevel::Error,
                    &format!("Unable to remove {}: {}", link, e),
                ),
            }
        }
    }
}
