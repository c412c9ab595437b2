//! CLI command implementations

pub mod install;
pub mod remove;
pub mod status;
pub mod update;

use anyhow::{anyhow, Result};
use tmca_lifecycle::{ExtensionLifecycle, Outcome};

/// Header for update and remove, left out when there is nothing installed
pub(crate) fn banner(lifecycle: &ExtensionLifecycle, verb: &str) -> Option<String> {
    lifecycle
        .is_installed()
        .then(|| format!("{} {}", verb, lifecycle.extension().name))
}

/// Map an operation outcome to the process result
///
/// The controller has already told the user what happened; only a fault in
/// the mutation phase turns into a non-zero exit.
pub(crate) fn conclude(outcome: Outcome) -> Result<()> {
    match outcome {
        Outcome::Completed(journal) => {
            tracing::info!("Completed {} step(s)", journal.len());
            Ok(())
        }
        Outcome::Aborted(reason, journal) => {
            tracing::info!("Aborted: {:?} after {} step(s)", reason, journal.len());
            Ok(())
        }
        Outcome::Skipped(reason) => {
            tracing::info!("Skipped: {:?}", reason);
            Ok(())
        }
        Outcome::Failed(failure) => Err(anyhow!("{}", failure)),
    }
}
