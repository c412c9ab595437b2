//! Update command

use anyhow::{Context, Result};
use tmca_lifecycle::ExtensionLifecycle;

use crate::output;

pub fn run(lifecycle: &ExtensionLifecycle) -> Result<()> {
    if let Some(title) = super::banner(lifecycle, "Updating") {
        output::header(&title);
    }

    let outcome = lifecycle.update().context("Update failed")?;
    super::conclude(outcome)
}
