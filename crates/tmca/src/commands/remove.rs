//! Remove command

use anyhow::{Context, Result};
use tmca_lifecycle::ExtensionLifecycle;

use crate::output;

pub fn run(lifecycle: &ExtensionLifecycle) -> Result<()> {
    if let Some(title) = super::banner(lifecycle, "Removing") {
        output::header(&title);
    }

    let outcome = lifecycle.remove().context("Removal failed")?;
    super::conclude(outcome)
}
