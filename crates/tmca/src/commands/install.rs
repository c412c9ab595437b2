//! Install command

use anyhow::{Context, Result};
use tmca_lifecycle::ExtensionLifecycle;

use crate::output;

pub fn run(lifecycle: &ExtensionLifecycle) -> Result<()> {
    output::header(&format!("Installing {}", lifecycle.extension().name));

    let outcome = lifecycle.install().context("Installation failed")?;
    super::conclude(outcome)
}
