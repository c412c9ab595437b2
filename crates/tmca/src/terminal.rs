//! Terminal implementations of the `Interaction` collaborator

use console::Style;
use dialoguer::{Confirm, Select};
use tmca_core::{Error, Result};
use tmca_host::{DialogKind, Interaction, MessageLevel};

use crate::output;

fn show_dialog(kind: DialogKind, lines: &[String]) {
    let (title, color) = match kind {
        DialogKind::Attention => ("ATTENTION", Style::new().yellow().bold()),
        DialogKind::Info => ("INFO", Style::new().cyan()),
        DialogKind::Warning => ("WARNING", Style::new().red().bold()),
    };
    println!();
    output::boxed(title, color, lines);
}

fn show_message(level: MessageLevel, message: &str) {
    match level {
        MessageLevel::Status => output::status(message),
        MessageLevel::Info => output::info(message),
        MessageLevel::Warning => output::warning(message),
        MessageLevel::Error => output::error(message),
        MessageLevel::Success => output::success(message),
    }
}

// git runs with captured output, so nothing else writes while this spins
fn show_progress(message: &str, task: &mut dyn FnMut() -> Result<()>) -> Result<()> {
    let spinner = output::spinner(message);
    let result = task();
    spinner.finish_and_clear();
    output::status(message);
    result
}

/// Interactive prompts on the controlling terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalInteraction;

impl TerminalInteraction {
    pub fn new() -> Self {
        Self
    }
}

impl Interaction for TerminalInteraction {
    fn confirm(&self, question: &str, default: bool, allow_back: bool) -> Result<bool> {
        if !allow_back {
            return Confirm::new()
                .with_prompt(question)
                .default(default)
                .interact()
                .map_err(|e| Error::prompt(e.to_string()));
        }

        // Back leaves the operation, same as answering no
        let choice = Select::new()
            .with_prompt(question)
            .items(&["Yes", "No", "Back"])
            .default(if default { 0 } else { 1 })
            .interact()
            .map_err(|e| Error::prompt(e.to_string()))?;
        Ok(choice == 0)
    }

    fn dialog(&self, kind: DialogKind, lines: &[String]) {
        show_dialog(kind, lines);
    }

    fn notify(&self, level: MessageLevel, message: &str) {
        show_message(level, message);
    }

    fn with_progress(&self, message: &str, task: &mut dyn FnMut() -> Result<()>) -> Result<()> {
        show_progress(message, task)
    }
}

/// Non-interactive mode for `--yes`: every question is answered "yes"
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl AssumeYes {
    pub fn new() -> Self {
        Self
    }
}

impl Interaction for AssumeYes {
    fn confirm(&self, question: &str, _default: bool, _allow_back: bool) -> Result<bool> {
        output::info(&format!("{} yes", question));
        tracing::debug!("Auto-confirmed: {}", question);
        Ok(true)
    }

    fn dialog(&self, kind: DialogKind, lines: &[String]) {
        show_dialog(kind, lines);
    }

    fn notify(&self, level: MessageLevel, message: &str) {
        show_message(level, message);
    }

    fn with_progress(&self, message: &str, task: &mut dyn FnMut() -> Result<()>) -> Result<()> {
        show_progress(message, task)
    }
}
