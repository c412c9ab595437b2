//! Results of the public lifecycle operations
//!
//! Expected conditions (a missing precondition, a declined prompt) are
//! ordinary [`Outcome`] variants. A fault during the mutation phase is also
//! an outcome, [`Outcome::Failed`], because by the time it is returned the
//! controller has already reported it and restarted the stopped services.

use std::fmt;
use tmca_core::Error;

use crate::journal::StepJournal;

/// The three transactional operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Install,
    Update,
    Remove,
}

impl Operation {
    /// Noun used inside sentences: "installation", "update", "removal"
    pub fn noun(&self) -> &'static str {
        match self {
            Operation::Install => "installation",
            Operation::Update => "update",
            Operation::Remove => "removal",
        }
    }

    /// Noun with the first letter capitalised, for sentence starts
    pub fn title(&self) -> String {
        let noun = self.noun();
        let mut chars = noun.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Past participle for the success message
    pub fn past(&self) -> &'static str {
        match self {
            Operation::Install => "installed",
            Operation::Update => "updated",
            Operation::Remove => "removed",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

/// Why an operation stopped at a user decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The extension is (partially) installed and overwriting was refused
    OverwriteDeclined,
    /// Stopping the running Klipper instances was refused
    StopDeclined,
    /// No Moonraker instance was found and continuing without one was refused
    MissingUpdateManagerDeclined,
}

/// Why an operation did nothing at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Klipper or its extras directory is missing
    HostNotFound,
    /// The extension's install directory is missing
    NotInstalled,
}

/// A mutation-phase fault, reported after the stopped services were restarted
#[derive(Debug)]
pub struct Failure {
    pub operation: Operation,
    pub cause: Error,
    /// Set when restarting the stopped services failed as well
    pub restart_error: Option<Error>,
    /// Steps that completed before the fault; they are not reverted
    pub journal: StepJournal,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.operation.title(), self.cause)?;
        if let Some(e) = &self.restart_error {
            write!(f, " (restarting services also failed: {})", e)?;
        }
        Ok(())
    }
}

/// Result of one public lifecycle operation
#[derive(Debug)]
pub enum Outcome {
    Completed(StepJournal),
    /// Steps already done when the user backed out stay in place
    Aborted(AbortReason, StepJournal),
    Skipped(SkipReason),
    Failed(Failure),
}

impl Outcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }

    /// Journal of completed steps, if any mutation happened
    pub fn journal(&self) -> Option<&StepJournal> {
        match self {
            Outcome::Completed(j) => Some(j),
            Outcome::Aborted(_, j) if !j.is_empty() => Some(j),
            Outcome::Failed(f) => Some(&f.journal),
            _ => None,
        }
    }
}
