//! Lifecycle orchestration for the Klipper TMC Autotune plugin
//!
//! This crate handles:
//! - Install, update and remove of the plugin checkout and its links
//! - The stop-instances interlock shared by all three operations
//! - Config section registration (printer.cfg include, Moonraker updater)
//! - Read-only status reporting

mod controller;
mod install;
pub mod journal;
pub mod outcome;
mod remove;
pub mod status;
mod update;

pub use controller::ExtensionLifecycle;
pub use journal::{Step, StepJournal};
pub use outcome::{AbortReason, Failure, Operation, Outcome, SkipReason};
pub use status::{InstanceStatus, LinkStatus, StatusReport};
