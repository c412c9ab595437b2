//! # tmca-core
//!
//! Core library for the TMC Autotune installer providing:
//! - Process-wide path configuration (`TmcaConfig`) with file and env overrides
//! - Type definitions for the managed extension and service instances
//! - The shared error type used by every library crate

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use config::{ConfigLoader, TmcaConfig};
pub use error::{Error, Result};
pub use types::{InstallationState, ManagedExtension, ServiceInstance, ServiceKind};
pub use utils::get_home_dir;
