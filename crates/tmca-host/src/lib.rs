//! Host collaborators for the TMC Autotune installer
//!
//! The lifecycle controller drives six collaborators, each behind a trait:
//!
//! ```text
//! ServiceRegistry  -> SystemdRegistry       (systemctl over discovered units)
//! Filesystem       -> LocalFilesystem       (std::fs)
//! SourceFetcher    -> GitFetcher            (git clone / git pull)
//! ConfigEditor     -> SectionConfigEditor   ([section] add / remove)
//! BackupService    -> TimestampedBackup     (~/kiauh-backups)
//! Interaction      -> provided by the binary (terminal prompts)
//! ```
//!
//! [`Host`] bundles one of each so the controller can be built from either
//! the real implementations or test doubles.

pub mod backup;
pub mod config_editor;
pub mod fs;
pub mod git;
mod process;
pub mod systemd;
pub mod traits;

pub use backup::TimestampedBackup;
pub use config_editor::{ConfigDocument, SectionConfigEditor};
pub use fs::LocalFilesystem;
pub use git::GitFetcher;
pub use systemd::SystemdRegistry;
pub use traits::{
    BackupService, ConfigEditor, DialogKind, EditStatus, Filesystem, Interaction, MessageLevel,
    SectionEdit, ServiceRegistry, SourceFetcher,
};

use tmca_core::TmcaConfig;

/// One implementation of every collaborator
pub struct Host {
    pub services: Box<dyn ServiceRegistry>,
    pub fs: Box<dyn Filesystem>,
    pub fetcher: Box<dyn SourceFetcher>,
    pub editor: Box<dyn ConfigEditor>,
    pub backup: Box<dyn BackupService>,
    pub ui: Box<dyn Interaction>,
}

impl Host {
    /// Real host implementations configured from `config`
    pub fn system(config: &TmcaConfig, ui: Box<dyn Interaction>) -> Self {
        Self {
            services: Box::new(SystemdRegistry::new(
                config.systemd_dir.clone(),
                config.home_dir.clone(),
            )),
            fs: Box::new(LocalFilesystem::new()),
            fetcher: Box::new(GitFetcher::new()),
            editor: Box::new(SectionConfigEditor::new()),
            backup: Box::new(TimestampedBackup::new(config.backup_dir.clone())),
            ui,
        }
    }
}
