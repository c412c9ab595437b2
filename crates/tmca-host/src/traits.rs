//! Collaborator trait definitions
//!
//! The lifecycle controller only ever talks to the host through these
//! traits, so tests can substitute in-memory doubles and alternate paths.

use camino::{Utf8Path, Utf8PathBuf};
use tmca_core::{Result, ServiceInstance, ServiceKind};

/// Enumerates and controls systemd-managed service instances
pub trait ServiceRegistry: Send + Sync {
    /// Return every installed instance of `kind`; an empty list is valid
    fn discover(&self, kind: ServiceKind) -> Result<Vec<ServiceInstance>>;

    /// Stop all given instances
    fn stop_all(&self, instances: &[ServiceInstance]) -> Result<()>;

    /// Start all given instances
    fn start_all(&self, instances: &[ServiceInstance]) -> Result<()>;

    /// Restart all given instances
    fn restart_all(&self, instances: &[ServiceInstance]) -> Result<()>;
}

/// Filesystem primitives
pub trait Filesystem: Send + Sync {
    /// True if anything (including a dangling symlink) is present at `path`
    fn exists(&self, path: &Utf8Path) -> bool;

    /// Create `link` pointing to `target`, replacing an existing link or file
    fn symlink(&self, target: &Utf8Path, link: &Utf8Path) -> Result<()>;

    /// Remove a file, symlink or directory tree; missing paths are a no-op
    fn remove(&self, path: &Utf8Path) -> Result<()>;

    /// Copy a regular file
    fn copy_file(&self, src: &Utf8Path, dest: &Utf8Path) -> Result<()>;
}

/// Version-control fetch operations
pub trait SourceFetcher: Send + Sync {
    /// Clone `url` into `dest`; `force` permits replacing an existing `dest`
    fn clone_repo(&self, url: &str, dest: &Utf8Path, force: bool) -> Result<()>;

    /// Pull the latest changes into an existing checkout
    fn pull(&self, dest: &Utf8Path) -> Result<()>;
}

/// What happened to one instance's config file during a section edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditStatus {
    /// The file was rewritten
    Changed,
    /// The file already was in the requested state and was left untouched
    Unchanged,
    /// The file does not exist; nothing was done
    MissingFile,
}

/// Result of editing one instance's primary config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionEdit {
    pub path: Utf8PathBuf,
    pub status: EditStatus,
}

/// Adds and removes named sections in each instance's primary config file
pub trait ConfigEditor: Send + Sync {
    /// Add `[section]` with `options` unless a section of that name exists
    fn add_section(
        &self,
        section: &str,
        instances: &[ServiceInstance],
        options: &[(String, String)],
    ) -> Result<Vec<SectionEdit>>;

    /// Remove `[section]` and its options; absent sections are a no-op
    fn remove_section(
        &self,
        section: &str,
        instances: &[ServiceInstance],
    ) -> Result<Vec<SectionEdit>>;

    /// Check whether the instance's primary config contains `[section]`
    fn has_section(&self, section: &str, instance: &ServiceInstance) -> Result<bool>;
}

/// Timestamped snapshots taken before mutation
pub trait BackupService: Send + Sync {
    /// Copy `src` to `<backup root>/<dest_dir>/<dest_name stem>_<timestamp><ext>`
    fn backup_file(&self, src: &Utf8Path, dest_dir: &str, dest_name: &str) -> Result<Utf8PathBuf>;

    /// Copy the tree at `src` to `<backup root>/<name>/<name>_<timestamp>`
    fn backup_directory(&self, src: &Utf8Path, name: &str) -> Result<Utf8PathBuf>;
}

/// Visual weight of a multi-line dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Attention,
    Info,
    Warning,
}

/// Severity of a single status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Status,
    Info,
    Warning,
    Error,
    Success,
}

/// User-facing prompts and messages
pub trait Interaction: Send + Sync {
    /// Blocking yes/no question; a "go back" answer is reported as `false`
    fn confirm(&self, question: &str, default: bool, allow_back: bool) -> Result<bool>;

    /// Show a framed multi-line dialog
    fn dialog(&self, kind: DialogKind, lines: &[String]);

    /// Show a single status line
    fn notify(&self, level: MessageLevel, message: &str);

    /// Run a blocking step while `message` is shown as in progress
    fn with_progress(&self, message: &str, task: &mut dyn FnMut() -> Result<()>) -> Result<()> {
        self.notify(MessageLevel::Status, message);
        task()
    }
}
