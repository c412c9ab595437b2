//! Record of completed mutation steps
//!
//! The lifecycle operations are best effort: a fault leaves earlier steps in
//! place. The journal lists exactly what was done so the failure report can
//! tell the user what to clean up or re-run.

use camino::Utf8PathBuf;
use std::fmt;
use tmca_core::ServiceKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    BackupCreated {
        path: Utf8PathBuf,
    },
    SourceCloned {
        path: Utf8PathBuf,
    },
    SourcePulled {
        path: Utf8PathBuf,
    },
    LinkCreated {
        path: Utf8PathBuf,
    },
    LinkRemoved {
        path: Utf8PathBuf,
    },
    DirectoryRemoved {
        path: Utf8PathBuf,
    },
    ExampleConfigCopied {
        path: Utf8PathBuf,
    },
    SectionAdded {
        section: String,
        path: Utf8PathBuf,
    },
    SectionRemoved {
        section: String,
        path: Utf8PathBuf,
    },
    ServicesRestarted {
        kind: ServiceKind,
    },
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::BackupCreated { path } => write!(f, "backup written to {}", path),
            Step::SourceCloned { path } => write!(f, "source cloned into {}", path),
            Step::SourcePulled { path } => write!(f, "source updated in {}", path),
            Step::LinkCreated { path } => write!(f, "symlink created at {}", path),
            Step::LinkRemoved { path } => write!(f, "symlink removed from {}", path),
            Step::DirectoryRemoved { path } => write!(f, "directory {} removed", path),
            Step::ExampleConfigCopied { path } => write!(f, "example config copied to {}", path),
            Step::SectionAdded { section, path } => {
                write!(f, "section [{}] added to {}", section, path)
            }
            Step::SectionRemoved { section, path } => {
                write!(f, "section [{}] removed from {}", section, path)
            }
            Step::ServicesRestarted { kind } => write!(f, "{} instances restarted", kind),
        }
    }
}

/// Ordered list of completed steps for one operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepJournal {
    steps: Vec<Step>,
}

impl StepJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Paths of links created, in creation order
    pub fn links_created(&self) -> Vec<&Utf8PathBuf> {
        self.steps
            .iter()
            .filter_map(|s| match s {
                Step::LinkCreated { path } => Some(path),
                _ => None,
            })
            .collect()
    }
}
