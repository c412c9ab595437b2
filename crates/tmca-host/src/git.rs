//! Git source fetcher

use camino::Utf8Path;
use std::fs;
use std::process::Command;
use tmca_core::{Error, Result};
use tracing::info;

use crate::process;
use crate::traits::SourceFetcher;

/// [`SourceFetcher`] shelling out to the `git` binary
#[derive(Debug, Default, Clone)]
pub struct GitFetcher {
    branch: Option<String>,
}

impl GitFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check out `branch` instead of the remote default
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }
}

impl SourceFetcher for GitFetcher {
    fn clone_repo(&self, url: &str, dest: &Utf8Path, force: bool) -> Result<()> {
        process::require("git")?;

        if fs::symlink_metadata(dest).is_ok() {
            if !force {
                return Err(Error::path_exists(dest.as_str()));
            }
            info!("Removing existing checkout at {}", dest);
            if dest.is_dir() {
                fs::remove_dir_all(dest)?;
            } else {
                fs::remove_file(dest)?;
            }
        }

        info!("Cloning repository: {} -> {}", url, dest);
        let mut cmd = Command::new("git");
        cmd.arg("clone");
        if let Some(branch) = &self.branch {
            cmd.arg("--branch").arg(branch);
        }
        cmd.arg(url).arg(dest.as_str());

        process::run(&mut cmd)?;
        Ok(())
    }

    fn pull(&self, dest: &Utf8Path) -> Result<()> {
        process::require("git")?;

        info!("Pulling latest changes in {}", dest);
        let mut cmd = Command::new("git");
        cmd.arg("-C").arg(dest.as_str()).arg("pull");

        process::run(&mut cmd)?;
        Ok(())
    }
}
