//! Timestamped file and directory backups

use camino::{Utf8Path, Utf8PathBuf};
use chrono::Local;
use std::fs;
use tmca_core::{Error, Result};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::traits::BackupService;

/// Timestamp format appended to backup names
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// [`BackupService`] writing copies below a single backup root
#[derive(Debug, Clone)]
pub struct TimestampedBackup {
    root: Utf8PathBuf,
}

impl TimestampedBackup {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn timestamp() -> String {
        Local::now().format(TIMESTAMP_FORMAT).to_string()
    }

    /// `printer.cfg` -> `printer_<ts>.cfg`, `Makefile` -> `Makefile_<ts>`
    fn stamped_name(name: &str, stamp: &str) -> String {
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => format!("{}_{}.{}", stem, stamp, ext),
            _ => format!("{}_{}", name, stamp),
        }
    }

    /// Two backups within the same second must not overwrite each other
    fn unique(path: Utf8PathBuf) -> Utf8PathBuf {
        if fs::symlink_metadata(&path).is_err() {
            return path;
        }
        let mut n = 1;
        loop {
            let candidate = Utf8PathBuf::from(format!("{}-{}", path, n));
            if fs::symlink_metadata(&candidate).is_err() {
                return candidate;
            }
            n += 1;
        }
    }

    fn copy_tree(src: &Utf8Path, dest: &Utf8Path) -> Result<u64> {
        let mut copied = 0;
        for entry in WalkDir::new(src).follow_links(false) {
            let entry = entry.map_err(|e| Error::Io(e.into()))?;
            let relative = entry
                .path()
                .strip_prefix(src)
                .map_err(|_| Error::non_utf8_path(entry.path().to_string_lossy()))?;
            let target = dest.as_std_path().join(relative);
            let file_type = entry.file_type();

            if file_type.is_dir() {
                fs::create_dir_all(&target)?;
            } else if file_type.is_symlink() {
                let link_target = fs::read_link(entry.path())?;
                std::os::unix::fs::symlink(link_target, &target)?;
                copied += 1;
            } else {
                fs::copy(entry.path(), &target)?;
                copied += 1;
            }
        }
        Ok(copied)
    }
}

impl BackupService for TimestampedBackup {
    fn backup_file(&self, src: &Utf8Path, dest_dir: &str, dest_name: &str) -> Result<Utf8PathBuf> {
        let dir = self.root.join(dest_dir);
        fs::create_dir_all(&dir)?;

        let dest = Self::unique(dir.join(Self::stamped_name(dest_name, &Self::timestamp())));
        fs::copy(src, &dest)?;

        info!("Backed up {} to {}", src, dest);
        Ok(dest)
    }

    fn backup_directory(&self, src: &Utf8Path, name: &str) -> Result<Utf8PathBuf> {
        let parent = self.root.join(name);
        fs::create_dir_all(&parent)?;

        let dest = Self::unique(parent.join(format!("{}_{}", name, Self::timestamp())));
        let copied = Self::copy_tree(src, &dest)?;

        debug!("Copied {} entries", copied);
        info!("Backed up {} to {}", src, dest);
        Ok(dest)
    }
}
