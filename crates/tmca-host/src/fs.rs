//! Local filesystem gateway

use camino::Utf8Path;
use std::fs;
use std::io::ErrorKind;
use tmca_core::{Error, Result};
use tracing::debug;

use crate::traits::Filesystem;

/// [`Filesystem`] implementation over `std::fs`
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Utf8Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    fn symlink(&self, target: &Utf8Path, link: &Utf8Path) -> Result<()> {
        match fs::symlink_metadata(link) {
            Ok(meta) if meta.is_dir() => {
                return Err(Error::path_exists(link.as_str()));
            }
            Ok(_) => {
                debug!("Replacing existing {}", link);
                fs::remove_file(link)?;
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        debug!("Linking {} -> {}", link, target);
        std::os::unix::fs::symlink(target, link)?;
        Ok(())
    }

    fn remove(&self, path: &Utf8Path) -> Result<()> {
        let meta = match fs::symlink_metadata(path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        debug!("Removing {}", path);
        if meta.is_dir() {
            fs::remove_dir_all(path)?;
        } else {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn copy_file(&self, src: &Utf8Path, dest: &Utf8Path) -> Result<()> {
        debug!("Copying {} -> {}", src, dest);
        fs::copy(src, dest)?;
        Ok(())
    }
}
