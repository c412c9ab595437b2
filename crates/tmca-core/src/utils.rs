//! Shared utility functions for tmca crates

use crate::error::{Error, Result};
use camino::Utf8PathBuf;

/// Get the user's home directory
///
/// Prefers the HOME environment variable over dirs::home_dir() so that
/// `sudo -E` and test harnesses can redirect every default path.
pub fn get_home_dir() -> Result<Utf8PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        if !home.is_empty() {
            return Ok(Utf8PathBuf::from(home));
        }
    }

    let home = dirs::home_dir().ok_or(Error::HomeDirUnavailable)?;
    Utf8PathBuf::from_path_buf(home).map_err(|p| Error::non_utf8_path(p.to_string_lossy()))
}
