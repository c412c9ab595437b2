//! Error types for tmca-core

use thiserror::Error;

/// Result type alias using tmca-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the installer and its collaborators
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration value
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Home directory could not be determined
    #[error("Could not determine home directory")]
    HomeDirUnavailable,

    /// Path is not valid UTF-8
    #[error("Path is not valid UTF-8: {path}")]
    NonUtf8Path { path: String },

    /// Required command not found on PATH
    #[error("Required command not found: {command}. Please ensure it is installed and in PATH")]
    CommandNotFound { command: String },

    /// External command exited unsuccessfully
    #[error("Command '{command}' failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    /// Destination already exists and overwriting was not permitted
    #[error("Path already exists: {path}")]
    PathExists { path: String },

    /// A config section could not be edited
    #[error("Failed to edit section [{section}] in {path}: {message}")]
    SectionEdit {
        section: String,
        path: String,
        message: String,
    },

    /// Interactive prompt failed (terminal closed, not a TTY, ...)
    #[error("Prompt failed: {message}")]
    Prompt { message: String },
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a non-UTF-8 path error
    pub fn non_utf8_path(path: impl Into<String>) -> Self {
        Self::NonUtf8Path { path: path.into() }
    }

    /// Create a command not found error
    pub fn command_not_found(command: impl Into<String>) -> Self {
        Self::CommandNotFound {
            command: command.into(),
        }
    }

    /// Create a command failed error
    pub fn command_failed(
        command: impl Into<String>,
        status: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            command: command.into(),
            status: status.into(),
            stderr: stderr.into(),
        }
    }

    /// Create a path exists error
    pub fn path_exists(path: impl Into<String>) -> Self {
        Self::PathExists { path: path.into() }
    }

    /// Create a section edit error
    pub fn section_edit(
        section: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::SectionEdit {
            section: section.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a prompt error
    pub fn prompt(message: impl Into<String>) -> Self {
        Self::Prompt {
            message: message.into(),
        }
    }
}
