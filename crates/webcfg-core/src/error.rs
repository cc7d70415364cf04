use std::path::PathBuf;
use thiserror::Error;

/// Stable error codes for machine-readable output.
pub mod codes {
    pub const CONFIG_PROJECT_NOT_FOUND: &str = "CONFIG_PROJECT_NOT_FOUND";
    pub const CONFIG_READ_FAILED: &str = "CONFIG_READ_FAILED";
    pub const CONFIG_PARSE_FAILED: &str = "CONFIG_PARSE_FAILED";
}

/// Core error type for webcfg operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The active project is missing from the project graph.
    #[error("Cannot find project '{project}' in the project graph")]
    ProjectNotFound { project: String },

    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    #[must_use]
    pub fn project_not_found(project: impl Into<String>) -> Self {
        Self::ProjectNotFound {
            project: project.into(),
        }
    }

    /// Get the stable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ProjectNotFound { .. } => codes::CONFIG_PROJECT_NOT_FOUND,
            Self::ConfigRead { .. } => codes::CONFIG_READ_FAILED,
            Self::ConfigParse { .. } => codes::CONFIG_PARSE_FAILED,
        }
    }

    /// Get the path involved in the error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::ConfigRead { path, .. } | Self::ConfigParse { path, .. } => Some(path),
            Self::ProjectNotFound { .. } => None,
        }
    }
}
