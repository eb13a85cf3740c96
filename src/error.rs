//! Errors of the preference backends.

use std::path::PathBuf;

/// Failures of the file-backed preference store.
#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("failed to access preferences at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed preferences in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode preferences for {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
