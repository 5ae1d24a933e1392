//! Error types for manifest generation and artifact loading.
//!
//! Follows ODF-REP: Library crates use `thiserror` for explicit error enums.

use std::path::PathBuf;

use thiserror::Error;

/// Error types for the discovery and artifact pipeline.
///
/// Malformed or missing `@module` annotations are never errors; every
/// variant here aborts the whole generation run.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Directory traversal failed (unreadable directory, missing root, link loop).
    #[error("Failed to traverse {}: {source}", .path.display())]
    Traverse {
        /// Path that could not be visited.
        path: PathBuf,
        /// Underlying walkdir error.
        #[source]
        source: walkdir::Error,
    },

    /// A candidate source file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The artifact could not be written or moved into place.
    #[error("Failed to write artifact {}: {source}", .path.display())]
    Write {
        /// Target artifact path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The manifest document could not be serialized.
    #[error("Failed to encode manifest: {0}")]
    Encode(#[from] serde_json::Error),

    /// The artifact text is not a valid manifest artifact.
    #[error("Invalid manifest artifact: {0}")]
    InvalidArtifact(String),

    /// The artifact payload does not match its recorded digest.
    #[error("Manifest artifact checksum mismatch (expected {expected}, found {actual})")]
    ChecksumMismatch {
        /// Digest recorded in the artifact header.
        expected: String,
        /// Digest of the payload actually present.
        actual: String,
    },

    /// A settings file could not be read.
    #[error("Failed to read settings {}: {source}", .path.display())]
    SettingsRead {
        /// Settings file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A settings file is not valid YAML for [`crate::ManifestSettings`].
    #[error("Failed to parse settings {}: {source}", .path.display())]
    Settings {
        /// Settings file path.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ManifestError>;
