//! Error types for configuration, bundling, and filesystem operations.
//!
//! Configuration errors are raised synchronously before any I/O. Bundler and
//! filesystem errors carry enough context to locate the file left behind.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::builder::BuildStage;
use crate::bundler::BundlerError;

/// Result type alias for builder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for all builder operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or incomplete build configuration
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The external bundler reported a failure
    #[error("bundler error: {0}")]
    Bundler(#[from] BundlerError),

    /// A filesystem write or delete failed
    #[error("filesystem error while {stage} `{}`: {source}", path.display())]
    Filesystem {
        /// Build stage the operation belonged to
        stage: BuildStage,
        /// File the operation targeted
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

/// Configuration errors. Always fatal to the current call, never retried.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// A key outside the recognized option set
    #[error("configure: option \"{0}\" is unknown")]
    UnknownOption(String),

    /// The configuration root is not an object
    #[error("configure: expected an object, got {0}")]
    NotAnObject(&'static str),

    /// A plugin entry lacks `config` or `rule`
    #[error("configure: plugin \"{plugin}\" is missing `{field}`")]
    MissingPluginField {
        /// Plugin name
        plugin: String,
        /// Missing field
        field: &'static str,
    },

    /// Plugin names must be non-empty
    #[error("configure: plugin names must not be empty")]
    EmptyPluginName,

    /// A plugin name does not normalize to a legal identifier
    #[error(
        "configure: plugin \"{plugin}\" normalizes to `{identifier}`, which is not a valid identifier"
    )]
    InvalidPluginName {
        /// Plugin name
        plugin: String,
        /// Normalized name
        identifier: String,
    },

    /// Two plugins would be bound to the same identifier
    #[error(
        "configure: plugins \"{first}\" and \"{second}\" both normalize to identifier `{identifier}`"
    )]
    IdentifierCollision {
        /// Plugin registered first
        first: String,
        /// Plugin registered second
        second: String,
        /// Shared identifier
        identifier: String,
    },

    /// A required option is absent at build time
    #[error("configure: option \"{0}\" is required")]
    MissingOption(&'static str),

    /// An option has the wrong shape
    #[error("configure: invalid value for \"{option}\": {reason}")]
    InvalidValue {
        /// Offending option
        option: String,
        /// Why it was rejected
        reason: String,
    },

    /// Configuration file could not be read
    #[error("failed to read configuration file `{}`: {source}", path.display())]
    Read {
        /// Configuration file
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid JSON/TOML
    #[error("failed to parse configuration file `{}`: {reason}", path.display())]
    Parse {
        /// Configuration file
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// Configuration file extension is neither json nor toml
    #[error("unsupported configuration file `{}` (expected .json or .toml)", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

/// Attaches build-stage and path context to IO results.
pub trait ErrorExt<T> {
    /// Converts an IO error into [`Error::Filesystem`].
    fn fs_context(self, stage: BuildStage, path: &Path) -> Result<T>;
}

impl<T> ErrorExt<T> for std::io::Result<T> {
    fn fs_context(self, stage: BuildStage, path: &Path) -> Result<T> {
        self.map_err(|source| Error::Filesystem {
            stage,
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Error {
    /// Returns true for errors raised before any filesystem write.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
