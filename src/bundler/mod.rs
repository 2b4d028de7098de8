//! External bundler integration.
//!
//! The bundler resolves everything reachable from the generated entry file
//! into one standalone script. The builder treats it as a black box behind
//! the [`Bundler`] trait:
//!
//! - [`CommandBundler`] - runs `browserify` or `esbuild` as a child process
//! - [`tool_detection`] - finds an installed bundler on `PATH`
//!
//! Bundler calls are single-shot. Failures are reported to the caller and
//! never retried.

mod command;
pub mod tool_detection;

pub use command::{BundlerKind, CommandBundler};

use bytes::Bytes;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

/// Global name the bundled artifact is exported under.
pub const STANDALONE_NAME: &str = "opendatalayer";

/// Options passed to a bundler invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleOptions {
    /// Wrap the output as a standalone script exposing this global.
    pub standalone: Option<String>,
}

impl BundleOptions {
    /// Options requesting a standalone build under `name`.
    pub fn standalone(name: impl Into<String>) -> Self {
        Self {
            standalone: Some(name.into()),
        }
    }
}

/// A module bundler.
///
/// Takes an entry file and returns the bundled payload.
pub trait Bundler {
    /// Bundles `entry` and everything it imports.
    fn bundle(
        &self,
        entry: &Path,
        options: &BundleOptions,
    ) -> impl Future<Output = Result<Bytes, BundlerError>> + Send;
}

/// Errors reported by a bundler.
#[derive(Error, Debug)]
pub enum BundlerError {
    /// Bundler executable could not be located
    #[error("`{program}` not found. Install it (e.g., npm install --save-dev {program}) or pass --bundler-bin")]
    NotFound {
        /// Executable name
        program: String,
    },

    /// Bundler process could not be started
    #[error("failed to start `{}`: {source}", program.display())]
    Spawn {
        /// Executable path
        program: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Bundler exited unsuccessfully
    #[error("`{}` failed ({status}): {stderr}", program.display())]
    Failed {
        /// Executable path
        program: PathBuf,
        /// Exit status
        status: ExitStatus,
        /// Captured standard error
        stderr: String,
    },

    /// Bundler exited successfully without producing output
    #[error("`{}` produced no output", program.display())]
    EmptyOutput {
        /// Executable path
        program: PathBuf,
    },

    /// Bundler did not finish within the configured timeout
    #[error("bundler did not finish within {0:?}")]
    Timeout(Duration),

    /// Failure reported by an in-process bundler
    #[error("{0}")]
    Other(String),
}
