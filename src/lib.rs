//! Init script generator and build orchestrator for opendatalayer bundles.
//!
//! Given a plugin configuration, this library:
//! - Validates the configuration against the recognized option set
//! - Generates an init script that imports every plugin and calls
//!   `initialize` with the config, rule, and mapping tables
//! - Hands the script to an external bundler and writes the standalone bundle
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod builder;
pub mod bundler;
pub mod cli;
pub mod codegen;
pub mod config;
pub mod error;
pub mod fs;

// Re-export commonly used types
pub use builder::{BuildArtifact, BuildStage, Builder};
pub use bundler::{Bundler, BundlerError, BundlerKind, CommandBundler};
pub use codegen::{generate_init_script, normalize_plugin_name};
pub use config::{BuildConfiguration, PluginEntry, Rule};
pub use error::{CliError, ConfigurationError, Error, Result};
pub use fs::{FileSystem, LocalFileSystem};
