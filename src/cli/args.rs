//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap, with overrides for
//! the configuration file options.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crate::bundler::BundlerKind;
use crate::codegen::ImportStyle;
use crate::config::BuildConfiguration;

/// Bundles opendatalayer with its configured plugins
#[derive(Parser, Debug)]
#[command(
    name = "odl-builder",
    version,
    about = "Bundles opendatalayer with its configured plugins",
    long_about = "Generates the opendatalayer init script from a plugin configuration, bundles it \
with browserify or esbuild, and writes a single standalone file.

Usage:
  odl-builder --config opendatalayer.config.json
  odl-builder --output-path build --output-filename odl.js --bundler esbuild
  odl-builder --emit-script

Without --config, opendatalayer.config.json or opendatalayer.config.toml is looked up in the \
base directory."
)]
pub struct Args {
    /// Configuration file (.json or .toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Base directory for output paths (overrides `baseDir`)
    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Output directory relative to the base directory (overrides `outputPath`)
    #[arg(short = 'p', long, value_name = "PATH")]
    pub output_path: Option<PathBuf>,

    /// Bundled file name (overrides `outputFilename`)
    #[arg(short = 'o', long, value_name = "NAME")]
    pub output_filename: Option<String>,

    /// Keep the temporary init script and print resolved paths (sets `debug`)
    #[arg(long)]
    pub debug: bool,

    /// Bundler to run. Defaults to the first one found on PATH.
    #[arg(long, value_enum, env = "ODL_BUNDLER")]
    pub bundler: Option<BundlerArg>,

    /// Path to the bundler executable
    #[arg(long, value_name = "PATH", env = "ODL_BUNDLER_BIN")]
    pub bundler_bin: Option<PathBuf>,

    /// Abort if the bundler runs longer than this many seconds
    #[arg(long, value_name = "SECS", env = "ODL_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Import flavor of the generated init script
    #[arg(long, value_enum, default_value_t = ModuleFormat::Commonjs)]
    pub module_format: ModuleFormat,

    /// Print the generated init script and exit without bundling
    #[arg(long)]
    pub emit_script: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Bundler selection on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BundlerArg {
    /// browserify --standalone
    Browserify,
    /// esbuild --format=iife
    Esbuild,
}

impl From<BundlerArg> for BundlerKind {
    fn from(arg: BundlerArg) -> Self {
        match arg {
            BundlerArg::Browserify => BundlerKind::Browserify,
            BundlerArg::Esbuild => BundlerKind::Esbuild,
        }
    }
}

/// Import flavor on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModuleFormat {
    /// require(...)
    Commonjs,
    /// import ... from ...
    Esm,
}

impl From<ModuleFormat> for ImportStyle {
    fn from(format: ModuleFormat) -> Self {
        match format {
            ModuleFormat::Commonjs => ImportStyle::CommonJs,
            ModuleFormat::Esm => ImportStyle::Esm,
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout == Some(0) {
            return Err("--timeout must be at least 1 second".to_string());
        }

        if self.output_filename.as_deref() == Some("") {
            return Err("--output-filename cannot be empty".to_string());
        }

        if self.bundler_bin.is_some() && self.bundler.is_none() {
            return Err(
                "--bundler-bin requires --bundler to select the argument convention".to_string(),
            );
        }

        Ok(())
    }

    /// Bundler timeout, if one was requested.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }

    /// Applies command line overrides to a loaded configuration.
    pub fn apply_overrides(&self, config: &mut BuildConfiguration) {
        if let Some(dir) = &self.base_dir {
            config.base_dir = Some(dir.clone());
        }
        if let Some(path) = &self.output_path {
            config.output_path = Some(path.clone());
        }
        if let Some(name) = &self.output_filename {
            config.output_filename = Some(name.clone());
        }
        if self.debug {
            config.debug = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_file_values() {
        let args = Args::parse_from([
            "odl-builder",
            "--output-path",
            "dist",
            "--output-filename",
            "bundle.js",
            "--debug",
        ]);
        let mut config = BuildConfiguration {
            output_path: Some("build".into()),
            output_filename: Some("odl.js".into()),
            ..Default::default()
        };

        args.apply_overrides(&mut config);
        assert_eq!(config.output_path, Some(PathBuf::from("dist")));
        assert_eq!(config.output_filename.as_deref(), Some("bundle.js"));
        assert!(config.debug);
    }

    #[test]
    fn zero_timeout_is_invalid() {
        let args = Args::parse_from(["odl-builder", "--timeout", "0"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn bundler_bin_needs_bundler_kind() {
        let args = Args::parse_from(["odl-builder", "--bundler-bin", "/opt/esbuild"]);
        assert!(args.validate().is_err());

        let args = Args::parse_from([
            "odl-builder",
            "--bundler",
            "esbuild",
            "--bundler-bin",
            "/opt/esbuild",
        ]);
        assert!(args.validate().is_ok());
    }
}
