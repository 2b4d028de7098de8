//! Main build orchestration.
//!
//! This module provides the [`Builder`] that drives one build from
//! configuration to bundled artifact.

use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{BuildPaths, BuildStage, checksum::calculate_sha256};
use crate::{
    bundler::{BundleOptions, Bundler, BundlerError, STANDALONE_NAME},
    codegen::{self, GeneratorOptions},
    config::{BuildConfiguration, validation},
    error::{ErrorExt, Result},
    fs::FileSystem,
};

/// Result of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArtifact {
    /// Where the bundle was written
    pub target_path: PathBuf,
    /// Temporary entry file
    pub temp_path: PathBuf,
    /// Whether the temporary entry file is still on disk
    pub temp_retained: bool,
    /// Bundle contents as returned by the bundler
    pub contents: Bytes,
    /// Hex-encoded SHA-256 of `contents`
    pub checksum: String,
}

/// Main build orchestrator.
///
/// Owns the active configuration and runs builds as a strict sequence:
///
/// 1. Validate the configuration and resolve paths
/// 2. Generate the init script and write it to the temporary entry file
/// 3. Bundle the entry file
/// 4. Write the bundle to the target file
/// 5. Delete the temporary entry file unless `debug` is set
///
/// On bundler failure the target file is not written and the temporary entry
/// file is left in place for inspection. `build` takes `&mut self`, so one
/// builder never runs two builds at once.
///
/// # Examples
///
/// ```no_run
/// use odl_builder::{Builder, CommandBundler, BundlerKind, LocalFileSystem};
/// use odl_builder::config::ConfigurationBuilder;
/// use serde_json::json;
///
/// # async fn example() -> odl_builder::Result<()> {
/// let config = ConfigurationBuilder::new()
///     .output_path("build")
///     .output_filename("odl.js")
///     .plugin("opendatalayer-plugin-example", json!({ "gaProdId": "UA-123456" }), true)
///     .build()?;
///
/// let bundler = CommandBundler::locate(BundlerKind::Browserify, None)?;
/// let mut builder = Builder::new(bundler, LocalFileSystem);
/// let artifact = builder.build(Some(config)).await?;
///
/// println!("Created: {} ({} bytes)", artifact.target_path.display(), artifact.contents.len());
/// println!("SHA256: {}", artifact.checksum);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Builder<B, F> {
    bundler: B,
    fs: F,
    configuration: BuildConfiguration,
    generator: GeneratorOptions,
    timeout: Option<Duration>,
    stage: BuildStage,
}

impl<B: Bundler, F: FileSystem> Builder<B, F> {
    /// Creates a builder with an empty configuration.
    pub fn new(bundler: B, fs: F) -> Self {
        Self {
            bundler,
            fs,
            configuration: BuildConfiguration::default(),
            generator: GeneratorOptions::default(),
            timeout: None,
            stage: BuildStage::Idle,
        }
    }

    /// Sets init script rendering options.
    pub fn with_generator_options(mut self, options: GeneratorOptions) -> Self {
        self.generator = options;
        self
    }

    /// Fails the build with [`BundlerError::Timeout`] if the bundler runs
    /// longer than `timeout`.
    ///
    /// Default: no timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replaces the stored configuration used by builds that do not pass one.
    ///
    /// # Errors
    ///
    /// Returns a configuration error and keeps the previous configuration if
    /// `config` is invalid.
    pub fn configure(&mut self, config: BuildConfiguration) -> Result<()> {
        validation::validate_configuration(&config)?;
        self.configuration = config;
        Ok(())
    }

    /// Returns the stored configuration.
    pub fn configuration(&self) -> &BuildConfiguration {
        &self.configuration
    }

    /// Returns the stage the last build reached.
    pub fn stage(&self) -> BuildStage {
        self.stage
    }

    /// Returns the bundler.
    pub fn bundler(&self) -> &B {
        &self.bundler
    }

    /// Returns the filesystem.
    pub fn file_system(&self) -> &F {
        &self.fs
    }

    /// Runs a build.
    ///
    /// If `config` is given it is validated and replaces the stored
    /// configuration before anything is written.
    ///
    /// # Errors
    ///
    /// - configuration errors, before any filesystem access
    /// - [`BundlerError`] from the bundler; the temporary entry file is kept
    /// - filesystem errors from writing the temporary or target file
    ///
    /// A failed delete of the temporary entry file is logged and reported
    /// through [`BuildArtifact::temp_retained`] instead of failing the build.
    pub async fn build(&mut self, config: Option<BuildConfiguration>) -> Result<BuildArtifact> {
        let result = self.run(config).await;
        if result.is_err() {
            self.transition(BuildStage::Failed);
        }
        result
    }

    async fn run(&mut self, config: Option<BuildConfiguration>) -> Result<BuildArtifact> {
        self.transition(BuildStage::Validating);
        if let Some(config) = config {
            self.configure(config)?;
        }
        let config = self.configuration.clone();
        let paths = BuildPaths::resolve(&config)?;

        if config.debug {
            log::info!("Running builder in: {}", paths.base_dir.display());
            log::info!("Writing temp file to: {}", paths.temp.display());
            log::info!("Writing target file to: {}", paths.target.display());
        }

        self.transition(BuildStage::Generating);
        let source = codegen::generate(&config, &self.generator);

        self.transition(BuildStage::WritingTemp);
        self.fs
            .write(&paths.temp, source.as_bytes())
            .fs_context(BuildStage::WritingTemp, &paths.temp)?;

        self.transition(BuildStage::Bundling);
        let contents = match self.run_bundler(&paths.temp).await {
            Ok(contents) => contents,
            Err(e) => {
                log::warn!("Bundling failed, keeping {}", paths.temp.display());
                return Err(e.into());
            }
        };

        self.transition(BuildStage::WritingFinal);
        self.fs
            .write(&paths.target, &contents)
            .fs_context(BuildStage::WritingFinal, &paths.target)?;

        let temp_retained = if config.debug {
            log::debug!("Debug mode - keeping {}", paths.temp.display());
            true
        } else {
            self.transition(BuildStage::CleaningUp);
            self.remove_temp(&paths.temp)
        };

        self.transition(BuildStage::Done);
        log::info!(
            "Created {} ({} bytes)",
            paths.target.display(),
            contents.len()
        );

        Ok(BuildArtifact {
            checksum: calculate_sha256(&contents),
            target_path: paths.target,
            temp_path: paths.temp,
            temp_retained,
            contents,
        })
    }

    async fn run_bundler(&self, entry: &Path) -> std::result::Result<Bytes, BundlerError> {
        let options = BundleOptions::standalone(STANDALONE_NAME);
        let bundle = self.bundler.bundle(entry, &options);

        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, bundle)
                .await
                .unwrap_or(Err(BundlerError::Timeout(timeout))),
            None => bundle.await,
        }
    }

    /// Returns true if the file is still on disk.
    fn remove_temp(&self, temp: &Path) -> bool {
        match self.fs.remove(temp) {
            Ok(()) => false,
            Err(e) => {
                log::warn!("Failed to delete {}: {}", temp.display(), e);
                true
            }
        }
    }

    fn transition(&mut self, stage: BuildStage) {
        log::debug!("Build stage: {} -> {}", self.stage, stage);
        self.stage = stage;
    }
}
