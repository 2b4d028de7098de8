//! Child-process bundler.
//!
//! Runs a JavaScript bundler CLI on the entry file and captures the bundle
//! from its standard output.

use bytes::Bytes;
use std::path::{Path, PathBuf};

use super::{BundleOptions, Bundler, BundlerError};

/// Supported bundler executables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BundlerKind {
    /// `browserify <entry> --standalone <name>`
    Browserify,
    /// `esbuild <entry> --bundle --format=iife --global-name=<name>`
    Esbuild,
}

impl BundlerKind {
    /// All kinds in detection order.
    pub const ALL: [BundlerKind; 2] = [BundlerKind::Browserify, BundlerKind::Esbuild];

    /// Executable name.
    pub fn program(self) -> &'static str {
        match self {
            Self::Browserify => "browserify",
            Self::Esbuild => "esbuild",
        }
    }

    /// Command line arguments for bundling `entry`.
    pub fn args(self, entry: &Path, options: &BundleOptions) -> Vec<String> {
        let entry = entry.display().to_string();
        match self {
            Self::Browserify => {
                let mut args = vec![entry];
                if let Some(name) = &options.standalone {
                    args.push("--standalone".to_string());
                    args.push(name.clone());
                }
                args
            }
            Self::Esbuild => {
                let mut args = vec![entry, "--bundle".to_string()];
                if let Some(name) = &options.standalone {
                    args.push("--format=iife".to_string());
                    args.push(format!("--global-name={name}"));
                }
                args
            }
        }
    }
}

/// Bundler backed by an external executable.
#[derive(Debug, Clone)]
pub struct CommandBundler {
    kind: BundlerKind,
    program: PathBuf,
    working_dir: Option<PathBuf>,
}

impl CommandBundler {
    /// Creates a bundler running `program` with the argument convention of `kind`.
    pub fn new(kind: BundlerKind, program: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            program: program.into(),
            working_dir: None,
        }
    }

    /// Locates the executable for `kind`.
    ///
    /// Looks in `<project_dir>/node_modules/.bin` first, then on `PATH`.
    pub fn locate(kind: BundlerKind, project_dir: Option<&Path>) -> Result<Self, BundlerError> {
        let local = project_dir
            .map(|dir| dir.join("node_modules").join(".bin").join(kind.program()))
            .filter(|candidate| candidate.is_file());

        let program = match local {
            Some(path) => path,
            None => which::which(kind.program()).map_err(|e| {
                log::debug!("{} not found in PATH: {}", kind.program(), e);
                BundlerError::NotFound {
                    program: kind.program().to_string(),
                }
            })?,
        };

        log::debug!("Using {} at {}", kind.program(), program.display());
        let mut bundler = Self::new(kind, program);
        bundler.working_dir = project_dir.map(Path::to_path_buf);
        Ok(bundler)
    }

    /// Runs the bundler from `dir` so module resolution starts there.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Bundler kind.
    pub fn kind(&self) -> BundlerKind {
        self.kind
    }

    /// Executable path.
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Bundler for CommandBundler {
    async fn bundle(&self, entry: &Path, options: &BundleOptions) -> Result<Bytes, BundlerError> {
        log::info!("Running {}...", self.kind.program());

        let mut command = tokio::process::Command::new(&self.program);
        command.args(self.kind.args(entry, options)).kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        let output = command.output().await.map_err(|source| BundlerError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !stderr.is_empty() {
            log::debug!("{} stderr: {}", self.kind.program(), stderr);
        }

        if !output.status.success() {
            return Err(BundlerError::Failed {
                program: self.program.clone(),
                status: output.status,
                stderr,
            });
        }

        if output.stdout.is_empty() {
            return Err(BundlerError::EmptyOutput {
                program: self.program.clone(),
            });
        }

        Ok(Bytes::from(output.stdout))
    }
}
