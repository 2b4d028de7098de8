//! Output path resolution.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::BuildStage;
use crate::config::BuildConfiguration;
use crate::error::{ConfigurationError, ErrorExt, Result};

/// Suffix appended to the target path for the temporary entry file.
pub const TEMP_SUFFIX: &str = ".__tmp.js";

/// Resolved locations of one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPaths {
    /// Absolute `baseDir`, or the working directory
    pub base_dir: PathBuf,
    /// `base_dir/outputPath/outputFilename`
    pub target: PathBuf,
    /// `target` + [`TEMP_SUFFIX`]
    pub temp: PathBuf,
}

impl BuildPaths {
    /// Resolves paths for `config`.
    ///
    /// A relative `baseDir` is anchored at the working directory, so the
    /// resolved paths stay valid for a bundler running in another directory.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::MissingOption`] if `outputFilename` is absent or empty
    /// - a filesystem error if the working directory is needed but unavailable
    pub fn resolve(config: &BuildConfiguration) -> Result<Self> {
        let filename = config
            .output_filename
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or(ConfigurationError::MissingOption("outputFilename"))?;

        let base_dir = match config.base_dir() {
            Some(dir) if dir.is_absolute() => dir.to_path_buf(),
            Some(dir) => working_dir()?.join(dir),
            None => working_dir()?,
        };

        Ok(Self::new(base_dir, config.output_path.as_deref(), filename))
    }

    /// Builds paths from their parts.
    pub fn new(base_dir: PathBuf, output_path: Option<&Path>, filename: &str) -> Self {
        let mut target = base_dir.clone();
        if let Some(output_path) = output_path {
            target.push(output_path);
        }
        target.push(filename);

        let mut temp: OsString = target.clone().into_os_string();
        temp.push(TEMP_SUFFIX);

        Self {
            base_dir,
            target,
            temp: PathBuf::from(temp),
        }
    }
}

fn working_dir() -> Result<PathBuf> {
    std::env::current_dir().fs_context(BuildStage::Validating, Path::new("."))
}
