//! Build lifecycle stages.

use std::fmt;

/// Stage of a build.
///
/// A build moves through the stages in declaration order and ends in
/// [`BuildStage::Done`] or [`BuildStage::Failed`]. `Failed` is reachable from
/// validation, bundling, and any filesystem write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BuildStage {
    /// No build has run yet
    #[default]
    Idle,
    /// Checking the configuration and resolving paths
    Validating,
    /// Rendering the init script
    Generating,
    /// Writing the init script to the temporary entry file
    WritingTemp,
    /// Waiting for the external bundler
    Bundling,
    /// Writing the bundle to the target file
    WritingFinal,
    /// Deleting the temporary entry file
    CleaningUp,
    /// Build finished successfully
    Done,
    /// Build aborted
    Failed,
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Generating => "generating",
            Self::WritingTemp => "writing temp file",
            Self::Bundling => "bundling",
            Self::WritingFinal => "writing target file",
            Self::CleaningUp => "cleaning up",
            Self::Done => "done",
            Self::Failed => "failed",
        })
    }
}
