//! Build orchestration.
//!
//! The [`Builder`] drives the build lifecycle:
//! validate → generate → write temp entry → bundle → write target → clean up.
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA256 checksum of the bundled artifact
//! - [`orchestrator`] - Main [`Builder`] struct and build operations
//! - [`paths`] - Target and temporary path resolution
//! - [`stage`] - [`BuildStage`] lifecycle states

mod checksum;
mod orchestrator;
mod paths;
mod stage;

pub use orchestrator::{BuildArtifact, Builder};
pub use paths::{BuildPaths, TEMP_SUFFIX};
pub use stage::BuildStage;
