//! Builder for constructing BuildConfiguration.

use super::{BuildConfiguration, PluginEntry, Rule, validation};
use crate::error::ConfigurationError;
use std::path::Path;

/// Builder for constructing [`BuildConfiguration`] from Rust code.
///
/// Plugins are registered with both `config` and `rule`, so an incomplete
/// entry cannot be expressed. [`build`](Self::build) runs the same semantic
/// validation as configuration files.
///
/// # Examples
///
/// ```
/// use odl_builder::config::ConfigurationBuilder;
/// use serde_json::json;
///
/// let config = ConfigurationBuilder::new()
///     .output_path("build")
///     .output_filename("odl.js")
///     .plugin("opendatalayer-plugin-example", json!({ "gaProdId": "UA-123456" }), true)
///     .plugin("odl/plugins/facebookWCA", json!({ "bla": "blubb" }), "window.consent === true")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.plugins.len(), 2);
/// ```
#[derive(Default)]
pub struct ConfigurationBuilder {
    config: BuildConfiguration,
}

impl ConfigurationBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Keeps the temporary init script after a successful build.
    ///
    /// Default: false
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Sets the base directory for output paths.
    ///
    /// Default: current working directory
    pub fn base_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.base_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the output directory relative to the base directory.
    pub fn output_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.output_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the bundled file name.
    ///
    /// # Required
    ///
    /// Builds fail without it.
    pub fn output_filename(mut self, name: impl Into<String>) -> Self {
        self.config.output_filename = Some(name.into());
        self
    }

    /// Registers a plugin. Registering the same name twice replaces the
    /// entry but keeps its original position.
    pub fn plugin(
        mut self,
        name: impl Into<String>,
        config: serde_json::Value,
        rule: impl Into<Rule>,
    ) -> Self {
        self.config
            .plugins
            .insert(name.into(), PluginEntry::new(config, rule));
        self
    }

    /// Sets the source fragment run before initialization.
    pub fn on_before_initialize(mut self, hook: impl Into<String>) -> Self {
        self.config.on_before_initialize = Some(hook.into());
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error for empty plugin names or names that normalize to the
    /// same identifier.
    pub fn build(self) -> Result<BuildConfiguration, ConfigurationError> {
        validation::validate_configuration(&self.config)?;
        Ok(self.config)
    }
}
