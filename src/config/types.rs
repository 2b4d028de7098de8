//! Build configuration and plugin entries.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

use super::validation;
use crate::error::ConfigurationError;

/// Top-level build request.
///
/// Keys map one-to-one onto the recognized option set
/// (`debug`, `baseDir`, `outputPath`, `outputFilename`, `plugins`,
/// `onBeforeInitialize`). Construct it with
/// [`BuildConfiguration::from_value`], [`load_configuration`](super::load_configuration)
/// or [`ConfigurationBuilder`](super::ConfigurationBuilder) so the validator
/// always runs.
///
/// # Examples
///
/// ```
/// use odl_builder::config::BuildConfiguration;
/// use serde_json::json;
///
/// let config = BuildConfiguration::from_value(json!({
///     "outputPath": "build",
///     "outputFilename": "odl.js",
///     "plugins": {
///         "opendatalayer-plugin-example": { "config": { "id": 1 }, "rule": true }
///     }
/// }))
/// .unwrap();
///
/// assert_eq!(config.plugins.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BuildConfiguration {
    /// Keep the temporary init script and log resolved paths. `null` means off.
    #[serde(default, deserialize_with = "null_as_default")]
    pub debug: bool,

    /// Root for output paths. Absent or empty means the working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,

    /// Output directory relative to `base_dir`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,

    /// Name of the bundled file. Required at build time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_filename: Option<String>,

    /// Configured plugins in insertion order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub plugins: IndexMap<String, PluginEntry>,

    /// Source fragment that runs before initialization and must call its
    /// continuation for initialization to happen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_before_initialize: Option<String>,
}

impl BuildConfiguration {
    /// Validates a raw configuration object and converts it.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::UnknownOption`] for any key outside the
    ///   recognized set
    /// - [`ConfigurationError::MissingPluginField`] for plugin entries
    ///   without `config` or `rule`
    /// - [`ConfigurationError::InvalidValue`] when a known key has the wrong type
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigurationError> {
        validation::validate_options(&value)?;

        let config: Self =
            serde_json::from_value(value).map_err(|e| ConfigurationError::InvalidValue {
                option: "configuration".to_string(),
                reason: e.to_string(),
            })?;

        validation::validate_configuration(&config)?;
        Ok(config)
    }

    /// Returns the before-initialize hook if one is set and non-blank.
    pub fn before_initialize_hook(&self) -> Option<&str> {
        self.on_before_initialize
            .as_deref()
            .map(str::trim)
            .filter(|hook| !hook.is_empty())
    }

    /// Returns the explicit base directory, treating an empty path as unset.
    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir
            .as_deref()
            .filter(|dir| !dir.as_os_str().is_empty())
    }
}

/// One configured plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginEntry {
    /// Opaque plugin configuration, emitted as JSON.
    pub config: serde_json::Value,

    /// Activation rule, emitted verbatim.
    pub rule: Rule,
}

impl PluginEntry {
    /// Creates a plugin entry.
    pub fn new(config: serde_json::Value, rule: impl Into<Rule>) -> Self {
        Self {
            config,
            rule: rule.into(),
        }
    }
}

/// Plugin activation rule.
///
/// Either a plain flag or a source expression evaluated by the runtime.
/// Expressions are passed through unescaped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rule {
    /// Always on or always off
    Flag(bool),
    /// Raw source expression
    Expression(String),
}

impl Rule {
    /// Renders the rule as source text.
    pub fn as_source(&self) -> Cow<'_, str> {
        match self {
            Self::Flag(true) => Cow::Borrowed("true"),
            Self::Flag(false) => Cow::Borrowed("false"),
            Self::Expression(expr) => Cow::Borrowed(expr.as_str()),
        }
    }

    /// Returns true for an expression with no source text.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Expression(expr) if expr.trim().is_empty())
    }
}

impl From<bool> for Rule {
    fn from(flag: bool) -> Self {
        Self::Flag(flag)
    }
}

impl From<&str> for Rule {
    fn from(expr: &str) -> Self {
        Self::Expression(expr.to_string())
    }
}

impl From<String> for Rule {
    fn from(expr: String) -> Self {
        Self::Expression(expr)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_debug_means_off() {
        let config = BuildConfiguration::from_value(json!({ "debug": null })).unwrap();
        assert!(!config.debug);

        let config = BuildConfiguration::from_value(json!({ "debug": true })).unwrap();
        assert!(config.debug);
    }

    #[test]
    fn non_boolean_debug_is_rejected() {
        let err = BuildConfiguration::from_value(json!({ "debug": "yes" })).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidValue { .. }));
    }

    #[test]
    fn blank_expression_rule() {
        assert!(Rule::from("").is_blank());
        assert!(Rule::from(" \t").is_blank());
        assert!(!Rule::from("window.optIn").is_blank());
        assert!(!Rule::Flag(false).is_blank());
    }
}
