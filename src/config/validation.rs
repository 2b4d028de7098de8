//! Configuration validation.
//!
//! [`validate_options`] checks a raw configuration object against the fixed
//! option whitelist and the required plugin fields. [`validate_configuration`]
//! checks a typed configuration for problems the generated script could not
//! survive.

use serde_json::Value;
use std::collections::HashMap;

use super::BuildConfiguration;
use crate::codegen::{is_identifier, normalize_plugin_name};
use crate::error::ConfigurationError;

/// Options accepted at the top level of a configuration object.
pub const KNOWN_OPTIONS: [&str; 6] = [
    "debug",
    "baseDir",
    "outputPath",
    "outputFilename",
    "plugins",
    "onBeforeInitialize",
];

/// Validates a raw configuration object.
///
/// Rejects on the first key outside [`KNOWN_OPTIONS`], then checks that every
/// plugin entry carries both `config` and `rule`. A `null` value or a blank
/// rule string counts as missing; `rule: false` is a valid rule. Has no side
/// effects.
pub fn validate_options(config: &Value) -> Result<(), ConfigurationError> {
    let Value::Object(options) = config else {
        return Err(ConfigurationError::NotAnObject(value_kind(config)));
    };

    if let Some(unknown) = options
        .keys()
        .find(|key| !KNOWN_OPTIONS.contains(&key.as_str()))
    {
        return Err(ConfigurationError::UnknownOption(unknown.clone()));
    }

    match options.get("plugins") {
        None | Some(Value::Null) => Ok(()),
        Some(Value::Object(plugins)) => {
            for (name, entry) in plugins {
                validate_plugin_entry(name, entry)?;
            }
            Ok(())
        }
        Some(other) => Err(ConfigurationError::InvalidValue {
            option: "plugins".to_string(),
            reason: format!("expected an object, got {}", value_kind(other)),
        }),
    }
}

/// Validates a single plugin entry.
pub fn validate_plugin_entry(name: &str, entry: &Value) -> Result<(), ConfigurationError> {
    let Value::Object(fields) = entry else {
        return Err(ConfigurationError::InvalidValue {
            option: format!("plugins.{name}"),
            reason: format!("expected an object, got {}", value_kind(entry)),
        });
    };

    for field in ["config", "rule"] {
        let missing = match fields.get(field) {
            None | Some(Value::Null) => true,
            Some(Value::String(source)) => field == "rule" && source.trim().is_empty(),
            Some(_) => false,
        };
        if missing {
            return Err(ConfigurationError::MissingPluginField {
                plugin: name.to_string(),
                field,
            });
        }
    }

    Ok(())
}

/// Validates a typed configuration.
///
/// Plugin names must be non-empty, must normalize to a legal identifier, and
/// must not collide after normalization, since each becomes a distinct
/// variable binding in the generated script. Rule expressions must not be
/// blank.
pub fn validate_configuration(config: &BuildConfiguration) -> Result<(), ConfigurationError> {
    let mut identifiers: HashMap<String, &str> = HashMap::with_capacity(config.plugins.len());

    for (name, entry) in &config.plugins {
        if name.is_empty() {
            return Err(ConfigurationError::EmptyPluginName);
        }

        if entry.rule.is_blank() {
            return Err(ConfigurationError::MissingPluginField {
                plugin: name.clone(),
                field: "rule",
            });
        }

        let identifier = normalize_plugin_name(name);
        if !is_identifier(&identifier) {
            return Err(ConfigurationError::InvalidPluginName {
                plugin: name.clone(),
                identifier,
            });
        }

        if let Some(first) = identifiers.get(&identifier) {
            return Err(ConfigurationError::IdentifierCollision {
                first: (*first).to_string(),
                second: name.clone(),
                identifier,
            });
        }
        identifiers.insert(identifier, name);
    }

    Ok(())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
