//! Configuration file loading and discovery.

use super::BuildConfiguration;
use crate::error::ConfigurationError;
use std::path::{Path, PathBuf};

/// File names searched by [`discover_configuration`], in priority order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["opendatalayer.config.json", "opendatalayer.config.toml"];

/// Load and validate a configuration file.
///
/// `.json` files are parsed directly. `.toml` files are converted into the
/// same JSON value model (key order preserved) so both formats go through
/// one validator.
pub fn load_configuration(path: &Path) -> Result<BuildConfiguration, ConfigurationError> {
    // Step 1: Read file once
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    // Step 2: Parse into the shared value model
    let value = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str::<serde_json::Value>(&contents).map_err(|e| {
            ConfigurationError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?,
        Some("toml") => {
            let table: toml::Table =
                toml::from_str(&contents).map_err(|e| ConfigurationError::Parse {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?;
            serde_json::to_value(table).map_err(|e| ConfigurationError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
        }
        _ => return Err(ConfigurationError::UnsupportedFormat(path.to_path_buf())),
    };

    // Step 3: Validate and convert
    log::debug!("Loaded configuration from {}", path.display());
    BuildConfiguration::from_value(value)
}

/// Find a configuration file in `dir`.
///
/// Returns the first existing entry of [`CONFIG_FILE_NAMES`].
pub fn discover_configuration(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Rule;

    #[test]
    fn loads_toml_in_declaration_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opendatalayer.config.toml");
        std::fs::write(
            &path,
            r#"
outputPath = "build"
outputFilename = "odl.js"

[plugins."zeta-plugin"]
config = { id = 1 }
rule = true

[plugins."alpha-plugin"]
config = {}
rule = "window.optIn"
"#,
        )
        .unwrap();

        let config = load_configuration(&path).unwrap();
        let names: Vec<_> = config.plugins.keys().cloned().collect();
        assert_eq!(names, ["zeta-plugin", "alpha-plugin"]);
        assert_eq!(
            config.plugins["alpha-plugin"].rule,
            Rule::Expression("window.optIn".into())
        );
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_configuration(Path::new("odl.config.yaml")).unwrap_err();
        // Read happens first, so a missing file reports the read failure.
        assert!(matches!(err, ConfigurationError::Read { .. }));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odl.config.yaml");
        std::fs::write(&path, "debug: true").unwrap();
        let err = load_configuration(&path).unwrap_err();
        assert!(matches!(err, ConfigurationError::UnsupportedFormat(_)));
    }

    #[test]
    fn discovery_prefers_json() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(discover_configuration(dir.path()), None);

        std::fs::write(dir.path().join("opendatalayer.config.toml"), "").unwrap();
        std::fs::write(dir.path().join("opendatalayer.config.json"), "{}").unwrap();
        assert_eq!(
            discover_configuration(dir.path()),
            Some(dir.path().join("opendatalayer.config.json"))
        );
    }
}
