//! Build configuration: types, validation, construction, and file loading.
//!
//! Every configuration reaches the builder through one of three doors, all
//! of which validate:
//!
//! - [`BuildConfiguration::from_value`] for raw JSON objects
//! - [`load_configuration`] for `.json` / `.toml` files
//! - [`ConfigurationBuilder`] for typed construction in Rust

mod builder;
mod loading;
mod types;
pub mod validation;

pub use builder::ConfigurationBuilder;
pub use loading::{CONFIG_FILE_NAMES, discover_configuration, load_configuration};
pub use types::{BuildConfiguration, PluginEntry, Rule};
pub use validation::{KNOWN_OPTIONS, validate_options};
