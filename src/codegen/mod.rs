//! Init script generation.
//!
//! Turns a [`BuildConfiguration`] into the source of the bundler entry point:
//!
//! 1. Imports: the runtime entry object, then one binding per plugin
//! 2. Config table: plugin name → JSON config
//! 3. Rule table: plugin name → rule source, verbatim
//! 4. Mapping table: plugin name → plugin binding
//! 5. Initialization: `initialize(state, rules, config, {}, mappings)`,
//!    optionally deferred behind the before-initialize hook
//!
//! Generation is pure; the same configuration always yields the same text.

mod naming;
mod program;

pub use naming::{is_identifier, normalize_plugin_name};
pub use program::{Export, Expr, ImportStyle, InitializeCall, Initialization, Program, Statement};

use crate::config::BuildConfiguration;

/// Module specifier of the data layer runtime.
pub const RUNTIME_MODULE: &str = "opendatalayer";
/// Named export of the runtime entry object.
pub const RUNTIME_EXPORT: &str = "odl";
/// Binding of the runtime entry object in the generated script.
pub const RUNTIME_BINDING: &str = "__$odl";
/// Binding of the config table.
pub const CONFIG_TABLE: &str = "__$ODL_CONFIG";
/// Binding of the rule table.
pub const RULE_TABLE: &str = "__$ODL_RULES";
/// Binding of the mapping table.
pub const MAPPING_TABLE: &str = "__$ODL_MAPPINGS";
/// Binding of the state container handed to `initialize`.
pub const STATE_CONTAINER: &str = "__$ODL_DATA";

/// Options for rendering the init script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Import flavor
    pub import_style: ImportStyle,
}

/// Generates the init script with CommonJS imports.
pub fn generate_init_script(config: &BuildConfiguration) -> String {
    generate(config, &GeneratorOptions::default())
}

/// Generates the init script.
pub fn generate(config: &BuildConfiguration, options: &GeneratorOptions) -> String {
    build_program(config).render(options.import_style)
}

/// Builds the init script IR without rendering it.
pub fn build_program(config: &BuildConfiguration) -> Program {
    let mut program = Program::new();

    program.push_block(import_block(config));
    program.push_block(vec![
        config_table(config),
        rule_table(config),
        mapping_table(config),
    ]);
    program.push_block(initialization_block(config));

    program
}

fn import_block(config: &BuildConfiguration) -> Vec<Statement> {
    let runtime = Statement::Import {
        binding: RUNTIME_BINDING.to_string(),
        module: RUNTIME_MODULE.to_string(),
        export: Export::Named(RUNTIME_EXPORT.to_string()),
    };

    std::iter::once(runtime)
        .chain(config.plugins.keys().map(|name| Statement::Import {
            binding: normalize_plugin_name(name),
            module: name.clone(),
            export: Export::Default,
        }))
        .collect()
}

fn config_table(config: &BuildConfiguration) -> Statement {
    Statement::Table {
        name: CONFIG_TABLE.to_string(),
        entries: config
            .plugins
            .iter()
            .map(|(name, entry)| (name.clone(), Expr::Json(entry.config.clone())))
            .collect(),
    }
}

fn rule_table(config: &BuildConfiguration) -> Statement {
    Statement::Table {
        name: RULE_TABLE.to_string(),
        entries: config
            .plugins
            .iter()
            .map(|(name, entry)| (name.clone(), Expr::Raw(entry.rule.as_source().into_owned())))
            .collect(),
    }
}

fn mapping_table(config: &BuildConfiguration) -> Statement {
    Statement::Table {
        name: MAPPING_TABLE.to_string(),
        entries: config
            .plugins
            .keys()
            .map(|name| (name.clone(), Expr::Ident(normalize_plugin_name(name))))
            .collect(),
    }
}

fn initialization_block(config: &BuildConfiguration) -> Vec<Statement> {
    let state = Statement::Declare {
        name: STATE_CONTAINER.to_string(),
        value: Expr::Raw("{}".to_string()),
    };

    let call = InitializeCall {
        runtime: RUNTIME_BINDING.to_string(),
        args: vec![
            STATE_CONTAINER.to_string(),
            RULE_TABLE.to_string(),
            CONFIG_TABLE.to_string(),
            "{}".to_string(),
            MAPPING_TABLE.to_string(),
        ],
    };

    let initialization = match config.before_initialize_hook() {
        Some(hook) => Initialization::Deferred {
            hook: hook.to_string(),
            hook_args: vec![RUNTIME_BINDING.to_string(), STATE_CONTAINER.to_string()],
            call,
        },
        None => Initialization::Immediate(call),
    };

    vec![state, Statement::Initialize(initialization)]
}
