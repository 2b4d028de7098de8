//! Intermediate representation of the init script and its serializer.
//!
//! The generator builds a [`Program`] of typed statements; [`Program::render`]
//! is the only place that decides emission order, literal escaping, and
//! import flavor.

use serde_json::Value;
use std::fmt::Write as _;

/// Module import flavor of the generated script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportStyle {
    /// `var x = require("m").default;`
    #[default]
    CommonJs,
    /// `import x from "m";`
    Esm,
}

/// Which export of a module a binding refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Export {
    /// The module's default export
    Default,
    /// A named export
    Named(String),
}

/// A value on the right-hand side of a table entry or declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// JSON data, serialized compactly
    Json(Value),
    /// Source text emitted verbatim
    Raw(String),
    /// Reference to a binding
    Ident(String),
}

/// A call to the runtime's `initialize` operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializeCall {
    /// Binding of the runtime entry object
    pub runtime: String,
    /// Positional arguments, rendered verbatim
    pub args: Vec<String>,
}

/// How initialization is triggered.
///
/// `Deferred` is a two-phase start: the hook runs first with the runtime, the
/// state container and a continuation, and initialization happens only when
/// the hook calls that continuation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Initialization {
    /// Initialize as soon as the script runs
    Immediate(InitializeCall),
    /// Initialize from inside the hook's continuation
    Deferred {
        /// Hook source fragment (a function expression)
        hook: String,
        /// Arguments passed to the hook before the continuation
        hook_args: Vec<String>,
        /// Call performed by the continuation
        call: InitializeCall,
    },
}

/// One top-level statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Bind an export of a module
    Import {
        /// Local binding
        binding: String,
        /// Module specifier
        module: String,
        /// Export bound
        export: Export,
    },
    /// `var name = value;`
    Declare {
        /// Binding
        name: String,
        /// Initial value
        value: Expr,
    },
    /// `var name = { "key": value, ... };`
    Table {
        /// Binding
        name: String,
        /// Entries in emission order
        entries: Vec<(String, Expr)>,
    },
    /// The initialization block
    Initialize(Initialization),
}

/// A generated program: blocks of statements separated by blank lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    blocks: Vec<Vec<Statement>>,
}

impl Program {
    /// Creates an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a block of statements.
    pub fn push_block(&mut self, block: Vec<Statement>) {
        self.blocks.push(block);
    }

    /// Returns the blocks in emission order.
    pub fn blocks(&self) -> &[Vec<Statement>] {
        &self.blocks
    }

    /// Iterates over all statements in emission order.
    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.blocks.iter().flatten()
    }

    /// Serializes the program to source text.
    pub fn render(&self, style: ImportStyle) -> String {
        let mut out = String::new();
        for (index, block) in self.blocks.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            for statement in block {
                render_statement(&mut out, statement, style);
            }
        }
        out
    }
}

fn render_statement(out: &mut String, statement: &Statement, style: ImportStyle) {
    match statement {
        Statement::Import {
            binding,
            module,
            export,
        } => render_import(out, binding, module, export, style),
        Statement::Declare { name, value } => {
            let _ = writeln!(out, "var {name} = {};", render_expr(value));
        }
        Statement::Table { name, entries } if entries.is_empty() => {
            let _ = writeln!(out, "var {name} = {{}};");
        }
        Statement::Table { name, entries } => {
            let _ = writeln!(out, "var {name} = {{");
            for (key, value) in entries {
                let _ = writeln!(out, "  {}: {},", string_literal(key), render_expr(value));
            }
            out.push_str("};\n");
        }
        Statement::Initialize(Initialization::Immediate(call)) => {
            let _ = writeln!(out, "{};", render_call(call));
        }
        Statement::Initialize(Initialization::Deferred {
            hook,
            hook_args,
            call,
        }) => {
            let _ = writeln!(out, "({hook})({}, function () {{", hook_args.join(", "));
            let _ = writeln!(out, "  {};", render_call(call));
            out.push_str("});\n");
        }
    }
}

fn render_import(out: &mut String, binding: &str, module: &str, export: &Export, style: ImportStyle) {
    let module = string_literal(module);
    let _ = match (style, export) {
        (ImportStyle::CommonJs, Export::Default) => {
            writeln!(out, "var {binding} = require({module}).default;")
        }
        (ImportStyle::CommonJs, Export::Named(name)) => {
            writeln!(out, "var {binding} = require({module}).{name};")
        }
        (ImportStyle::Esm, Export::Default) => writeln!(out, "import {binding} from {module};"),
        (ImportStyle::Esm, Export::Named(name)) if name == binding => {
            writeln!(out, "import {{ {name} }} from {module};")
        }
        (ImportStyle::Esm, Export::Named(name)) => {
            writeln!(out, "import {{ {name} as {binding} }} from {module};")
        }
    };
}

fn render_call(call: &InitializeCall) -> String {
    format!("{}.initialize({})", call.runtime, call.args.join(", "))
}

fn render_expr(expr: &Expr) -> String {
    match expr {
        Expr::Json(value) => value.to_string(),
        Expr::Raw(source) => source.clone(),
        Expr::Ident(name) => name.clone(),
    }
}

/// JSON string literals are valid JavaScript string literals.
fn string_literal(value: &str) -> String {
    Value::String(value.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn call() -> InitializeCall {
        InitializeCall {
            runtime: "rt".into(),
            args: vec!["a".into(), "{}".into()],
        }
    }

    #[test]
    fn renders_blocks_separated_by_blank_lines() {
        let mut program = Program::new();
        program.push_block(vec![Statement::Declare {
            name: "x".into(),
            value: Expr::Json(json!({ "k": [1, 2] })),
        }]);
        program.push_block(vec![Statement::Initialize(Initialization::Immediate(call()))]);

        assert_eq!(
            program.render(ImportStyle::CommonJs),
            "var x = {\"k\":[1,2]};\n\nrt.initialize(a, {});\n"
        );
    }

    #[test]
    fn escapes_table_keys_but_not_raw_values() {
        let mut program = Program::new();
        program.push_block(vec![Statement::Table {
            name: "T".into(),
            entries: vec![("say \"hi\"".into(), Expr::Raw("a && b".into()))],
        }]);

        assert_eq!(
            program.render(ImportStyle::CommonJs),
            "var T = {\n  \"say \\\"hi\\\"\": a && b,\n};\n"
        );
    }

    #[test]
    fn empty_table_renders_inline() {
        let mut program = Program::new();
        program.push_block(vec![Statement::Table {
            name: "T".into(),
            entries: vec![],
        }]);
        assert_eq!(program.render(ImportStyle::Esm), "var T = {};\n");
    }

    #[test]
    fn import_flavors() {
        let mut program = Program::new();
        program.push_block(vec![
            Statement::Import {
                binding: "__$odl".into(),
                module: "opendatalayer".into(),
                export: Export::Named("odl".into()),
            },
            Statement::Import {
                binding: "odl".into(),
                module: "opendatalayer".into(),
                export: Export::Named("odl".into()),
            },
            Statement::Import {
                binding: "my_plugin".into(),
                module: "my-plugin".into(),
                export: Export::Default,
            },
        ]);

        assert_eq!(
            program.render(ImportStyle::CommonJs),
            "var __$odl = require(\"opendatalayer\").odl;\n\
             var odl = require(\"opendatalayer\").odl;\n\
             var my_plugin = require(\"my-plugin\").default;\n"
        );
        assert_eq!(
            program.render(ImportStyle::Esm),
            "import { odl as __$odl } from \"opendatalayer\";\n\
             import { odl } from \"opendatalayer\";\n\
             import my_plugin from \"my-plugin\";\n"
        );
    }

    #[test]
    fn deferred_initialization_wraps_call_in_continuation() {
        let mut program = Program::new();
        program.push_block(vec![Statement::Initialize(Initialization::Deferred {
            hook: "function (rt, data, next) { next(); }".into(),
            hook_args: vec!["rt".into(), "data".into()],
            call: call(),
        })]);

        assert_eq!(
            program.render(ImportStyle::CommonJs),
            "(function (rt, data, next) { next(); })(rt, data, function () {\n  rt.initialize(a, {});\n});\n"
        );
    }
}
