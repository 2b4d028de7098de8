//! Command line interface for odl-builder.
//!
//! Loads the configuration, applies command line overrides, and either prints
//! the generated init script or runs a full build.

mod args;

pub use args::{Args, BundlerArg, ModuleFormat};

use anyhow::Context;
use std::path::{Path, PathBuf};

use crate::builder::Builder;
use crate::bundler::{BundlerError, BundlerKind, CommandBundler, tool_detection};
use crate::codegen::{self, GeneratorOptions};
use crate::config::{self, BuildConfiguration};
use crate::error::CliError;
use crate::fs::LocalFileSystem;

/// Main CLI entry point
pub async fn run() -> anyhow::Result<i32> {
    let args = Args::parse_args();
    init_logging(args.verbose);
    execute(args).await
}

/// Runs the CLI with already parsed arguments.
pub async fn execute(args: Args) -> anyhow::Result<i32> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let mut configuration = load_configuration(&args)?;
    args.apply_overrides(&mut configuration);

    let generator = GeneratorOptions {
        import_style: args.module_format.into(),
    };

    if args.emit_script {
        config::validation::validate_configuration(&configuration)?;
        print!("{}", codegen::generate(&configuration, &generator));
        return Ok(0);
    }

    let project_dir = configuration.base_dir().map(Path::to_path_buf);
    let bundler = select_bundler(&args, project_dir.as_deref())?;

    let mut builder = Builder::new(bundler, LocalFileSystem).with_generator_options(generator);
    if let Some(timeout) = args.timeout() {
        builder = builder.with_timeout(timeout);
    }

    let artifact = builder
        .build(Some(configuration))
        .await
        .context("build failed")?;

    println!("✓ Created {}", artifact.target_path.display());
    println!("  Size:   {} bytes", artifact.contents.len());
    println!("  SHA256: {}", artifact.checksum);
    if artifact.temp_retained {
        println!("  Init script kept at {}", artifact.temp_path.display());
    }

    Ok(0)
}

/// Loads the configuration named on the command line, or the one found in
/// the base directory, or an empty configuration.
fn load_configuration(args: &Args) -> anyhow::Result<BuildConfiguration> {
    let path: Option<PathBuf> = match &args.config {
        Some(path) => Some(path.clone()),
        None => {
            let search_dir = match &args.base_dir {
                Some(dir) => dir.clone(),
                None => std::env::current_dir().context("cannot determine working directory")?,
            };
            config::discover_configuration(&search_dir)
        }
    };

    match path {
        Some(path) => Ok(config::load_configuration(&path)?),
        None => {
            log::debug!("No configuration file found, using command line options only");
            Ok(BuildConfiguration::default())
        }
    }
}

fn select_bundler(args: &Args, project_dir: Option<&Path>) -> Result<CommandBundler, BundlerError> {
    if let (Some(kind), Some(bin)) = (args.bundler, &args.bundler_bin) {
        let bundler = CommandBundler::new(kind.into(), bin.clone());
        return Ok(match project_dir {
            Some(dir) => bundler.with_working_dir(dir),
            None => bundler,
        });
    }

    let kind = match args.bundler {
        Some(kind) => BundlerKind::from(kind),
        None => {
            // A project-local install wins over detection on PATH.
            let local = BundlerKind::ALL.into_iter().find(|kind| {
                project_dir.is_some_and(|dir| {
                    dir.join("node_modules")
                        .join(".bin")
                        .join(kind.program())
                        .is_file()
                })
            });
            local
                .or_else(tool_detection::detect_bundler)
                .ok_or_else(|| BundlerError::NotFound {
                    program: "browserify".to_string(),
                })?
        }
    };

    CommandBundler::locate(kind, project_dir)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}
