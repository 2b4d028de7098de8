//! odl-builder - bundles opendatalayer with its configured plugins.
//!
//! Generates the init script from the configuration, runs the bundler on it,
//! and writes a single standalone file.

use std::process;

#[tokio::main]
async fn main() {
    // Run CLI and get exit code
    let exit_code = match odl_builder::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };

    process::exit(exit_code);
}
