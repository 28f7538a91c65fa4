// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! extpack - build, catalog and conformance-test content-source extensions.
//!
//! This is the binary entry point.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use extpack::commands::{resolve, run_build, run_json, run_test};
use extpack_bundler::EsbuildCompiler;
use extpack_catalog::{Introspector, NodeLoader};
use extpack_config::{render_errors, ExtpackConfig};
use extpack_conformance::ProcessValidator;
use extpack_core::ExtpackError;

/// Exit status for configuration errors.
const CONFIG_ERROR_EXIT: i32 = 2;

/// extpack - build, catalog and conformance-test content-source extensions.
#[derive(Parser, Debug)]
#[command(name = "extpack", version, about, long_about = None)]
struct Cli {
    /// Use this config file instead of the standard lookup.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile every extension under the source directory.
    Build,
    /// Write index.json for the compiled extensions.
    Json {
        /// Directory holding the compiled artifacts.
        #[arg(long, value_name = "DIR")]
        path: Option<PathBuf>,
    },
    /// Run the conformance tests.
    Test {
        /// Show validator stdout.
        #[arg(long)]
        nocapture: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => extpack_config::load_and_validate_path(path),
        None => extpack_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            render_errors(&errors);
            std::process::exit(CONFIG_ERROR_EXIT);
        }
    };

    extpack::init_tracing(&config.pipeline.log_level);
    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    if let Err(e) = dispatch(cli.command, &config).await {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(e.exit_code());
    }
}

async fn dispatch(command: Commands, config: &ExtpackConfig) -> Result<(), ExtpackError> {
    let project_dir = std::env::current_dir()
        .map_err(|e| ExtpackError::io("failed to read current directory", e))?;
    let introspector = Introspector::new(NodeLoader::new(&config.runtime.program));

    match command {
        Commands::Build => {
            let compiler =
                EsbuildCompiler::new(&config.bundler.program, config.bundler.extra_args.clone());
            run_build(config, &project_dir, &compiler, &introspector).await?;
        }
        Commands::Json { path } => {
            let dir = resolve(&project_dir, path.as_ref().unwrap_or(&config.paths.dist_dir));
            run_json(&dir, &config.discovery.artifact_extension, &introspector).await?;
        }
        Commands::Test { nocapture } => {
            let compiler =
                EsbuildCompiler::new(&config.bundler.program, config.bundler.extra_args.clone());
            let validator =
                ProcessValidator::new(&config.validator.program, config.validator.args.clone());
            run_test(config, &project_dir, compiler, validator, nocapture).await?;
        }
    }
    Ok(())
}
