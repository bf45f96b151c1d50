// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: CLI entry point for the vmsh topology shell.
// Author: Lukas Bower
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! CLI entry point for the vmsh topology shell.

use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{info, LevelFilter};
use vmsh::{default_config_path, load_config, Shell, VmshConfig};
use vmsh_core::Vmsh;

/// vmsh command-line arguments.
#[derive(Debug, Parser)]
#[command(author = "Lukas Bower", version, about = "Virtual machine topology shell", long_about = None)]
struct Cli {
    /// Path to a vmsh TOML configuration file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Execute commands from a script file instead of starting an interactive shell.
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let mut builder =
        env_logger::Builder::from_env(Env::default().default_filter_or(default_level.as_str()));
    builder.format_timestamp_millis();
    let _ = builder.try_init();
}

fn resolve_config_path(cli_path: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        return Some(path);
    }
    if let Ok(value) = env::var("VMSH_CONFIG") {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    let fallback = default_config_path();
    fallback.is_file().then_some(fallback)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match resolve_config_path(cli.config) {
        Some(path) => {
            info!("loading config from {}", path.display());
            load_config(&path)?
        }
        None => VmshConfig::default(),
    };

    let stdout = io::stdout();
    let vmsh = Vmsh::with_options(config.namespace_options());
    let mut shell =
        Shell::new(vmsh, stdout.lock(), io::stderr()).with_prompt(config.shell.prompt.as_str());

    if let Some(path) = cli.script {
        let file = File::open(&path)
            .with_context(|| format!("failed to open script {}", path.display()))?;
        shell.run_script(BufReader::new(file))?;
    } else {
        let stdin = io::stdin();
        shell.repl(stdin.lock())?;
    }
    Ok(())
}
