//! pal CLI - prompt assembly compiler
//!
//! Usage: pal <COMMAND>
//!
//! Commands:
//!   compile  Compile a prompt assembly into its final prompt string
//!   lint     Check every .pal and .pal.lib document under a directory
//!   info     Show a manifest's metadata without compiling it

mod cli;
mod commands;
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let json = cli.json;
    if let Err(err) = run(cli) {
        ui::print_error(&err, json);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Compile {
            file,
            vars,
            vars_file,
            output,
        } => commands::cmd_compile(
            &file,
            vars.as_deref(),
            vars_file.as_deref(),
            output.as_deref(),
            cli.json,
        ),
        Commands::Lint {
            path,
            strict_warnings,
        } => commands::cmd_lint(&path, strict_warnings, cli.json, cli.verbose),
        Commands::Info { file } => commands::cmd_info(&file, cli.json),
    }
}

/// Logs go to stderr so they never mix with the compiled prompt on
/// stdout. RUST_LOG overrides the -v mapping when set.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "pal=warn",
        1 => "pal=debug",
        _ => "pal=trace",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
