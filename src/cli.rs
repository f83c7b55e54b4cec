use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// pal - prompt assembly compiler
#[derive(Parser, Debug)]
#[command(name = "pal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Emit machine-readable JSON events instead of human output
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile a prompt assembly into its final prompt string
    Compile {
        /// Manifest to compile (path or https:// URL)
        file: String,

        /// Variable bindings as an inline JSON object
        #[arg(long, value_name = "JSON")]
        vars: Option<String>,

        /// Read variable bindings from a JSON file
        #[arg(long, value_name = "FILE")]
        vars_file: Option<PathBuf>,

        /// Write the compiled prompt to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Check every .pal and .pal.lib document under a directory
    Lint {
        /// File or directory to lint
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Treat warnings as failures
        #[arg(long)]
        strict_warnings: bool,
    },

    /// Show a manifest's metadata without compiling it
    Info {
        /// Manifest to inspect (path or https:// URL)
        file: String,
    },
}
