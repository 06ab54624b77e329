//! tailmerge CLI - install design-system animations into Tailwind configs.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "tailmerge")]
#[command(about = "Install design-system keyframes and animations into Tailwind configs")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge keyframes and animations into the project's Tailwind config
    Merge {
        /// Project root containing tailwind.config.{ts,js}
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Patch file (.json or .toml) with `keyframes` and `animation` tables
        #[arg(short, long)]
        patch: Option<PathBuf>,

        /// Built-in preset to apply (repeatable)
        #[arg(long = "preset")]
        presets: Vec<String>,

        /// Print the merged config instead of writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Create a starter Tailwind config
    Init {
        /// Project root to create the config in
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Module format of the generated config
        #[arg(short, long, value_enum, default_value_t = InitFormat::Esm)]
        format: InitFormat,

        /// Overwrite an existing config
        #[arg(short, long)]
        yes: bool,
    },

    /// List built-in animation presets
    Presets,
}

/// Module format for `init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InitFormat {
    /// tailwind.config.ts with `export default`
    Esm,
    /// tailwind.config.js with `module.exports`
    Cjs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging on stderr so --dry-run output stays clean
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Merge {
            root,
            patch,
            presets,
            dry_run,
        } => {
            commands::merge::run(root, patch, presets, dry_run)?;
        }
        Commands::Init { root, format, yes } => {
            commands::init::run(root, format, yes)?;
        }
        Commands::Presets => {
            commands::presets::run();
        }
    }

    Ok(())
}
