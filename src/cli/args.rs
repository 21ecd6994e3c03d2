//! CLI argument definitions.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::install::PackageManager;

/// Toolsense - detect, install, and degrade gracefully around optional tools.
#[derive(Debug, Parser)]
#[command(name = "toolsense")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides the default config location)
    #[arg(short, long, global = true, env = "TOOLSENSE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the status of every known tool
    Status(StatusArgs),

    /// Detect tools and refresh the status cache
    Detect(DetectArgs),

    /// Install a tool with the best available package manager
    Install(InstallArgs),

    /// Check whether a tool can be installed, and how
    CanInstall(CanInstallArgs),

    /// List tools that currently provide a capability
    Resolve(ResolveArgs),

    /// Show the current degradation mode
    Mode(ModeArgs),

    /// Show recent installation attempts
    History(HistoryArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `detect` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DetectArgs {
    /// Tools to detect (default: all)
    pub tools: Vec<String>,

    /// Probe one tool at a time
    #[arg(long, conflicts_with = "workers")]
    pub sequential: bool,

    /// Worker pool size (overrides max_workers)
    #[arg(long)]
    pub workers: Option<usize>,
}

/// Arguments for the `install` command.
#[derive(Debug, Clone, clap::Args)]
pub struct InstallArgs {
    /// Tool to install
    pub tool: String,

    /// Install even if already installed
    #[arg(short, long)]
    pub force: bool,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Package manager to use
    #[arg(short, long)]
    pub manager: Option<PackageManager>,
}

/// Arguments for the `can-install` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CanInstallArgs {
    /// Tool to check
    pub tool: String,
}

/// Arguments for the `resolve` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ResolveArgs {
    /// Capability name, e.g. advanced-search
    pub capability: String,
}

/// Arguments for the `mode` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ModeArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `history` command.
#[derive(Debug, Clone, clap::Args)]
pub struct HistoryArgs {
    /// Number of entries to show
    #[arg(short = 'n', long, default_value_t = 20)]
    pub limit: usize,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
