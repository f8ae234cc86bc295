//! Argument model for the `micro-gw` binary

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "micro-gw", author, version, long_about = None)]
#[command(about = "Set up, build and run micro gateway projects for a label")]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show usage for micro-gw or one of its commands
    Help(HelpArgs),
    /// Set up a micro gateway project for a label
    Setup(SetupArgs),
    /// Package a label project into a distribution
    Build(LabelArgs),
    /// Run a micro gateway for a label
    Run(LabelArgs),
}

#[derive(Debug, Args)]
pub struct HelpArgs {
    /// Command to show usage for
    #[arg(value_name = "COMMAND")]
    pub topics: Vec<String>,
}

#[derive(Debug, Args)]
pub struct SetupArgs {
    /// Label whose APIs and policies are fetched
    #[arg(short, long)]
    pub label: Option<String>,
    /// Workspace root; remembered for later commands
    #[arg(long, value_name = "DIR")]
    pub path: Option<String>,
    /// Username on the management API
    #[arg(short, long)]
    pub user: Option<String>,
    /// Password on the management API
    #[arg(short, long)]
    pub password: Option<String>,
    /// Forget the cached username and client before setting up
    #[arg(long)]
    pub reset: bool,
}

#[derive(Debug, Args)]
pub struct LabelArgs {
    /// Label project to use
    #[arg(short, long)]
    pub label: Option<String>,
}

/// Command names that `help <topic>` accepts
pub const COMMAND_NAMES: [&str; 4] = ["help", "setup", "build", "run"];

// Conversion implementations

impl From<SetupArgs> for mgw_commands::setup::SetupArgs {
    fn from(args: SetupArgs) -> Self {
        Self {
            label: args.label,
            path: args.path,
            user: args.user,
            password: args.password,
            reset: args.reset,
        }
    }
}

impl From<LabelArgs> for mgw_commands::build::BuildArgs {
    fn from(args: LabelArgs) -> Self {
        Self { label: args.label }
    }
}

impl From<LabelArgs> for mgw_commands::run::RunArgs {
    fn from(args: LabelArgs) -> Self {
        Self { label: args.label }
    }
}
