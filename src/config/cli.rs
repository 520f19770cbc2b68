use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "checklist-weights")]
#[command(about = "Check, balance and publish checklist section/item percentages")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Report the sum, remaining percentage and invalid entries of a sheet
    Check {
        sheet: PathBuf,
    },
    /// Split 100% equally across every entry
    Distribute {
        sheet: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Set one entry's percentage
    Set {
        sheet: PathBuf,
        #[arg(long)]
        id: u64,
        #[arg(long, allow_negative_numbers = true)]
        weight: f64,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Move an entry to another position
    Reorder {
        sheet: PathBuf,
        #[arg(long)]
        from: usize,
        #[arg(long)]
        to: usize,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Log in and save the sheet to the server
    Push {
        sheet: PathBuf,
        #[command(flatten)]
        target: TargetArgs,
        #[arg(long, env = "CHECKLIST_USERNAME")]
        username: String,
        #[arg(long, env = "CHECKLIST_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Where to write the result (defaults to overwriting the input sheet)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
#[group(required = true, multiple = false)]
pub struct TargetArgs {
    /// Checklist whose sections the sheet holds
    #[arg(long)]
    pub checklist: Option<u64>,
    /// Section whose items the sheet holds
    #[arg(long)]
    pub section: Option<u64>,
}
