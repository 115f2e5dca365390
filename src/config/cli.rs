use crate::domain::model::GroupBy;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "fn-order")]
#[command(about = "Finds fiscal drives expiring next month and orders replacements")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Extract and aggregate only; write nothing and call no external service
    #[arg(long)]
    pub dry_run: bool,

    /// Print the aggregated groups as JSON
    #[arg(long)]
    pub print: bool,

    /// Skip the chat notifications
    #[arg(long)]
    pub no_notify: bool,

    /// Start a workflow task per group even if bitrix.enabled is false
    #[arg(long)]
    pub create_tasks: bool,

    /// Override local.group_by from the config
    #[arg(long, value_enum)]
    pub group_by: Option<GroupBy>,

    /// Use this date instead of today when building the file pattern
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Directory for the daily log file
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}
