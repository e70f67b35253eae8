use std::path::PathBuf;

use clap::{Args, Subcommand};
use daybook_core::{Category, Priority, TaskDate, TaskStatus, TimeBlock};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Validate tasks and push them for a date.
    Push(PushArgs),
    /// Fetch the task set for a date.
    Pull(PullArgs),
    /// Change fields of one task and push the set.
    Update(UpdateArgs),
    /// Show recent task sets, newest first.
    History(HistoryArgs),
    /// Poll a date for remote changes.
    Watch(WatchArgs),
    /// Probe the remote store.
    Check,
}

#[derive(Clone, Debug, Args)]
pub struct PushArgs {
    /// Date key (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub date: Option<TaskDate>,
    /// JSON file of raw task payloads (`-` for stdin). Without it, the cached
    /// snapshot for the date is pushed again.
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct PullArgs {
    #[arg(long)]
    pub date: Option<TaskDate>,
    /// Serve the local snapshot if one exists, without contacting the remote.
    #[arg(long)]
    pub cache: bool,
}

#[derive(Clone, Debug, Args)]
pub struct UpdateArgs {
    /// Task ID (`tsk-xxxxxxxx`).
    pub id: String,
    #[arg(long)]
    pub date: Option<TaskDate>,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub priority: Option<Priority>,
    #[arg(long)]
    pub status: Option<TaskStatus>,
    #[arg(long)]
    pub progress: Option<u8>,
    #[arg(long)]
    pub category: Option<Category>,
    #[arg(long)]
    pub estimate: Option<u32>,
    #[arg(long)]
    pub actual: Option<u32>,
    #[arg(long)]
    pub time_block: Option<TimeBlock>,
    /// Append a timestamped note.
    #[arg(long)]
    pub note: Option<String>,
    /// Mark a subtask completed by ID.
    #[arg(long)]
    pub complete_subtask: Option<String>,
    /// Raw field change as `field=value`; the value is parsed as JSON when it
    /// can be, otherwise taken as a string. Repeatable.
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub set: Vec<String>,
}

#[derive(Clone, Debug, Args)]
pub struct HistoryArgs {
    /// Number of days to look back, including today.
    #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(u32).range(1..=366))]
    pub days: u32,
}

#[derive(Clone, Debug, Args)]
pub struct WatchArgs {
    #[arg(long)]
    pub date: Option<TaskDate>,
    /// Seconds between polls.
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,
    /// Stop after this many polls; runs until interrupted when omitted.
    #[arg(long)]
    pub iterations: Option<u32>,
}
