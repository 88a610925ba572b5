use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tidywin",
    about = "A Windows cleanup tool — reclaim disk space and triage runaway processes",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Measure reclaimable areas (dry-run, no deletion)
    Scan {
        /// Only measure a specific area (e.g. "temp", "browser-cache:Chrome")
        #[arg(long)]
        area: Option<String>,
    },

    /// Clean reclaimable areas and empty the recycle bin
    Clean {
        /// Actually delete files. Without this flag, behaves like scan.
        #[arg(long)]
        confirm: bool,

        /// Only clean a specific area
        #[arg(long)]
        area: Option<String>,
    },

    /// List resource-heavy processes
    Processes {
        /// CPU percent threshold
        #[arg(long, default_value_t = tidywin::process::DEFAULT_CPU_THRESHOLD)]
        cpu: f32,

        /// Resident memory threshold in MB
        #[arg(long, default_value_t = tidywin::process::DEFAULT_MEM_THRESHOLD_MB)]
        mem: f64,
    },

    /// Terminate a process by pid, or all processes matching a name
    Kill {
        /// Target pid
        #[arg(long)]
        pid: Option<u32>,

        /// Target process name (case-insensitive, e.g. "notepad.exe")
        #[arg(long)]
        name: Option<String>,

        /// Skip graceful termination and kill outright
        #[arg(long)]
        force: bool,
    },

    /// Terminate surplus instances of known resource-heavy applications
    Optimize {
        /// How many of the newest instances of each app to keep
        #[arg(long, default_value_t = tidywin::process::DEFAULT_KEEP_NEWEST)]
        keep: usize,
    },
}
