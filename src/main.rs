mod cli;
mod output;

use std::time::SystemTime;

use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use tidywin::catalog::AreaKind;
use tidywin::cleaner::CleanupReport;
use tidywin::orchestrator::Orchestrator;
use tidywin::process::{heavy_processes, ProcessReclaimer};
use tidywin::{admin, reclaim, space, updates};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    output::print_banner();

    match cli.command {
        Command::Scan { area } => scan(area.as_deref()),
        Command::Clean { confirm, area } => clean(confirm, area.as_deref())?,
        Command::Processes { cpu, mem } => {
            output::print_process_header();
            for record in heavy_processes(cpu, mem) {
                output::print_process_row(&record);
            }
        }
        Command::Kill { pid, name, force } => {
            let reclaimer = ProcessReclaimer::windows_default();
            match (pid, name) {
                (Some(pid), None) => {
                    let ok = reclaimer.terminate(pid, force);
                    output::print_kill_outcome(pid, ok);
                }
                (None, Some(name)) => {
                    let tally = reclaimer.terminate_by_name(&name);
                    output::print_tally(&name, &tally);
                }
                _ => bail!("pass exactly one of --pid or --name"),
            }
        }
        Command::Optimize { keep } => {
            let reclaimer = ProcessReclaimer::windows_default();
            let report = reclaimer.optimize(keep);
            output::print_optimize_report(&report);
        }
    }
    Ok(())
}

fn scan(only: Option<&str>) {
    let orchestrator = Orchestrator::windows_default();
    output::print_scan_header();

    let mut total = 0u64;
    for area in orchestrator.areas() {
        if only.is_some_and(|id| id != area.id) {
            continue;
        }
        let bytes = reclaim::measure(area);
        total += bytes;
        output::print_scan_row(&area.id, &space::format_size(bytes));
    }
    output::print_grand_total(&space::format_size(total));
}

fn clean(confirm: bool, only: Option<&str>) -> Result<()> {
    if !confirm {
        output::print_no_confirm_warning();
        scan(only);
        return Ok(());
    }
    if !admin::is_elevated() {
        output::print_not_elevated_warning();
    }

    let orchestrator = Orchestrator::windows_default();
    let now = SystemTime::now();

    let report = match only {
        None => orchestrator.full_cleanup(now),
        Some(id) => {
            let Some(area) = orchestrator.areas().iter().find(|a| a.id == id) else {
                bail!("unknown area '{id}'");
            };
            let result = match area.kind {
                AreaKind::UpdateCache => updates::clean_update_cache(area, now),
                _ => reclaim::reclaim(area, now),
            };
            CleanupReport {
                results: vec![result],
            }
        }
    };

    for result in &report.results {
        output::print_clean_result(result);
    }
    output::print_clean_summary(&report);
    Ok(())
}
