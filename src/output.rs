use colored::Colorize;

use tidywin::cleaner::{CleanupReport, CleanupResult};
use tidywin::process::{KillTally, OptimizeReport, ProcessRecord};

pub fn print_banner() {
    println!("{}", "tidywin - Windows Cleanup Tool v0.3.0".bold().cyan());
    println!();
}

pub fn print_scan_header() {
    println!("{}", "=== Reclaimable space ===".bold().white());
}

pub fn print_scan_row(area: &str, size: &str) {
    println!("  {:<28} {}", area, size.yellow());
}

pub fn print_grand_total(total: &str) {
    println!("  {}", "─".repeat(40).dimmed());
    println!("  {:<28} {}", "Total reclaimable:".bold(), total.green().bold());
    println!();
}

pub fn print_clean_result(result: &CleanupResult) {
    println!(
        "  {:<28} {}  {}",
        result.area,
        result.freed_display().green(),
        format!("({} files)", result.files_deleted).dimmed()
    );
    for error in &result.errors {
        println!("    {} {}", "!".red().bold(), error.red());
    }
}

pub fn print_clean_summary(report: &CleanupReport) {
    println!("  {}", "─".repeat(40).dimmed());
    println!(
        "  {:<28} {}",
        "Total freed:".bold(),
        report.total_formatted().green().bold()
    );
    if report.error_count() > 0 {
        println!(
            "  {}",
            format!("{} entries could not be deleted", report.error_count()).yellow()
        );
    }
    println!();
}

pub fn print_process_header() {
    println!(
        "{}",
        format!("  {:>8}  {:>6}  {:>10}  NAME", "PID", "CPU%", "MEM").bold()
    );
}

pub fn print_process_row(record: &ProcessRecord) {
    println!(
        "  {:>8}  {:>6.1}  {:>10}  {}",
        record.pid,
        record.cpu_percent,
        format!("{:.1} MB", record.memory_mb),
        record.name
    );
}

pub fn print_kill_outcome(pid: u32, ok: bool) {
    if ok {
        println!("{} process {pid} is no longer running", "OK".green().bold());
    } else {
        println!(
            "{} could not terminate process {pid} (protected or access denied)",
            "Failed".red().bold()
        );
    }
}

pub fn print_tally(name: &str, tally: &KillTally) {
    println!(
        "{name}: {} killed, {} failed, {} found",
        tally.killed.to_string().green(),
        tally.failed.to_string().red(),
        tally.total_found
    );
}

pub fn print_optimize_report(report: &OptimizeReport) {
    for action in &report.actions {
        println!("  {}", action.dimmed());
    }
    println!(
        "{} {} processes terminated, ~{:.1} MB freed",
        "Done.".green().bold(),
        report.processes_killed,
        report.memory_freed_mb
    );
}

pub fn print_no_confirm_warning() {
    println!(
        "{}",
        "No --confirm flag provided. Running as dry-run scan."
            .yellow()
            .bold()
    );
    println!();
}

pub fn print_not_elevated_warning() {
    println!(
        "{}",
        "Not running elevated — some system areas may be skipped."
            .yellow()
    );
    println!();
}
