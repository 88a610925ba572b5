use std::time::{Duration, Instant};

use sysinfo::{Pid, ProcessesToUpdate, Signal, System};
use tracing::{debug, info, warn};

/// Default thresholds for flagging a process as resource-heavy.
pub const DEFAULT_CPU_THRESHOLD: f32 = 5.0;
pub const DEFAULT_MEM_THRESHOLD_MB: f64 = 100.0;

/// Applications known to pile up worker instances.
pub const HEAVY_APPS: &[&str] = &[
    "chrome.exe",
    "firefox.exe",
    "msedge.exe",
    "spotify.exe",
    "discord.exe",
    "steam.exe",
    "skype.exe",
    "teams.exe",
];

/// Above this many live instances of a heavy app, surplus ones get reclaimed.
pub const MAX_INSTANCES: usize = 3;

/// How many of the newest instances survive an optimize pass.
pub const DEFAULT_KEEP_NEWEST: usize = 2;

/// Critical OS processes. Terminating any of these destabilizes the system.
pub const PROTECTED_PROCESSES: &[&str] = &[
    "System",
    "Registry",
    "smss.exe",
    "csrss.exe",
    "wininit.exe",
    "winlogon.exe",
    "services.exe",
    "lsass.exe",
    "svchost.exe",
    "dwm.exe",
    "explorer.exe",
];

const GRACEFUL_WAIT: Duration = Duration::from_secs(5);
const FORCED_WAIT: Duration = Duration::from_secs(2);
const EXIT_POLL: Duration = Duration::from_millis(100);

/// Point-in-time snapshot of one process. Stale the moment it is taken;
/// anything acting on it must treat "no such process" as a benign outcome.
#[derive(Debug, Clone)]
pub struct ProcessRecord {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f32,
    pub memory_mb: f64,
    pub start_time: u64,
    pub status: String,
}

/// Process names that must never be terminated, matched case-insensitively.
#[derive(Debug, Clone)]
pub struct ProtectedSet {
    names: Vec<String>,
}

impl ProtectedSet {
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        Self {
            names: names.into_iter().map(|n| n.to_lowercase()).collect(),
        }
    }

    pub fn windows_default() -> Self {
        Self::new(PROTECTED_PROCESSES.iter().map(|s| s.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.names.iter().any(|n| *n == lower)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KillTally {
    pub killed: usize,
    pub failed: usize,
    pub total_found: usize,
}

#[derive(Debug, Default)]
pub struct OptimizeReport {
    pub processes_killed: usize,
    pub memory_freed_mb: f64,
    pub actions: Vec<String>,
}

/// Snapshot every live process once. Two CPU refreshes separated by the
/// minimum sampling interval are needed for meaningful usage figures.
/// Processes that exit or deny access mid-snapshot are simply absent.
pub fn snapshot() -> Vec<ProcessRecord> {
    let mut sys = System::new_all();
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    sys.refresh_processes(ProcessesToUpdate::All, true);

    sys.processes()
        .iter()
        .map(|(pid, proc_)| ProcessRecord {
            pid: pid.as_u32(),
            name: proc_.name().to_string_lossy().to_string(),
            cpu_percent: proc_.cpu_usage(),
            memory_mb: proc_.memory() as f64 / 1_048_576.0,
            start_time: proc_.start_time(),
            status: format!("{:?}", proc_.status()),
        })
        .collect()
}

/// Keep records exceeding either threshold, sorted descending by CPU.
/// The sort is stable, so ties keep their enumeration order.
pub fn filter_heavy(
    mut records: Vec<ProcessRecord>,
    cpu_threshold: f32,
    mem_threshold_mb: f64,
) -> Vec<ProcessRecord> {
    records.retain(|r| r.cpu_percent > cpu_threshold || r.memory_mb > mem_threshold_mb);
    records.sort_by(|a, b| {
        b.cpu_percent
            .partial_cmp(&a.cpu_percent)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    records
}

/// Convenience wrapper: snapshot then filter.
pub fn heavy_processes(cpu_threshold: f32, mem_threshold_mb: f64) -> Vec<ProcessRecord> {
    filter_heavy(snapshot(), cpu_threshold, mem_threshold_mb)
}

/// Pids of the instances to terminate: all but the `keep_newest` most
/// recently created, oldest first.
pub fn excess_instances(mut instances: Vec<(u32, u64)>, keep_newest: usize) -> Vec<u32> {
    instances.sort_by_key(|&(_, start_time)| start_time);
    let cut = instances.len().saturating_sub(keep_newest);
    instances.truncate(cut);
    instances.into_iter().map(|(pid, _)| pid).collect()
}

/// Terminates processes while honoring the protected set and tolerating the
/// races inherent in acting on a stale process list.
pub struct ProcessReclaimer {
    protected: ProtectedSet,
}

impl ProcessReclaimer {
    pub fn new(protected: ProtectedSet) -> Self {
        Self { protected }
    }

    pub fn windows_default() -> Self {
        Self::new(ProtectedSet::windows_default())
    }

    /// Terminate one process. Graceful first (where the platform has a
    /// graceful signal), escalating to a forced kill after a bounded wait.
    ///
    /// Returns `true` when the process is no longer running afterwards,
    /// including the case where it was already gone. Protected names and
    /// access denial return `false`. Never panics past this boundary.
    pub fn terminate(&self, pid: u32, force: bool) -> bool {
        let pid = Pid::from_u32(pid);
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

        let signalled = match sys.process(pid) {
            // Already exited: the goal is satisfied.
            None => return true,
            Some(proc_) => {
                let name = proc_.name().to_string_lossy();
                if self.protected.contains(&name) {
                    warn!(pid = pid.as_u32(), %name, "refusing to terminate protected process");
                    return false;
                }
                debug!(pid = pid.as_u32(), %name, force, "terminating");
                if force {
                    proc_.kill()
                } else {
                    // Platforms without a graceful signal fall back to kill,
                    // matching terminate semantics on Windows.
                    proc_
                        .kill_with(Signal::Term)
                        .unwrap_or_else(|| proc_.kill())
                }
            }
        };

        if !signalled {
            // The signal was refused: either access was denied or the process
            // exited in between. Re-check liveness to tell them apart.
            sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
            return sys.process(pid).is_none();
        }

        if wait_for_exit(pid, GRACEFUL_WAIT) {
            return true;
        }
        if !force {
            sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
            match sys.process(pid) {
                None => return true,
                Some(proc_) => {
                    proc_.kill();
                }
            }
            return wait_for_exit(pid, FORCED_WAIT);
        }
        false
    }

    /// Terminate every process whose name matches case-insensitively.
    /// A process that vanished before its turn counts as killed, since the
    /// underlying call reports "already gone" as success.
    pub fn terminate_by_name(&self, name: &str) -> KillTally {
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::All, true);

        let targets: Vec<u32> = sys
            .processes()
            .iter()
            .filter(|(_, p)| p.name().to_string_lossy().eq_ignore_ascii_case(name))
            .map(|(pid, _)| pid.as_u32())
            .collect();

        let mut tally = KillTally {
            killed: 0,
            failed: 0,
            total_found: targets.len(),
        };
        for pid in targets {
            if self.terminate(pid, false) {
                tally.killed += 1;
            } else {
                tally.failed += 1;
            }
        }
        info!(target_name = name, ?tally, "terminate by name finished");
        tally
    }

    /// Reclaim surplus instances of known heavy applications: when more than
    /// [`MAX_INSTANCES`] are alive, the oldest ones beyond `keep_newest` get
    /// terminated. Freed memory is attributed as the app's average
    /// per-instance memory.
    pub fn optimize(&self, keep_newest: usize) -> OptimizeReport {
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::All, true);

        let mut report = OptimizeReport::default();
        for app in HEAVY_APPS {
            let instances: Vec<(u32, u64)> = sys
                .processes()
                .iter()
                .filter(|(_, p)| p.name().to_string_lossy().eq_ignore_ascii_case(app))
                .map(|(pid, p)| (pid.as_u32(), p.start_time()))
                .collect();
            if instances.len() <= MAX_INSTANCES {
                continue;
            }

            let total_mb: f64 = sys
                .processes()
                .values()
                .filter(|p| p.name().to_string_lossy().eq_ignore_ascii_case(app))
                .map(|p| p.memory() as f64 / 1_048_576.0)
                .sum();
            let avg_mb = total_mb / instances.len() as f64;

            for pid in excess_instances(instances, keep_newest) {
                if self.terminate(pid, false) {
                    report.processes_killed += 1;
                    report.memory_freed_mb += avg_mb;
                    report
                        .actions
                        .push(format!("Terminated stale instance of {app} (pid {pid})"));
                }
            }
        }
        report
    }
}

fn wait_for_exit(pid: Pid, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    let mut sys = System::new();
    loop {
        sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        if sys.process(pid).is_none() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(EXIT_POLL);
    }
}
