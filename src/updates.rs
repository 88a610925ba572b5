use std::time::SystemTime;

use crate::catalog::ReclaimableArea;
use crate::cleaner::CleanupResult;
use crate::reclaim;

/// Services holding the update cache open. Stopped before deletion and
/// restarted afterwards, both best-effort.
#[cfg(windows)]
const UPDATE_SERVICES: &[&str] = &["wuauserv", "cryptSvc", "bits", "msiserver"];

/// Reclaim the Windows Update download cache.
///
/// The services are restarted even when deletion partially failed; only the
/// reclaim outcome is reported, service-control hiccups are swallowed.
pub fn clean_update_cache(area: &ReclaimableArea, now: SystemTime) -> CleanupResult {
    stop_services();
    let result = reclaim::reclaim(area, now);
    start_services();
    result
}

#[cfg(windows)]
fn stop_services() {
    for service in UPDATE_SERVICES {
        tracing::debug!(service, "stopping");
        let _ = std::process::Command::new("net")
            .args(["stop", service])
            .output();
    }
}

#[cfg(windows)]
fn start_services() {
    for service in UPDATE_SERVICES {
        tracing::debug!(service, "restarting");
        let _ = std::process::Command::new("net")
            .args(["start", service])
            .output();
    }
}

#[cfg(not(windows))]
fn stop_services() {}

#[cfg(not(windows))]
fn start_services() {}

// Not on Windows: the test would stop the machine's real update services.
#[cfg(all(test, not(windows)))]
mod tests {
    use super::*;
    use crate::catalog::{AreaKind, Retention};
    use std::fs;

    #[test]
    fn reclaims_cache_subtrees() {
        let dir = tempfile::tempdir().unwrap();
        let download = dir.path().join("Download");
        fs::create_dir(&download).unwrap();
        fs::write(download.join("update.cab"), vec![0u8; 128]).unwrap();

        let area = ReclaimableArea {
            id: "update-cache".to_string(),
            kind: AreaKind::UpdateCache,
            paths: vec![download.clone()],
            retention: Retention::Subtree,
        };
        let result = clean_update_cache(&area, SystemTime::now());

        assert_eq!(result.bytes_freed, Some(128));
        assert_eq!(result.files_deleted, 1);
        assert!(!download.exists());
    }
}
