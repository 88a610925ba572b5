use std::time::SystemTime;

use tracing::info;

use crate::catalog::{self, AreaKind, ReclaimableArea};
use crate::cleaner::CleanupReport;
use crate::recycle;
use crate::reclaim;
use crate::updates;

/// Runs the catalog areas in fixed order and aggregates one report.
/// The catalog is injected at construction so tests substitute fixtures.
pub struct Orchestrator {
    catalog: Vec<ReclaimableArea>,
}

impl Orchestrator {
    pub fn new(catalog: Vec<ReclaimableArea>) -> Self {
        Self { catalog }
    }

    pub fn windows_default() -> Self {
        Self::new(catalog::windows_default())
    }

    pub fn areas(&self) -> &[ReclaimableArea] {
        &self.catalog
    }

    /// Full cleanup pass: temp files, browser caches, recycle bin, logs,
    /// update cache. A failed category is reported alongside the others and
    /// never aborts the run.
    pub fn full_cleanup(&self, now: SystemTime) -> CleanupReport {
        let mut results = Vec::new();

        for area in self.areas_of(AreaKind::Temp) {
            info!(area = %area.id, "cleaning temp files");
            results.push(reclaim::reclaim(area, now));
        }
        for area in self.areas_of(AreaKind::BrowserCache) {
            info!(area = %area.id, "cleaning browser cache");
            results.push(reclaim::reclaim(area, now));
        }
        info!("emptying recycle bin");
        results.push(recycle::empty_recycle_bin());
        for area in self.areas_of(AreaKind::Logs) {
            info!(area = %area.id, "cleaning logs");
            results.push(reclaim::reclaim(area, now));
        }
        for area in self.areas_of(AreaKind::UpdateCache) {
            info!(area = %area.id, "cleaning update cache");
            results.push(updates::clean_update_cache(area, now));
        }

        CleanupReport { results }
    }

    fn areas_of(&self, kind: AreaKind) -> impl Iterator<Item = &ReclaimableArea> {
        self.catalog.iter().filter(move |a| a.kind == kind)
    }
}

// Not on Windows: full_cleanup would empty the developer's real recycle bin
// and skew the totals below.
#[cfg(all(test, not(windows)))]
mod tests {
    use super::*;
    use crate::catalog::Retention;
    use std::fs;
    use std::time::Duration;

    #[test]
    fn categories_run_in_fixed_order_and_failures_stay_isolated() {
        let dir = tempfile::tempdir().unwrap();

        let temp_root = dir.path().join("temp");
        fs::create_dir(&temp_root).unwrap();
        fs::write(temp_root.join("stale.tmp"), vec![0u8; 64]).unwrap();

        let cache_root = dir.path().join("cache");
        fs::create_dir(&cache_root).unwrap();
        fs::write(cache_root.join("blob"), vec![0u8; 200]).unwrap();

        let orchestrator = Orchestrator::new(vec![
            ReclaimableArea {
                id: "temp".to_string(),
                kind: AreaKind::Temp,
                paths: vec![temp_root.clone()],
                retention: Retention::OlderThan {
                    min_age: Duration::from_secs(60),
                    extensions: None,
                },
            },
            ReclaimableArea {
                id: "browser-cache:Chrome".to_string(),
                kind: AreaKind::BrowserCache,
                paths: vec![cache_root.clone()],
                retention: Retention::Subtree,
            },
            ReclaimableArea {
                id: "logs".to_string(),
                kind: AreaKind::Logs,
                paths: vec![dir.path().join("no-logs-here")],
                retention: Retention::OlderThan {
                    min_age: Duration::from_secs(60),
                    extensions: None,
                },
            },
        ]);

        // Pretend it is next year so the temp file is comfortably stale.
        let now = SystemTime::now() + Duration::from_secs(365 * 24 * 60 * 60);
        let report = orchestrator.full_cleanup(now);

        let areas: Vec<&str> = report.results.iter().map(|r| r.area.as_str()).collect();
        assert_eq!(areas, ["temp", "browser-cache:Chrome", "recycle-bin", "logs"]);

        // The recycle bin failing (or reporting unknown) must not stop the
        // filesystem categories from completing.
        assert_eq!(report.total_bytes(), 64 + 200);
        assert!(!temp_root.join("stale.tmp").exists());
        assert!(!cache_root.exists());
    }
}
