use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::catalog::{ReclaimableArea, Retention};
use crate::cleaner::CleanupResult;
use crate::space;

/// Reclaim one area. `now` is injected so callers (and tests) control ageing.
///
/// Freed space is measured as before-minus-after per path; concurrent growth
/// can make the delta negative, which saturates to zero rather than erroring.
pub fn reclaim(area: &ReclaimableArea, now: SystemTime) -> CleanupResult {
    let mut result = CleanupResult::new(area.id.clone());
    let mut bytes_freed = 0u64;

    for path in resolve_paths(&area.paths) {
        if !path.exists() {
            continue;
        }
        debug!(area = %area.id, path = %path.display(), "reclaiming");
        let before = space::dir_size(&path);

        match &area.retention {
            Retention::Subtree => {
                result.files_deleted += remove_tree_best_effort(&path);
            }
            Retention::OlderThan {
                min_age,
                extensions,
            } => {
                let cutoff = now
                    .checked_sub(*min_age)
                    .unwrap_or(SystemTime::UNIX_EPOCH);
                delete_files_older_than(&path, cutoff, *extensions, &mut result);
                remove_empty_subdirs(&path);
            }
        }

        let after = space::dir_size(&path);
        bytes_freed += before.saturating_sub(after);
    }

    if !result.errors.is_empty() {
        warn!(
            area = %area.id,
            errors = result.errors.len(),
            "some entries could not be deleted"
        );
    }
    result.bytes_freed = Some(bytes_freed);
    result
}

/// Measure an area without deleting anything.
pub fn measure(area: &ReclaimableArea) -> u64 {
    resolve_paths(&area.paths)
        .iter()
        .map(|p| space::dir_size(p))
        .sum()
}

/// Expand `*` path segments against the live filesystem.
/// A pattern whose parent cannot be read resolves to nothing.
pub fn resolve_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut resolved = Vec::new();
    for path in paths {
        expand_wildcard(path, &mut resolved);
    }
    resolved
}

fn expand_wildcard(path: &Path, out: &mut Vec<PathBuf>) {
    let components: Vec<_> = path.components().collect();
    for (i, component) in components.iter().enumerate() {
        if component.as_os_str() != "*" {
            continue;
        }
        let prefix: PathBuf = components[..i].iter().collect();
        let suffix: PathBuf = components[i + 1..].iter().collect();
        if let Ok(read_dir) = std::fs::read_dir(&prefix) {
            for entry in read_dir.flatten() {
                if suffix.as_os_str().is_empty() {
                    out.push(entry.path());
                } else {
                    expand_wildcard(&entry.path().join(&suffix), out);
                }
            }
        }
        return;
    }
    out.push(path.to_path_buf());
}

/// Delete files last modified before `cutoff`, recording per-item failures.
/// A single locked or vanished file never aborts the walk.
fn delete_files_older_than(
    root: &Path,
    cutoff: SystemTime,
    extensions: Option<&[&str]>,
    result: &mut CleanupResult,
) {
    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(exts) = extensions {
            let name = entry.file_name().to_string_lossy().to_lowercase();
            if !exts.iter().any(|ext| name.ends_with(ext)) {
                continue;
            }
        }
        let modified = match entry.metadata().ok().and_then(|m| m.modified().ok()) {
            Some(t) => t,
            None => continue,
        };
        if modified >= cutoff {
            continue;
        }
        match std::fs::remove_file(entry.path()) {
            Ok(()) => result.files_deleted += 1,
            // Deleted by another actor between listing and unlink.
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => result
                .errors
                .push(format!("Failed to delete {}: {e}", entry.path().display())),
        }
    }
}

/// Remove directories under `root` that ended up empty. `root` itself stays.
fn remove_empty_subdirs(root: &Path) {
    for entry in WalkDir::new(root)
        .min_depth(1)
        .contents_first(true)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_dir() {
            // Only succeeds when empty.
            let _ = std::fs::remove_dir(entry.path());
        }
    }
}

/// Delete an entire subtree, swallowing individual failures, and report how
/// many files went away. Unlike `fs::remove_dir_all` this keeps going past
/// locked entries.
fn remove_tree_best_effort(root: &Path) -> usize {
    let mut removed = 0;
    for entry in WalkDir::new(root)
        .contents_first(true)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_dir() {
            let _ = std::fs::remove_dir(entry.path());
        } else if std::fs::remove_file(entry.path()).is_ok() {
            removed += 1;
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::AreaKind;
    use std::fs::{self, File};
    use std::time::Duration;

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    fn write_aged(path: &Path, contents: &[u8], age: Duration) {
        fs::write(path, contents).unwrap();
        let mtime = SystemTime::now().checked_sub(age).unwrap();
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(mtime)
            .unwrap();
    }

    fn age_area(paths: Vec<PathBuf>, min_age: Duration) -> ReclaimableArea {
        ReclaimableArea {
            id: "temp".to_string(),
            kind: AreaKind::Temp,
            paths,
            retention: Retention::OlderThan {
                min_age,
                extensions: None,
            },
        }
    }

    #[test]
    fn deletes_only_files_older_than_threshold() {
        let dir = tempfile::tempdir().unwrap();
        write_aged(&dir.path().join("fresh.tmp"), b"aaaa", Duration::ZERO);
        write_aged(&dir.path().join("two-days.tmp"), b"bbbbbbbb", 2 * DAY);
        write_aged(&dir.path().join("ten-days.tmp"), b"cccccccccccc", 10 * DAY);

        let area = age_area(vec![dir.path().to_path_buf()], DAY);
        let result = reclaim(&area, SystemTime::now());

        assert_eq!(result.files_deleted, 2);
        assert_eq!(result.bytes_freed, Some(8 + 12));
        assert!(result.errors.is_empty());
        assert!(dir.path().join("fresh.tmp").exists());
        assert!(!dir.path().join("two-days.tmp").exists());
        assert!(!dir.path().join("ten-days.tmp").exists());
    }

    #[test]
    fn injected_clock_controls_ageing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("recent.tmp"), b"data").unwrap();

        let area = age_area(vec![dir.path().to_path_buf()], DAY);

        // From today's perspective the file is new.
        let result = reclaim(&area, SystemTime::now());
        assert_eq!(result.files_deleted, 0);
        assert!(dir.path().join("recent.tmp").exists());

        // From next week's perspective it is stale.
        let next_week = SystemTime::now() + 7 * DAY;
        let result = reclaim(&area, next_week);
        assert_eq!(result.files_deleted, 1);
        assert!(!dir.path().join("recent.tmp").exists());
    }

    #[test]
    fn extension_allow_list_limits_deletion() {
        let dir = tempfile::tempdir().unwrap();
        write_aged(&dir.path().join("old.log"), b"log!", 30 * DAY);
        write_aged(&dir.path().join("OLD.TXT"), b"txt!", 30 * DAY);
        write_aged(&dir.path().join("old.db"), b"keep", 30 * DAY);

        let area = ReclaimableArea {
            id: "logs".to_string(),
            kind: AreaKind::Logs,
            paths: vec![dir.path().to_path_buf()],
            retention: Retention::OlderThan {
                min_age: 7 * DAY,
                extensions: Some(&[".log", ".txt", ".etl"]),
            },
        };
        let result = reclaim(&area, SystemTime::now());

        assert_eq!(result.files_deleted, 2);
        assert!(!dir.path().join("old.log").exists());
        assert!(!dir.path().join("OLD.TXT").exists());
        assert!(dir.path().join("old.db").exists());
    }

    #[test]
    fn emptied_subdirectories_are_removed() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("session");
        fs::create_dir(&sub).unwrap();
        write_aged(&sub.join("stale.tmp"), b"x", 3 * DAY);

        let area = age_area(vec![dir.path().to_path_buf()], DAY);
        let result = reclaim(&area, SystemTime::now());

        assert_eq!(result.files_deleted, 1);
        assert!(!sub.exists());
        assert!(dir.path().exists());
    }

    #[test]
    fn subdirectories_with_fresh_files_survive() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("active");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("in-use.tmp"), b"x").unwrap();

        let area = age_area(vec![dir.path().to_path_buf()], DAY);
        reclaim(&area, SystemTime::now());

        assert!(sub.join("in-use.tmp").exists());
    }

    #[test]
    fn subtree_retention_removes_everything() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("Cache");
        fs::create_dir_all(cache.join("js")).unwrap();
        fs::write(cache.join("index"), vec![0u8; 100]).unwrap();
        fs::write(cache.join("js").join("blob"), vec![0u8; 400]).unwrap();

        let area = ReclaimableArea {
            id: "browser-cache:Chrome".to_string(),
            kind: AreaKind::BrowserCache,
            paths: vec![cache.clone()],
            retention: Retention::Subtree,
        };
        let result = reclaim(&area, SystemTime::now());

        assert_eq!(result.files_deleted, 2);
        assert_eq!(result.bytes_freed, Some(500));
        assert!(!cache.exists());
    }

    #[test]
    fn missing_paths_are_skipped_without_error() {
        let dir = tempfile::tempdir().unwrap();
        let area = age_area(vec![dir.path().join("never-existed")], DAY);
        let result = reclaim(&area, SystemTime::now());

        assert_eq!(result.bytes_freed, Some(0));
        assert_eq!(result.files_deleted, 0);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn wildcard_segments_resolve_against_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let profiles = dir.path().join("Profiles");
        for profile in ["abc.default", "xyz.dev"] {
            let cache2 = profiles.join(profile).join("cache2");
            fs::create_dir_all(&cache2).unwrap();
            fs::write(cache2.join("entry"), vec![0u8; 50]).unwrap();
        }

        let pattern = profiles.join("*").join("cache2");
        let mut resolved = resolve_paths(&[pattern.clone()]);
        resolved.sort();
        assert_eq!(resolved.len(), 2);
        assert!(resolved.iter().all(|p| p.ends_with("cache2")));

        let area = ReclaimableArea {
            id: "browser-cache:Firefox".to_string(),
            kind: AreaKind::BrowserCache,
            paths: vec![pattern],
            retention: Retention::Subtree,
        };
        let result = reclaim(&area, SystemTime::now());
        assert_eq!(result.files_deleted, 2);
        assert_eq!(result.bytes_freed, Some(100));
    }

    #[test]
    fn wildcard_with_unreadable_parent_resolves_to_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = dir.path().join("missing").join("*").join("cache2");
        assert!(resolve_paths(&[pattern]).is_empty());
    }

    #[test]
    fn measure_reports_without_deleting() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("keep.tmp"), vec![0u8; 256]).unwrap();

        let area = age_area(vec![dir.path().to_path_buf()], DAY);
        assert_eq!(measure(&area), 256);
        assert!(dir.path().join("keep.tmp").exists());
    }
}
