use std::path::PathBuf;
use std::time::Duration;

/// Default retention for temp areas: files untouched for a day are fair game.
pub const TEMP_MIN_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// Default retention for log areas: a week.
pub const LOG_MIN_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Only these extensions are deleted from log areas.
pub const LOG_EXTENSIONS: &[&str] = &[".log", ".txt", ".etl"];

/// Where an area slots into the fixed cleanup order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaKind {
    Temp,
    BrowserCache,
    Logs,
    UpdateCache,
}

/// How files inside an area are selected for deletion.
#[derive(Debug, Clone)]
pub enum Retention {
    /// Remove the whole subtree, best-effort. Cache directories are safe to
    /// leave partially cleaned, so individual failures are swallowed.
    Subtree,
    /// Delete files whose last modification is older than `min_age`.
    /// When `extensions` is set, only matching files qualify.
    OlderThan {
        min_age: Duration,
        extensions: Option<&'static [&'static str]>,
    },
}

/// A filesystem location eligible for cleanup. Immutable once built.
///
/// Candidate paths may contain a `*` segment (Firefox profile directories)
/// which is resolved against the live filesystem at reclaim time. Paths that
/// do not exist are skipped downstream, so a missing environment variable
/// simply degrades the area instead of failing catalog construction.
#[derive(Debug, Clone)]
pub struct ReclaimableArea {
    pub id: String,
    pub kind: AreaKind,
    pub paths: Vec<PathBuf>,
    pub retention: Retention,
}

fn env_path(var: &str) -> PathBuf {
    std::env::var_os(var).map(PathBuf::from).unwrap_or_default()
}

fn local_appdata() -> PathBuf {
    std::env::var_os("LOCALAPPDATA")
        .map(PathBuf::from)
        .or_else(dirs::data_local_dir)
        .unwrap_or_default()
}

fn roaming_appdata() -> PathBuf {
    std::env::var_os("APPDATA")
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
        .unwrap_or_default()
}

/// The fixed catalog of reclaimable areas on a Windows install.
pub fn windows_default() -> Vec<ReclaimableArea> {
    let local = local_appdata();
    let roaming = roaming_appdata();

    vec![
        ReclaimableArea {
            id: "temp".to_string(),
            kind: AreaKind::Temp,
            paths: vec![
                env_path("TEMP"),
                env_path("TMP"),
                local.join("Temp"),
                PathBuf::from(r"C:\Windows\Temp"),
                PathBuf::from(r"C:\Windows\Prefetch"),
            ],
            retention: Retention::OlderThan {
                min_age: TEMP_MIN_AGE,
                extensions: None,
            },
        },
        ReclaimableArea {
            id: "browser-cache:Chrome".to_string(),
            kind: AreaKind::BrowserCache,
            paths: vec![
                local.join(r"Google\Chrome\User Data\Default\Cache"),
                local.join(r"Google\Chrome\User Data\Default\Code Cache"),
            ],
            retention: Retention::Subtree,
        },
        ReclaimableArea {
            id: "browser-cache:Edge".to_string(),
            kind: AreaKind::BrowserCache,
            paths: vec![
                local.join(r"Microsoft\Edge\User Data\Default\Cache"),
                local.join(r"Microsoft\Edge\User Data\Default\Code Cache"),
            ],
            retention: Retention::Subtree,
        },
        ReclaimableArea {
            id: "browser-cache:Firefox".to_string(),
            kind: AreaKind::BrowserCache,
            // Profile directory names are generated, hence the wildcard.
            paths: vec![roaming.join(r"Mozilla\Firefox\Profiles\*\cache2")],
            retention: Retention::Subtree,
        },
        ReclaimableArea {
            id: "logs".to_string(),
            kind: AreaKind::Logs,
            paths: vec![
                PathBuf::from(r"C:\Windows\Logs"),
                PathBuf::from(r"C:\Windows\System32\LogFiles"),
                local.join(r"Microsoft\Windows\WebCache"),
            ],
            retention: Retention::OlderThan {
                min_age: LOG_MIN_AGE,
                extensions: Some(LOG_EXTENSIONS),
            },
        },
        ReclaimableArea {
            id: "update-cache".to_string(),
            kind: AreaKind::UpdateCache,
            paths: vec![
                PathBuf::from(r"C:\Windows\SoftwareDistribution\Download"),
                PathBuf::from(r"C:\Windows\System32\catroot2"),
            ],
            retention: Retention::Subtree,
        },
    ]
}
