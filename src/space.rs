use std::path::Path;
use walkdir::WalkDir;

/// Compute total size of a directory recursively.
///
/// Best-effort: entries that vanish or deny access between listing and stat
/// are skipped, since other processes delete and lock files concurrently.
pub fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

/// Format byte count as human-readable string using 1024-based units.
/// Values under 1 KB render as integer bytes.
pub fn format_size(bytes: u64) -> String {
    if bytes >= 1_073_741_824 {
        format!("{:.1} GB", bytes as f64 / 1_073_741_824.0)
    } else if bytes >= 1_048_576 {
        format!("{:.1} MB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1_024 {
        format!("{:.1} KB", bytes as f64 / 1_024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// Parse a human-readable size string ("5.0 MB", "512 B", "2048") into bytes.
/// Inverse of [`format_size`] within one-decimal rounding.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let (num_str, multiplier) = if let Some(n) = s.strip_suffix("GB") {
        (n, 1_073_741_824u64)
    } else if let Some(n) = s.strip_suffix("gb") {
        (n, 1_073_741_824)
    } else if let Some(n) = s.strip_suffix("MB") {
        (n, 1_048_576)
    } else if let Some(n) = s.strip_suffix("mb") {
        (n, 1_048_576)
    } else if let Some(n) = s.strip_suffix("KB") {
        (n, 1_024)
    } else if let Some(n) = s.strip_suffix("kb") {
        (n, 1_024)
    } else if let Some(n) = s.strip_suffix("B") {
        (n, 1)
    } else if let Some(n) = s.strip_suffix("b") {
        (n, 1)
    } else {
        // assume bytes if no suffix
        (s, 1)
    };

    let num: f64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    if num < 0.0 {
        return Err("Size cannot be negative".to_string());
    }

    Ok((num * multiplier as f64) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn dir_size_of_empty_directory_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(dir_size(dir.path()), 0);
    }

    #[test]
    fn dir_size_of_missing_directory_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        assert_eq!(dir_size(&missing), 0);
    }

    #[test]
    fn dir_size_sums_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.bin"), vec![0u8; 300]).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("b.bin"), vec![0u8; 700]).unwrap();
        assert_eq!(dir_size(dir.path()), 1000);
    }

    #[test]
    fn format_size_picks_largest_whole_unit() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1_048_576), "5.0 MB");
        assert_eq!(format_size(1_610_612_736), "1.5 GB");
    }

    #[test]
    fn parse_size_accepts_formatted_output() {
        assert_eq!(parse_size("512 B").unwrap(), 512);
        assert_eq!(parse_size("2.0 KB").unwrap(), 2048);
        assert_eq!(parse_size("5.0 MB").unwrap(), 5 * 1_048_576);
        assert_eq!(parse_size("100MB").unwrap(), 100 * 1_048_576);
        assert_eq!(parse_size("42").unwrap(), 42);
    }

    #[test]
    fn parse_size_rejects_garbage() {
        assert!(parse_size("lots").is_err());
        assert!(parse_size("-1 MB").is_err());
    }

    #[test]
    fn formatted_sizes_sum_back_to_exact_total() {
        // Heterogeneous unit displays must recombine into the raw byte sum.
        let parts = [512u64, 2048, 5 * 1_048_576];
        let total: u64 = parts
            .iter()
            .map(|&b| parse_size(&format_size(b)).unwrap())
            .sum();
        assert_eq!(total, 512 + 2048 + 5 * 1_048_576);
    }
}
