use crate::space;

/// Outcome of cleaning a single reclaimable area.
///
/// `bytes_freed` is `None` when the underlying platform operation does not
/// report a size (the recycle bin on some systems). Per-item failures land in
/// `errors`; a non-empty error list still counts as a completed result.
pub struct CleanupResult {
    pub area: String,
    pub bytes_freed: Option<u64>,
    pub files_deleted: usize,
    pub errors: Vec<String>,
}

impl CleanupResult {
    pub fn new(area: impl Into<String>) -> Self {
        Self {
            area: area.into(),
            bytes_freed: Some(0),
            files_deleted: 0,
            errors: Vec::new(),
        }
    }

    /// Human-readable freed-space figure, "unknown" when unreported.
    pub fn freed_display(&self) -> String {
        match self.bytes_freed {
            Some(bytes) => space::format_size(bytes),
            None => "unknown".to_string(),
        }
    }
}

/// Aggregated outcome of a full cleanup run, in execution order.
pub struct CleanupReport {
    pub results: Vec<CleanupResult>,
}

impl CleanupReport {
    /// Total freed bytes across all areas that reported a size.
    /// Totals are combined from raw byte counts; formatting happens only at
    /// the presentation boundary.
    pub fn total_bytes(&self) -> u64 {
        self.results.iter().filter_map(|r| r.bytes_freed).sum()
    }

    pub fn total_formatted(&self) -> String {
        space::format_size(self.total_bytes())
    }

    pub fn error_count(&self) -> usize {
        self.results.iter().map(|r| r.errors.len()).sum()
    }
}
