use crate::cleaner::CleanupResult;

/// Empty the recycle bin for all drives.
///
/// The size estimate comes from querying the bin beforehand; when the query
/// fails the bin is still emptied and the freed figure is reported unknown.
#[cfg(windows)]
pub fn empty_recycle_bin() -> CleanupResult {
    use std::ptr;
    use tracing::{info, warn};
    use winapi::um::shellapi::{
        SHEmptyRecycleBinW, SHQueryRecycleBinW, SHERB_NOCONFIRMATION, SHERB_NOPROGRESSUI,
        SHERB_NOSOUND, SHQUERYRBINFO,
    };

    let mut result = CleanupResult::new("recycle-bin");

    unsafe {
        let mut bin_info = SHQUERYRBINFO {
            cbSize: std::mem::size_of::<SHQUERYRBINFO>() as u32,
            i64Size: 0,
            i64NumItems: 0,
        };
        let estimate = if SHQueryRecycleBinW(ptr::null(), &mut bin_info) == 0 {
            Some((bin_info.i64Size.max(0) as u64, bin_info.i64NumItems.max(0) as usize))
        } else {
            None
        };

        let hr = SHEmptyRecycleBinW(
            ptr::null_mut(),
            ptr::null(),
            SHERB_NOCONFIRMATION | SHERB_NOPROGRESSUI | SHERB_NOSOUND,
        );
        if hr == 0 {
            match estimate {
                Some((bytes, items)) => {
                    result.bytes_freed = Some(bytes);
                    result.files_deleted = items;
                }
                None => result.bytes_freed = None,
            }
            info!(freed = %result.freed_display(), "recycle bin emptied");
        } else {
            warn!(hresult = format!("{hr:#010x}"), "failed to empty recycle bin");
            result
                .errors
                .push(format!("Failed to empty recycle bin (HRESULT {hr:#010x})"));
        }
    }
    result
}

#[cfg(not(windows))]
pub fn empty_recycle_bin() -> CleanupResult {
    let mut result = CleanupResult::new("recycle-bin");
    result.bytes_freed = None;
    result
        .errors
        .push("Emptying the recycle bin is only supported on Windows".to_string());
    result
}
