/// Whether the current process runs with elevated privileges.
/// Used to warn before cleanup, never to block it.
#[cfg(windows)]
pub fn is_elevated() -> bool {
    unsafe { winapi::um::shellapi::IsUserAnAdmin() != 0 }
}

#[cfg(not(windows))]
pub fn is_elevated() -> bool {
    false
}
