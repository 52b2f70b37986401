//! Utility functions for the statistics service

#[cfg(windows)]
use std::mem::MaybeUninit;

/// Get current process memory usage on Windows (returns bytes)
#[cfg(windows)]
pub fn get_process_memory_bytes() -> Option<u64> {
    use winapi::um::processthreadsapi::GetCurrentProcess;
    use winapi::um::psapi::{GetProcessMemoryInfo, PROCESS_MEMORY_COUNTERS};

    unsafe {
        let mut pmc: MaybeUninit<PROCESS_MEMORY_COUNTERS> = MaybeUninit::uninit();
        let cb = std::mem::size_of::<PROCESS_MEMORY_COUNTERS>() as u32;

        if GetProcessMemoryInfo(GetCurrentProcess(), pmc.as_mut_ptr(), cb) != 0 {
            let pmc = pmc.assume_init();
            Some(pmc.WorkingSetSize as u64)
        } else {
            None
        }
    }
}

/// Resident set size from /proc on Linux
#[cfg(target_os = "linux")]
pub fn get_process_memory_bytes() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    let line = status.lines().find(|l| l.starts_with("VmRSS:"))?;
    let kb: u64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(kb * 1024)
}

/// Fallback for other platforms
#[cfg(not(any(windows, target_os = "linux")))]
pub fn get_process_memory_bytes() -> Option<u64> {
    None
}
