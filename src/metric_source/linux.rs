// Linux-specific helpers: /proc process count, pseudo filesystem filter.

/// Count numeric entries under /proc (one per process). Cheaper than a full sysinfo
/// process refresh, which also reads per-process stat files.
pub(super) fn count_processes_linux() -> Option<u32> {
    #[cfg(target_os = "linux")]
    {
        let entries = std::fs::read_dir("/proc").ok()?;
        let count = entries
            .filter_map(Result::ok)
            .filter(|e| {
                e.file_name()
                    .to_str()
                    .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
            })
            .count();
        if count == 0 {
            return None;
        }
        Some(count.min(u32::MAX as usize) as u32)
    }
    #[cfg(not(target_os = "linux"))]
    None
}

/// Filesystems that never represent real storage (excluded when no root mount is found).
pub(super) fn is_pseudo_fs(fs: &str) -> bool {
    matches!(
        fs,
        "tmpfs" | "devtmpfs" | "overlay" | "squashfs" | "proc" | "sysfs" | "cgroup" | "cgroup2"
    )
}
