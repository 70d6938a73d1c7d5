//! Embed colors

pub const SUCCESS_COLOR: u32 = 2_123_412;
pub const FAILURE_COLOR: u32 = 15_548_997;
pub const WARNING_COLOR: u32 = 16_705_372;
pub const INFO_COLOR: u32 = 3_447_003;

/// Used for absent or unrecognised severities
pub const DEFAULT_COLOR: u32 = SUCCESS_COLOR;

/// Map a sender severity tag to a color (case-insensitive)
pub fn severity_color(severity: &str) -> u32 {
    match severity.trim().to_ascii_lowercase().as_str() {
        "info" => INFO_COLOR,
        "notice" | "success" | "ok" => SUCCESS_COLOR,
        "warning" | "warn" => WARNING_COLOR,
        "error" | "err" | "critical" | "crit" => FAILURE_COLOR,
        _ => DEFAULT_COLOR,
    }
}

/// Color of a backup summary given whether every job succeeded
pub fn report_color(all_ok: bool) -> u32 {
    if all_ok { SUCCESS_COLOR } else { FAILURE_COLOR }
}
