//! Timestamp utilities

use chrono::{DateTime, Local};

/// Get current local timestamp
pub fn now() -> DateTime<Local> {
    Local::now()
}

/// Compact timestamp used in session log file names (`YYYYMMDD_HHMMSS`)
pub fn session_stamp(at: &DateTime<Local>) -> String {
    at.format("%Y%m%d_%H%M%S").to_string()
}
