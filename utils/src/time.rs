//! Time formatting helpers.

/// Format a duration in seconds to a human-readable string.
///
/// Two units at most: `"45s"`, `"16m 40s"`, `"2h 30m"`, `"3d 4h"`.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}
