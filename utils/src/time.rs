//! Duration formatting for log lines and CLI output.

const UNITS: [(u64, &str); 4] = [(86_400, "d"), (3_600, "h"), (60, "m"), (1, "s")];

/// Render `secs` with its two most significant units, e.g. `"1d 2h"`.
pub fn format_duration(secs: u64) -> String {
    let Some(i) = UNITS.iter().position(|(size, _)| secs >= *size) else {
        return "0s".to_string();
    };
    let (major, major_unit) = UNITS[i];
    let head = format!("{}{}", secs / major, major_unit);
    match UNITS.get(i + 1) {
        Some((minor, minor_unit)) => format!("{head} {}{}", (secs % major) / minor, minor_unit),
        None => head,
    }
}
