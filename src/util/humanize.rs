//! Human readable byte sizes

const UNITS: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];

/// Format a byte count with SI units (base 1000)
///
/// Values under ten keep one decimal, larger ones are rounded to whole
/// units: `64 B`, `1.0 kB`, `16 kB`.
pub fn humanize_bytes(bytes: u64) -> String {
    if bytes < 10 {
        return format!("{} B", bytes);
    }

    let mut exp = 0;
    let mut base = 1u64;
    while exp + 1 < UNITS.len() && bytes / base >= 1000 {
        base *= 1000;
        exp += 1;
    }

    let value = (bytes as f64 / base as f64 * 10.0 + 0.5).floor() / 10.0;
    if value < 10.0 {
        format!("{:.1} {}", value, UNITS[exp])
    } else {
        format!("{:.0} {}", value, UNITS[exp])
    }
}
