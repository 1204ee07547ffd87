const UNIT_SUFFIXES: [&str; 7] = ["b", "k", "m", "g", "t", "p", "e"];
const UNIT_STEP: f64 = 1024.0;

/// Formats a byte count with binary units and at most two decimals, e.g. `1.5k` or `500.0b`.
/// Zero is rendered as `0B`.
pub fn format_file_size(size: u64) -> String {
    if size == 0 {
        return "0B".to_string();
    }

    let mut unit = 0;
    let mut scaled = size as f64;
    while scaled >= UNIT_STEP && unit < UNIT_SUFFIXES.len() - 1 {
        scaled /= UNIT_STEP;
        unit += 1;
    }

    let rounded = (scaled * 100.0).round() / 100.0;
    let mut value = rounded.to_string();
    if !value.contains('.') {
        value.push_str(".0");
    }

    format!("{}{}", value, UNIT_SUFFIXES[unit])
}
