/// Format a fraction as a percentage, e.g. `0.1234` -> `12.34%`
pub fn format_percentage(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Format a growth multiple, e.g. `3.456` -> `3.46x`
pub fn format_multiple(value: f64) -> String {
    format!("{value:.2}x")
}

/// Format a plain ratio to two decimals
pub fn format_ratio(value: f64) -> String {
    format!("{value:.2}")
}
