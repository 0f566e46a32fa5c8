/// Format a number for display.
///
/// Uses the shortest representation that round-trips (`5`, `2.5`,
/// `0.30000000000000004`). Negative zero prints as `0`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}
