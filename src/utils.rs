/// Shared small helpers used across the tracker modules

/// Truncate a string to at most `max_chars` characters without splitting a
/// char boundary. Used to keep token mints and wallet addresses log-friendly.
pub fn safe_truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Absolute-tolerance float comparison for quantities, fees and P&L values.
pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(safe_truncate("DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263", 8), "DezXAZ8z");
        assert_eq!(safe_truncate("so11", 8), "so11");
        // multi-byte chars must not be split
        assert_eq!(safe_truncate("héllo wörld", 5), "héllo");
    }

    #[test]
    fn approx_eq_tolerance() {
        assert!(approx_eq(0.1 + 0.2, 0.3, 1e-9));
        assert!(!approx_eq(1.0, 1.1, 1e-9));
    }
}
