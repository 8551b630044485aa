//! Display formatting for metric values.

/// Shown in place of a value that is missing or not a finite number.
pub const PLACEHOLDER: &str = "--";

/// Formats `value` with a fixed number of decimals, or [`PLACEHOLDER`].
#[must_use]
pub fn format_score(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.decimals$}"),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Formats a `[0, 1]` fraction as a percentage with one decimal.
#[must_use]
pub fn format_percent(fraction: Option<f64>) -> String {
    match fraction {
        Some(v) if v.is_finite() => format!("{:.1}%", v * 100.0),
        _ => PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_scores() {
        assert_eq!(format_score(Some(82.3), 2), "82.30");
        assert_eq!(format_score(Some(0.61), 3), "0.610");
        assert_eq!(format_score(None, 2), PLACEHOLDER);
        assert_eq!(format_score(Some(f64::NAN), 2), PLACEHOLDER);
        assert_eq!(format_score(Some(f64::INFINITY), 1), PLACEHOLDER);
    }

    #[test]
    fn formats_percentages() {
        assert_eq!(format_percent(Some(0.25)), "25.0%");
        assert_eq!(format_percent(None), "--");
    }
}
