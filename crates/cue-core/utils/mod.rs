//! Shared helpers: error types and tolerant numeric parsing.

pub mod errors;

pub use errors::CoreError;

/// Strip everything outside `[0-9.]` from a settings value and parse it.
///
/// Caption settings arrive as free text (`"50%"`, `"  12px"`, `"garbage"`).
/// Layout and settings parsing never raise on malformed numeric input; an
/// unusable value yields `None` and the caller falls back to its documented
/// default.
#[must_use]
pub fn sanitize_numeric(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Assemble seconds from split timestamp groups.
///
/// `seconds = hours*3600 + minutes*60 + seconds + 0.<fraction>`; missing
/// groups count as zero. The fraction is digit text, so `"5"` is 0.5 and
/// `"500"` is also 0.5.
#[must_use]
pub fn timestamp_seconds(
    hours: Option<&str>,
    minutes: Option<&str>,
    seconds: Option<&str>,
    fraction: Option<&str>,
) -> f64 {
    let int = |group: Option<&str>| -> f64 {
        group
            .and_then(|g| g.parse::<u64>().ok())
            .map_or(0.0, |v| v as f64)
    };

    let frac = fraction.map_or(0.0, |digits| {
        digits
            .parse::<u64>()
            .ok()
            .map_or(0.0, |v| v as f64 / 10f64.powi(digits.len() as i32))
    });

    int(hours) * 3600.0 + int(minutes) * 60.0 + int(seconds) + frac
}
