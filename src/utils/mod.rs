use chrono::{DateTime, NaiveDate, Utc};
use std::time::{Duration, Instant};
use tracing::info;

/// A simple wall-clock timer for logging elapsed time.
pub struct Timer {
    label: String,
    start: Instant,
}

impl Timer {
    pub fn start(label: impl Into<String>) -> Self {
        let label = label.into();
        info!("⏱  Starting: {}", label);
        Self {
            label,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        info!(
            "⏱  Finished: {} (took {:.2?})",
            self.label,
            self.start.elapsed()
        );
    }
}

// ── Dates ────────────────────────────────────────────────────────────────────

/// Truncate an upstream timestamp to its UTC calendar day.
/// GitHub stamps traffic buckets at midnight UTC, but comparisons here are
/// day-granularity regardless of the time-of-day component.
pub fn day_of(ts: DateTime<Utc>) -> NaiveDate {
    ts.date_naive()
}

/// Parse a stored `YYYY-MM-DD` date value.
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_day_of_discards_time() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 23, 59, 59).unwrap();
        assert_eq!(day_of(ts), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn test_parse_day() {
        assert_eq!(
            parse_day("2024-01-02"),
            Some(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
        );
        assert_eq!(parse_day(" 2024-01-02 "), parse_day("2024-01-02"));
        assert_eq!(parse_day("not-a-date"), None);
        assert_eq!(parse_day(""), None);
    }
}
