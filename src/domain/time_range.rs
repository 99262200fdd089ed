//! Inclusive timestamp range used to filter stored readings.

use chrono::NaiveDateTime;

use crate::error::RangeParseError;

/// Format of the read view's `start`/`end` query parameters, as produced by
/// an HTML `datetime-local` input.
pub const RANGE_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Inclusive `[start, end]` range over stored reading timestamps.
///
/// A range whose start lies after its end is kept as-is and matches
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeRange {
    /// Creates a range from two bounds.
    #[must_use]
    pub const fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Parses both bounds in [`RANGE_FORMAT`].
    ///
    /// # Errors
    ///
    /// Returns [`RangeParseError`] naming the first bound that fails.
    pub fn parse(start: &str, end: &str) -> Result<Self, RangeParseError> {
        Ok(Self::new(parse_bound("start", start)?, parse_bound("end", end)?))
    }

    /// Builds the filter for a read-view request.
    ///
    /// The filter applies only when both bounds are present, non-empty and
    /// well formed. Anything else yields `None`, meaning "all readings"; a
    /// malformed bound is logged and otherwise ignored.
    #[must_use]
    pub fn from_params(start: Option<&str>, end: Option<&str>) -> Option<Self> {
        let (Some(start), Some(end)) = (start, end) else {
            return None;
        };
        if start.is_empty() || end.is_empty() {
            return None;
        }
        match Self::parse(start, end) {
            Ok(range) => Some(range),
            Err(e) => {
                tracing::warn!(error = %e, "invalid date range received, ignoring filter");
                None
            }
        }
    }

    /// Lower bound (inclusive).
    #[must_use]
    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Upper bound (inclusive).
    #[must_use]
    pub const fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Returns `true` if `ts` lies within the range, bounds included.
    #[must_use]
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        self.start <= ts && ts <= self.end
    }
}

fn parse_bound(field: &'static str, value: &str) -> Result<NaiveDateTime, RangeParseError> {
    NaiveDateTime::parse_from_str(value, RANGE_FORMAT).map_err(|_| RangeParseError {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(day: u32, hour: u32, min: u32) -> NaiveDateTime {
        let Some(ts) =
            NaiveDate::from_ymd_opt(2024, 1, day).and_then(|d| d.and_hms_opt(hour, min, 0))
        else {
            panic!("valid timestamp");
        };
        ts
    }

    #[test]
    fn parses_datetime_local_format() {
        let Ok(range) = TimeRange::parse("2024-01-01T00:00", "2024-01-02T00:00") else {
            panic!("range must parse");
        };
        assert_eq!(range.start(), at(1, 0, 0));
        assert_eq!(range.end(), at(2, 0, 0));
    }

    #[test]
    fn bounds_are_inclusive() {
        let range = TimeRange::new(at(1, 0, 0), at(2, 0, 0));
        assert!(range.contains(at(1, 0, 0)));
        assert!(range.contains(at(1, 12, 30)));
        assert!(range.contains(at(2, 0, 0)));
        assert!(!range.contains(at(2, 0, 1)));
    }

    #[test]
    fn malformed_start_is_reported() {
        let Err(err) = TimeRange::parse("not-a-date", "2024-01-02T00:00") else {
            panic!("expected parse failure");
        };
        assert_eq!(err.field, "start");
    }

    #[test]
    fn seconds_are_rejected() {
        assert!(TimeRange::parse("2024-01-01T00:00:00", "2024-01-02T00:00").is_err());
    }

    #[test]
    fn from_params_drops_malformed_filter() {
        assert!(TimeRange::from_params(Some("not-a-date"), Some("2024-01-02T00:00")).is_none());
    }

    #[test]
    fn from_params_requires_both_bounds() {
        assert!(TimeRange::from_params(Some("2024-01-01T00:00"), None).is_none());
        assert!(TimeRange::from_params(Some(""), Some("2024-01-02T00:00")).is_none());
        assert!(TimeRange::from_params(None, None).is_none());
    }

    #[test]
    fn from_params_builds_valid_range() {
        let range = TimeRange::from_params(Some("2024-01-01T00:00"), Some("2024-01-02T00:00"));
        assert_eq!(range, Some(TimeRange::new(at(1, 0, 0), at(2, 0, 0))));
    }

    #[test]
    fn inverted_range_matches_nothing() {
        let range = TimeRange::new(at(2, 0, 0), at(1, 0, 0));
        assert!(!range.contains(at(1, 12, 0)));
    }
}
