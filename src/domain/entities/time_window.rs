use chrono::{DateTime, Days, Months, Timelike, Utc};
use thiserror::Error;

pub const DEFAULT_MONTHS: u32 = 3;
pub const DEFAULT_DAYS: u32 = 0;

/// Returned by `describe` when neither months nor days are set.
pub const NOT_SET: &str = "[not set]";

/// How far back a login must reach to count as active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindowSpec {
    pub months: u32,
    pub days: u32,
    /// Reset the cutoff's hour and minute to zero ("from midnight").
    pub truncate_to_midnight: bool,
}

impl Default for TimeWindowSpec {
    fn default() -> Self {
        Self {
            months: DEFAULT_MONTHS,
            days: DEFAULT_DAYS,
            truncate_to_midnight: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cutoff for a window of {window} before {now} is out of range")]
pub struct WindowError {
    pub window: String,
    pub now: DateTime<Utc>,
}

impl TimeWindowSpec {
    pub fn new(months: u32, days: u32, truncate_to_midnight: bool) -> Self {
        Self {
            months,
            days,
            truncate_to_midnight,
        }
    }

    /// Compute the cutoff instant: `now - months - days`.
    ///
    /// Months are subtracted first and clamp to the last valid day of the target month
    /// (March 31 minus one month is February 28/29). Days are subtracted afterwards.
    /// With `truncate_to_midnight` only hour and minute are zeroed; seconds and the
    /// sub-second part of `now` are kept.
    pub fn cutoff_from(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, WindowError> {
        let out_of_range = || WindowError {
            window: self.describe(),
            now,
        };

        let cutoff = now
            .checked_sub_months(Months::new(self.months))
            .and_then(|at| at.checked_sub_days(Days::new(u64::from(self.days))))
            .ok_or_else(out_of_range)?;

        if !self.truncate_to_midnight {
            return Ok(cutoff);
        }

        cutoff
            .with_hour(0)
            .and_then(|at| at.with_minute(0))
            .ok_or_else(out_of_range)
    }

    /// Human-friendly description, e.g. "3 months", "1 month and 1 day", "10 days".
    pub fn describe(&self) -> String {
        let months = match self.months {
            0 => None,
            1 => Some("1 month".to_string()),
            n => Some(format!("{n} months")),
        };
        let days = match self.days {
            0 => None,
            1 => Some("1 day".to_string()),
            n => Some(format!("{n} days")),
        };

        match (months, days) {
            (Some(months), Some(days)) => format!("{months} and {days}"),
            (Some(months), None) => months,
            (None, Some(days)) => days,
            (None, None) => NOT_SET.to_string(),
        }
    }
}

impl std::fmt::Display for TimeWindowSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn test_default_window() {
        let window = TimeWindowSpec::default();
        assert_eq!(window.months, 3);
        assert_eq!(window.days, 0);
        assert!(!window.truncate_to_midnight);
    }

    #[test]
    fn test_cutoff_months_and_days() {
        let now = at(2024, 2, 1, 10, 30, 0);

        assert_eq!(
            TimeWindowSpec::new(1, 0, false).cutoff_from(now).unwrap(),
            at(2024, 1, 1, 10, 30, 0)
        );
        assert_eq!(
            TimeWindowSpec::new(0, 10, false).cutoff_from(now).unwrap(),
            at(2024, 1, 22, 10, 30, 0)
        );
        assert_eq!(
            TimeWindowSpec::new(3, 5, false).cutoff_from(now).unwrap(),
            at(2023, 10, 27, 10, 30, 0)
        );
        assert_eq!(
            TimeWindowSpec::new(0, 0, false).cutoff_from(now).unwrap(),
            now
        );
    }

    #[test]
    fn test_cutoff_clamps_to_month_end() {
        // Leap year
        assert_eq!(
            TimeWindowSpec::new(1, 0, false)
                .cutoff_from(at(2024, 3, 31, 8, 0, 0))
                .unwrap(),
            at(2024, 2, 29, 8, 0, 0)
        );
        assert_eq!(
            TimeWindowSpec::new(1, 0, false)
                .cutoff_from(at(2023, 3, 31, 8, 0, 0))
                .unwrap(),
            at(2023, 2, 28, 8, 0, 0)
        );
        assert_eq!(
            TimeWindowSpec::new(1, 0, false)
                .cutoff_from(at(2024, 5, 31, 8, 0, 0))
                .unwrap(),
            at(2024, 4, 30, 8, 0, 0)
        );
    }

    #[test]
    fn test_cutoff_months_applied_before_days() {
        // Mar 31 - 1 month = Feb 29, then - 1 day = Feb 28.
        assert_eq!(
            TimeWindowSpec::new(1, 1, false)
                .cutoff_from(at(2024, 3, 31, 0, 0, 0))
                .unwrap(),
            at(2024, 2, 28, 0, 0, 0)
        );
    }

    #[test]
    fn test_cutoff_truncate_to_midnight_keeps_seconds() {
        let now = at(2024, 2, 1, 15, 42, 17) + chrono::Duration::milliseconds(500);
        let cutoff = TimeWindowSpec::new(1, 0, true).cutoff_from(now).unwrap();

        assert_eq!(
            cutoff,
            at(2024, 1, 1, 0, 0, 17) + chrono::Duration::milliseconds(500)
        );
    }

    #[test]
    fn test_cutoff_out_of_range() {
        let err = TimeWindowSpec::new(u32::MAX, 0, false)
            .cutoff_from(at(2024, 1, 1, 0, 0, 0))
            .unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_describe() {
        assert_eq!(TimeWindowSpec::new(3, 0, false).describe(), "3 months");
        assert_eq!(TimeWindowSpec::new(1, 0, false).describe(), "1 month");
        assert_eq!(TimeWindowSpec::new(0, 1, false).describe(), "1 day");
        assert_eq!(TimeWindowSpec::new(0, 10, false).describe(), "10 days");
        assert_eq!(
            TimeWindowSpec::new(1, 1, false).describe(),
            "1 month and 1 day"
        );
        assert_eq!(
            TimeWindowSpec::new(2, 15, true).describe(),
            "2 months and 15 days"
        );
        assert_eq!(TimeWindowSpec::new(0, 0, false).describe(), NOT_SET);
    }

    #[test]
    fn test_display_matches_describe() {
        let window = TimeWindowSpec::new(1, 2, false);
        assert_eq!(format!("{}", window), window.describe());
    }
}
