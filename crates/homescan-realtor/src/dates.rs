//! Date constraints: a rolling "last N days" window or an explicit range.
//!
//! The same [`DateSpec`] feeds two consumers: the provider-side `{min, max}`
//! clause built by the query builder, and the client-side [`DateWindow`]
//! used by the pending-listing filter. When both inputs are given the
//! provider clause uses the explicit range and the pending filter uses the
//! rolling window.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde_json::{json, Value};

use crate::error::RealtorError;
use crate::pending::DateWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateSpec {
    #[default]
    None,
    /// Rolling window ending today.
    PastDays(u32),
    /// Inclusive explicit range.
    Between { from: NaiveDate, to: NaiveDate },
    /// Both a rolling window and an explicit range.
    Combined {
        days: u32,
        from: NaiveDate,
        to: NaiveDate,
    },
}

impl DateSpec {
    /// Builds a spec from adapter-level inputs.
    ///
    /// `past_days` of zero means no rolling window. Explicit bounds must both
    /// be present, parse as `YYYY-MM-DD`, and be ordered.
    ///
    /// # Errors
    ///
    /// Returns [`RealtorError::InvalidRequest`] when only one bound is given,
    /// a bound does not parse, or `from` is after `to`.
    pub fn from_parts(
        past_days: Option<u32>,
        date_from: Option<&str>,
        date_to: Option<&str>,
    ) -> Result<Self, RealtorError> {
        let range = match (date_from, date_to) {
            (None, None) => None,
            (Some(from), Some(to)) => {
                let from = parse_day(from)?;
                let to = parse_day(to)?;
                if from > to {
                    return Err(RealtorError::InvalidRequest(format!(
                        "date_from {from} is after date_to {to}"
                    )));
                }
                Some((from, to))
            }
            _ => {
                return Err(RealtorError::InvalidRequest(
                    "date_from and date_to must be given together".to_owned(),
                ))
            }
        };
        let spec = match (past_days.filter(|days| *days > 0), range) {
            (None, None) => DateSpec::None,
            (Some(days), None) => DateSpec::PastDays(days),
            (None, Some((from, to))) => DateSpec::Between { from, to },
            (Some(days), Some((from, to))) => DateSpec::Combined { days, from, to },
        };
        Ok(spec)
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        !matches!(self, DateSpec::None | DateSpec::PastDays(0))
    }

    /// Provider range value, e.g. `{"min": "$today-30D"}` or
    /// `{"min": "2025-01-01", "max": "2025-01-31"}`. An explicit range wins.
    #[must_use]
    pub fn server_bound(&self) -> Option<Value> {
        match self {
            DateSpec::None | DateSpec::PastDays(0) => None,
            DateSpec::PastDays(days) => Some(json!({ "min": format!("$today-{days}D") })),
            DateSpec::Between { from, to } | DateSpec::Combined { from, to, .. } => Some(json!({
                "min": from.format("%Y-%m-%d").to_string(),
                "max": to.format("%Y-%m-%d").to_string(),
            })),
        }
    }

    /// Client-side window as timezone-naive instants relative to `now`.
    /// The rolling window wins; explicit bounds are taken at midnight.
    #[must_use]
    pub fn window(&self, now: NaiveDateTime) -> Option<DateWindow> {
        match self {
            DateSpec::PastDays(days) | DateSpec::Combined { days, .. } if *days > 0 => Some(
                DateWindow::Since(now - Duration::days(i64::from(*days))),
            ),
            DateSpec::None | DateSpec::PastDays(_) => None,
            DateSpec::Between { from, to } | DateSpec::Combined { from, to, .. } => Some(DateWindow::Between {
                from: from.and_time(chrono::NaiveTime::MIN),
                to: to.and_time(chrono::NaiveTime::MIN),
            }),
        }
    }
}

fn parse_day(s: &str) -> Result<NaiveDate, RealtorError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| RealtorError::InvalidRequest(format!("invalid date \"{s}\": {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn both_inputs_keep_range_and_window() {
        let spec = DateSpec::from_parts(Some(7), Some("2025-01-01"), Some("2025-01-31")).unwrap();
        assert_eq!(
            spec,
            DateSpec::Combined {
                days: 7,
                from: day("2025-01-01"),
                to: day("2025-01-31")
            }
        );
    }

    #[test]
    fn explicit_range_wins_for_server_bound() {
        let spec = DateSpec::from_parts(Some(7), Some("2025-01-01"), Some("2025-01-31")).unwrap();
        assert_eq!(
            spec.server_bound(),
            Some(json!({ "min": "2025-01-01", "max": "2025-01-31" }))
        );
    }

    #[test]
    fn rolling_window_wins_for_pending_filter() {
        let spec = DateSpec::from_parts(Some(7), Some("2025-01-01"), Some("2025-01-31")).unwrap();
        let now = day("2025-06-30").and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(
            spec.window(now),
            Some(DateWindow::Since(day("2025-06-23").and_hms_opt(12, 0, 0).unwrap()))
        );
    }

    #[test]
    fn zero_past_days_means_no_constraint() {
        let spec = DateSpec::from_parts(Some(0), None, None).unwrap();
        assert_eq!(spec, DateSpec::None);
        assert!(spec.server_bound().is_none());
        let now = day("2025-09-01").and_hms_opt(12, 0, 0).unwrap();
        assert!(spec.window(now).is_none());
    }

    #[test]
    fn hand_built_zero_day_window_is_ignored() {
        let now = day("2025-09-01").and_hms_opt(12, 0, 0).unwrap();
        assert!(!DateSpec::PastDays(0).is_set());
        assert!(DateSpec::PastDays(0).server_bound().is_none());
        assert!(DateSpec::PastDays(0).window(now).is_none());
    }

    #[test]
    fn zero_past_days_falls_back_to_explicit_range() {
        let spec = DateSpec::from_parts(Some(0), Some("2025-01-01"), Some("2025-01-31")).unwrap();
        assert_eq!(
            spec,
            DateSpec::Between {
                from: day("2025-01-01"),
                to: day("2025-01-31")
            }
        );
    }

    #[test]
    fn explicit_range_parses() {
        let spec = DateSpec::from_parts(None, Some("2025-01-01"), Some("2025-01-31")).unwrap();
        assert_eq!(
            spec,
            DateSpec::Between {
                from: day("2025-01-01"),
                to: day("2025-01-31")
            }
        );
    }

    #[test]
    fn no_inputs_means_no_constraint() {
        let spec = DateSpec::from_parts(None, None, None).unwrap();
        assert!(!spec.is_set());
        assert!(spec.server_bound().is_none());
    }

    #[test]
    fn half_open_range_is_rejected() {
        let err = DateSpec::from_parts(None, Some("2025-01-01"), None).unwrap_err();
        assert!(matches!(err, RealtorError::InvalidRequest(_)));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = DateSpec::from_parts(None, Some("2025-02-01"), Some("2025-01-01")).unwrap_err();
        assert!(matches!(err, RealtorError::InvalidRequest(ref m) if m.contains("after")));
    }

    #[test]
    fn malformed_date_is_rejected() {
        let err = DateSpec::from_parts(None, Some("01/02/2025"), Some("2025-01-31")).unwrap_err();
        assert!(matches!(err, RealtorError::InvalidRequest(_)));
    }

    #[test]
    fn server_bound_uses_today_macro_for_rolling_window() {
        assert_eq!(
            DateSpec::PastDays(30).server_bound(),
            Some(json!({ "min": "$today-30D" }))
        );
    }

    #[test]
    fn server_bound_for_explicit_range() {
        let spec = DateSpec::Between {
            from: day("2025-03-01"),
            to: day("2025-03-15"),
        };
        assert_eq!(
            spec.server_bound(),
            Some(json!({ "min": "2025-03-01", "max": "2025-03-15" }))
        );
    }

    #[test]
    fn rolling_window_is_anchored_at_now() {
        let now = day("2025-06-30").and_hms_opt(12, 0, 0).unwrap();
        let window = DateSpec::PastDays(30).window(now).unwrap();
        assert_eq!(
            window,
            DateWindow::Since(day("2025-05-31").and_hms_opt(12, 0, 0).unwrap())
        );
    }

    #[test]
    fn explicit_window_uses_midnight_bounds() {
        let spec = DateSpec::Between {
            from: day("2025-03-01"),
            to: day("2025-03-15"),
        };
        let now = day("2025-06-30").and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(
            spec.window(now),
            Some(DateWindow::Between {
                from: day("2025-03-01").and_hms_opt(0, 0, 0).unwrap(),
                to: day("2025-03-15").and_hms_opt(0, 0, 0).unwrap(),
            })
        );
    }
}
