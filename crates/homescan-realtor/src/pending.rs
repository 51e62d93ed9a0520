//! Client-side date filter for the pending listing category.
//!
//! The provider ignores `pending_date`/`contract_date` range criteria, so
//! pending searches are sent without a date clause and narrowed here.
//! Records are reduced to a [`PendingView`] by the [`PendingCandidate`]
//! adapter; the filter itself never looks at the record representation.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use homescan_core::Property;
use serde_json::Value;

/// Resolved client-side date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateWindow {
    /// Everything at or after the cutoff. No upper bound.
    Since(NaiveDateTime),
    /// Inclusive on both ends.
    Between {
        from: NaiveDateTime,
        to: NaiveDateTime,
    },
}

impl DateWindow {
    #[must_use]
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        match *self {
            DateWindow::Since(cutoff) => instant >= cutoff,
            DateWindow::Between { from, to } => from <= instant && instant <= to,
        }
    }
}

/// The two facts the filter needs from a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PendingView {
    /// Parsed pending date; `None` when absent or unparseable.
    pub pending_at: Option<NaiveDateTime>,
    pub is_contingent: bool,
}

/// Extracts a [`PendingView`] from a record representation.
pub trait PendingCandidate {
    fn pending_view(&self) -> PendingView;
}

impl PendingCandidate for Value {
    fn pending_view(&self) -> PendingView {
        let pending_at = self
            .get("pending_date")
            .and_then(Value::as_str)
            .and_then(parse_pending_date);
        let is_contingent = self
            .pointer("/flags/is_contingent")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        PendingView {
            pending_at,
            is_contingent,
        }
    }
}

impl PendingCandidate for Property {
    fn pending_view(&self) -> PendingView {
        PendingView {
            pending_at: self.pending_date.map(|d| d.and_time(NaiveTime::MIN)),
            is_contingent: self.is_contingent(),
        }
    }
}

/// Parses a provider date into a timezone-naive instant.
///
/// Accepts RFC 3339 (`2025-08-29T10:15:00Z`, `...+05:00`, fractional
/// seconds), ISO datetimes without offset, `YYYY-MM-DD HH:MM:SS`, and a bare
/// `YYYY-MM-DD`. Offsets are dropped, keeping the wall-clock time.
#[must_use]
pub fn parse_pending_date(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Keeps records whose pending date falls inside `window`, plus contingent
/// records that carry no usable pending date. Order is preserved.
#[must_use]
pub fn filter_pending<T: PendingCandidate>(records: Vec<T>, window: &DateWindow) -> Vec<T> {
    let before = records.len();
    let kept: Vec<T> = records
        .into_iter()
        .filter(|record| {
            let view = record.pending_view();
            match view.pending_at {
                Some(instant) => window.contains(instant),
                None => view.is_contingent,
            }
        })
        .collect();
    tracing::debug!(before, after = kept.len(), "applied pending date filter");
    kept
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn now() -> NaiveDateTime {
        at("2025-09-01 12:00:00")
    }

    fn since_days(days: i64) -> DateWindow {
        DateWindow::Since(now() - chrono::Duration::days(days))
    }

    fn sample() -> Vec<Value> {
        vec![
            json!({"property_id": "A", "pending_date": null, "flags": {"is_contingent": true}}),
            json!({"property_id": "B", "pending_date": "2099-01-01T00:00:00Z", "flags": {}}),
            json!({"property_id": "C", "pending_date": "2025-08-29 00:00:00", "flags": {}}),
            json!({"property_id": "D", "pending_date": "2025-07-01T08:30:00.123456+00:00", "flags": {}}),
            json!({"property_id": "E", "flags": {"is_contingent": false}}),
            json!({"property_id": "F", "pending_date": "not a date", "flags": {"is_contingent": true}}),
            json!({"property_id": "G", "pending_date": "yesterday-ish", "flags": {}}),
        ]
    }

    fn ids(records: &[Value]) -> Vec<&str> {
        records
            .iter()
            .map(|r| r["property_id"].as_str().unwrap())
            .collect()
    }

    #[test]
    fn parses_supported_formats() {
        assert_eq!(
            parse_pending_date("2025-08-29T10:15:00Z"),
            Some(at("2025-08-29 10:15:00"))
        );
        assert_eq!(
            parse_pending_date("2025-08-29T10:15:00.500000+05:00"),
            Some(
                NaiveDateTime::parse_from_str("2025-08-29 10:15:00.5", "%Y-%m-%d %H:%M:%S%.f")
                    .unwrap()
            )
        );
        assert_eq!(
            parse_pending_date("2025-08-29T10:15:00"),
            Some(at("2025-08-29 10:15:00"))
        );
        assert_eq!(
            parse_pending_date("2025-08-29 00:00:00"),
            Some(at("2025-08-29 00:00:00"))
        );
        assert_eq!(
            parse_pending_date("2025-08-29"),
            Some(at("2025-08-29 00:00:00"))
        );
    }

    #[test]
    fn unparseable_dates_are_none() {
        assert!(parse_pending_date("").is_none());
        assert!(parse_pending_date("29/08/2025").is_none());
        assert!(parse_pending_date("soon").is_none());
    }

    #[test]
    fn contingent_without_date_is_kept() {
        let kept = filter_pending(vec![sample().remove(0)], &since_days(30));
        assert_eq!(ids(&kept), vec!["A"]);
    }

    #[test]
    fn far_future_date_is_kept_under_literal_cutoff_rule() {
        // `Since` has no upper bound, so a 2099 date satisfies `>= cutoff`.
        let kept = filter_pending(vec![sample().remove(1)], &since_days(30));
        assert_eq!(ids(&kept), vec!["B"]);
    }

    #[test]
    fn rolling_window_filters_mixed_records() {
        let kept = filter_pending(sample(), &since_days(30));
        // D is older than 30 days, E has no date and is not contingent,
        // F falls back to its contingent flag, G is unparseable and not contingent.
        assert_eq!(ids(&kept), vec!["A", "B", "C", "F"]);
    }

    #[test]
    fn explicit_range_is_inclusive() {
        let window = DateWindow::Between {
            from: at("2025-07-01 08:30:00"),
            to: at("2025-08-29 00:00:00"),
        };
        let kept = filter_pending(sample(), &window);
        assert_eq!(ids(&kept), vec!["A", "C", "D", "F"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let window = since_days(30);
        let once = filter_pending(sample(), &window);
        let twice = filter_pending(once.clone(), &window);
        assert_eq!(once, twice);
    }

    #[test]
    fn wider_window_never_keeps_fewer_records() {
        for (narrow, wide) in [(1, 7), (7, 30), (30, 90), (90, 3650)] {
            let a = filter_pending(sample(), &since_days(narrow)).len();
            let b = filter_pending(sample(), &since_days(wide)).len();
            assert!(a <= b, "{narrow}d kept {a}, {wide}d kept {b}");
        }
    }

    #[test]
    fn typed_records_use_the_same_rules() {
        let mut contingent = Property {
            property_id: "T1".into(),
            ..Property::default()
        };
        contingent.flags = Some(homescan_core::HomeFlags {
            is_contingent: Some(true),
            ..homescan_core::HomeFlags::default()
        });
        let stale = Property {
            property_id: "T2".into(),
            pending_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Property::default()
        };
        let fresh = Property {
            property_id: "T3".into(),
            pending_date: NaiveDate::from_ymd_opt(2025, 8, 30),
            ..Property::default()
        };
        let kept = filter_pending(vec![contingent, stale, fresh], &since_days(30));
        let kept_ids: Vec<&str> = kept.iter().map(|p| p.property_id.as_str()).collect();
        assert_eq!(kept_ids, vec!["T1", "T3"]);
    }
}
