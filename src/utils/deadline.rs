use chrono::{DateTime, Utc};
use serde::Serialize;

const MILLIS_PER_DAY: i64 = 86_400_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeadlineStatus {
    Unspecified,
    Expired,
    Urgent,
    Soon,
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeadlineInfo {
    pub status: DeadlineStatus,
    pub days_remaining: Option<i64>,
}

/// Classifies an opportunity's deadline relative to `now`.
///
/// Whole days are counted with floor semantics: a deadline later today is 0
/// days away, and one that passed 12 hours ago is -1, i.e. expired. The same
/// classification drives the urgency badge and the server-side apply gate.
pub fn classify(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DeadlineInfo {
    let Some(deadline) = deadline else {
        return DeadlineInfo {
            status: DeadlineStatus::Unspecified,
            days_remaining: None,
        };
    };

    // Millisecond granularity: num_seconds() truncates toward zero, which
    // would round a sub-second-past deadline up to 0 days instead of -1.
    let diff_days = (deadline - now).num_milliseconds().div_euclid(MILLIS_PER_DAY);
    let status = match diff_days {
        d if d < 0 => DeadlineStatus::Expired,
        0..=3 => DeadlineStatus::Urgent,
        4..=7 => DeadlineStatus::Soon,
        _ => DeadlineStatus::Normal,
    };

    DeadlineInfo {
        status,
        days_remaining: Some(diff_days),
    }
}

pub fn is_expired(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    classify(deadline, now).status == DeadlineStatus::Expired
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        "2025-08-20T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn missing_deadline_is_unspecified() {
        let info = classify(None, now());
        assert_eq!(info.status, DeadlineStatus::Unspecified);
        assert_eq!(info.days_remaining, None);
    }

    #[test]
    fn past_deadline_is_expired() {
        let info = classify(Some(now() - Duration::days(2)), now());
        assert_eq!(info.status, DeadlineStatus::Expired);
        assert_eq!(info.days_remaining, Some(-2));
    }

    #[test]
    fn floor_semantics_twelve_hours_past() {
        // floor(-0.5 days) = -1, not 0: already expired.
        let info = classify(Some(now() - Duration::hours(12)), now());
        assert_eq!(info.status, DeadlineStatus::Expired);
        assert_eq!(info.days_remaining, Some(-1));
    }

    #[test]
    fn floor_semantics_just_past_deadline() {
        // Half a second past is still past: floor, not truncation.
        let info = classify(Some(now() - Duration::milliseconds(500)), now());
        assert_eq!(info.status, DeadlineStatus::Expired);
        assert_eq!(info.days_remaining, Some(-1));
    }

    #[test]
    fn floor_semantics_later_same_day() {
        // A deadline 6 hours out reports 0 days, not 1.
        let info = classify(Some(now() + Duration::hours(6)), now());
        assert_eq!(info.status, DeadlineStatus::Urgent);
        assert_eq!(info.days_remaining, Some(0));
    }

    #[test]
    fn urgent_upper_bound() {
        let info = classify(Some(now() + Duration::days(3)), now());
        assert_eq!(info.status, DeadlineStatus::Urgent);
    }

    #[test]
    fn soon_window() {
        assert_eq!(
            classify(Some(now() + Duration::days(4)), now()).status,
            DeadlineStatus::Soon
        );
        assert_eq!(
            classify(Some(now() + Duration::days(7)), now()).status,
            DeadlineStatus::Soon
        );
    }

    #[test]
    fn beyond_a_week_is_normal() {
        let info = classify(Some(now() + Duration::days(8)), now());
        assert_eq!(info.status, DeadlineStatus::Normal);
        assert_eq!(info.days_remaining, Some(8));
    }
}
