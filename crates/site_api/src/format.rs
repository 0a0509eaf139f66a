//! Display formatting kept apart from the stores so they stay locale-free.

use chrono::{DateTime, NaiveDate, Utc};
use shared::{
    domain::{MessageType, ReportStatus},
    protocol::SiteHealth,
};

pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

pub fn format_time(instant: DateTime<Utc>) -> String {
    instant.format("%I:%M %p").to_string()
}

fn ago(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

/// "just now", "N minutes ago", "N hours ago" and "N days ago" for the last
/// week; the absolute date and time for anything older or in the future.
pub fn format_relative_or_absolute(instant: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(instant);
    if elapsed < chrono::Duration::zero() || elapsed >= chrono::Duration::days(7) {
        return format!("{} {}", format_date(instant.date_naive()), format_time(instant));
    }
    match (elapsed.num_days(), elapsed.num_hours(), elapsed.num_minutes()) {
        (0, 0, 0) => "just now".to_string(),
        (0, 0, minutes) => ago(minutes, "minute"),
        (0, hours, _) => ago(hours, "hour"),
        (days, _, _) => ago(days, "day"),
    }
}

/// Whole days from `today` until `end`; negative once the date has passed.
pub fn days_remaining(end: NaiveDate, today: NaiveDate) -> i64 {
    end.signed_duration_since(today).num_days()
}

pub fn status_badge_class(status: ReportStatus) -> &'static str {
    match status {
        ReportStatus::Approved => "bg-green-100 text-green-800 border border-green-300",
        ReportStatus::Pending => "bg-yellow-100 text-yellow-800 border border-yellow-300",
        ReportStatus::Submitted => "bg-blue-100 text-blue-800 border border-blue-300",
    }
}

pub fn message_type_class(kind: MessageType) -> &'static str {
    match kind {
        MessageType::Milestone => "border-l-4 border-green-500 bg-green-50",
        MessageType::Alert => "border-l-4 border-yellow-500 bg-yellow-50",
        MessageType::Update => "border-l-4 border-blue-500 bg-blue-50",
    }
}

pub fn site_health_class(health: SiteHealth) -> &'static str {
    match health {
        SiteHealth::OnTrack => "bg-green-50 border-green-200",
        SiteHealth::AtRisk => "bg-yellow-50 border-yellow-200",
        SiteHealth::Behind => "bg-red-50 border-red-200",
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn at(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw)
            .expect("timestamp")
            .with_timezone(&Utc)
    }

    #[test]
    fn formats_dates_and_times() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 5).expect("date");
        assert_eq!(format_date(date), "February 5, 2026");
        assert_eq!(format_time(at("2026-02-05T14:05:00Z")), "02:05 PM");
        assert_eq!(format_time(at("2026-02-05T09:30:00Z")), "09:30 AM");
    }

    #[test]
    fn relative_buckets() {
        let now = at("2026-02-13T12:00:00Z");
        assert_eq!(format_relative_or_absolute(now, now), "just now");
        assert_eq!(
            format_relative_or_absolute(now - Duration::seconds(59), now),
            "just now"
        );
        assert_eq!(
            format_relative_or_absolute(now - Duration::minutes(1), now),
            "1 minute ago"
        );
        assert_eq!(
            format_relative_or_absolute(now - Duration::minutes(45), now),
            "45 minutes ago"
        );
        assert_eq!(
            format_relative_or_absolute(now - Duration::hours(2), now),
            "2 hours ago"
        );
        assert_eq!(
            format_relative_or_absolute(now - Duration::hours(24), now),
            "1 day ago"
        );
        assert_eq!(
            format_relative_or_absolute(now - Duration::days(6), now),
            "6 days ago"
        );
    }

    #[test]
    fn old_and_future_instants_are_absolute() {
        let now = at("2026-02-13T12:00:00Z");
        assert_eq!(
            format_relative_or_absolute(at("2026-02-01T08:15:00Z"), now),
            "February 1, 2026 08:15 AM"
        );
        assert_eq!(
            format_relative_or_absolute(now + Duration::minutes(5), now),
            "February 13, 2026 12:05 PM"
        );
    }

    #[test]
    fn days_remaining_counts_calendar_days() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 13).expect("date");
        let end = NaiveDate::from_ymd_opt(2026, 3, 1).expect("date");
        assert_eq!(days_remaining(end, today), 16);
        assert_eq!(days_remaining(today, end), -16);
    }

    #[test]
    fn badge_classes_follow_status_colors() {
        assert!(status_badge_class(ReportStatus::Pending).contains("yellow"));
        assert!(status_badge_class(ReportStatus::Approved).contains("green"));
        assert!(message_type_class(MessageType::Update).contains("blue"));
        assert!(site_health_class(SiteHealth::Behind).contains("red"));
    }
}
