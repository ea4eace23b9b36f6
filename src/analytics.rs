use crate::session::Session;
use chrono::{DateTime, Duration, Local, Utc};

/// One chart point: a local date label and the session length in minutes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesPoint {
    pub label: String,
    pub minutes: u64,
}

impl SeriesPoint {
    pub fn new(label: impl Into<String>, minutes: u64) -> Self {
        Self {
            label: label.into(),
            minutes,
        }
    }
}

fn local_datetime(epoch_ms: u64) -> Option<DateTime<Local>> {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms as i64).map(|t| t.with_timezone(&Local))
}

/// Sum of durations over sessions started within the local calendar day
/// of `now`. Empty store -> 0.
pub fn today_total(sessions: &[Session], now: DateTime<Local>) -> u64 {
    let today = now.date_naive();
    sessions
        .iter()
        .filter(|s| local_datetime(s.start_time).map(|t| t.date_naive()) == Some(today))
        .map(|s| s.duration)
        .sum()
}

/// Mean duration over sessions started within the trailing 7 days of
/// `now`, boundary inclusive. Empty window -> 0, never NaN.
pub fn week_average(sessions: &[Session], now: DateTime<Local>) -> u64 {
    let cutoff = now - Duration::days(7);
    let durations: Vec<u64> = sessions
        .iter()
        .filter(|s| {
            local_datetime(s.start_time).is_some_and(|t| t >= cutoff && t <= now)
        })
        .map(|s| s.duration)
        .collect();
    if durations.is_empty() {
        return 0;
    }
    durations.iter().sum::<u64>() / durations.len() as u64
}

/// The last `n` sessions in chronological order, reduced to chart points.
/// An empty store yields a single sentinel so the chart always has a
/// renderable series.
pub fn recent_series(sessions: &[Session], n: usize) -> Vec<SeriesPoint> {
    if sessions.is_empty() {
        return vec![SeriesPoint::new("No sessions yet", 0)];
    }
    let start = sessions.len().saturating_sub(n);
    sessions[start..]
        .iter()
        .map(|s| {
            let label = local_datetime(s.start_time)
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            // round to nearest whole minute
            SeriesPoint::new(label, (s.duration + 30_000) / 60_000)
        })
        .collect()
}

/// Render a duration as "{hours}h {minutes}m", no padding, no seconds
pub fn format_duration(ms: u64) -> String {
    let total_minutes = ms / 60_000;
    format!("{}h {}m", total_minutes / 60, total_minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn session_at(start: DateTime<Local>, duration: u64) -> Session {
        let start_ms = start.timestamp_millis() as u64;
        Session {
            id: start_ms,
            start_time: start_ms,
            duration,
            focus_scores: Vec::new(),
            current_score: 0,
        }
    }

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_today_total_empty() {
        assert_eq!(today_total(&[], noon()), 0);
    }

    #[test]
    fn test_today_total_counts_only_today() {
        let now = noon();
        let sessions = vec![
            session_at(now - Duration::hours(2), 60_000),
            session_at(now - Duration::hours(1), 30_000),
            // yesterday evening, excluded despite being < 24h ago
            session_at(now - Duration::hours(14), 600_000),
        ];
        assert_eq!(today_total(&sessions, now), 90_000);
    }

    #[test]
    fn test_week_average_empty() {
        assert_eq!(week_average(&[], noon()), 0);
    }

    #[test]
    fn test_week_average_mean_over_trailing_window() {
        let now = noon();
        let sessions = vec![
            session_at(now - Duration::days(1), 100),
            session_at(now - Duration::days(3), 300),
            // outside the trailing week
            session_at(now - Duration::days(8), 5_000),
        ];
        assert_eq!(week_average(&sessions, now), 200);
    }

    #[test]
    fn test_week_average_includes_boundary() {
        let now = noon();
        let sessions = vec![session_at(now, 42)];
        assert_eq!(week_average(&sessions, now), 42);
    }

    #[test]
    fn test_recent_series_empty_store_sentinel() {
        let series = recent_series(&[], 7);
        assert_eq!(series, vec![SeriesPoint::new("No sessions yet", 0)]);
    }

    #[test]
    fn test_recent_series_takes_last_n_in_order() {
        let now = noon();
        let sessions: Vec<Session> = (0..10)
            .map(|i| session_at(now - Duration::days(9 - i), (i as u64 + 1) * 60_000))
            .collect();
        let series = recent_series(&sessions, 7);
        assert_eq!(series.len(), 7);
        let minutes: Vec<u64> = series.iter().map(|p| p.minutes).collect();
        assert_eq!(minutes, vec![4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_recent_series_rounds_minutes() {
        let now = noon();
        // 89.5s rounds to 1 minute, 90.1s rounds to 2
        let sessions = vec![session_at(now, 89_500), session_at(now, 90_100)];
        let series = recent_series(&sessions, 7);
        assert_eq!(series[0].minutes, 1);
        assert_eq!(series[1].minutes, 2);
    }

    #[test]
    fn test_recent_series_labels_are_local_dates() {
        let now = noon();
        let series = recent_series(&[session_at(now, 0)], 7);
        assert_eq!(series[0].label, "2026-03-10");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0h 0m");
        assert_eq!(format_duration(5_400_000), "1h 30m");
        assert_eq!(format_duration(59_999), "0h 0m");
        assert_eq!(format_duration(25 * 3_600_000), "25h 0m");
    }
}
