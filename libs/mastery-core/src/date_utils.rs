//! Date utilities for daily reset hour handling.

use chrono::{DateTime, Duration, NaiveTime, Utc};

/// Bounds `[start, end)` of the study day containing `now`.
///
/// The study day begins at `daily_reset_hour` (UTC). Before that hour, `now`
/// still belongs to the previous day, which lets late-night sessions count
/// toward the day they started.
pub fn today_window(now: DateTime<Utc>, daily_reset_hour: u32) -> (DateTime<Utc>, DateTime<Utc>) {
    let reset = NaiveTime::from_hms_opt(daily_reset_hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
    let mut start = now.date_naive().and_time(reset).and_utc();
    if now < start {
        start -= Duration::days(1);
    }
    (start, start + Duration::days(1))
}
