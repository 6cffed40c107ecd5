//! In-process daily schedule for the anniversary check.
//!
//! Sleeps until the configured UTC time of day, runs the check, repeats.
//! Each run is independent; a failure is logged and the next day still runs.

use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::routes::anniversary::run_check;
use crate::state::AppState;

/// First instant strictly after `now` whose UTC time of day is `at`.
pub fn next_run_after(now: DateTime<Utc>, at: NaiveTime) -> DateTime<Utc> {
    let today = now.date_naive().and_time(at).and_utc();
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

/// Run the anniversary check every day at `state.config.schedule_utc`.
/// Runs until the task is cancelled.
pub async fn run_daily(state: AppState) {
    let at = state.config.schedule_utc;

    loop {
        let now = Utc::now();
        let next = next_run_after(now, at);
        let wait = (next - now).to_std().unwrap_or_default();
        tracing::info!(next_run = %next, "Next anniversary check scheduled");

        tokio::time::sleep(wait).await;

        let today = Utc::now().date_naive();
        match run_check(&state, today).await {
            Ok(outcome) => tracing::info!(%today, %outcome, "Scheduled anniversary check finished"),
            Err(e) => tracing::error!(%today, error = %e, "Scheduled anniversary check failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn two_pm() -> NaiveTime {
        NaiveTime::from_hms_opt(14, 0, 0).unwrap()
    }

    #[test]
    fn test_next_run_later_today() {
        let now = Utc.with_ymd_and_hms(2026, 8, 5, 9, 30, 0).unwrap();
        assert_eq!(
            next_run_after(now, two_pm()),
            Utc.with_ymd_and_hms(2026, 8, 5, 14, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_next_run_tomorrow_when_passed_or_exact() {
        let exact = Utc.with_ymd_and_hms(2026, 8, 5, 14, 0, 0).unwrap();
        assert_eq!(
            next_run_after(exact, two_pm()),
            Utc.with_ymd_and_hms(2026, 8, 6, 14, 0, 0).unwrap()
        );

        let late = Utc.with_ymd_and_hms(2026, 12, 31, 23, 59, 0).unwrap();
        assert_eq!(
            next_run_after(late, two_pm()),
            Utc.with_ymd_and_hms(2027, 1, 1, 14, 0, 0).unwrap()
        );
    }
}
