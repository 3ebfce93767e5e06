//! Shared idle-duration arithmetic and formatting.
//!
//! A presence stanza can report idleness two ways at once: a delayed-delivery
//! timestamp (when the sender last changed state) and an elapsed-seconds hint
//! from the sender's client. The effective idle time is the wall-clock
//! distance to the timestamp plus the hint.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Compute the idle duration for a presence update.
///
/// Returns `None` when the stanza reported neither signal. A delay timestamp
/// in the future contributes zero.
pub fn idle_duration(
    delay: Option<&DateTime<Utc>>,
    idle_seconds: Option<u64>,
    now: DateTime<Utc>,
) -> Option<Duration> {
    let since_delay =
        delay.map(|stamp| now.signed_duration_since(*stamp).to_std().unwrap_or_default());
    let hint = idle_seconds.map(Duration::from_secs);

    match (since_delay, hint) {
        (None, None) => None,
        (Some(d), None) => Some(d),
        (None, Some(h)) => Some(h),
        (Some(d), Some(h)) => Some(d + h),
    }
}

/// Render an idle duration for display, in whole minutes.
pub fn format_idle(idle: Duration) -> String {
    let minutes = idle.as_secs() / 60;
    if minutes < 60 {
        format!("{minutes}m")
    } else {
        format!("{}h {:02}m", minutes / 60, minutes % 60)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at_noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).single().unwrap()
    }

    #[test]
    fn combines_delay_and_elapsed_hint() {
        let now = at_noon();
        let stamp = now - chrono::Duration::minutes(10);
        let idle = idle_duration(Some(&stamp), Some(120), now).unwrap();
        assert_eq!(format_idle(idle), "12m");
    }

    #[test]
    fn hint_alone() {
        let idle = idle_duration(None, Some(300), at_noon()).unwrap();
        assert_eq!(idle, Duration::from_secs(300));
    }

    #[test]
    fn delay_alone() {
        let now = at_noon();
        let stamp = now - chrono::Duration::minutes(3);
        let idle = idle_duration(Some(&stamp), None, now).unwrap();
        assert_eq!(idle, Duration::from_secs(180));
    }

    #[test]
    fn future_delay_contributes_zero() {
        let now = at_noon();
        let stamp = now + chrono::Duration::minutes(5);
        let idle = idle_duration(Some(&stamp), Some(60), now).unwrap();
        assert_eq!(idle, Duration::from_secs(60));
    }

    #[test]
    fn neither_signal_is_none() {
        assert!(idle_duration(None, None, at_noon()).is_none());
    }

    #[test]
    fn formats_hours() {
        assert_eq!(format_idle(Duration::from_secs(65 * 60)), "1h 05m");
        assert_eq!(format_idle(Duration::from_secs(59 * 60)), "59m");
    }
}
