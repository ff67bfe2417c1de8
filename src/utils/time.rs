//! Report clock and timestamp formats.
//!
//! The hot lists this engine aggregates roll over on China Standard Time,
//! so the report clock is fixed at UTC+8 regardless of host timezone.

use chrono::{DateTime, FixedOffset, Utc};
use once_cell::sync::Lazy;

static REPORT_TZ: Lazy<FixedOffset> =
    Lazy::new(|| FixedOffset::east_opt(8 * 3600).expect("static UTC+8 offset"));

/// Current time on the report clock.
pub fn report_now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&*REPORT_TZ)
}

/// Daily artifact folder name, e.g. `2026年08月06日`.
pub fn date_folder(now: &DateTime<FixedOffset>) -> String {
    now.format("%Y年%m月%d日").to_string()
}

/// Timestamped file name stem, e.g. `15时30分`.
pub fn time_filename(now: &DateTime<FixedOffset>) -> String {
    now.format("%H时%M分").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_follow_report_clock() {
        let t = REPORT_TZ.with_ymd_and_hms(2026, 8, 6, 15, 30, 0).unwrap();
        assert_eq!(date_folder(&t), "2026年08月06日");
        assert_eq!(time_filename(&t), "15时30分");
    }
}
