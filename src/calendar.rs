//! Civil-day arithmetic in the India reference timezone
//!
//! Every "same day" or "how many days" question in the tracker is answered in
//! India Standard Time (UTC+05:30, no DST) regardless of the machine's local
//! timezone. Instants are always `DateTime<Utc>`; civil dates are `NaiveDate`s
//! observed at the reference offset.

use std::time::Duration;

use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime, Offset, TimeDelta, Utc};

/// Offset of India Standard Time from UTC, in seconds
pub const REFERENCE_OFFSET_SECONDS: i32 = 5 * 3600 + 30 * 60;

/// Format used for civil date keys
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// The fixed reference offset (IST)
pub fn reference_offset() -> FixedOffset {
    FixedOffset::east_opt(REFERENCE_OFFSET_SECONDS).unwrap_or_else(|| Utc.fix())
}

/// Civil date of an instant as observed in IST
pub fn civil_date(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&reference_offset()).date_naive()
}

/// `YYYY-MM-DD` key of an instant as observed in IST
pub fn civil_date_key(instant: DateTime<Utc>) -> String {
    civil_date(instant).format(DATE_KEY_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` civil date key
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), DATE_KEY_FORMAT).ok()
}

/// Signed number of civil days from `start` to `now`.
///
/// Only the date components are compared, so 23:59 and 00:01 on consecutive
/// IST days are one day apart.
pub fn days_between(start: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (civil_date(now) - civil_date(start)).num_days()
}

/// 1-based day of the challenge that `now` falls on.
///
/// The start date itself is day 1. Instants before the start also report
/// day 1.
pub fn days_since_start(start: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let diff = days_between(start, now).saturating_add(1).max(1);
    u32::try_from(diff).unwrap_or(u32::MAX)
}

/// The instant at which `date` begins in IST
pub fn start_of_civil_day(date: NaiveDate) -> DateTime<Utc> {
    let local_midnight = date.and_time(NaiveTime::MIN).and_utc();
    local_midnight - TimeDelta::seconds(i64::from(REFERENCE_OFFSET_SECONDS))
}

/// Move a civil date by a signed number of days, saturating at chrono's range
pub fn add_civil_days(date: NaiveDate, days: i64) -> NaiveDate {
    let magnitude = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    };
    shifted.unwrap_or(if days >= 0 { NaiveDate::MAX } else { NaiveDate::MIN })
}

/// Time left until the next IST midnight after `now`
pub fn until_next_midnight(now: DateTime<Utc>) -> Duration {
    let tomorrow = add_civil_days(civil_date(now), 1);
    (start_of_civil_day(tomorrow) - now).to_std().unwrap_or(Duration::from_secs(24 * 60 * 60))
}
