//! Marketplace time handling.
//!
//! The Wildberries statistics API reports timestamps in Moscow time (UTC+3)
//! without an offset marker, so sync windows and analytics clamping are all
//! defined against the MSK wall clock.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

const MSK_OFFSET_SECS: i32 = 3 * 3600;

fn msk_offset() -> FixedOffset {
    FixedOffset::east_opt(MSK_OFFSET_SECS).expect("valid fixed offset")
}

/// Current wall-clock moment in Moscow time, as the naive timestamp the
/// marketplace API speaks.
pub fn msk_now() -> NaiveDateTime {
    msk_now_from(Utc::now())
}

/// Deterministic variant of [`msk_now`] for callers that carry their own clock.
pub fn msk_now_from(utc: DateTime<Utc>) -> NaiveDateTime {
    utc.with_timezone(&msk_offset()).naive_local()
}

/// Current Moscow calendar date.
pub fn msk_today() -> NaiveDate {
    msk_now().date()
}
