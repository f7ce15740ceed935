//! Epoch-tick timestamp helpers.
//!
//! Catalog timestamps are stored as ticks: 100-nanosecond intervals
//! since 0001-01-01T00:00:00 UTC. This is the representation legacy
//! catalog writers used, so the on-disk numbers must keep meaning it.

use chrono::{DateTime, TimeZone, Utc};

/// Ticks per second (one tick is 100 ns).
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Ticks between 0001-01-01 and the Unix epoch (1970-01-01), both UTC.
const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

/// Current wall-clock time as ticks.
pub fn ticks_now() -> i64 {
    ticks_from_datetime(Utc::now())
}

/// Convert a `DateTime<Utc>` to ticks.
pub fn ticks_from_datetime(dt: DateTime<Utc>) -> i64 {
    let seconds = dt.timestamp();
    let sub_ticks = i64::from(dt.timestamp_subsec_nanos()) / 100;
    UNIX_EPOCH_TICKS + seconds * TICKS_PER_SECOND + sub_ticks
}

/// Convert ticks back to a `DateTime<Utc>`.
///
/// Ticks before the Unix epoch clamp to the epoch; the catalog never
/// holds real timestamps that old, only zero defaults.
pub fn datetime_from_ticks(ticks: i64) -> DateTime<Utc> {
    let unix_ticks = ticks - UNIX_EPOCH_TICKS;
    if unix_ticks < 0 {
        return Utc.timestamp_opt(0, 0).unwrap();
    }
    let seconds = unix_ticks / TICKS_PER_SECOND;
    let nanos = (unix_ticks % TICKS_PER_SECOND) * 100;
    Utc.timestamp_opt(seconds, nanos as u32).unwrap()
}
