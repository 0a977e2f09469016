//! # Clock Seeds
//!
//! Default seed source when the caller does not pin one: the local
//! wall-clock time read as the decimal number `HHMMSSfff`.

use chrono::{DateTime, Local, TimeZone, Timelike};

/// Seed from the current local time.
#[must_use]
pub fn clock_seed() -> u64 {
    clock_seed_from(&Local::now())
}

/// Seed for a given time: hours, minutes, seconds and milliseconds
/// concatenated as zero-padded decimal digits.
///
/// The result always lies in `0..=235_959_999`.
#[must_use]
pub fn clock_seed_from<Tz: TimeZone>(time: &DateTime<Tz>) -> u64 {
    // Leap seconds report up to 1999 ms
    let millis = u64::from((time.nanosecond() / 1_000_000).min(999));
    u64::from(time.hour()) * 10_000_000
        + u64::from(time.minute()) * 100_000
        + u64::from(time.second()) * 1_000
        + millis
}
