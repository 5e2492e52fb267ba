//! A nanosecond-precision UTC timestamp stored as a single `u64` count of
//! nanoseconds since the Unix epoch (1970-01-01 00:00:00 UTC).
//!
//! Feeds that already deliver nanoseconds since epoch can be wrapped with
//! [`TimestampNano::new`] at no cost; the calendar view, the sub-second parts
//! and the string form are all computed on demand from that one field.
//!
//! The calendar view ([`CalendarUtc`]) has 100ns tick resolution and is
//! derived from whole microseconds, so the last three digits of the
//! nanosecond count are only available through [`TimestampNano::nanoseconds`].

mod calendar;
mod error;
mod parse;

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

pub use calendar::{CalendarUtc, MAX_TICKS, TICKS_PER_DAY, TICKS_PER_SECOND, UNIX_EPOCH_TICKS};
pub use error::{Error, InvalidField, Result};

pub const NANOS_PER_MICROSECOND: i64 = 1_000;
pub const NANOS_PER_MILLISECOND: i64 = 1_000_000;
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;
pub const NANOS_PER_MINUTE: i64 = 60 * NANOS_PER_SECOND;
pub const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MINUTE;
pub const NANOS_PER_DAY: i64 = 24 * NANOS_PER_HOUR;

const NANOS_PER_TICK: i128 = 100;

/// An instant in UTC with nanosecond precision, stored as nanoseconds since
/// the Unix epoch.
///
/// Instants before the epoch cannot be represented. The `add_*` family wraps
/// modulo 2^64 instead of failing; use
/// [`checked_add_nanoseconds`](Self::checked_add_nanoseconds) or
/// [`saturating_add_nanoseconds`](Self::saturating_add_nanoseconds) where
/// wrapping is not wanted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct TimestampNano {
    nanoseconds_since_epoch: u64,
}

impl TimestampNano {
    pub const UNIX_EPOCH: TimestampNano = TimestampNano::new(0);
    pub const MAX: TimestampNano = TimestampNano::new(u64::MAX);

    /// Wraps a raw count of nanoseconds since the Unix epoch. Any value is
    /// accepted.
    pub const fn new(nanoseconds_since_epoch: u64) -> Self {
        Self {
            nanoseconds_since_epoch,
        }
    }

    /// Builds a timestamp from calendar fields.
    ///
    /// `year` through `millisecond` are validated like [`CalendarUtc::new`].
    /// `microsecond` and `nanosecond` are not range checked: they are added as
    /// offsets, so a `microsecond` of 5000 moves the instant forward by 5ms.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        year: u32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        millisecond: u32,
        microsecond: i64,
        nanosecond: i64,
    ) -> Result<Self> {
        let instant = CalendarUtc::new(year, month, day, hour, minute, second, millisecond)?
            .add_microseconds(microsecond)?;
        Self::from_signed_nanos(
            (instant.ticks() - UNIX_EPOCH_TICKS) as i128 * NANOS_PER_TICK + nanosecond as i128,
        )
    }

    /// Midnight UTC on the given date.
    pub fn from_date(year: u32, month: u32, day: u32) -> Result<Self> {
        Self::from_parts(year, month, day, 0, 0, 0, 0, 0, 0)
    }

    pub fn from_date_time(
        year: u32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<Self> {
        Self::from_parts(year, month, day, hour, minute, second, 0, 0, 0)
    }

    /// Converts a calendar instant exactly. Instants before the epoch are
    /// rejected.
    pub fn from_calendar_utc(instant: CalendarUtc) -> Result<Self> {
        Self::from_signed_nanos((instant.ticks() - UNIX_EPOCH_TICKS) as i128 * NANOS_PER_TICK)
    }

    fn from_signed_nanos(nanos: i128) -> Result<Self> {
        if nanos < 0 {
            log::debug!("{nanos}ns is before the Unix epoch");
            return Err(InvalidField::BeforeEpoch.into());
        }
        match u64::try_from(nanos) {
            Ok(nanos) => Ok(Self::new(nanos)),
            Err(_) => {
                log::debug!("{nanos}ns does not fit in 64 bits");
                Err(InvalidField::OutOfRange.into())
            }
        }
    }

    /// Parses `yyyy-MM-dd HH:mm:ss.fffffffff`.
    ///
    /// The date and time may be separated by any single non-digit character
    /// and the fraction may have 0 to 9 digits. Fraction digits fill
    /// milliseconds, then microseconds, then nanoseconds, three at a time, so
    /// `.1` is one millisecond.
    pub fn parse(text: &str) -> Result<Self> {
        let f = parse::parse_fields(text)?;
        Self::from_parts(
            f.year,
            f.month,
            f.day,
            f.hour,
            f.minute,
            f.second,
            f.millisecond,
            f.microsecond as i64,
            f.nanosecond as i64,
        )
    }

    /// Current UTC time from the system clock.
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self::new(u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX))
    }

    /// Nanoseconds since the Unix epoch, verbatim.
    pub const fn to_unix_nanoseconds(&self) -> u64 {
        self.nanoseconds_since_epoch
    }

    /// Ticks since 0001-01-01, truncated to whole microseconds.
    pub const fn total_ticks(&self) -> i64 {
        UNIX_EPOCH_TICKS + (self.nanoseconds_since_epoch / 1000) as i64 * 10
    }

    /// The calendar view, without the last three nanosecond digits.
    pub fn to_calendar_utc(&self) -> CalendarUtc {
        // Every u64 nanosecond count lands before 2555, well inside the calendar.
        CalendarUtc::from_ticks_unchecked(self.total_ticks())
    }

    /// Midnight of the calendar day.
    pub fn date(&self) -> CalendarUtc {
        self.to_calendar_utc().date()
    }

    /// The nanoseconds below the calendar's resolution (0-999).
    pub const fn nanoseconds(&self) -> u32 {
        (self.nanoseconds_since_epoch % 1000) as u32
    }

    /// The fraction of the second in nanoseconds (0-999_999_999).
    pub fn subsec_nanos(&self) -> u32 {
        let instant = self.to_calendar_utc();
        instant.millisecond() * 1_000_000 + instant.microsecond() * 1_000 + self.nanoseconds()
    }

    /// Adds a signed number of nanoseconds, wrapping modulo 2^64.
    ///
    /// Subtracting past the epoch wraps to the far end of the range rather than
    /// failing.
    #[must_use]
    pub const fn add_nanoseconds(&self, nanoseconds: i64) -> Self {
        Self::new(
            self.nanoseconds_since_epoch
                .wrapping_add_signed(nanoseconds),
        )
    }

    #[must_use]
    pub const fn add_microseconds(&self, microseconds: i64) -> Self {
        self.add_nanoseconds(microseconds.wrapping_mul(NANOS_PER_MICROSECOND))
    }

    #[must_use]
    pub const fn add_milliseconds(&self, milliseconds: i64) -> Self {
        self.add_nanoseconds(milliseconds.wrapping_mul(NANOS_PER_MILLISECOND))
    }

    #[must_use]
    pub const fn add_seconds(&self, seconds: i64) -> Self {
        self.add_nanoseconds(seconds.wrapping_mul(NANOS_PER_SECOND))
    }

    #[must_use]
    pub const fn add_minutes(&self, minutes: i64) -> Self {
        self.add_nanoseconds(minutes.wrapping_mul(NANOS_PER_MINUTE))
    }

    #[must_use]
    pub const fn add_hours(&self, hours: i64) -> Self {
        self.add_nanoseconds(hours.wrapping_mul(NANOS_PER_HOUR))
    }

    #[must_use]
    pub const fn add_days(&self, days: i32) -> Self {
        self.add_nanoseconds((days as i64).wrapping_mul(NANOS_PER_DAY))
    }

    /// Shifts by whole calendar months, clamping the day of month to the
    /// target month's length. The sub-microsecond nanoseconds are carried over
    /// unchanged.
    pub fn add_months(&self, months: i32) -> Result<Self> {
        let shifted = self.to_calendar_utc().add_months(months)?;
        Self::from_calendar_utc(shifted)?
            .checked_add_nanoseconds(self.nanoseconds() as i64)
            .ok_or_else(|| InvalidField::OutOfRange.into())
    }

    /// Adds a signed number of nanoseconds, returning `None` instead of
    /// wrapping.
    pub const fn checked_add_nanoseconds(&self, nanoseconds: i64) -> Option<Self> {
        match self
            .nanoseconds_since_epoch
            .checked_add_signed(nanoseconds)
        {
            Some(nanos) => Some(Self::new(nanos)),
            None => None,
        }
    }

    /// Adds a signed number of nanoseconds, clamping at the epoch and at
    /// [`TimestampNano::MAX`].
    #[must_use]
    pub const fn saturating_add_nanoseconds(&self, nanoseconds: i64) -> Self {
        Self::new(
            self.nanoseconds_since_epoch
                .saturating_add_signed(nanoseconds),
        )
    }
}

/// Formats as `yyyy-MM-dd HH:mm:ss.fffffffff`.
impl fmt::Display for TimestampNano {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let instant = self.to_calendar_utc();
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:09}",
            instant.year(),
            instant.month(),
            instant.day(),
            instant.hour(),
            instant.minute(),
            instant.second(),
            self.subsec_nanos()
        )
    }
}

impl FromStr for TimestampNano {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<u64> for TimestampNano {
    fn from(nanoseconds_since_epoch: u64) -> Self {
        Self::new(nanoseconds_since_epoch)
    }
}

impl From<TimestampNano> for u64 {
    fn from(timestamp: TimestampNano) -> u64 {
        timestamp.nanoseconds_since_epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE_NANOS: u64 = 1_700_000_000_000_000_000;
    const FULL_NANOS: u64 = 1_739_219_232_123_456_789;

    fn base() -> TimestampNano {
        TimestampNano::new(BASE_NANOS)
    }

    #[test]
    fn test_add_nanoseconds() {
        assert_eq!(base().add_nanoseconds(500).to_unix_nanoseconds(), BASE_NANOS + 500);
    }

    #[test]
    fn test_add_microseconds() {
        assert_eq!(
            base().add_microseconds(1_000).to_unix_nanoseconds(),
            BASE_NANOS + 1_000_000
        );
    }

    #[test]
    fn test_add_milliseconds() {
        assert_eq!(
            base().add_milliseconds(2).to_unix_nanoseconds(),
            BASE_NANOS + 2_000_000
        );
    }

    #[test]
    fn test_add_seconds() {
        assert_eq!(
            base().add_seconds(3).to_unix_nanoseconds(),
            BASE_NANOS + 3_000_000_000
        );
    }

    #[test]
    fn test_add_minutes() {
        assert_eq!(
            base().add_minutes(4).to_unix_nanoseconds(),
            BASE_NANOS + 4 * 60 * 1_000_000_000
        );
    }

    #[test]
    fn test_add_hours() {
        assert_eq!(
            base().add_hours(5).to_unix_nanoseconds(),
            BASE_NANOS + 5 * 3600 * 1_000_000_000
        );
    }

    #[test]
    fn test_add_days() {
        assert_eq!(
            base().add_days(1).to_unix_nanoseconds(),
            BASE_NANOS + 86_400_000_000_000
        );
    }

    #[test]
    fn test_add_days_does_not_truncate_to_32_bits() {
        assert_eq!(
            base().add_days(100_000).to_unix_nanoseconds(),
            BASE_NANOS + 8_640_000_000_000_000_000
        );
        assert_eq!(base().add_days(-3), base().add_hours(-72));
    }

    #[test]
    fn test_add_months() {
        let expected = base().to_calendar_utc().add_months(2).unwrap();
        let result = base().add_months(2).unwrap();
        assert_eq!(result.to_calendar_utc(), expected);
        assert_eq!(result.to_unix_nanoseconds(), 1_705_270_400_000_000_000);
    }

    #[test]
    fn test_add_months_keeps_sub_microsecond_nanos() {
        let ts = TimestampNano::new(FULL_NANOS);
        let next = ts.add_months(1).unwrap();
        assert_eq!(next.nanoseconds(), 789);
        assert_eq!(next.to_string(), "2025-03-10 20:27:12.123456789");

        let back = ts.add_months(-12).unwrap();
        assert_eq!(back.to_string(), "2024-02-10 20:27:12.123456789");
    }

    #[test]
    fn test_add_months_clamps_day() {
        let ts = TimestampNano::parse("2024-01-31 08:00:00.000000007").unwrap();
        assert_eq!(
            ts.add_months(1).unwrap().to_string(),
            "2024-02-29 08:00:00.000000007"
        );
    }

    #[test]
    fn test_add_months_before_epoch_fails() {
        let ts = TimestampNano::from_date(1970, 1, 15).unwrap();
        assert_eq!(
            ts.add_months(-1),
            Err(Error::InvalidCalendarField(InvalidField::BeforeEpoch))
        );
        assert_eq!(
            TimestampNano::MAX.add_months(1),
            Err(Error::InvalidCalendarField(InvalidField::OutOfRange))
        );
    }

    #[test]
    fn test_to_unix_nanoseconds() {
        assert_eq!(base().to_unix_nanoseconds(), BASE_NANOS);
        assert_eq!(u64::from(base()), BASE_NANOS);
        assert_eq!(TimestampNano::from(BASE_NANOS), base());
    }

    #[test]
    fn test_to_string_matches_calendar() {
        let ts = base();
        let instant = ts.to_calendar_utc();
        let expected = format!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:09}",
            instant.year(),
            instant.month(),
            instant.day(),
            instant.hour(),
            instant.minute(),
            instant.second(),
            ts.to_unix_nanoseconds() % 1_000_000_000
        );
        assert_eq!(ts.to_string(), expected);
        assert_eq!(ts.to_string(), "2023-11-14 22:13:20.000000000");
    }

    #[test]
    fn test_epoch() {
        let instant = CalendarUtc::from_date(1970, 1, 1).unwrap();
        let ts = TimestampNano::from_calendar_utc(instant).unwrap();
        assert_eq!(ts.to_calendar_utc(), instant);
        assert_eq!(ts.to_unix_nanoseconds(), 0);
        assert_eq!(ts.total_ticks(), 621_355_968_000_000_000);
        assert_eq!(ts, TimestampNano::UNIX_EPOCH);
        assert_eq!(TimestampNano::default(), TimestampNano::UNIX_EPOCH);
    }

    #[test]
    fn test_from_calendar_with_milliseconds() {
        let instant = CalendarUtc::new(2025, 2, 10, 20, 27, 12, 123).unwrap();
        let ts = TimestampNano::from_calendar_utc(instant).unwrap();
        assert_eq!(ts.to_calendar_utc(), instant);
        assert_eq!(ts.to_unix_nanoseconds(), 1_739_219_232_123_000_000);
        assert_eq!(ts.nanoseconds(), 0);
    }

    #[test]
    fn test_from_calendar_before_epoch_fails() {
        let instant = CalendarUtc::from_date(1969, 12, 31).unwrap();
        assert_eq!(
            TimestampNano::from_calendar_utc(instant),
            Err(Error::InvalidCalendarField(InvalidField::BeforeEpoch))
        );
    }

    #[test]
    fn test_from_nanoseconds() {
        let ts = TimestampNano::new(FULL_NANOS);
        let expected = CalendarUtc::new(2025, 2, 10, 20, 27, 12, 123)
            .unwrap()
            .add_microseconds(456)
            .unwrap();
        assert_eq!(ts.to_unix_nanoseconds(), FULL_NANOS);
        assert_eq!(ts.to_calendar_utc(), expected);
        assert_eq!(ts.nanoseconds(), 789);
        assert_eq!(ts.subsec_nanos(), 123_456_789);
        assert_eq!(ts.date(), CalendarUtc::from_date(2025, 2, 10).unwrap());
    }

    #[test]
    fn test_calendar_view_drops_hundreds_of_nanos() {
        let ts = TimestampNano::new(1_000_000_999);
        assert_eq!(ts.to_calendar_utc().tick_of_second(), 0);
        assert_eq!(ts.subsec_nanos(), 999);
    }

    #[test]
    fn test_format() {
        assert_eq!(
            TimestampNano::new(FULL_NANOS).to_string(),
            "2025-02-10 20:27:12.123456789"
        );
        assert_eq!(
            TimestampNano::UNIX_EPOCH.to_string(),
            "1970-01-01 00:00:00.000000000"
        );
        assert_eq!(
            TimestampNano::MAX.to_string(),
            "2554-07-21 23:34:33.709551615"
        );
    }

    #[test]
    fn test_parse() {
        let cases = [
            ("2025-02-10 20:27:12.123456789", 123, 456, 789),
            ("2025-02-10 20:27:12.123456", 123, 456, 0),
            ("2025-02-10 20:27:12.123", 123, 0, 0),
            ("2025-02-10 20:27:12", 0, 0, 0),
        ];
        for (text, millisecond, microsecond, nanosecond) in cases {
            let ts = TimestampNano::parse(text).unwrap();
            let expected = CalendarUtc::new(2025, 2, 10, 20, 27, 12, millisecond)
                .unwrap()
                .add_microseconds(microsecond)
                .unwrap();
            assert_eq!(ts.to_calendar_utc(), expected, "{text}");
            assert_eq!(ts.nanoseconds(), nanosecond, "{text}");
            assert_eq!(text.parse::<TimestampNano>(), Ok(ts));
        }
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            TimestampNano::parse("10/02/2025"),
            Err(Error::Parse {
                input: "10/02/2025".to_owned()
            })
        );
        assert_eq!(
            TimestampNano::parse("2025-02-30 00:00:00"),
            Err(Error::InvalidCalendarField(InvalidField::Day {
                year: 2025,
                month: 2,
                day: 30
            }))
        );
        assert_eq!(
            TimestampNano::parse("2025-13-01 00:00:00"),
            Err(Error::InvalidCalendarField(InvalidField::Month(13)))
        );
        assert_eq!(
            TimestampNano::parse("1969-12-31 23:59:59.999"),
            Err(Error::InvalidCalendarField(InvalidField::BeforeEpoch))
        );
    }

    #[test]
    fn test_add_nanoseconds_formatting() {
        let cases = [
            ("2025-02-10 20:27:12", 123_456_789, "2025-02-10 20:27:12.123456789"),
            ("2025-02-10 20:27:12.123456789", -123_456_789, "2025-02-10 20:27:12.000000000"),
        ];
        for (text, delta, expected) in cases {
            let ts = TimestampNano::parse(text).unwrap().add_nanoseconds(delta);
            assert_eq!(ts.to_string(), expected);
        }
    }

    #[test]
    fn test_add_nanoseconds_wraps_below_epoch() {
        let ts = TimestampNano::new(5).add_nanoseconds(-10);
        assert_eq!(ts.to_unix_nanoseconds(), u64::MAX - 4);
        assert_eq!(TimestampNano::MAX.add_nanoseconds(1), TimestampNano::UNIX_EPOCH);
    }

    #[test]
    fn test_checked_and_saturating() {
        let ts = TimestampNano::new(5);
        assert_eq!(ts.checked_add_nanoseconds(-10), None);
        assert_eq!(ts.checked_add_nanoseconds(-5), Some(TimestampNano::UNIX_EPOCH));
        assert_eq!(ts.saturating_add_nanoseconds(-10), TimestampNano::UNIX_EPOCH);
        assert_eq!(TimestampNano::MAX.checked_add_nanoseconds(1), None);
        assert_eq!(TimestampNano::MAX.saturating_add_nanoseconds(1), TimestampNano::MAX);
    }

    #[test]
    fn test_from_parts_offsets() {
        let ts = TimestampNano::from_parts(2025, 2, 10, 0, 0, 0, 0, 5_000, 0).unwrap();
        assert_eq!(ts.to_calendar_utc().millisecond(), 5);

        let ts = TimestampNano::from_parts(2025, 2, 10, 0, 0, 0, 0, 0, 1_500).unwrap();
        assert_eq!(ts.to_string(), "2025-02-10 00:00:00.000001500");

        let ts = TimestampNano::from_parts(2025, 2, 10, 0, 0, 0, 0, -1, 0).unwrap();
        assert_eq!(ts.to_string(), "2025-02-09 23:59:59.999999000");
    }

    #[test]
    fn test_from_parts_past_u64_range() {
        assert_eq!(
            TimestampNano::from_date(2600, 1, 1),
            Err(Error::InvalidCalendarField(InvalidField::OutOfRange))
        );
    }

    #[test]
    fn test_from_date_time() {
        let ts = TimestampNano::from_date_time(2025, 2, 10, 20, 27, 12).unwrap();
        assert_eq!(ts.to_unix_nanoseconds(), 1_739_219_232_000_000_000);
    }

    #[test]
    fn test_now_is_after_2020() {
        assert!(TimestampNano::now() > TimestampNano::from_date(2020, 1, 1).unwrap());
    }

    #[test]
    fn test_ordering() {
        let a = TimestampNano::new(FULL_NANOS);
        assert!(a < a.add_nanoseconds(1));
        assert!(a > a.add_nanoseconds(-1));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serializes_as_single_integer() {
        let ts = TimestampNano::new(FULL_NANOS);
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "1739219232123456789");
        assert_eq!(serde_json::from_str::<TimestampNano>(&json).unwrap(), ts);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_calendar_serializes_as_ticks() {
        let instant = CalendarUtc::UNIX_EPOCH;
        assert_eq!(serde_json::to_string(&instant).unwrap(), "621355968000000000");
        assert!(serde_json::from_str::<CalendarUtc>("-1").is_err());
    }
}
