use std::fmt;

use crate::error::{InvalidField, Result};

pub(crate) const TICKS_PER_MICROSECOND: i64 = 10;
pub(crate) const TICKS_PER_MILLISECOND: i64 = 10_000;
pub const TICKS_PER_SECOND: i64 = 10_000_000;
pub(crate) const TICKS_PER_MINUTE: i64 = 60 * TICKS_PER_SECOND;
pub(crate) const TICKS_PER_HOUR: i64 = 60 * TICKS_PER_MINUTE;
pub const TICKS_PER_DAY: i64 = 24 * TICKS_PER_HOUR;

/// Days from 0001-01-01 to 1970-01-01.
const DAYS_TO_UNIX_EPOCH: i64 = 719_162;

/// Ticks from 0001-01-01 to 1970-01-01.
pub const UNIX_EPOCH_TICKS: i64 = DAYS_TO_UNIX_EPOCH * TICKS_PER_DAY;

/// Ticks at 9999-12-31 23:59:59.9999999.
pub const MAX_TICKS: i64 = 3_155_378_975_999_999_999;

fn is_leap_year(year: u32) -> bool {
    (year.is_multiple_of(4) && !year.is_multiple_of(100)) || year.is_multiple_of(400)
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Days since 1970-01-01 for a proleptic Gregorian date (Hinnant's `days_from_civil`).
fn days_from_civil(year: u32, month: u32, day: u32) -> i64 {
    let y = if month <= 2 {
        year as i64 - 1
    } else {
        year as i64
    };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = (y - era * 400) as u32;
    let doy = (153 * (if month > 2 { month - 3 } else { month + 9 }) + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146097 + doe as i64 - 719468
}

/// Inverse of `days_from_civil` (Hinnant's `civil_from_days`).
fn civil_from_days(days: i64) -> (u32, u32, u32) {
    let z = days + 719468; // shift epoch to 0000-03-01
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u32; // day of era [0, 146096]
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365; // year of era [0, 399]
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // day of year [0, 365]
    let mp = (5 * doy + 2) / 153; // month proxy [0, 11]
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = if month <= 2 { y + 1 } else { y };
    (year as u32, month, day)
}

/// A UTC calendar instant with 100-nanosecond (tick) resolution.
///
/// Stored as ticks since 0001-01-01T00:00:00 on the proleptic Gregorian
/// calendar, valid through 9999-12-31T23:59:59.9999999. Leap seconds are not
/// modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "i64", into = "i64")
)]
pub struct CalendarUtc {
    ticks: i64,
}

impl CalendarUtc {
    /// 1970-01-01T00:00:00.
    pub const UNIX_EPOCH: CalendarUtc = CalendarUtc {
        ticks: UNIX_EPOCH_TICKS,
    };

    /// Builds an instant from calendar fields, rejecting any field outside its
    /// natural range.
    pub fn new(
        year: u32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        millisecond: u32,
    ) -> Result<Self> {
        if !(1..=9999).contains(&year) {
            return Err(InvalidField::Year(year).into());
        }
        if !(1..=12).contains(&month) {
            return Err(InvalidField::Month(month).into());
        }
        if day < 1 || day > days_in_month(year, month) {
            return Err(InvalidField::Day { year, month, day }.into());
        }
        if hour > 23 {
            return Err(InvalidField::Hour(hour).into());
        }
        if minute > 59 {
            return Err(InvalidField::Minute(minute).into());
        }
        if second > 59 {
            return Err(InvalidField::Second(second).into());
        }
        if millisecond > 999 {
            return Err(InvalidField::Millisecond(millisecond).into());
        }
        let days = days_from_civil(year, month, day) + DAYS_TO_UNIX_EPOCH;
        Ok(Self {
            ticks: days * TICKS_PER_DAY
                + hour as i64 * TICKS_PER_HOUR
                + minute as i64 * TICKS_PER_MINUTE
                + second as i64 * TICKS_PER_SECOND
                + millisecond as i64 * TICKS_PER_MILLISECOND,
        })
    }

    /// Midnight on the given date.
    pub fn from_date(year: u32, month: u32, day: u32) -> Result<Self> {
        Self::new(year, month, day, 0, 0, 0, 0)
    }

    pub fn from_ticks(ticks: i64) -> Result<Self> {
        if (0..=MAX_TICKS).contains(&ticks) {
            Ok(Self { ticks })
        } else {
            log::debug!("calendar ticks {ticks} outside 0..={MAX_TICKS}");
            Err(InvalidField::OutOfRange.into())
        }
    }

    /// Caller guarantees `0..=MAX_TICKS`.
    pub(crate) const fn from_ticks_unchecked(ticks: i64) -> Self {
        debug_assert!(ticks >= 0 && ticks <= MAX_TICKS);
        Self { ticks }
    }

    /// Ticks since 0001-01-01T00:00:00.
    pub fn ticks(&self) -> i64 {
        self.ticks
    }

    fn ymd(&self) -> (u32, u32, u32) {
        civil_from_days(self.ticks / TICKS_PER_DAY - DAYS_TO_UNIX_EPOCH)
    }

    pub fn year(&self) -> u32 {
        self.ymd().0
    }
    pub fn month(&self) -> u32 {
        self.ymd().1
    }
    pub fn day(&self) -> u32 {
        self.ymd().2
    }
    pub fn hour(&self) -> u32 {
        (self.ticks / TICKS_PER_HOUR % 24) as u32
    }
    pub fn minute(&self) -> u32 {
        (self.ticks / TICKS_PER_MINUTE % 60) as u32
    }
    pub fn second(&self) -> u32 {
        (self.ticks / TICKS_PER_SECOND % 60) as u32
    }

    /// Millisecond within the second (0-999).
    pub fn millisecond(&self) -> u32 {
        (self.ticks / TICKS_PER_MILLISECOND % 1000) as u32
    }

    /// Microsecond within the millisecond (0-999).
    pub fn microsecond(&self) -> u32 {
        (self.ticks / TICKS_PER_MICROSECOND % 1000) as u32
    }

    /// Ticks within the second (0-9_999_999).
    pub fn tick_of_second(&self) -> u32 {
        (self.ticks % TICKS_PER_SECOND) as u32
    }

    /// Midnight of the same day.
    pub fn date(&self) -> Self {
        Self {
            ticks: self.ticks - self.ticks % TICKS_PER_DAY,
        }
    }

    pub fn add_ticks(&self, ticks: i64) -> Result<Self> {
        let ticks = self
            .ticks
            .checked_add(ticks)
            .ok_or(InvalidField::OutOfRange)?;
        Self::from_ticks(ticks)
    }

    pub fn add_microseconds(&self, microseconds: i64) -> Result<Self> {
        let ticks = microseconds
            .checked_mul(TICKS_PER_MICROSECOND)
            .ok_or(InvalidField::OutOfRange)?;
        self.add_ticks(ticks)
    }

    /// Shifts by whole months. The day of month is clamped to the length of the
    /// target month; the time of day is kept.
    pub fn add_months(&self, months: i32) -> Result<Self> {
        let (year, month, day) = self.ymd();
        let index = year as i64 * 12 + (month as i64 - 1) + months as i64;
        let target_year = index.div_euclid(12);
        if !(1..=9999).contains(&target_year) {
            log::debug!("adding {months} months to {self} leaves the calendar range");
            return Err(InvalidField::OutOfRange.into());
        }
        let target_year = target_year as u32;
        let target_month = index.rem_euclid(12) as u32 + 1;
        let target_day = day.min(days_in_month(target_year, target_month));
        let days = days_from_civil(target_year, target_month, target_day) + DAYS_TO_UNIX_EPOCH;
        Ok(Self {
            ticks: days * TICKS_PER_DAY + self.ticks % TICKS_PER_DAY,
        })
    }
}

impl fmt::Display for CalendarUtc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (year, month, day) = self.ymd();
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:07}",
            year,
            month,
            day,
            self.hour(),
            self.minute(),
            self.second(),
            self.tick_of_second()
        )
    }
}

impl TryFrom<i64> for CalendarUtc {
    type Error = crate::Error;

    fn try_from(ticks: i64) -> Result<Self> {
        Self::from_ticks(ticks)
    }
}

impl From<CalendarUtc> for i64 {
    fn from(instant: CalendarUtc) -> i64 {
        instant.ticks
    }
}
