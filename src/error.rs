use thiserror::Error;

/// Errors produced when building or parsing a [`TimestampNano`](crate::TimestampNano).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The text did not match `yyyy-MM-dd HH:mm:ss.fffffffff`.
    #[error("invalid timestamp format, expected yyyy-MM-dd HH:mm:ss.fffffffff: {input:?}")]
    Parse { input: String },

    /// A calendar field was out of range, or the instant cannot be represented.
    #[error("invalid calendar field: {0}")]
    InvalidCalendarField(#[from] InvalidField),
}

/// The calendar field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidField {
    #[error("year {0} is outside 1-9999")]
    Year(u32),
    #[error("month {0} is outside 1-12")]
    Month(u32),
    #[error("day {day} does not exist in {year:04}-{month:02}")]
    Day { year: u32, month: u32, day: u32 },
    #[error("hour {0} is outside 0-23")]
    Hour(u32),
    #[error("minute {0} is outside 0-59")]
    Minute(u32),
    #[error("second {0} is outside 0-59")]
    Second(u32),
    #[error("millisecond {0} is outside 0-999")]
    Millisecond(u32),
    #[error("instant precedes the Unix epoch")]
    BeforeEpoch,
    #[error("instant is outside the representable range")]
    OutOfRange,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
