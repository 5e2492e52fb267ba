//! Scanner for `yyyy-MM-dd HH:mm:ss[.fffffffff]`.
//!
//! The pattern is searched for anywhere in the input: the first position where
//! it matches wins and text around the match is ignored. Fields are only
//! checked for being numeric here; range checks happen during calendar
//! construction.

use crate::error::{Error, Result};

/// Raw fields captured from a date/time string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Fields {
    pub year: u32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
    pub microsecond: u32,
    pub nanosecond: u32,
}

/// Byte spans of each captured group; fraction groups may be empty.
type Spans = [(usize, usize); 9];

/// Consumes up to `max` ASCII digits starting at `pos`, returning the end.
fn take_digits(bytes: &[u8], pos: usize, max: usize) -> usize {
    bytes[pos..]
        .iter()
        .take(max)
        .take_while(|b| b.is_ascii_digit())
        .count()
        + pos
}

fn number(bytes: &[u8], pos: usize) -> Option<(usize, usize)> {
    let end = take_digits(bytes, pos, usize::MAX);
    (end > pos).then_some((pos, end))
}

fn literal(bytes: &[u8], pos: usize, expected: u8) -> Option<usize> {
    (bytes.get(pos) == Some(&expected)).then_some(pos + 1)
}

fn match_at(text: &str, start: usize) -> Option<Spans> {
    let bytes = text.as_bytes();
    let mut spans: Spans = [(0, 0); 9];

    spans[0] = number(bytes, start)?;
    let pos = literal(bytes, spans[0].1, b'-')?;
    spans[1] = number(bytes, pos)?;
    let pos = literal(bytes, spans[1].1, b'-')?;
    spans[2] = number(bytes, pos)?;

    // Any single non-digit UTF-16 code unit separates date and time.
    let separator = text[spans[2].1..].chars().next()?;
    if separator.is_ascii_digit() || separator.len_utf16() != 1 {
        return None;
    }
    let pos = spans[2].1 + separator.len_utf8();

    spans[3] = number(bytes, pos)?;
    let pos = literal(bytes, spans[3].1, b':')?;
    spans[4] = number(bytes, pos)?;
    let pos = literal(bytes, spans[4].1, b':')?;
    spans[5] = number(bytes, pos)?;

    let mut pos = spans[5].1;
    while bytes.get(pos) == Some(&b'.') {
        pos += 1;
    }
    for span in &mut spans[6..] {
        let end = take_digits(bytes, pos, 3);
        *span = (pos, end);
        pos = end;
    }
    Some(spans)
}

/// Returns the first match. Starts inside a digit run end their year at the
/// same byte as the run's first digit, so a failed run is skipped whole.
fn find_match(text: &str) -> Option<Spans> {
    let bytes = text.as_bytes();
    let mut pos = 0;
    while pos < bytes.len() {
        if !bytes[pos].is_ascii_digit() {
            pos += 1;
            continue;
        }
        if let Some(spans) = match_at(text, pos) {
            return Some(spans);
        }
        pos = take_digits(bytes, pos, usize::MAX);
    }
    None
}

fn field(text: &str, (start, end): (usize, usize)) -> Option<u32> {
    if start == end {
        return Some(0);
    }
    // Fields are capped at the signed 32-bit range.
    let value: i32 = text[start..end].parse().ok()?;
    u32::try_from(value).ok()
}

pub(crate) fn parse_fields(text: &str) -> Result<Fields> {
    let error = || {
        log::debug!("rejecting date/time text {text:?}");
        Error::Parse {
            input: text.to_owned(),
        }
    };

    let spans = find_match(text).ok_or_else(error)?;

    let mut values = [0u32; 9];
    for (value, span) in values.iter_mut().zip(spans) {
        *value = field(text, span).ok_or_else(error)?;
    }
    let [year, month, day, hour, minute, second, millisecond, microsecond, nanosecond] = values;
    Ok(Fields {
        year,
        month,
        day,
        hour,
        minute,
        second,
        millisecond,
        microsecond,
        nanosecond,
    })
}
