use chrono::offset::LocalResult;
use chrono::{NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimezoneError {
    #[error("unknown time zone identifier: {0}")]
    InvalidTimezone(String),

    #[error("local time {0} does not exist in time zone {1}")]
    NonexistentLocalTime(NaiveDateTime, Tz),
}

pub fn parse_timezone(name: &str) -> Result<Tz, TimezoneError> {
    name.parse()
        .map_err(|_| TimezoneError::InvalidTimezone(name.to_string()))
}

/// Reinterprets a naive wall-clock timestamp from `from_tz` into `to_tz`,
/// applying each zone's rules at the given calendar date. Equal zones are
/// an identity and skip conversion entirely.
///
/// An ambiguous local time (clocks rolled back) resolves to the earlier
/// instant; a nonexistent one (clocks jumped forward) is an error.
pub fn convert_timezone(
    date_time: NaiveDateTime,
    from_tz: Tz,
    to_tz: Tz,
) -> Result<NaiveDateTime, TimezoneError> {
    if from_tz == to_tz {
        return Ok(date_time);
    }

    let localized = match from_tz.from_local_datetime(&date_time) {
        LocalResult::Single(localized) => localized,
        LocalResult::Ambiguous(earlier, _) => earlier,
        LocalResult::None => {
            return Err(TimezoneError::NonexistentLocalTime(date_time, from_tz));
        }
    };

    Ok(localized.with_timezone(&to_tz).naive_local())
}

pub fn convert_timezone_by_name(
    date_time: NaiveDateTime,
    from_tz: &str,
    to_tz: &str,
) -> Result<NaiveDateTime, TimezoneError> {
    let from_tz = parse_timezone(from_tz)?;
    let to_tz = parse_timezone(to_tz)?;

    convert_timezone(date_time, from_tz, to_tz)
}
