use chrono::{Local, NaiveDateTime, TimeDelta};

use crate::{
    error::{Error, Result},
    trend::{encode, FROM_FORMAT},
};

const FROM_PARAM: &str = "from";

/// Move a graph URL's `from=` parameter to `day_offset` days before now.
///
/// Best effort: an unparseable offset or a URL without a `from` parameter
/// returns the URL unchanged.
pub fn shift_from(url: &str, day_offset: &str) -> String {
    shift_from_at(url, day_offset, Local::now().naive_local())
}

/// [`shift_from`] relative to an explicit `now`.
pub fn shift_from_at(url: &str, day_offset: &str, now: NaiveDateTime) -> String {
    match try_shift(url, day_offset, now) {
        Ok(shifted) => shifted,
        Err(e) => {
            log::warn!("Returning graph url unchanged: {e}");
            url.to_string()
        }
    }
}

fn try_shift(url: &str, day_offset: &str, now: NaiveDateTime) -> Result<String> {
    let days: i64 = day_offset
        .trim()
        .parse()
        .map_err(|_| Error::MalformedShiftTarget {
            reason: format!("day offset {day_offset:?} is not an integer"),
        })?;

    let from = TimeDelta::try_days(days)
        .and_then(|delta| now.checked_sub_signed(delta))
        .ok_or_else(|| Error::MalformedShiftTarget {
            reason: format!("day offset {days} is out of range"),
        })?;

    replace_query_value(url, FROM_PARAM, &encode(&from.format(FROM_FORMAT).to_string()))
}

/// Replace the value of the first `name=` query parameter, leaving every other
/// byte of the URL untouched.
fn replace_query_value(url: &str, name: &str, value: &str) -> Result<String> {
    let query_start = url.find('?').map(|i| i + 1).unwrap_or(0);
    let mut offset = query_start;

    for param in url[query_start..].split('&') {
        let end = offset + param.len();
        if let Some(rest) = param.strip_prefix(name) {
            if rest.starts_with('=') {
                let value_start = offset + name.len() + 1;
                let mut shifted = String::with_capacity(url.len() + value.len());
                shifted.push_str(&url[..value_start]);
                shifted.push_str(value);
                shifted.push_str(&url[end..]);
                return Ok(shifted);
            }
        }
        offset = end + 1;
    }

    Err(Error::MalformedShiftTarget {
        reason: format!("no '{name}=' parameter in url"),
    })
}
