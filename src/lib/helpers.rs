use std::fmt::Display;

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::constants::{FILE_TIME_FORMAT, HUMAN_TIME_FORMAT};

#[derive(Debug)]
pub struct WrfPlotError {
    msg: String,
}

impl From<String> for WrfPlotError {
    fn from(msg: String) -> Self {
        WrfPlotError { msg }
    }
}

impl From<WrfPlotError> for String {
    fn from(value: WrfPlotError) -> String {
        value.msg
    }
}

impl From<&str> for WrfPlotError {
    fn from(msg: &str) -> Self {
        WrfPlotError { msg: msg.into() }
    }
}

impl Display for WrfPlotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.msg)
    }
}

impl std::error::Error for WrfPlotError {}

pub fn parse_timezone(name: &str) -> Result<Tz, WrfPlotError> {
    name.parse::<Tz>()
        .map_err(|err| format!("Invalid timezone '{name}': {err}").into())
}

pub fn to_local(time: &DateTime<Utc>, tz: &Tz) -> DateTime<Tz> {
    time.with_timezone(tz)
}

/// "3. 5. 2024 ob 14:00"
pub fn human_time(time: &DateTime<Tz>) -> String {
    time.format(HUMAN_TIME_FORMAT).to_string()
}

/// "20240503_1400"
pub fn file_time(time: &DateTime<Tz>) -> String {
    time.format(FILE_TIME_FORMAT).to_string()
}

fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d_%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d_%H_%M_%S",
    ];
    let s = s.trim();
    // drop fractional seconds, "2024-05-01T00:00:00.000000000"
    let s = s.split('.').next().unwrap_or(s);
    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
}

/// Parses CF-style time units ("minutes since 2024-05-01 00:00:00").
/// Returns the reference time and the length of one unit in seconds.
pub fn parse_cf_units(units: &str) -> Result<(DateTime<Utc>, i64), WrfPlotError> {
    let (unit, reference) = units
        .split_once(" since ")
        .ok_or_else(|| format!("Invalid time units '{units}'"))?;

    let seconds = match unit.trim().to_lowercase().as_str() {
        "seconds" | "second" | "s" => 1,
        "minutes" | "minute" | "min" => 60,
        "hours" | "hour" | "h" => 3600,
        "days" | "day" | "d" => 86400,
        other => return Err(format!("Unsupported time unit '{other}'").into()),
    };

    let reference = parse_naive(reference)
        .ok_or_else(|| format!("Invalid reference time in units '{units}'"))?;

    Ok((Utc.from_utc_datetime(&reference), seconds))
}

/// decodes a CF time value expressed in `units`
pub fn decode_cf_time(value: f64, units: &str) -> Result<DateTime<Utc>, WrfPlotError> {
    let (reference, seconds) = parse_cf_units(units)?;
    let offset = (value * seconds as f64).round() as i64;
    let offset = Duration::try_seconds(offset).ok_or("Time offset out of range")?;
    Ok(reference + offset)
}

/// Valid time encoded in a WRF output file name,
/// e.g. `wrfout_d01_2024-05-01_03:00:00`.
pub fn parse_wrf_file_time(file_name: &str) -> Option<DateTime<Utc>> {
    let stem = file_name.strip_suffix(".nc").unwrap_or(file_name);
    if stem.len() < 19 || !stem.is_char_boundary(stem.len() - 19) {
        return None;
    }
    let stamp = &stem[stem.len() - 19..];
    parse_naive(stamp).map(|naive| Utc.from_utc_datetime(&naive))
}
