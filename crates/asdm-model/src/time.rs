//! Instants and durations with nanosecond resolution.
//!
//! [`ArrayTime`] counts nanoseconds since MJD 0 (1858-11-17T00:00:00 UTC).
//! Its text form in table documents is the bare integer; the dataset
//! manifest records creation times in the FITS form
//! `YYYY-MM-DDThh:mm:ss.sss`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ModelError, Result};

const NANOS_PER_SECOND: i64 = 1_000_000_000;
const NANOS_PER_DAY: i64 = 86_400 * NANOS_PER_SECOND;
/// MJD of the Unix epoch.
const UNIX_EPOCH_MJD: i64 = 40_587;
const UNIX_EPOCH_NANOS: i64 = UNIX_EPOCH_MJD * NANOS_PER_DAY;

const FITS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct ArrayTime(i64);

impl ArrayTime {
    pub const fn from_nanoseconds(nanoseconds: i64) -> Self {
        Self(nanoseconds)
    }

    pub const fn nanoseconds(&self) -> i64 {
        self.0
    }

    /// Modified Julian Date in days.
    pub fn mjd(&self) -> f64 {
        self.0 as f64 / NANOS_PER_DAY as f64
    }

    pub fn from_datetime(datetime: NaiveDateTime) -> Result<Self> {
        datetime
            .and_utc()
            .timestamp_nanos_opt()
            .and_then(|ns| ns.checked_add(UNIX_EPOCH_NANOS))
            .map(Self)
            .ok_or_else(|| ModelError::InvalidTime(datetime.to_string()))
    }

    pub fn to_datetime(&self) -> Option<NaiveDateTime> {
        let since_unix = self.0.checked_sub(UNIX_EPOCH_NANOS)?;
        let seconds = since_unix.div_euclid(NANOS_PER_SECOND);
        let nanos = u32::try_from(since_unix.rem_euclid(NANOS_PER_SECOND)).ok()?;
        DateTime::from_timestamp(seconds, nanos).map(|dt| dt.naive_utc())
    }

    pub fn now() -> Self {
        Self::from_datetime(Utc::now().naive_utc()).unwrap_or_default()
    }

    /// Millisecond-precision FITS text, e.g. `2024-03-01T12:00:00.000`.
    pub fn to_fits(&self) -> String {
        match self.to_datetime() {
            Some(dt) => dt.format(FITS_FORMAT).to_string(),
            None => self.0.to_string(),
        }
    }

    pub fn from_fits(text: &str) -> Result<Self> {
        let text = text.trim();
        let datetime = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
            .map_err(|_| ModelError::InvalidTime(text.to_string()))?;
        Self::from_datetime(datetime)
    }
}

impl fmt::Display for ArrayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ArrayTime {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| ModelError::InvalidTime(s.to_string()))
    }
}

/// A duration in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Interval(i64);

impl Interval {
    pub const fn from_nanoseconds(nanoseconds: i64) -> Self {
        Self(nanoseconds)
    }

    pub const fn nanoseconds(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Interval {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| ModelError::InvalidTime(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_mjd_epoch_is_zero() {
        let t = ArrayTime::from_datetime(datetime(1858, 11, 17, 0, 0, 0)).unwrap();
        assert_eq!(t.nanoseconds(), 0);
    }

    #[test]
    fn test_unix_epoch_mjd() {
        let t = ArrayTime::from_datetime(datetime(1970, 1, 1, 0, 0, 0)).unwrap();
        assert_eq!(t.mjd(), 40_587.0);
    }

    #[test]
    fn test_fits_text() {
        let t = ArrayTime::from_datetime(datetime(2011, 6, 30, 23, 59, 58)).unwrap();
        assert_eq!(t.to_fits(), "2011-06-30T23:59:58.000");
        assert_eq!(ArrayTime::from_fits("2011-06-30T23:59:58.000").unwrap(), t);
        assert_eq!(ArrayTime::from_fits("2011-06-30T23:59:58").unwrap(), t);
        assert!(ArrayTime::from_fits("yesterday").is_err());
    }

    #[test]
    fn test_datetime_conversion_is_reversible() {
        let dt = datetime(2024, 2, 29, 6, 30, 0);
        let t = ArrayTime::from_datetime(dt).unwrap();
        assert_eq!(t.to_datetime(), Some(dt));
    }

    proptest::proptest! {
        #[test]
        fn prop_fits_text_keeps_milliseconds(millis in 0i64..9_000_000_000_000) {
            let t = ArrayTime::from_nanoseconds(millis * 1_000_000);
            proptest::prop_assert_eq!(ArrayTime::from_fits(&t.to_fits()).unwrap(), t);
        }
    }

    #[test]
    fn test_integer_text_form() {
        let t: ArrayTime = " 4835116800000000000 ".parse().unwrap();
        assert_eq!(t.to_string(), "4835116800000000000");
        assert!("12.5".parse::<ArrayTime>().is_err());
    }
}
