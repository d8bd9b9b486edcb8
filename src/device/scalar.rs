//! NX-OS scalar encodings: durations and timestamps arrive as custom
//! text formats rather than plain numbers.

use anyhow::{bail, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// A device-reported duration.
///
/// Parsed from either the ISO-8601-style form ("P1DT2H3M4S", "PT0S")
/// or the clock form ("01:02:03"). Stored with sub-second precision;
/// metrics render it as truncated whole seconds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NxDuration(Duration);

impl NxDuration {
    pub fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }

    pub fn as_secs(&self) -> u64 {
        self.0.as_secs()
    }
}

const DURATION_UNITS: [(char, u64); 4] = [('D', 86_400), ('H', 3_600), ('M', 60), ('S', 1)];

impl FromStr for NxDuration {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let first = match s.chars().next() {
            Some(c) => c,
            None => bail!("empty duration"),
        };
        if first == 'P' {
            let mut total = 0u64;
            let mut val = 0u64;
            let mut unit = 0usize;
            for c in s[1..].chars() {
                match c {
                    '0'..='9' => val = val * 10 + (c as u64 - '0' as u64),
                    'T' => {
                        if val > 0 {
                            bail!("malformed duration: {}", s);
                        }
                    }
                    _ => {
                        while unit < DURATION_UNITS.len() && DURATION_UNITS[unit].0 != c {
                            unit += 1;
                        }
                        if unit == DURATION_UNITS.len() {
                            bail!("unknown duration unit {:?} in {}", c, s);
                        }
                        total += val * DURATION_UNITS[unit].1;
                        val = 0;
                        unit += 1;
                    }
                }
            }
            return Ok(Self(Duration::from_secs(total)));
        }
        if first.is_ascii_digit() {
            // hh:mm:ss clock form
            let parts: Vec<&str> = s.split(':').collect();
            if parts.len() != 3 || parts.iter().any(|p| p.len() != 2) {
                bail!("duration must be in the form hh:mm:ss, found {}", s);
            }
            let mut secs = 0u64;
            for p in parts {
                secs = secs * 60 + p.parse::<u64>()?;
            }
            return Ok(Self(Duration::from_secs(secs)));
        }
        bail!("duration must start with 'P' or a digit, found {}", s)
    }
}

impl<'de> Deserialize<'de> for NxDuration {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let s = String::deserialize(de)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A device-reported wall-clock timestamp, stored as Unix seconds.
///
/// The device emits one of three textual forms depending on the age
/// of the entry: "Mon Jan  2 15:04:05 2006", "01/02/2006 15:04:05" or
/// "01/02/2006". Zero means "no timestamp".
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NxTimeStamp(i64);

impl NxTimeStamp {
    pub fn unix_secs(&self) -> i64 {
        self.0
    }
}

impl FromStr for NxTimeStamp {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        // Day-of-month may be space padded; collapse runs of spaces.
        let text = s.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.is_empty() {
            return Ok(Self(0));
        }
        let parsed = NaiveDateTime::parse_from_str(&text, "%a %b %e %H:%M:%S %Y")
            .or_else(|_| NaiveDateTime::parse_from_str(&text, "%m/%d/%Y %H:%M:%S"))
            .or_else(|_| {
                NaiveDate::parse_from_str(&text, "%m/%d/%Y")
                    .map(|d| d.and_hms_opt(0, 0, 0).unwrap())
            });
        match parsed {
            Ok(dt) => Ok(Self(dt.and_utc().timestamp())),
            Err(_) => bail!("unrecognized timestamp: {}", s),
        }
    }
}

impl fmt::Display for NxTimeStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return Ok(());
        }
        match chrono::DateTime::from_timestamp(self.0, 0) {
            Some(dt) => write!(f, "{}", dt.format("%m/%d/%Y %H:%M:%S")),
            None => Ok(()),
        }
    }
}

impl<'de> Deserialize<'de> for NxTimeStamp {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let s = String::deserialize(de)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_style_durations() {
        let d: NxDuration = "P1DT2H3M4S".parse().unwrap();
        assert_eq!(d.as_secs(), 86_400 + 2 * 3_600 + 3 * 60 + 4);
        let d: NxDuration = "PT0S".parse().unwrap();
        assert_eq!(d.as_secs(), 0);
        let d: NxDuration = "P2D".parse().unwrap();
        assert_eq!(d.as_secs(), 172_800);
        let d: NxDuration = "PT5M".parse().unwrap();
        assert_eq!(d.as_secs(), 300);
    }

    #[test]
    fn clock_style_durations() {
        let d: NxDuration = "01:02:03".parse().unwrap();
        assert_eq!(d.as_secs(), 3_723);
        let d: NxDuration = "00:00:09".parse().unwrap();
        assert_eq!(d.as_secs(), 9);
    }

    #[test]
    fn malformed_durations_rejected() {
        assert!("".parse::<NxDuration>().is_err());
        assert!("1:2:3".parse::<NxDuration>().is_err());
        assert!("P1X".parse::<NxDuration>().is_err());
        // units out of order
        assert!("PT1S2M".parse::<NxDuration>().is_err());
    }

    #[test]
    fn timestamp_formats() {
        let t: NxTimeStamp = "01/02/2006 15:04:05".parse().unwrap();
        assert_eq!(t.unix_secs(), 1_136_214_245);
        let t2: NxTimeStamp = "Mon Jan  2 15:04:05 2006".parse().unwrap();
        assert_eq!(t2, t);
        let t3: NxTimeStamp = "01/02/2006".parse().unwrap();
        assert_eq!(t3.unix_secs(), 1_136_160_000);
        let empty: NxTimeStamp = "".parse().unwrap();
        assert_eq!(empty.unix_secs(), 0);
        assert!("soon".parse::<NxTimeStamp>().is_err());
    }

    #[test]
    fn timestamp_display_round_trip() {
        let t: NxTimeStamp = "01/02/2006 15:04:05".parse().unwrap();
        assert_eq!(t.to_string(), "01/02/2006 15:04:05");
        assert_eq!(NxTimeStamp::default().to_string(), "");
    }
}
