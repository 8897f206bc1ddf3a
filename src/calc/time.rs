//! Shorthand time normalization.
//!
//! A shorthand time is the number a user types for a wall-clock time in
//! 12-hour form (`1036` for 10:36), paired with a [`Period`]. Normalizing it
//! yields a 24-hour [`ClockTime`]; [`offset`] derives the 반티/완티 checkpoints.

use crate::error::CalcError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Largest accepted shorthand value (23:59).
pub const MAX_SHORTHAND: u32 = 2359;

/// 반티 checkpoint, minutes after the start time.
pub const BANTI_OFFSET: i32 = 11;

/// 완티 checkpoint, minutes after the start time.
pub const WANTI_OFFSET: i32 = 31;

const MINUTES_PER_DAY: i32 = 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Am,
    #[default]
    Pm,
}

impl Period {
    pub fn label(self) -> &'static str {
        match self {
            Period::Am => "오전",
            Period::Pm => "오후",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "오전" => Ok(Period::Am),
            "오후" => Ok(Period::Pm),
            other => match other.to_ascii_lowercase().as_str() {
                "am" => Ok(Period::Am),
                "pm" => Ok(Period::Pm),
                _ => Err(format!("Unknown period '{}', expected am, pm, 오전 or 오후", other)),
            },
        }
    }
}

/// Canonical 24-hour time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    /// Returns `None` unless `hour < 24` and `minute < 60`.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self {
                hour: hour as u8,
                minute: minute as u8,
            })
        } else {
            None
        }
    }

    pub fn hour(self) -> u32 {
        u32::from(self.hour)
    }

    pub fn minute(self) -> u32 {
        u32::from(self.minute)
    }

    /// Minutes since midnight.
    pub fn total_minutes(self) -> u32 {
        self.hour() * 60 + self.minute()
    }

    fn from_total_minutes(total: i32) -> Self {
        let wrapped = total.rem_euclid(MINUTES_PER_DAY);
        Self {
            hour: (wrapped / 60) as u8,
            minute: (wrapped % 60) as u8,
        }
    }

    /// Zero-padded minute component, as shown for the 반티/완티 markers.
    pub fn minute_label(self) -> String {
        format!("{:02}", self.minute)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CalcError::InvalidFormat(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        if h.is_empty() || m.len() != 2 {
            return Err(invalid());
        }
        let hour: u32 = h.parse().map_err(|_| invalid())?;
        let minute: u32 = m.parse().map_err(|_| invalid())?;
        if minute >= 60 {
            return Err(CalcError::InvalidMinute(minute));
        }
        ClockTime::new(hour, minute).ok_or_else(invalid)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Parses the digits a user typed into a shorthand value.
pub fn parse_shorthand(input: &str) -> Result<u32, CalcError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CalcError::MissingField("time"));
    }
    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CalcError::InvalidFormat(trimmed.to_string()));
    }
    match trimmed.parse::<u32>() {
        Ok(value) if value <= MAX_SHORTHAND => Ok(value),
        _ => Err(CalcError::InvalidFormat(trimmed.to_string())),
    }
}

/// Converts a shorthand time plus period into a 24-hour clock time.
///
/// The hour field is not checked against 1..=12; `0` with PM lands on noon,
/// the same as `1200` PM.
pub fn normalize(shorthand: u32, period: Period) -> Result<ClockTime, CalcError> {
    if shorthand > MAX_SHORTHAND {
        return Err(CalcError::InvalidFormat(shorthand.to_string()));
    }

    let mut hour = shorthand / 100;
    let minute = shorthand % 100;
    if minute > 59 {
        return Err(CalcError::InvalidMinute(minute));
    }

    match period {
        Period::Pm if hour != 12 => hour = hour % 12 + 12,
        Period::Am if hour == 12 => hour = 0,
        _ => {}
    }

    ClockTime::new(hour, minute).ok_or_else(|| CalcError::InvalidFormat(shorthand.to_string()))
}

/// Shifts a clock time by `delta_minutes`, wrapping around midnight.
pub fn offset(clock: ClockTime, delta_minutes: i32) -> ClockTime {
    ClockTime::from_total_minutes(clock.total_minutes() as i32 + delta_minutes)
}

/// Inverse of [`normalize`] for display: the shorthand and period a user
/// would type to get `clock` back.
pub fn to_shorthand(clock: ClockTime) -> (u32, Period) {
    let (display_hour, period) = match clock.hour() {
        0 => (12, Period::Am),
        h @ 1..=11 => (h, Period::Am),
        12 => (12, Period::Pm),
        h => (h - 12, Period::Pm),
    };
    (display_hour * 100 + clock.minute(), period)
}

/// Live preview of what an input will normalize to, `__:__` if it won't.
pub fn preview(input: &str, period: Period) -> String {
    parse_shorthand(input)
        .and_then(|s| normalize(s, period))
        .map(|c| c.to_string())
        .unwrap_or_else(|_| "__:__".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ct(h: u32, m: u32) -> ClockTime {
        ClockTime::new(h, m).unwrap()
    }

    #[test]
    fn test_noon_and_midnight() {
        assert_eq!(normalize(1200, Period::Am).unwrap(), ct(0, 0));
        assert_eq!(normalize(1200, Period::Pm).unwrap(), ct(12, 0));
        assert_eq!(normalize(100, Period::Am).unwrap(), ct(1, 0));
        assert_eq!(normalize(100, Period::Pm).unwrap(), ct(13, 0));
    }

    #[test]
    fn test_pm_hours_land_in_afternoon() {
        for s in 0..=1259 {
            if s % 100 >= 60 {
                continue;
            }
            let c = normalize(s, Period::Pm).unwrap();
            assert!((12..=23).contains(&c.hour()), "{} -> {}", s, c);
        }
    }

    #[test]
    fn test_zero_pm_collides_with_noon() {
        assert_eq!(normalize(0, Period::Pm).unwrap(), ct(12, 0));
        assert_eq!(normalize(36, Period::Pm).unwrap(), ct(12, 36));
        assert_eq!(normalize(36, Period::Am).unwrap(), ct(0, 36));
    }

    #[test]
    fn test_minute_boundary() {
        assert_eq!(normalize(1059, Period::Am).unwrap(), ct(10, 59));
        assert_eq!(normalize(1060, Period::Am), Err(CalcError::InvalidMinute(60)));
        assert_eq!(normalize(99, Period::Pm), Err(CalcError::InvalidMinute(99)));
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(matches!(
            normalize(2360, Period::Am),
            Err(CalcError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_shorthand("2400"),
            Err(CalcError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_shorthand() {
        assert_eq!(parse_shorthand(" 900 ").unwrap(), 900);
        assert_eq!(parse_shorthand("0036").unwrap(), 36);
        assert_eq!(parse_shorthand(""), Err(CalcError::MissingField("time")));
        assert!(matches!(parse_shorthand("10:36"), Err(CalcError::InvalidFormat(_))));
        assert!(matches!(parse_shorthand("-5"), Err(CalcError::InvalidFormat(_))));
    }

    #[test]
    fn test_offset_wraps() {
        assert_eq!(offset(ct(22, 36), BANTI_OFFSET), ct(22, 47));
        assert_eq!(offset(ct(23, 55), WANTI_OFFSET), ct(0, 26));
        assert_eq!(offset(ct(0, 5), -10), ct(23, 55));
    }

    #[test]
    fn test_clock_text_round_trip() {
        for h in 0..24 {
            for m in [0, 1, 9, 30, 59] {
                let c = ct(h, m);
                assert_eq!(c.to_string().parse::<ClockTime>().unwrap(), c);
            }
        }
        assert!("24:00".parse::<ClockTime>().is_err());
        assert_eq!("12:60".parse::<ClockTime>(), Err(CalcError::InvalidMinute(60)));
        assert!("1236".parse::<ClockTime>().is_err());
    }

    #[test]
    fn test_to_shorthand_inverts_normalize() {
        assert_eq!(to_shorthand(ct(0, 15)), (1215, Period::Am));
        assert_eq!(to_shorthand(ct(12, 0)), (1200, Period::Pm));
        assert_eq!(to_shorthand(ct(19, 36)), (736, Period::Pm));

        for period in [Period::Am, Period::Pm] {
            for hour in 1..=12 {
                let s = hour * 100 + 45;
                let (back, p) = to_shorthand(normalize(s, period).unwrap());
                assert_eq!((back, p), (s, period));
            }
        }
    }

    #[test]
    fn test_period_parsing() {
        assert_eq!("PM".parse::<Period>().unwrap(), Period::Pm);
        assert_eq!("오전".parse::<Period>().unwrap(), Period::Am);
        assert!("noon".parse::<Period>().is_err());
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("1036", Period::Pm), "22:36");
        assert_eq!(preview("1036", Period::Am), "10:36");
        assert_eq!(preview("1075", Period::Am), "__:__");
        assert_eq!(preview("", Period::Am), "__:__");
    }
}
