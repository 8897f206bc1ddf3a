//! Elapsed-time to billable count conversion.

use super::time::ClockTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Billable count in tenths, so 1.2 is stored as `12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Count(u32);

impl Count {
    pub fn from_tenths(tenths: u32) -> Self {
        Self(tenths)
    }

    pub fn tenths(self) -> u32 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 10 == 0 {
            write!(f, "{}", self.0 / 10)
        } else {
            write!(f, "{}.{}", self.0 / 10, self.0 % 10)
        }
    }
}

impl Serialize for Count {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % 10 == 0 {
            serializer.serialize_u32(self.0 / 10)
        } else {
            serializer.serialize_f64(self.as_f64())
        }
    }
}

impl<'de> Deserialize<'de> for Count {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        if !value.is_finite() || value < 0.0 {
            return Err(serde::de::Error::custom(format!("invalid count {}", value)));
        }
        Ok(Self((value * 10.0).round() as u32))
    }
}

/// Minutes from `start` to `end`, assuming `end` is on the next day when it
/// is earlier than `start`.
pub fn elapsed_minutes(start: ClockTime, end: ClockTime) -> u32 {
    let start_total = start.total_minutes();
    let mut end_total = end.total_minutes();
    if end_total < start_total {
        end_total += MINUTES_PER_DAY;
    }
    end_total - start_total
}

/// Maps elapsed minutes to a billable count.
///
/// Whole hours count 1 each. The leftover minutes add a fraction: inside the
/// first hour 1-10 minutes are free, 11-30 add 0.5 and 31+ add 1. From the
/// second hour on only 1-5 minutes are free and 6-10 add 0.2.
pub fn count_for(elapsed_minutes: u32) -> Count {
    let hours = elapsed_minutes / 60;
    let remainder = elapsed_minutes % 60;

    let extra_tenths = match (hours, remainder) {
        (_, 0) => 0,
        (0, 1..=10) => 0,
        (_, 1..=5) => 0,
        (_, 6..=10) => 2,
        (_, 11..=30) => 5,
        _ => 10,
    };

    Count(hours * 10 + extra_tenths)
}

pub fn format_elapsed(minutes: u32) -> String {
    format!("{}시간 {}분", minutes / 60, minutes % 60)
}
