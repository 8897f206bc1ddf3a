//! Calculation results kept in history and rendered for pasting into chat.

use crate::calc::duration::{Count, count_for, elapsed_minutes};
use crate::calc::time::{BANTI_OFFSET, ClockTime, Period, WANTI_OFFSET, offset};
use crate::error::CalcError;
use chrono::{DateTime, Local, Timelike};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRecord {
    pub room_number: String,
    pub start_time: ClockTime,
    pub banti_minute: String,
    pub wanti_minute: String,
    pub timestamp: DateTime<Local>,
}

impl TimeRecord {
    pub fn new(room: &str, start: ClockTime, now: DateTime<Local>) -> Result<Self, CalcError> {
        let room = room.trim();
        if room.is_empty() {
            return Err(CalcError::MissingField("room"));
        }

        Ok(Self {
            room_number: room.to_string(),
            start_time: start,
            banti_minute: offset(start, BANTI_OFFSET).minute_label(),
            wanti_minute: offset(start, WANTI_OFFSET).minute_label(),
            timestamp: now,
        })
    }

    /// Text for the chat message announcing the start.
    pub fn clipboard_text(&self) -> String {
        format!(
            "{}\n{} 스타트\n\n{}분 반티\n{}분 완티",
            self.room_number, self.start_time, self.banti_minute, self.wanti_minute
        )
    }

    pub fn summary(&self) -> String {
        format!(
            "{} 시작 · {}분 반티 · {}분 완티",
            self.start_time, self.banti_minute, self.wanti_minute
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationRecord {
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub diff_hours: u32,
    pub diff_minutes: u32,
    pub count: Count,
    pub count_text: String,
    pub timestamp: DateTime<Local>,
}

impl DurationRecord {
    pub fn new(start: ClockTime, end: ClockTime, now: DateTime<Local>) -> Self {
        let elapsed = elapsed_minutes(start, end);
        let count = count_for(elapsed);

        Self {
            start_time: start,
            end_time: end,
            diff_hours: elapsed / 60,
            diff_minutes: elapsed % 60,
            count,
            count_text: format!("{}개", count),
            timestamp: now,
        }
    }

    pub fn clipboard_text(&self) -> String {
        format!(
            "시작: {}\n끝: {}\n소요: {}시간 {}분\n결과: {} 끝",
            self.start_time, self.end_time, self.diff_hours, self.diff_minutes, self.count_text
        )
    }

    pub fn summary(&self) -> String {
        format!(
            "{} → {} · {}시간 {}분 · {} 끝",
            self.start_time, self.end_time, self.diff_hours, self.diff_minutes, self.count_text
        )
    }
}

/// Creation time in the Korean locale form, e.g. `2025. 3. 14. 오후 10:40:00`.
pub fn format_timestamp(ts: &DateTime<Local>) -> String {
    let (is_pm, hour) = ts.hour12();
    let period = if is_pm { Period::Pm } else { Period::Am };
    format!(
        "{} {} {}:{:02}:{:02}",
        ts.format("%Y. %-m. %-d."),
        period.label(),
        hour,
        ts.minute(),
        ts.second()
    )
}
