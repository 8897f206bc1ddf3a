//! Application state and the reducer that drives it.
//!
//! Every user interaction is an [`Action`]. [`reduce`] takes the current
//! state and an action and returns the next state together with the
//! persistence [`Effect`] the caller must carry out. Nothing here touches
//! storage or the clock; `now` is passed in.

use crate::calc::time::{self, Period, normalize, parse_shorthand};
use crate::error::CalcError;
use crate::records::{DurationRecord, TimeRecord};
use crate::state::History;
use chrono::{DateTime, Local};

/// How many stored start times the duration form offers to load.
pub const LOADABLE_START_TIMES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Start,
    End,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StartForm {
    pub room: String,
    pub time_input: String,
    pub period: Period,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EndForm {
    pub start_input: String,
    pub start_period: Period,
    pub end_input: String,
    pub end_period: Period,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub tab: Tab,
    pub start_form: StartForm,
    pub end_form: EndForm,
    pub result: Option<TimeRecord>,
    pub end_result: Option<DurationRecord>,
    pub history: History<TimeRecord>,
    pub end_history: History<DurationRecord>,
}

impl AppState {
    pub fn new(history: History<TimeRecord>, end_history: History<DurationRecord>) -> Self {
        Self {
            history,
            end_history,
            ..Self::default()
        }
    }

    /// Every period selector starts on `period`.
    pub fn with_default_period(mut self, period: Period) -> Self {
        self.start_form.period = period;
        self.end_form.start_period = period;
        self.end_form.end_period = period;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectTab(Tab),
    SetRoom(String),
    SetTimeInput(String),
    SetPeriod(Period),
    Calculate,
    Reset,
    LoadFromHistory(usize),
    ClearHistory,
    SetStartInput(String),
    SetStartPeriod(Period),
    SetEndInput(String),
    SetEndPeriod(Period),
    CalculateDuration,
    ResetDuration,
    /// Loads one of the [`LOADABLE_START_TIMES`] most recent start times
    /// into the duration form.
    LoadStartTime(usize),
    LoadFromEndHistory(usize),
    ClearEndHistory,
}

/// Storage work the caller owes after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    PersistTimeHistory,
    PersistEndHistory,
    ClearTimeHistory,
    ClearEndHistory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: AppState,
    pub effect: Effect,
}

impl Transition {
    fn quiet(state: AppState) -> Self {
        Self {
            state,
            effect: Effect::None,
        }
    }
}

fn digits_only(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn read_time(input: &str, period: Period) -> Result<time::ClockTime, CalcError> {
    normalize(parse_shorthand(input)?, period)
}

pub fn reduce(
    state: &AppState,
    action: Action,
    now: DateTime<Local>,
) -> Result<Transition, CalcError> {
    let mut next = state.clone();

    match action {
        Action::SelectTab(tab) => next.tab = tab,
        Action::SetRoom(room) => next.start_form.room = room,
        Action::SetTimeInput(input) => next.start_form.time_input = digits_only(&input),
        Action::SetPeriod(period) => next.start_form.period = period,
        Action::Calculate => {
            let form = &next.start_form;
            if form.room.trim().is_empty() {
                return Err(CalcError::MissingField("room"));
            }
            let start = read_time(&form.time_input, form.period)?;
            let record = TimeRecord::new(&form.room, start, now)?;

            next.history.push(record.clone());
            next.result = Some(record);
            return Ok(Transition {
                state: next,
                effect: Effect::PersistTimeHistory,
            });
        }
        Action::Reset => {
            next.start_form.room.clear();
            next.start_form.time_input.clear();
            next.result = None;
        }
        Action::LoadFromHistory(index) => {
            let item = next
                .history
                .get(index)
                .cloned()
                .ok_or(CalcError::NoSuchEntry(index + 1))?;
            next.start_form.room = item.room_number.clone();
            next.result = Some(item);
        }
        Action::ClearHistory => {
            next.history.clear();
            return Ok(Transition {
                state: next,
                effect: Effect::ClearTimeHistory,
            });
        }
        Action::SetStartInput(input) => next.end_form.start_input = digits_only(&input),
        Action::SetStartPeriod(period) => next.end_form.start_period = period,
        Action::SetEndInput(input) => next.end_form.end_input = digits_only(&input),
        Action::SetEndPeriod(period) => next.end_form.end_period = period,
        Action::CalculateDuration => {
            let form = &next.end_form;
            if form.start_input.trim().is_empty() {
                return Err(CalcError::MissingField("start time"));
            }
            if form.end_input.trim().is_empty() {
                return Err(CalcError::MissingField("end time"));
            }
            let start = read_time(&form.start_input, form.start_period)?;
            let end = read_time(&form.end_input, form.end_period)?;
            let record = DurationRecord::new(start, end, now);

            next.end_history.push(record.clone());
            next.end_result = Some(record);
            return Ok(Transition {
                state: next,
                effect: Effect::PersistEndHistory,
            });
        }
        Action::ResetDuration => {
            next.end_form.start_input.clear();
            next.end_form.end_input.clear();
            next.end_result = None;
        }
        Action::LoadStartTime(index) => {
            let item = next
                .history
                .recent(LOADABLE_START_TIMES)
                .get(index)
                .ok_or(CalcError::NoSuchEntry(index + 1))?;
            let (shorthand, period) = time::to_shorthand(item.start_time);
            next.end_form.start_input = shorthand.to_string();
            next.end_form.start_period = period;
        }
        Action::LoadFromEndHistory(index) => {
            let item = next
                .end_history
                .get(index)
                .cloned()
                .ok_or(CalcError::NoSuchEntry(index + 1))?;
            next.end_result = Some(item);
        }
        Action::ClearEndHistory => {
            next.end_history.clear();
            return Ok(Transition {
                state: next,
                effect: Effect::ClearEndHistory,
            });
        }
    }

    Ok(Transition::quiet(next))
}
