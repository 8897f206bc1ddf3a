use super::{Session, copy_to_clipboard};
use crate::OutputFormat;
use crate::app::{Action, Tab};
use crate::calc::time::{Period, parse_shorthand};
use crate::config::Config;
use crate::error::CalcError;
use anyhow::{Context, Result};

pub struct EndArgs<'a> {
    pub start: Option<&'a str>,
    pub end: &'a str,
    pub start_period: Option<Period>,
    pub end_period: Option<Period>,
    /// 1-based position among the most recent start records
    pub from_history: Option<usize>,
    pub copy: bool,
    pub format: OutputFormat,
}

/// Computes elapsed time and billable count between two shorthand times.
pub fn run(config: &Config, args: EndArgs<'_>) -> Result<()> {
    let mut session = Session::open(config)?;
    let mut actions = vec![Action::SelectTab(Tab::End)];

    match (args.from_history, args.start) {
        (Some(n), _) => {
            let index = n.checked_sub(1).ok_or(CalcError::NoSuchEntry(n))?;
            actions.push(Action::LoadStartTime(index));
        }
        (None, Some(start)) => {
            parse_shorthand(start)?;
            actions.push(Action::SetStartInput(start.to_string()));
        }
        (None, None) => return Err(CalcError::MissingField("start time").into()),
    }
    if let Some(period) = args.start_period {
        actions.push(Action::SetStartPeriod(period));
    }

    parse_shorthand(args.end)?;
    actions.push(Action::SetEndInput(args.end.to_string()));
    if let Some(period) = args.end_period {
        actions.push(Action::SetEndPeriod(period));
    }
    actions.push(Action::CalculateDuration);

    session.dispatch_all(actions)?;

    let record = session
        .state()
        .end_result
        .as_ref()
        .context("Calculation produced no result")?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(record)?),
        OutputFormat::Text => println!("{}", record.clipboard_text()),
    }

    if args.copy || config.clipboard.auto_copy {
        copy_to_clipboard(&config.clipboard, &record.clipboard_text())?;
    }

    Ok(())
}
