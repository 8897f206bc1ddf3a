use super::{Session, copy_to_clipboard};
use crate::OutputFormat;
use crate::app::Action;
use crate::calc::time::{Period, parse_shorthand};
use crate::config::Config;
use anyhow::{Context, Result};

/// Computes the start time and 반티/완티 minutes for a room and records it.
pub fn run(
    config: &Config,
    room: &str,
    time: &str,
    period: Option<Period>,
    copy: bool,
    format: OutputFormat,
) -> Result<()> {
    // The form filter would silently drop stray characters; reject them here.
    parse_shorthand(time)?;

    let mut session = Session::open(config)?;

    let mut actions = vec![Action::SetRoom(room.to_string())];
    if let Some(period) = period {
        actions.push(Action::SetPeriod(period));
    }
    actions.push(Action::SetTimeInput(time.to_string()));
    actions.push(Action::Calculate);
    session.dispatch_all(actions)?;

    let record = session
        .state()
        .result
        .as_ref()
        .context("Calculation produced no result")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(record)?),
        OutputFormat::Text => println!("{}", record.clipboard_text()),
    }

    if copy || config.clipboard.auto_copy {
        copy_to_clipboard(&config.clipboard, &record.clipboard_text())?;
    }

    Ok(())
}
