use super::{Session, copy_to_clipboard};
use crate::OutputFormat;
use crate::app::{Action, LOADABLE_START_TIMES};
use crate::config::Config;
use crate::error::CalcError;
use crate::records::format_timestamp;
use anyhow::{Context, Result};
use clap::ValueEnum;
use std::io::{self, Write};

#[derive(Clone, Copy, ValueEnum, Debug, PartialEq, Eq)]
pub enum HistoryKind {
    /// Start-time records (반티/완티)
    Start,
    /// Elapsed-time records (개)
    End,
}

pub fn list(config: &Config, kind: HistoryKind, format: OutputFormat) -> Result<()> {
    let session = Session::open(config)?;
    let state = session.state();

    if let OutputFormat::Json = format {
        let json = match kind {
            HistoryKind::Start => serde_json::to_string_pretty(&state.history)?,
            HistoryKind::End => serde_json::to_string_pretty(&state.end_history)?,
        };
        println!("{}", json);
        return Ok(());
    }

    match kind {
        HistoryKind::Start if state.history.is_empty() => println!("No start records yet."),
        HistoryKind::Start => {
            println!("📜 최근 기록");
            for (i, item) in state.history.iter().enumerate() {
                let marker = if i < LOADABLE_START_TIMES { "*" } else { " " };
                println!(
                    "{:>2}{} {}  {}  ({})",
                    i + 1,
                    marker,
                    item.room_number,
                    item.summary(),
                    format_timestamp(&item.timestamp)
                );
            }
            println!("\n* usable with: sigan end --from-history <N> <END>");
        }
        HistoryKind::End if state.end_history.is_empty() => println!("No end records yet."),
        HistoryKind::End => {
            println!("📜 최근 기록");
            for (i, item) in state.end_history.iter().enumerate() {
                println!(
                    "{:>2}  {}  ({})",
                    i + 1,
                    item.summary(),
                    format_timestamp(&item.timestamp)
                );
            }
        }
    }

    Ok(())
}

/// Re-displays a stored record, optionally copying its text again.
pub fn show(config: &Config, kind: HistoryKind, n: usize, copy: bool) -> Result<()> {
    let index = n.checked_sub(1).ok_or(CalcError::NoSuchEntry(n))?;
    let mut session = Session::open(config)?;

    let text = match kind {
        HistoryKind::Start => {
            session.dispatch(Action::LoadFromHistory(index))?;
            session
                .state()
                .result
                .as_ref()
                .map(|r| r.clipboard_text())
        }
        HistoryKind::End => {
            session.dispatch(Action::LoadFromEndHistory(index))?;
            session
                .state()
                .end_result
                .as_ref()
                .map(|r| r.clipboard_text())
        }
    }
    .context("History entry produced no result")?;

    println!("{}", text);
    if copy {
        copy_to_clipboard(&config.clipboard, &text)?;
    }
    Ok(())
}

pub fn clear(config: &Config, kind: HistoryKind, yes: bool) -> Result<()> {
    if !yes && !confirm("모든 히스토리를 삭제하시겠습니까? [y/N] ")? {
        println!("Cancelled.");
        return Ok(());
    }

    let mut session = Session::open(config)?;
    match kind {
        HistoryKind::Start => session.dispatch(Action::ClearHistory)?,
        HistoryKind::End => session.dispatch(Action::ClearEndHistory)?,
    }
    println!("✓ History cleared.");
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
