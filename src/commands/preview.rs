use crate::calc::time::{Period, preview};
use crate::config::Config;
use anyhow::Result;

/// Prints what a shorthand input will normalize to, e.g. `오후 + 1036 → 22:36`.
pub fn run(config: &Config, time: &str, period: Option<Period>) -> Result<()> {
    let period = period.unwrap_or(config.defaults.period);
    let shown = if time.is_empty() { "____" } else { time };
    println!("{} + {} → {}", period, shown, preview(time, period));
    Ok(())
}
