use anyhow::Result;
use clap::{Parser, Subcommand};
use sigan::OutputFormat;
use sigan::calc::time::Period;
use sigan::commands;
use sigan::commands::end::EndArgs;
use sigan::commands::history::HistoryKind;
use sigan::config;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sigan")]
#[command(about = "반티/완티 start-time and 끝난 개수 calculator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute start time plus 반티 (+11) and 완티 (+31) minutes
    Start {
        #[arg(help = "Room label, e.g. 101티")]
        room: String,
        #[arg(help = "Shorthand time, e.g. 1036 for 10:36")]
        time: String,
        #[arg(long, help = "am/pm (오전/오후); defaults to config")]
        period: Option<Period>,
        #[arg(long, help = "Copy the result text to the clipboard")]
        copy: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Compute elapsed time and billable count (개)
    End {
        #[arg(
            help = "Shorthand start time (omit with --from-history)",
            required_unless_present = "from_history"
        )]
        start: Option<String>,
        #[arg(help = "Shorthand end time")]
        end: Option<String>,
        #[arg(long, help = "Period of the start time")]
        start_period: Option<Period>,
        #[arg(long, help = "Period of the end time")]
        end_period: Option<Period>,
        #[arg(long, value_name = "N", help = "Use start record N (1-5) from history")]
        from_history: Option<usize>,
        #[arg(long, help = "Copy the result text to the clipboard")]
        copy: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Show what a shorthand input normalizes to
    Preview {
        time: String,
        #[arg(long)]
        period: Option<Period>,
    },
    /// Recent records
    History(HistoryArgs),
    /// Configuration
    Config(ConfigArgs),
}

#[derive(Parser)]
#[command(args_conflicts_with_subcommands = true)]
struct HistoryArgs {
    #[command(subcommand)]
    action: Option<HistoryAction>,
    #[arg(value_enum, default_value_t = HistoryKind::Start)]
    kind: HistoryKind,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum HistoryAction {
    /// Show one stored record again
    Show {
        #[arg(value_enum)]
        kind: HistoryKind,
        #[arg(help = "Entry number as listed (1 = newest)")]
        n: usize,
        #[arg(long)]
        copy: bool,
    },
    /// Delete every record of one kind
    Clear {
        #[arg(value_enum)]
        kind: HistoryKind,
        #[arg(long, short = 'y', help = "Skip confirmation")]
        yes: bool,
    },
}

#[derive(Parser)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Subcommand)]
enum ConfigAction {
    List,
    Set { key: String, value: String },
    Get { key: String },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SIGAN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = config::load()?;

    match &cli.command {
        Commands::Start {
            room,
            time,
            period,
            copy,
            format,
        } => {
            commands::start::run(&config, room, time, *period, *copy, *format)?;
        }
        Commands::End {
            start,
            end,
            start_period,
            end_period,
            from_history,
            copy,
            format,
        } => {
            // With --from-history the single positional is the end time.
            let (start, end) = match (from_history, start, end) {
                (Some(_), Some(_), Some(_)) => {
                    anyhow::bail!("--from-history replaces the start time; pass only the end time")
                }
                (Some(_), Some(only), None) => (None, only.as_str()),
                (_, start, Some(end)) => (start.as_deref(), end.as_str()),
                (_, _, None) => anyhow::bail!("End time is required"),
            };
            commands::end::run(
                &config,
                EndArgs {
                    start,
                    end,
                    start_period: *start_period,
                    end_period: *end_period,
                    from_history: *from_history,
                    copy: *copy,
                    format: *format,
                },
            )?;
        }
        Commands::Preview { time, period } => {
            commands::preview::run(&config, time, *period)?;
        }
        Commands::History(args) => match &args.action {
            None => commands::history::list(&config, args.kind, args.format)?,
            Some(HistoryAction::Show { kind, n, copy }) => {
                commands::history::show(&config, *kind, *n, *copy)?
            }
            Some(HistoryAction::Clear { kind, yes }) => {
                commands::history::clear(&config, *kind, *yes)?
            }
        },
        Commands::Config(args) => match &args.action {
            ConfigAction::List => commands::config::list(&config)?,
            ConfigAction::Set { key, value } => commands::config::set(key, value)?,
            ConfigAction::Get { key } => commands::config::get(key, &config)?,
        },
    }

    Ok(())
}
