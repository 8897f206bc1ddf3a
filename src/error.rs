use thiserror::Error;

/// Recoverable input errors raised by the calculators and the form layer.
///
/// All of these are surfaced before any history mutation happens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalcError {
    #[error("Invalid time '{0}': expected a shorthand time between 0 and 2359 (e.g. 1036, 900)")]
    InvalidFormat(String),

    #[error("Invalid minute {0}: minutes must be between 00 and 59")]
    InvalidMinute(u32),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("No history entry #{0}")]
    NoSuchEntry(usize),
}

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("Clipboard write failed: {0}")]
    Write(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
