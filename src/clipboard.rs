//! Clipboard access with a terminal fallback.
//!
//! The system clipboard is not always reachable (headless sessions, SSH).
//! When it fails, [`copy_with_fallback`] hands the text to a second
//! [`Clipboard`], normally [`Osc52Clipboard`], which asks the terminal
//! emulator to do the copy.

use crate::error::ClipboardError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::io::Write;

pub trait Clipboard {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError>;
}

pub struct SystemClipboard {
    manager: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, ClipboardError> {
        let manager =
            arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        Ok(Self { manager })
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.manager
            .set_text(text.to_string())
            .map_err(|e| ClipboardError::Write(e.to_string()))
    }
}

/// Writes an OSC 52 "set clipboard" sequence to `out`.
pub struct Osc52Clipboard<W: Write> {
    out: W,
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Clipboard for Osc52Clipboard<W> {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        let encoded = STANDARD.encode(text.as_bytes());
        write!(self.out, "\x1b]52;c;{}\x07", encoded)?;
        self.out.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMethod {
    System,
    Fallback,
}

/// Copies with `primary` if there is one, otherwise or on failure with
/// `fallback`.
pub fn copy_with_fallback(
    primary: Option<&mut dyn Clipboard>,
    fallback: &mut dyn Clipboard,
    text: &str,
) -> Result<CopyMethod, ClipboardError> {
    if let Some(primary) = primary {
        match primary.copy(text) {
            Ok(()) => return Ok(CopyMethod::System),
            Err(e) => tracing::warn!(error = %e, "system clipboard failed, using fallback"),
        }
    }

    fallback.copy(text)?;
    Ok(CopyMethod::Fallback)
}
