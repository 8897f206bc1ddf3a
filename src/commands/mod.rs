pub mod config;
pub mod end;
pub mod history;
pub mod preview;
pub mod start;

use crate::app::{Action, AppState, Effect, reduce};
use crate::clipboard::{Clipboard, CopyMethod, Osc52Clipboard, SystemClipboard, copy_with_fallback};
use crate::config::{ClipboardConfig, Config};
use crate::platform::history_paths;
use crate::state::{HistoryStore, JsonFileStore};
use anyhow::{Context, Result};
use chrono::Local;

/// Application state loaded from disk plus the store it persists to.
pub struct Session {
    store: HistoryStore<JsonFileStore>,
    state: AppState,
}

impl Session {
    pub fn open(config: &Config) -> Result<Self> {
        let paths = history_paths(config.state.state_dir_override.as_deref())?;
        let store = HistoryStore::new(JsonFileStore::new(paths.lock, paths.data));

        let state = AppState::new(store.load_time_history()?, store.load_end_history()?)
            .with_default_period(config.defaults.period);

        Ok(Self { store, state })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Applies `action` and writes whatever history it changed.
    ///
    /// New records are pushed onto the history as stored right now, not the
    /// snapshot loaded by [`Session::open`], so another run that saved in the
    /// meantime keeps its entry.
    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        tracing::debug!(?action, "dispatch");
        let transition = reduce(&self.state, action, Local::now())?;
        self.state = transition.state;

        match transition.effect {
            Effect::None => {}
            Effect::PersistTimeHistory => {
                let record = self.state.result.clone().context("No start record to save")?;
                self.state.history = self.store.push_time_record(record)?;
            }
            Effect::PersistEndHistory => {
                let record = self.state.end_result.clone().context("No end record to save")?;
                self.state.end_history = self.store.push_end_record(record)?;
            }
            Effect::ClearTimeHistory => self.store.clear_time_history()?,
            Effect::ClearEndHistory => self.store.clear_end_history()?,
        }
        if transition.effect != Effect::None {
            tracing::info!(effect = ?transition.effect, "history updated");
        }

        Ok(())
    }

    pub fn dispatch_all(&mut self, actions: impl IntoIterator<Item = Action>) -> Result<()> {
        actions.into_iter().try_for_each(|action| self.dispatch(action))
    }
}

/// Copies `text` to the system clipboard, falling back to OSC 52 on stdout.
pub fn copy_to_clipboard(config: &ClipboardConfig, text: &str) -> Result<()> {
    let mut system = match SystemClipboard::new() {
        Ok(clipboard) => Some(clipboard),
        Err(e) => {
            tracing::warn!(error = %e, "system clipboard unavailable");
            None
        }
    };
    let primary = system.as_mut().map(|c| c as &mut dyn Clipboard);

    if !config.osc52_fallback {
        let Some(primary) = primary else {
            anyhow::bail!("System clipboard unavailable and clipboard.osc52_fallback is off");
        };
        primary.copy(text)?;
        println!("✓ 복사됨!");
        return Ok(());
    }

    let mut fallback = Osc52Clipboard::new(std::io::stdout());
    match copy_with_fallback(primary, &mut fallback, text)? {
        CopyMethod::System => println!("✓ 복사됨!"),
        CopyMethod::Fallback => println!("\n✓ 복사됨! (terminal clipboard)"),
    }
    Ok(())
}
