//! Where the history store lives on disk.

use anyhow::{Context, Result, anyhow};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

const LOCK_FILE: &str = "history.lock";
const DATA_FILE: &str = "history.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryPaths {
    pub lock: PathBuf,
    pub data: PathBuf,
}

impl HistoryPaths {
    fn in_dir(dir: &Path) -> Self {
        Self {
            lock: dir.join(LOCK_FILE),
            data: dir.join(DATA_FILE),
        }
    }
}

/// `~/.sigan`, then the platform data dir. An override replaces both.
fn candidate_dirs(override_dir: Option<&Path>) -> Vec<PathBuf> {
    if let Some(dir) = override_dir {
        return vec![dir.to_path_buf()];
    }

    home::home_dir()
        .map(|home| home.join(".sigan"))
        .into_iter()
        .chain(dirs::data_local_dir().map(|data| data.join("sigan")))
        .collect()
}

/// Creates `dir` and its lock file. Succeeding here means the store can
/// take its lock later.
fn prepare(dir: &Path) -> Result<HistoryPaths> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let paths = HistoryPaths::in_dir(dir);
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&paths.lock)
        .with_context(|| format!("Directory {} is not writable", dir.display()))?;

    Ok(paths)
}

/// Picks the first usable history directory.
pub fn history_paths(override_dir: Option<&Path>) -> Result<HistoryPaths> {
    let mut last_error = None;

    for dir in candidate_dirs(override_dir) {
        match prepare(&dir) {
            Ok(paths) => return Ok(paths),
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "history directory unusable");
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        anyhow!("No home or data directory found; set state.state_dir_override in config")
    }))
}
