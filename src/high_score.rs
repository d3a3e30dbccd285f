/// High-score persistence: a single integer in a one-line text file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::ScoreError;

const SCORE_FILE_NAME: &str = ".fuel_rush_score";

/// Default location: `$HOME/.fuel_rush_score`, or the working directory
/// when `HOME` is unset.
pub fn default_score_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(SCORE_FILE_NAME)
}

#[derive(Clone, Debug)]
pub struct HighScoreStore {
    path: PathBuf,
    /// Last value read or written.
    best: u32,
}

impl HighScoreStore {
    /// Open the store at `path` and read the current best.  A missing file
    /// is a best of 0; an unreadable or garbled one is logged and treated
    /// the same way.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let best = match read_score(&path) {
            Ok(score) => score,
            Err(e) => {
                warn!("{e}; starting from 0");
                0
            }
        };
        HighScoreStore { path, best }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Persist `score` if it beats the stored best.  Returns whether it did.
    pub fn submit(&mut self, score: u32) -> Result<bool, ScoreError> {
        if score <= self.best {
            return Ok(false);
        }
        std::fs::write(&self.path, score.to_string()).map_err(|source| ScoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        self.best = score;
        info!("new high score {score} saved to {}", self.path.display());
        Ok(true)
    }
}

/// Read the stored best; `Ok(0)` when no file exists yet.
pub fn read_score(path: &Path) -> Result<u32, ScoreError> {
    match std::fs::read_to_string(path) {
        Ok(text) => text.trim().parse().map_err(|_| ScoreError::Parse {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
        Err(source) => Err(ScoreError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}
