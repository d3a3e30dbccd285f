/// Error types for the fallible edges of the game: the INI config, the
/// high-score file and the audio device.  The simulation itself never fails.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config file {path}: {reason}")]
    Load { path: PathBuf, reason: String },
}

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("failed to read high score from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write high score to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("high score file {path} does not contain a number")]
    Parse { path: PathBuf },
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("sound output is not compiled in (build with --features audio)")]
    Disabled,
    #[error("no audio output device: {0}")]
    Device(String),
    #[error("audio thread exited before reporting readiness")]
    ThreadGone,
}
