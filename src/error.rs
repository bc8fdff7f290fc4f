use std::process::ExitStatus;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PrepError>;

#[derive(Debug, Error)]
pub enum PrepError {
    /// A caller-supplied value violates a precondition.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("audio decode error: {0}")]
    Decode(#[from] symphonia::core::errors::Error),

    #[error("resampling failed: {0}")]
    Resample(String),

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("feature file error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to spawn `{program}`. Is it installed?")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with {status}:\n{stderr}")]
    ExternalProcess {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
}

impl PrepError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        PrepError::InvalidArgument(msg.into())
    }
}
