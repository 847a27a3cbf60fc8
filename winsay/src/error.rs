//! Error types for winsay

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while parsing options or dispatching a request
#[derive(Debug, Error)]
pub enum WinsayError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unsupported file format: {0}")]
    UnsupportedFileFormat(String),

    #[error("unsupported data format: {0}")]
    UnsupportedDataFormat(String),

    #[error("unsupported bit rate: {0} (use --bit-rate=? to list rates)")]
    UnsupportedBitRate(u32),

    #[error("unsupported channel count: {0} (use --channels=? to list counts)")]
    UnsupportedChannels(u8),

    #[error("failed to read {}: {source}", path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("unable to enumerate voices")]
    NoVoices,

    #[error("voice not found: {0} (use -v ? to list voices)")]
    VoiceNotFound(String),

    #[error("speech backend error: {0}")]
    Backend(String),

    #[error("this program requires Windows with SAPI 5 installed")]
    Unsupported,
}

pub type Result<T> = std::result::Result<T, WinsayError>;
