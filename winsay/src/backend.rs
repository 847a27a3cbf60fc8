//! Speech backend seam
//!
//! The dispatcher talks to the platform through [`SpeechBackend`]. On Windows
//! the implementation is [`crate::sapi5::Synthesizer`].

use std::path::PathBuf;

use crate::error::{Result, WinsayError};
use crate::format::{AudioFormat, FileFormat};
use crate::voice::VoiceToken;

/// Where synthesized audio goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechOutput {
    /// The default audio device
    Default,
    /// A file in `file_format`, holding PCM data laid out as `format`
    File {
        path: PathBuf,
        file_format: FileFormat,
        format: AudioFormat,
    },
}

/// Everything needed for one synthesis call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakRequest {
    pub text: String,
    /// `None` keeps the system default voice
    pub voice: Option<VoiceToken>,
    /// SAPI rate adjustment, -10..=10
    pub rate: Option<i32>,
    /// 0..=100
    pub volume: u16,
    pub output: SpeechOutput,
}

pub trait SpeechBackend {
    /// List installed voices
    fn voices(&self) -> Result<Vec<VoiceToken>>;

    /// Resolve an LCID to a locale tag such as `en-US`
    fn locale_name(&self, lcid: u32) -> Option<String>;

    /// Speak and block until the speech is finished
    fn speak(&self, request: &SpeakRequest) -> Result<()>;
}

/// Words per minute at SAPI rate 0
const BASE_WPM: f64 = 180.0;

/// Map words per minute onto SAPI's -10..=10 rate scale
///
/// Every 10 steps on the SAPI scale triple the speed.
pub fn rate_from_wpm(wpm: u32) -> Result<i32> {
    if wpm == 0 {
        return Err(WinsayError::InvalidArgument(
            "rate must be a positive number of words per minute".to_string(),
        ));
    }
    let steps = 10.0 * (f64::from(wpm) / BASE_WPM).ln() / 3f64.ln();
    Ok(steps.round().clamp(-10.0, 10.0) as i32)
}

/// Connect to the platform speech subsystem
#[cfg(windows)]
pub fn default_backend() -> Result<Box<dyn SpeechBackend>> {
    Ok(Box::new(crate::sapi5::Synthesizer::new()?))
}

#[cfg(not(windows))]
pub fn default_backend() -> Result<Box<dyn SpeechBackend>> {
    Err(WinsayError::Unsupported)
}
