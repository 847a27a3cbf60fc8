//! SAPI5 TTS Synthesizer
//!
//! High-level interface over `ISpVoice` and the voice token category

#![cfg(windows)]

use std::ffi::c_void;
use std::path::Path;

use log::{debug, warn};
use windows::core::{w, HSTRING, PCWSTR, PWSTR};
use windows::Win32::Foundation::BOOL;
use windows::Win32::Globalization::{LCIDToLocaleName, LOCALE_NAME_MAX_LENGTH};
use windows::Win32::Media::Audio::WAVEFORMATEX;
use windows::Win32::Media::Speech::{
    ISpDataKey, ISpObjectToken, ISpObjectTokenCategory, ISpStream, ISpVoice, SpObjectToken,
    SpObjectTokenCategory, SpStream, SpVoice, SPF_PURGEBEFORESPEAK, SPFM_CREATE_ALWAYS,
};
use windows::Win32::System::Com::{
    CoCreateInstance, CoInitializeEx, CoTaskMemFree, CoUninitialize, CLSCTX_ALL,
    COINIT_APARTMENTTHREADED,
};
use windows::Win32::System::Threading::INFINITE;

use super::close_after;
use super::guids::*;
use crate::backend::{SpeakRequest, SpeechBackend, SpeechOutput};
use crate::error::WinsayError;
use crate::format::{AudioFormat, FileFormat};
use crate::voice::VoiceToken;

/// Error types for SAPI5 operations
#[derive(Debug, thiserror::Error)]
pub enum Sapi5Error {
    #[error("COM initialization failed: {0}")]
    ComInit(String),
    #[error("Failed to open voice category: {0}")]
    CategoryOpen(String),
    #[error("Failed to enumerate voices: {0}")]
    EnumerateVoices(String),
    #[error("Failed to create voice: {0}")]
    VoiceCreate(String),
    #[error("Failed to select voice: {0}")]
    SelectVoice(String),
    #[error("Failed to get/set attributes: {0}")]
    Attributes(String),
    #[error("Failed to create output stream: {0}")]
    StreamCreate(String),
    #[error("Failed to set output file: {0}")]
    SetOutputFile(String),
    #[error("Failed to synthesize text: {0}")]
    Synthesize(String),
}

pub type Result<T> = std::result::Result<T, Sapi5Error>;

impl From<Sapi5Error> for WinsayError {
    fn from(err: Sapi5Error) -> Self {
        WinsayError::Backend(err.to_string())
    }
}

/// SAPI5 TTS Synthesizer
///
/// Owns the COM apartment of the calling thread. COM objects are created and
/// released inside each call, so none outlive it.
pub struct Synthesizer {
    _com_initialized: bool,
}

impl Synthesizer {
    /// Create a new synthesizer, initializing COM
    pub fn new() -> Result<Self> {
        unsafe {
            let hr = CoInitializeEx(None, COINIT_APARTMENTTHREADED);
            if hr.is_err() {
                return Err(Sapi5Error::ComInit(format!("HRESULT: {:?}", hr)));
            }
        }
        Ok(Self {
            _com_initialized: true,
        })
    }

    /// List all voices registered in the voice token category
    pub fn list_voices(&self) -> Result<Vec<VoiceToken>> {
        unsafe {
            let category: ISpObjectTokenCategory =
                CoCreateInstance(&SpObjectTokenCategory, None, CLSCTX_ALL)
                    .map_err(|e| Sapi5Error::CategoryOpen(format!("{:?}", e)))?;
            category
                .SetId(SPCAT_VOICES, BOOL::from(false))
                .map_err(|e| Sapi5Error::CategoryOpen(format!("{:?}", e)))?;

            let tokens = category
                .EnumTokens(PCWSTR::null(), PCWSTR::null())
                .map_err(|e| Sapi5Error::EnumerateVoices(format!("{:?}", e)))?;

            let mut count = 0u32;
            tokens
                .GetCount(&mut count)
                .map_err(|e| Sapi5Error::EnumerateVoices(format!("{:?}", e)))?;

            let mut voices = Vec::with_capacity(count as usize);
            for index in 0..count {
                let token = match tokens.Item(index) {
                    Ok(token) => token,
                    Err(e) => {
                        warn!("skipping voice token {}: {:?}", index, e);
                        continue;
                    }
                };
                if let Some(voice) = read_voice_token(&token) {
                    voices.push(voice);
                }
            }

            debug!("found {} voices", voices.len());
            Ok(voices)
        }
    }

    /// Speak a request synchronously
    pub fn speak_request(&self, request: &SpeakRequest) -> Result<()> {
        unsafe {
            let voice: ISpVoice = CoCreateInstance(&SpVoice, None, CLSCTX_ALL)
                .map_err(|e| Sapi5Error::VoiceCreate(format!("{:?}", e)))?;

            if let Some(selected) = &request.voice {
                let token: ISpObjectToken = CoCreateInstance(&SpObjectToken, None, CLSCTX_ALL)
                    .map_err(|e| Sapi5Error::SelectVoice(format!("{:?}", e)))?;
                token
                    .SetId(PCWSTR::null(), &HSTRING::from(selected.id.as_str()), BOOL::from(false))
                    .map_err(|e| Sapi5Error::SelectVoice(format!("{}: {:?}", selected.id, e)))?;
                voice
                    .SetVoice(&token)
                    .map_err(|e| Sapi5Error::SelectVoice(format!("{}: {:?}", selected.id, e)))?;
            }

            voice
                .SetVolume(request.volume)
                .map_err(|e| Sapi5Error::Attributes(format!("volume: {:?}", e)))?;
            if let Some(rate) = request.rate {
                voice
                    .SetRate(rate)
                    .map_err(|e| Sapi5Error::Attributes(format!("rate: {:?}", e)))?;
            }

            let stream = match &request.output {
                SpeechOutput::Default => None,
                SpeechOutput::File {
                    path,
                    file_format,
                    format,
                } => {
                    // SpStream only writes RIFF/WAVE containers
                    let stream = match file_format {
                        FileFormat::Wave => bind_to_file(path, format)?,
                    };
                    voice
                        .SetOutput(&stream, BOOL::from(true))
                        .map_err(|e| Sapi5Error::SetOutputFile(format!("{:?}", e)))?;
                    Some(stream)
                }
            };

            let spoken = speak_and_wait(&voice, &request.text);

            // Close flushes the RIFF header sizes, so it runs after a failed Speak too
            match stream {
                Some(stream) => close_after(spoken, || {
                    stream
                        .Close()
                        .map_err(|e| Sapi5Error::SetOutputFile(format!("{:?}", e)))
                }),
                None => spoken,
            }
        }
    }
}

impl SpeechBackend for Synthesizer {
    fn voices(&self) -> crate::Result<Vec<VoiceToken>> {
        Ok(self.list_voices()?)
    }

    fn locale_name(&self, lcid: u32) -> Option<String> {
        let mut buffer = [0u16; LOCALE_NAME_MAX_LENGTH as usize];
        let len = unsafe { LCIDToLocaleName(lcid, Some(&mut buffer), 0) };
        // len counts the terminating null
        if len <= 1 {
            return None;
        }
        Some(String::from_utf16_lossy(&buffer[..len as usize - 1]))
    }

    fn speak(&self, request: &SpeakRequest) -> crate::Result<()> {
        Ok(self.speak_request(request)?)
    }
}

impl Drop for Synthesizer {
    fn drop(&mut self) {
        unsafe {
            CoUninitialize();
        }
    }
}

/// Read the id and attributes of a voice token
///
/// Tokens without an `Attributes` key are skipped.
unsafe fn read_voice_token(token: &ISpObjectToken) -> Option<VoiceToken> {
    let id = match token.GetId() {
        Ok(id) => take_co_string(id),
        Err(e) => {
            warn!("voice token without id: {:?}", e);
            return None;
        }
    };

    let attributes = match token.OpenKey(ATTRIBUTES_KEY) {
        Ok(key) => key,
        Err(e) => {
            debug!("{} has no attributes: {:?}", id, e);
            return None;
        }
    };

    Some(VoiceToken::new(
        id,
        read_string_value(&attributes, w!("Name")),
        read_string_value(&attributes, w!("Age")),
        read_string_value(&attributes, w!("Gender")),
        read_string_value(&attributes, w!("Language")),
    ))
}

/// Missing values read as empty strings
unsafe fn read_string_value(key: &ISpDataKey, name: PCWSTR) -> String {
    key.GetStringValue(name)
        .map(|value| take_co_string(value))
        .unwrap_or_default()
}

/// Copy a `CoTaskMemAlloc`ed string and free it
unsafe fn take_co_string(value: PWSTR) -> String {
    if value.is_null() {
        return String::new();
    }
    let text = value.to_string().unwrap_or_default();
    CoTaskMemFree(Some(value.0 as *const c_void));
    text
}

unsafe fn speak_and_wait(voice: &ISpVoice, text: &str) -> Result<()> {
    let text = HSTRING::from(text);
    voice
        .Speak(&text, SPF_PURGEBEFORESPEAK.0 as u32, None)
        .map_err(|e| Sapi5Error::Synthesize(format!("Speak failed: {:?}", e)))?;
    voice
        .WaitUntilDone(INFINITE)
        .map_err(|e| Sapi5Error::Synthesize(format!("WaitUntilDone failed: {:?}", e)))
}

fn wave_format_ex(format: &AudioFormat) -> WAVEFORMATEX {
    WAVEFORMATEX {
        wFormatTag: WAVE_FORMAT_PCM,
        nChannels: format.channels.count(),
        nSamplesPerSec: format.sample_rate.hz(),
        nAvgBytesPerSec: format.avg_bytes_per_sec(),
        nBlockAlign: format.block_align(),
        wBitsPerSample: format.sample_type.bits(),
        cbSize: 0,
    }
}

/// Create a file-backed stream in the requested PCM format
unsafe fn bind_to_file(path: &Path, format: &AudioFormat) -> Result<ISpStream> {
    let stream: ISpStream = CoCreateInstance(&SpStream, None, CLSCTX_ALL)
        .map_err(|e| Sapi5Error::StreamCreate(format!("{:?}", e)))?;

    let wave_format = wave_format_ex(format);
    let file_name = HSTRING::from(path.as_os_str());
    stream
        .BindToFile(
            &file_name,
            SPFM_CREATE_ALWAYS,
            Some(&SPDFID_WAVE_FORMAT_EX as *const _),
            Some(&wave_format as *const _),
            0,
        )
        .map_err(|e| Sapi5Error::SetOutputFile(format!("{}: {:?}", path.display(), e)))?;

    Ok(stream)
}
