//! Output format strings
//!
//! SAPI renders files through a `WAVEFORMATEX` header, so everything here
//! reduces to PCM: unsigned 8-bit or signed 16-bit samples, one or two
//! channels, at one of the rates in SAPI's `SPSTREAMFORMAT` table.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Result, WinsayError};

/// Container format of the output file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileFormat {
    #[default]
    Wave,
}

impl FileFormat {
    pub const ALL: [FileFormat; 1] = [FileFormat::Wave];

    /// Parse `WAVE`, `WAV` or `.wav` (case-insensitive)
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let name = trimmed.strip_prefix('.').unwrap_or(trimmed);
        if name.eq_ignore_ascii_case("wave") || name.eq_ignore_ascii_case("wav") {
            Ok(FileFormat::Wave)
        } else {
            Err(WinsayError::UnsupportedFileFormat(s.to_string()))
        }
    }

    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        FileFormat::parse(ext).ok()
    }

    pub fn name(&self) -> &'static str {
        match self {
            FileFormat::Wave => "WAVE",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Wave => "wav",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FileFormat::Wave => "Waveform audio (PCM)",
        }
    }
}

/// PCM sample encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    /// Unsigned 8-bit integer
    U8,
    /// Signed 16-bit little-endian integer
    I16,
}

impl SampleType {
    pub const ALL: [SampleType; 2] = [SampleType::U8, SampleType::I16];

    pub fn bits(&self) -> u16 {
        match self {
            SampleType::U8 => 8,
            SampleType::I16 => 16,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SampleType::U8 => "UI8",
            SampleType::I16 => "I16",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SampleType::U8 => "unsigned 8-bit integer PCM",
            SampleType::I16 => "signed 16-bit little-endian integer PCM",
        }
    }
}

/// Sampling rates SAPI can render to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleRate {
    Hz8000,
    Hz11025,
    Hz12000,
    Hz16000,
    Hz22050,
    Hz24000,
    Hz32000,
    Hz44100,
    Hz48000,
}

impl SampleRate {
    /// In `SPSTREAMFORMAT` order
    pub const ALL: [SampleRate; 9] = [
        SampleRate::Hz8000,
        SampleRate::Hz11025,
        SampleRate::Hz12000,
        SampleRate::Hz16000,
        SampleRate::Hz22050,
        SampleRate::Hz24000,
        SampleRate::Hz32000,
        SampleRate::Hz44100,
        SampleRate::Hz48000,
    ];

    pub fn hz(&self) -> u32 {
        match self {
            SampleRate::Hz8000 => 8000,
            SampleRate::Hz11025 => 11025,
            SampleRate::Hz12000 => 12000,
            SampleRate::Hz16000 => 16000,
            SampleRate::Hz22050 => 22050,
            SampleRate::Hz24000 => 24000,
            SampleRate::Hz32000 => 32000,
            SampleRate::Hz44100 => 44100,
            SampleRate::Hz48000 => 48000,
        }
    }

    pub fn from_hz(hz: u32) -> Result<Self> {
        SampleRate::ALL
            .into_iter()
            .find(|rate| rate.hz() == hz)
            .ok_or(WinsayError::UnsupportedBitRate(hz))
    }

    fn index(&self) -> i32 {
        SampleRate::ALL
            .iter()
            .position(|rate| rate == self)
            .unwrap_or_default() as i32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    Mono,
    Stereo,
}

impl Channels {
    pub const ALL: [Channels; 2] = [Channels::Mono, Channels::Stereo];

    pub fn count(&self) -> u16 {
        match self {
            Channels::Mono => 1,
            Channels::Stereo => 2,
        }
    }

    pub fn from_count(count: u8) -> Result<Self> {
        match count {
            1 => Ok(Channels::Mono),
            2 => Ok(Channels::Stereo),
            other => Err(WinsayError::UnsupportedChannels(other)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Channels::Mono => "mono",
            Channels::Stereo => "stereo",
        }
    }
}

/// A `--data-format` value: `[LE]{UI8|I16}[@rate]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataFormat {
    pub sample_type: SampleType,
    pub sample_rate: Option<SampleRate>,
}

impl DataFormat {
    pub fn parse(s: &str) -> Result<Self> {
        let unsupported = || WinsayError::UnsupportedDataFormat(s.to_string());

        let upper = s.trim().to_ascii_uppercase();
        let (kind, rate) = match upper.split_once('@') {
            Some((kind, rate)) => (kind, Some(rate)),
            None => (upper.as_str(), None),
        };

        // SAPI only writes little-endian PCM
        if kind.starts_with("BE") {
            return Err(unsupported());
        }
        let kind = kind.strip_prefix("LE").unwrap_or(kind);

        let sample_type = match kind {
            "UI8" => SampleType::U8,
            "I16" => SampleType::I16,
            _ => return Err(unsupported()),
        };

        let sample_rate = match rate {
            Some(rate) => {
                let hz = rate.trim().parse::<u32>().map_err(|_| unsupported())?;
                Some(SampleRate::from_hz(hz)?)
            }
            None => None,
        };

        Ok(DataFormat {
            sample_type,
            sample_rate,
        })
    }
}

impl FromStr for DataFormat {
    type Err = WinsayError;

    fn from_str(s: &str) -> Result<Self> {
        DataFormat::parse(s)
    }
}

/// The PCM layout of a rendered file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub sample_type: SampleType,
    pub channels: Channels,
    pub sample_rate: SampleRate,
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self {
            sample_type: SampleType::I16,
            channels: Channels::Mono,
            sample_rate: SampleRate::Hz22050,
        }
    }
}

impl AudioFormat {
    /// Combine the format options; a rate inside `--data-format` wins over `--bit-rate`
    pub fn resolve(
        data_format: Option<&DataFormat>,
        bit_rate: Option<SampleRate>,
        channels: Option<Channels>,
    ) -> Self {
        let defaults = AudioFormat::default();
        AudioFormat {
            sample_type: data_format
                .map(|fmt| fmt.sample_type)
                .unwrap_or(defaults.sample_type),
            channels: channels.unwrap_or(defaults.channels),
            sample_rate: data_format
                .and_then(|fmt| fmt.sample_rate)
                .or(bit_rate)
                .unwrap_or(defaults.sample_rate),
        }
    }

    /// Value of the matching `SPSTREAMFORMAT` enumerator (`SPSF_8kHz8BitMono` is 4)
    pub fn sapi_stream_format(&self) -> i32 {
        let wide = if self.sample_type == SampleType::I16 { 2 } else { 0 };
        let stereo = if self.channels == Channels::Stereo { 1 } else { 0 };
        4 + 4 * self.sample_rate.index() + wide + stereo
    }

    pub fn block_align(&self) -> u16 {
        self.channels.count() * self.sample_type.bits() / 8
    }

    pub fn avg_bytes_per_sec(&self) -> u32 {
        self.sample_rate.hz() * u32::from(self.block_align())
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{} {}",
            self.sample_type.name(),
            self.sample_rate.hz(),
            self.channels.name()
        )
    }
}
