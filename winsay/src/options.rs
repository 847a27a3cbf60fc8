//! Command line and the resolved option record

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::{debug, warn};

use crate::error::{Result, WinsayError};
use crate::format::{AudioFormat, Channels, DataFormat, FileFormat, SampleRate};

/// Argument value that asks for a listing instead of a setting
const LIST: &str = "?";

#[derive(Parser, Debug)]
#[command(name = "winsay")]
#[command(about = "Windows says things: speak text using the Microsoft Speech API")]
#[command(version)]
pub struct Cli {
    /// The text to speak
    #[arg(value_name = "STRING")]
    pub text: Vec<String>,

    /// An input file to be spoken. If FILE is - or neither this option nor
    /// a message is given, read from standard input
    #[arg(short = 'f', long, value_name = "FILE")]
    pub input_file: Option<PathBuf>,

    /// Write the speech to this file instead of the audio device
    #[arg(short, long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// The voice to be used; ? lists installed voices
    #[arg(short, long, env = "WINSAY_VOICE")]
    pub voice: Option<String>,

    /// Speech rate in words per minute
    #[arg(short, long, env = "WINSAY_RATE", value_parser = clap::value_parser!(u32).range(1..))]
    pub rate: Option<u32>,

    /// Output volume (0-100)
    #[arg(long, env = "WINSAY_VOLUME", default_value_t = 100,
          value_parser = clap::value_parser!(u16).range(0..=100))]
    pub volume: u16,

    /// Output file format; ? lists formats
    #[arg(long, value_name = "FORMAT")]
    pub file_format: Option<String>,

    /// Audio data format, e.g. I16@22050; ? lists formats
    #[arg(long, value_name = "FORMAT")]
    pub data_format: Option<String>,

    /// Number of channels; ? lists counts
    #[arg(long)]
    pub channels: Option<String>,

    /// Sampling rate in Hz; ? lists supported rates
    #[arg(long)]
    pub bit_rate: Option<String>,

    /// The audio converter quality (ignored)
    #[arg(long)]
    pub quality: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

/// What a run does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Speak to the default audio device
    #[default]
    Say,
    /// Render speech to a file
    Output,
    ListVoices,
    ListFileFormats,
    ListDataFormats,
    ListBitRates,
    ListChannels,
}

impl Mode {
    /// Whether the run synthesizes speech (and so needs text)
    pub fn speaks(&self) -> bool {
        matches!(self, Mode::Say | Mode::Output)
    }
}

/// The resolved parameters of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub mode: Mode,
    pub input_file: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub voice: Option<String>,
    pub text: String,
    pub file_format: FileFormat,
    pub audio_format: AudioFormat,
    /// Words per minute
    pub rate: Option<u32>,
    pub volume: u16,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            mode: Mode::Say,
            input_file: None,
            output_file: None,
            voice: None,
            text: String::new(),
            file_format: FileFormat::Wave,
            audio_format: AudioFormat::default(),
            rate: None,
            volume: 100,
        }
    }
}

impl Cli {
    /// Resolve the mode, validate format options and, when speaking, gather the text
    pub fn into_options<R: Read>(self, stdin: R) -> Result<Options> {
        let mode = self.mode();

        if let Some(quality) = &self.quality {
            debug!("ignoring --quality={}", quality);
        }

        let mut options = Options {
            mode,
            input_file: self.input_file,
            output_file: self.output_file,
            voice: self.voice,
            rate: self.rate,
            volume: self.volume,
            ..Options::default()
        };

        if !mode.speaks() {
            return Ok(options);
        }

        options.file_format = match (&self.file_format, &options.output_file) {
            (Some(name), _) => FileFormat::parse(name)?,
            (None, Some(path)) => FileFormat::from_path(path).unwrap_or_else(|| {
                warn!(
                    "{}: unknown extension, writing {} data",
                    path.display(),
                    FileFormat::default().name()
                );
                FileFormat::default()
            }),
            (None, None) => FileFormat::default(),
        };

        let data_format = self.data_format.as_deref().map(DataFormat::parse).transpose()?;
        let bit_rate = self
            .bit_rate
            .as_deref()
            .map(|hz| parse_number::<u32>("bit rate", hz).and_then(SampleRate::from_hz))
            .transpose()?;
        let channels = self
            .channels
            .as_deref()
            .map(|count| parse_number::<u8>("channels", count).and_then(Channels::from_count))
            .transpose()?;

        if mode == Mode::Say && (data_format.is_some() || bit_rate.is_some() || channels.is_some())
        {
            warn!("audio format options only apply with --output-file; ignoring them");
        }
        options.audio_format = AudioFormat::resolve(data_format.as_ref(), bit_rate, channels);

        options.text = assemble_text(&self.text, options.input_file.as_deref(), stdin)?;
        Ok(options)
    }

    fn mode(&self) -> Mode {
        let asks = |value: &Option<String>| value.as_deref() == Some(LIST);

        if asks(&self.voice) {
            Mode::ListVoices
        } else if asks(&self.file_format) {
            Mode::ListFileFormats
        } else if asks(&self.data_format) {
            Mode::ListDataFormats
        } else if asks(&self.bit_rate) {
            Mode::ListBitRates
        } else if asks(&self.channels) {
            Mode::ListChannels
        } else if self.output_file.is_some() {
            Mode::Output
        } else {
            Mode::Say
        }
    }
}

fn parse_number<T: std::str::FromStr>(what: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| WinsayError::InvalidArgument(format!("{what}: '{value}' is not a number")))
}

/// Gather the text to speak
///
/// Words from the command line win. Without words, the input file is read,
/// or standard input when there is no file or the file is `-`. The result is
/// trimmed.
pub fn assemble_text<R: Read>(words: &[String], input_file: Option<&Path>, mut stdin: R) -> Result<String> {
    let text = if !words.is_empty() {
        words.join(" ")
    } else {
        let bytes = match input_file {
            Some(path) if path != Path::new("-") => {
                fs::read(path).map_err(|source| WinsayError::ReadInput {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            _ => {
                let mut bytes = Vec::new();
                stdin.read_to_end(&mut bytes)?;
                bytes
            }
        };
        String::from_utf8_lossy(&bytes).into_owned()
    };

    Ok(text.trim().to_string())
}
