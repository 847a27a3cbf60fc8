//! Mode dispatch

use std::io::Write;

use log::{debug, info, warn};

use crate::backend::{rate_from_wpm, SpeakRequest, SpeechBackend, SpeechOutput};
use crate::error::{Result, WinsayError};
use crate::format::{Channels, FileFormat, SampleRate, SampleType};
use crate::options::{Mode, Options};
use crate::voice::{find_voice, format_voice_line, parse_lcids};

/// Run the selected mode, writing listings to `out`
///
/// `connect` is only called for modes that need the speech subsystem, so
/// format listings work without it.
pub fn run<W, F>(options: &Options, connect: F, out: &mut W) -> Result<()>
where
    W: Write,
    F: FnOnce() -> Result<Box<dyn SpeechBackend>>,
{
    match options.mode {
        Mode::ListFileFormats => {
            for format in FileFormat::ALL {
                writeln!(out, "{:<6}{:<6}{}", format.name(), format.extension(), format.description())?;
            }
        }
        Mode::ListDataFormats => {
            for sample_type in SampleType::ALL {
                writeln!(out, "{:<6}{}", sample_type.name(), sample_type.description())?;
            }
        }
        Mode::ListBitRates => {
            for rate in SampleRate::ALL {
                writeln!(out, "{}", rate.hz())?;
            }
        }
        Mode::ListChannels => {
            for channels in Channels::ALL {
                writeln!(out, "{:<3}{}", channels.count(), channels.name())?;
            }
        }
        Mode::ListVoices => {
            let backend = connect()?;
            list_voices(backend.as_ref(), out)?;
        }
        Mode::Say | Mode::Output => {
            let backend = connect()?;
            say(options, backend.as_ref())?;
        }
    }

    out.flush()?;
    Ok(())
}

fn list_voices<W: Write>(backend: &dyn SpeechBackend, out: &mut W) -> Result<()> {
    let voices = backend.voices()?;
    if voices.is_empty() {
        return Err(WinsayError::NoVoices);
    }

    for voice in &voices {
        let locale = parse_lcids(&voice.language)
            .first()
            .and_then(|&lcid| backend.locale_name(lcid));
        writeln!(out, "{}", format_voice_line(voice, locale.as_deref()))?;
    }
    Ok(())
}

fn say(options: &Options, backend: &dyn SpeechBackend) -> Result<()> {
    let voices = backend.voices()?;
    if voices.is_empty() {
        return Err(WinsayError::NoVoices);
    }

    let voice = match options.voice.as_deref() {
        Some(name) if !name.is_empty() => {
            let token = find_voice(&voices, name)
                .ok_or_else(|| WinsayError::VoiceNotFound(name.to_string()))?;
            debug!("selected voice {} ({})", token.full_name, token.id);
            Some(token.clone())
        }
        _ => None,
    };

    let output = match &options.output_file {
        Some(path) => {
            debug!(
                "rendering to {} as {} {} (SPSTREAMFORMAT {})",
                path.display(),
                options.file_format.name(),
                options.audio_format,
                options.audio_format.sapi_stream_format()
            );
            SpeechOutput::File {
                path: path.clone(),
                file_format: options.file_format,
                format: options.audio_format,
            }
        }
        None => SpeechOutput::Default,
    };

    if options.text.is_empty() {
        warn!("nothing to speak");
        if output == SpeechOutput::Default {
            return Ok(());
        }
    }

    let request = SpeakRequest {
        text: options.text.clone(),
        voice,
        rate: options.rate.map(rate_from_wpm).transpose()?,
        volume: options.volume,
        output,
    };

    info!("speaking {} characters", request.text.chars().count());
    backend.speak(&request)
}
