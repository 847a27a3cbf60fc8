use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;

use winsay::backend::{SpeakRequest, SpeechBackend, SpeechOutput};
use winsay::dispatch;
use winsay::format::{AudioFormat, Channels, FileFormat, SampleRate, SampleType};
use winsay::voice::VoiceToken;
use winsay::{Mode, Options, WinsayError};

/// Records speak requests instead of talking to SAPI
#[derive(Clone, Default)]
struct FakeBackend {
    voices: Vec<VoiceToken>,
    spoken: Rc<RefCell<Vec<SpeakRequest>>>,
}

impl FakeBackend {
    fn with_voices() -> Self {
        FakeBackend {
            voices: vec![
                voice("Microsoft David Desktop", "409"),
                voice("Microsoft Haruka Desktop", "411"),
                voice("Microsoft Hedda Desktop", "407;7"),
            ],
            ..Default::default()
        }
    }

    fn connect(&self) -> impl FnOnce() -> winsay::Result<Box<dyn SpeechBackend>> {
        let backend = self.clone();
        move || -> winsay::Result<Box<dyn SpeechBackend>> { Ok(Box::new(backend)) }
    }
}

impl SpeechBackend for FakeBackend {
    fn voices(&self) -> winsay::Result<Vec<VoiceToken>> {
        Ok(self.voices.clone())
    }

    fn locale_name(&self, lcid: u32) -> Option<String> {
        match lcid {
            0x409 => Some("en-US".to_string()),
            0x411 => Some("ja-JP".to_string()),
            _ => None,
        }
    }

    fn speak(&self, request: &SpeakRequest) -> winsay::Result<()> {
        self.spoken.borrow_mut().push(request.clone());
        Ok(())
    }
}

fn voice(full_name: &str, language: &str) -> VoiceToken {
    VoiceToken::new(
        format!("HKEY_LOCAL_MACHINE\\SOFTWARE\\Microsoft\\Speech\\Voices\\Tokens\\{full_name}"),
        full_name.to_string(),
        "Adult".to_string(),
        "Male".to_string(),
        language.to_string(),
    )
}

fn options(mode: Mode) -> Options {
    Options {
        mode,
        text: "Hello, world".to_string(),
        ..Options::default()
    }
}

fn run_to_string(options: &Options, backend: &FakeBackend) -> winsay::Result<String> {
    let mut out = Vec::new();
    dispatch::run(options, backend.connect(), &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

fn never_connect() -> winsay::Result<Box<dyn SpeechBackend>> {
    panic!("listing formats must not touch the speech subsystem");
}

#[test]
fn test_list_voices() {
    let output = run_to_string(&options(Mode::ListVoices), &FakeBackend::with_voices()).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], format!("{:<19} en-US", "David"));
    assert_eq!(lines[1], format!("{:<19} ja-JP", "Haruka"));
    // unknown LCID falls back to the raw attribute
    assert_eq!(lines[2], format!("{:<19} 407;7", "Hedda"));
}

#[test]
fn test_list_voices_without_voices() {
    let err = run_to_string(&options(Mode::ListVoices), &FakeBackend::default()).unwrap_err();
    assert!(matches!(err, WinsayError::NoVoices));
}

#[test]
fn test_format_listings() {
    let mut out = Vec::new();
    dispatch::run(&options(Mode::ListFileFormats), never_connect, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "WAVE  wav   Waveform audio (PCM)\n");

    let mut out = Vec::new();
    dispatch::run(&options(Mode::ListDataFormats), never_connect, &mut out).unwrap();
    let listing = String::from_utf8(out).unwrap();
    assert!(listing.starts_with("UI8   unsigned 8-bit"));
    assert!(listing.contains("\nI16   signed 16-bit"));

    let mut out = Vec::new();
    dispatch::run(&options(Mode::ListBitRates), never_connect, &mut out).unwrap();
    let rates: Vec<u32> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| line.parse().unwrap())
        .collect();
    assert_eq!(rates, vec![8000, 11025, 12000, 16000, 22050, 24000, 32000, 44100, 48000]);

    let mut out = Vec::new();
    dispatch::run(&options(Mode::ListChannels), never_connect, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "1  mono\n2  stereo\n");
}

#[test]
fn test_say_with_default_voice() {
    let backend = FakeBackend::with_voices();
    let output = run_to_string(&options(Mode::Say), &backend).unwrap();
    assert!(output.is_empty());

    let spoken = backend.spoken.borrow();
    assert_eq!(spoken.len(), 1);
    assert_eq!(spoken[0].text, "Hello, world");
    assert_eq!(spoken[0].voice, None);
    assert_eq!(spoken[0].rate, None);
    assert_eq!(spoken[0].volume, 100);
    assert_eq!(spoken[0].output, SpeechOutput::Default);
}

#[test]
fn test_say_with_named_voice_and_rate() {
    let backend = FakeBackend::with_voices();
    let mut opts = options(Mode::Say);
    opts.voice = Some("haruka".to_string());
    opts.rate = Some(540);
    opts.volume = 30;
    run_to_string(&opts, &backend).unwrap();

    let spoken = backend.spoken.borrow();
    let request = &spoken[0];
    assert_eq!(request.voice.as_ref().unwrap().full_name, "Microsoft Haruka Desktop");
    assert_eq!(request.rate, Some(10));
    assert_eq!(request.volume, 30);
}

#[test]
fn test_unknown_voice_is_an_error() {
    let backend = FakeBackend::with_voices();
    let mut opts = options(Mode::Say);
    opts.voice = Some("Zira".to_string());
    let err = run_to_string(&opts, &backend).unwrap_err();
    assert!(matches!(err, WinsayError::VoiceNotFound(ref name) if name == "Zira"));
    assert!(backend.spoken.borrow().is_empty());
}

#[test]
fn test_say_without_voices_is_an_error() {
    let backend = FakeBackend::default();
    let err = run_to_string(&options(Mode::Say), &backend).unwrap_err();
    assert!(matches!(err, WinsayError::NoVoices));
}

#[test]
fn test_output_renders_to_file() {
    let backend = FakeBackend::with_voices();
    let format = AudioFormat {
        sample_type: SampleType::U8,
        channels: Channels::Stereo,
        sample_rate: SampleRate::Hz11025,
    };
    let mut opts = options(Mode::Output);
    opts.output_file = Some(PathBuf::from("hello.wav"));
    opts.audio_format = format;
    run_to_string(&opts, &backend).unwrap();

    let spoken = backend.spoken.borrow();
    assert_eq!(
        spoken[0].output,
        SpeechOutput::File {
            path: PathBuf::from("hello.wav"),
            file_format: FileFormat::Wave,
            format,
        }
    );
}

#[test]
fn test_empty_text_is_not_spoken_aloud() {
    let backend = FakeBackend::with_voices();
    let mut opts = options(Mode::Say);
    opts.text.clear();
    run_to_string(&opts, &backend).unwrap();
    assert!(backend.spoken.borrow().is_empty());
}

#[test]
fn test_empty_text_still_writes_file() {
    let backend = FakeBackend::with_voices();
    let mut opts = options(Mode::Output);
    opts.text.clear();
    opts.output_file = Some(PathBuf::from("silence.wav"));
    run_to_string(&opts, &backend).unwrap();
    assert_eq!(backend.spoken.borrow().len(), 1);
}

#[test]
fn test_connect_errors_propagate() {
    let connected = Cell::new(false);
    let mut out = Vec::new();
    let err = dispatch::run(
        &options(Mode::Say),
        || {
            connected.set(true);
            Err(WinsayError::Unsupported)
        },
        &mut out,
    )
    .unwrap_err();
    assert!(connected.get());
    assert!(matches!(err, WinsayError::Unsupported));
}

#[test]
fn test_say_ignores_audio_format() {
    let backend = FakeBackend::with_voices();
    let mut opts = options(Mode::Say);
    opts.audio_format = AudioFormat {
        sample_type: SampleType::U8,
        channels: Channels::Stereo,
        sample_rate: SampleRate::Hz8000,
    };
    run_to_string(&opts, &backend).unwrap();

    let spoken = backend.spoken.borrow();
    assert_eq!(spoken.len(), 1);
    assert_eq!(spoken[0].output, SpeechOutput::Default);
}
