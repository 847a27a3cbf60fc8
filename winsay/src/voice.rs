//! Voice metadata and selection
//!
//! SAPI stores each voice as an object token whose `Attributes` sub-key
//! carries `Name`, `Age`, `Gender` and `Language` values.

/// An installed voice, as read from its object token
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceToken {
    /// Token id (the registry path of the voice)
    pub id: String,
    /// Display name with vendor prefix and platform suffix removed
    pub name: String,
    /// The `Name` attribute as stored
    pub full_name: String,
    pub age: String,
    pub gender: String,
    /// Semicolon-separated hexadecimal LCIDs, e.g. `409;9`
    pub language: String,
}

impl VoiceToken {
    pub fn new(id: String, full_name: String, age: String, gender: String, language: String) -> Self {
        Self {
            id,
            name: clean_voice_name(&full_name),
            full_name,
            age,
            gender,
            language,
        }
    }
}

const VENDOR_PREFIX: &str = "Microsoft ";
const DESKTOP_SUFFIX: &str = " Desktop";

/// Shorten "Microsoft Zira Desktop" to "Zira"
///
/// Each affix is removed only when something is left after removing it.
pub fn clean_voice_name(full_name: &str) -> String {
    let mut name = full_name;
    if name.len() > VENDOR_PREFIX.len() {
        if let Some(rest) = name.strip_prefix(VENDOR_PREFIX) {
            name = rest;
        }
    }
    if name.len() > DESKTOP_SUFFIX.len() {
        if let Some(rest) = name.strip_suffix(DESKTOP_SUFFIX) {
            name = rest;
        }
    }
    name.to_string()
}

/// Find a voice by short or full name, ignoring case
///
/// When several voices match, the last one enumerated wins.
pub fn find_voice<'a>(voices: &'a [VoiceToken], requested: &str) -> Option<&'a VoiceToken> {
    let requested = requested.to_lowercase();
    voices.iter().rev().find(|voice| {
        voice.name.to_lowercase() == requested || voice.full_name.to_lowercase() == requested
    })
}

/// Parse the `Language` attribute into LCIDs
pub fn parse_lcids(language: &str) -> Vec<u32> {
    language
        .split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(|part| u32::from_str_radix(part, 16).ok())
        .collect()
}

/// One line of `-v ?` output: the name padded to 20 columns, then the locale
pub fn format_voice_line(voice: &VoiceToken, locale: Option<&str>) -> String {
    format!("{:<19} {}", voice.name, locale.unwrap_or(&voice.language))
}
