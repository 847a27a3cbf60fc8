//! SAPI5 identifiers
//!
//! These values come from the Microsoft Speech SDK 5.1 headers (sapi.h, sapiddk.h)

#[cfg(windows)]
use windows::core::{w, GUID, PCWSTR};

// SPDFID_WaveFormatEx {C31ADBAE-527F-4ff5-A230-F62BB61FF70C}
#[cfg(windows)]
pub const SPDFID_WAVE_FORMAT_EX: GUID = GUID::from_u128(
    0xc31adbae_527f_4ff5_a230_f62bb61ff70c
);

// SPCAT_VOICES
#[cfg(windows)]
pub const SPCAT_VOICES: PCWSTR = w!("HKEY_LOCAL_MACHINE\\SOFTWARE\\Microsoft\\Speech\\Voices");

/// Name of the token sub-key holding voice attributes
#[cfg(windows)]
pub const ATTRIBUTES_KEY: PCWSTR = w!("Attributes");

/// WAVE_FORMAT_PCM from mmreg.h
pub const WAVE_FORMAT_PCM: u16 = 1;
