//! winsay: Windows says things.
//!
//! A `say`-style command-line front end for the Microsoft Speech API.
//! The crate parses the command line into [`Options`], then [`dispatch::run`]
//! either prints a listing (voices, file formats, data formats, bit rates,
//! channels) or hands a [`backend::SpeakRequest`] to the speech backend.
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use winsay::{backend, dispatch, Cli};
//!
//! let options = Cli::parse().into_options(std::io::stdin().lock())?;
//! dispatch::run(&options, backend::default_backend, &mut std::io::stdout())?;
//! ```

pub mod backend;
pub mod dispatch;
mod error;
pub mod format;
pub mod options;
pub mod sapi5;
pub mod voice;

pub use error::{Result, WinsayError};
pub use options::{Cli, Mode, Options};
