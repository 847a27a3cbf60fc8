//! winsay CLI
//!
//! Command-line interface for SAPI5 text-to-speech synthesis

use std::io;
use std::process;

use clap::Parser;
use log::debug;

use winsay::{backend, dispatch, Cli};

fn init_logging(debug_mode: bool) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(log::LevelFilter::Warn);
    // RUST_LOG overrides the default
    builder.parse_default_env();
    if debug_mode {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn run(cli: Cli) -> winsay::Result<()> {
    let options = cli.into_options(io::stdin().lock())?;
    debug!("options: {:?}", options);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    dispatch::run(&options, backend::default_backend, &mut out)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(e) = run(cli) {
        debug!("fatal: {:?}", e);
        eprintln!("ERROR: {}", e);
        process::exit(1);
    }
}
