use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

pub const PROGRAM_NAME: &str = "vibfft-view";

/// Command line: a single log file.
#[derive(Debug, Parser)]
#[command(name = PROGRAM_NAME)]
struct Cli {
    /// Path to the vibration FFT data file (tab-separated format)
    #[arg(allow_hyphen_values = true)]
    input_file: PathBuf,
}

/// What the process should do.
#[derive(Debug, PartialEq, Eq)]
pub enum Invocation {
    /// Print usage and stop.
    Usage,
    /// Load and show this file.
    Open(PathBuf),
}

/// Interpret the raw arguments (program name first).
///
/// Help requests and every malformed invocation end up as [`Invocation::Usage`].
/// Any other single argument is a path, even one starting with `-`.
pub fn parse_args<I, T>(args: I) -> Invocation
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if let [_, flag] = args.as_slice() {
        if flag == "-h" || flag == "--help" {
            return Invocation::Usage;
        }
    }

    match Cli::try_parse_from(args) {
        Ok(cli) => Invocation::Open(cli.input_file),
        Err(e) => {
            log::debug!("Argument parsing: {}", e.kind());
            Invocation::Usage
        }
    }
}

pub fn usage() -> String {
    format!(
        "Usage: {PROGRAM_NAME} <input_file>\n  \
         <input_file>: Path to the vibration FFT data file (tab-separated format)\n\
         Example:\n  \
         {PROGRAM_NAME} vibFftAcf_z_flatTop.txt"
    )
}
