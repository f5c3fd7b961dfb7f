//! Command-line configuration
//!
//! ```text
//! bytethon [--size N] [--batch] [--verbose]
//! ```
//!
//! The arena size is fixed for the whole run; there is no config file.

use crate::constants::{DEFAULT_ARENA_SIZE, MAX_ARENA_SIZE};
use log::LevelFilter;

/// Startup settings passed into the core
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub arena_size: usize,
    pub batch: bool,
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            arena_size: DEFAULT_ARENA_SIZE,
            batch: false,
            log_level: LevelFilter::Info,
        }
    }
}

/// What the command line asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Run(Config),
    Help,
}

/// Parse arguments, excluding the program name
pub fn parse_args<I, S>(args: I) -> Result<Invocation, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut config = Config::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_ref() {
            "-h" | "--help" => return Ok(Invocation::Help),
            "-b" | "--batch" => config.batch = true,
            "-v" | "--verbose" => config.log_level = LevelFilter::Debug,
            "-s" | "--size" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--size needs a value".to_string())?;
                config.arena_size = parse_arena_size(value.as_ref())?;
            }
            other => return Err(format!("Unknown argument '{}'", other)),
        }
    }

    Ok(Invocation::Run(config))
}

fn parse_arena_size(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(size) if (1..=MAX_ARENA_SIZE).contains(&size) => Ok(size),
        _ => Err(format!(
            "Invalid input: '{}'. Please enter a valid number between 1 and {}!",
            value, MAX_ARENA_SIZE
        )),
    }
}

pub fn usage(program_name: &str) -> String {
    format!(
        "Usage: {} [--size N] [--batch] [--verbose]\n\n\
         \x20 -s, --size N   arena size in bytes, 1 - {} (default {})\n\
         \x20 -b, --batch    read commands from stdin and print plain replies\n\
         \x20 -v, --verbose  log split, merge and shift steps\n\
         \x20 -h, --help     show this message",
        program_name, MAX_ARENA_SIZE, DEFAULT_ARENA_SIZE
    )
}
