#![forbid(unsafe_code)]

//! Command-line argument parsing for the `sortviz` binary.
//!
//! Args are parsed by hand using `--flag=value` syntax. Environment
//! variables with the `SORTVIZ_` prefix are applied first; explicit flags
//! override them.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::process;

use sortviz_core::{Algorithm, Config, ConfigError, DEFAULT_DELAY_MS, DEFAULT_SIZE};

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub(crate) const HELP_TEXT: &str = "\
sortviz - step-by-step sorting visualizer for the terminal

USAGE:
    sortviz [OPTIONS]

OPTIONS:
    --algorithm=NAME     Algorithm to animate (default: bubble)
    --size=N             Number of bars, 10..=100 (default: 20)
    --delay-ms=N         Delay between steps, 10..=1000 ms (default: 300)
    --seed=N             Seed the array generator for reproducible arrays
    --record=PATH        Record every snapshot to PATH as NDJSON
    --log-file=PATH      Write logs to PATH (logging is off without it)
    --log-json           Write logs as JSON lines
    --exit-after-ms=N    Quit automatically after N milliseconds
    --help, -h           Show this help message
    --version, -V        Show version

ALGORITHMS:
    1  bubble
    2  selection
    3  insertion
    4  merge
    5  quick
    6  heap

KEYBINDINGS:
    Space           Start / stop sorting
    r               Generate a new array
    1-6             Select algorithm
    [ / ]           Shrink / grow the array by 5
    - / +           Slower / faster
    ?               Toggle help overlay
    q / Ctrl+C      Quit

ENVIRONMENT VARIABLES:
    SORTVIZ_ALGORITHM       Override --algorithm
    SORTVIZ_SIZE            Override --size
    SORTVIZ_DELAY_MS        Override --delay-ms
    SORTVIZ_SEED            Override --seed
    SORTVIZ_RECORD          Override --record
    SORTVIZ_LOG_FILE        Override --log-file
    SORTVIZ_EXIT_AFTER_MS   Override --exit-after-ms
    SORTVIZ_LOG             Log filter directives (default: info)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    pub algorithm: Algorithm,
    pub size: usize,
    pub delay_ms: u64,
    /// Fixed generator seed; entropy when absent.
    pub seed: Option<u64>,
    /// NDJSON snapshot recording destination.
    pub record: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub log_json: bool,
    /// Auto-exit after this many milliseconds (0 = disabled).
    pub exit_after_ms: u64,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            size: DEFAULT_SIZE,
            delay_ms: DEFAULT_DELAY_MS,
            seed: None,
            record: None,
            log_file: None,
            log_json: false,
            exit_after_ms: 0,
        }
    }
}

/// What the command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

/// Rejected command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    /// Value that does not parse for its flag or variable.
    InvalidValue { name: String, value: String },
    /// Well-formed value outside the engine's bounds.
    Config(ConfigError),
    UnknownArgument(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { name, value } => write!(f, "invalid {name} value: {value}"),
            Self::Config(err) => write!(f, "{err}"),
            Self::UnknownArgument(arg) => write!(f, "unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl Opts {
    /// Parse the process arguments and environment.
    ///
    /// Prints help or version and exits when asked to; prints the error and
    /// exits with status 1 on a bad command line.
    pub fn parse() -> Self {
        match Self::parse_from(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("sortviz {VERSION}");
                process::exit(0);
            }
            Err(err) => {
                eprintln!("{err}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Parse `args` (program name excluded) with `env` looking up variables.
    ///
    /// # Errors
    ///
    /// [`CliError`] for unknown flags, unparsable values, or values outside
    /// the configured bounds.
    pub fn parse_from<I, F>(args: I, env: F) -> Result<Command, CliError>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Environment first; flags below override.
        if let Some(val) = env("SORTVIZ_ALGORITHM") {
            opts.algorithm = val.parse()?;
        }
        if let Some(val) = env("SORTVIZ_SIZE") {
            opts.size = parse_number("SORTVIZ_SIZE", &val)?;
        }
        if let Some(val) = env("SORTVIZ_DELAY_MS") {
            opts.delay_ms = parse_number("SORTVIZ_DELAY_MS", &val)?;
        }
        if let Some(val) = env("SORTVIZ_SEED") {
            opts.seed = Some(parse_number("SORTVIZ_SEED", &val)?);
        }
        if let Some(val) = env("SORTVIZ_RECORD") {
            opts.record = Some(PathBuf::from(val));
        }
        if let Some(val) = env("SORTVIZ_LOG_FILE") {
            opts.log_file = Some(PathBuf::from(val));
        }
        if let Some(val) = env("SORTVIZ_EXIT_AFTER_MS") {
            opts.exit_after_ms = parse_number("SORTVIZ_EXIT_AFTER_MS", &val)?;
        }

        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                "--log-json" => opts.log_json = true,
                other => {
                    if let Some(val) = other.strip_prefix("--algorithm=") {
                        opts.algorithm = val.parse()?;
                    } else if let Some(val) = other.strip_prefix("--size=") {
                        opts.size = parse_number("--size", val)?;
                    } else if let Some(val) = other.strip_prefix("--delay-ms=") {
                        opts.delay_ms = parse_number("--delay-ms", val)?;
                    } else if let Some(val) = other.strip_prefix("--seed=") {
                        opts.seed = Some(parse_number("--seed", val)?);
                    } else if let Some(val) = other.strip_prefix("--record=") {
                        opts.record = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--log-file=") {
                        opts.log_file = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--exit-after-ms=") {
                        opts.exit_after_ms = parse_number("--exit-after-ms", val)?;
                    } else {
                        return Err(CliError::UnknownArgument(other.to_string()));
                    }
                }
            }
        }

        opts.config()?;
        Ok(Command::Run(opts))
    }

    /// Engine configuration described by these options.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] when size or delay is out of range.
    pub fn config(&self) -> Result<Config, ConfigError> {
        Config::new(self.algorithm, self.size, self.delay_ms)
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
    })
}
