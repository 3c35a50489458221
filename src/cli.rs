use clap::{ArgAction, Parser};
use log::LevelFilter;
use std::path::PathBuf;

/// Resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the tree to scan.
    pub directory: PathBuf,
    /// Newline-delimited ignore patterns; a missing file is only a warning.
    pub ignore_file: PathBuf,
    pub output_path: PathBuf,
    /// Whether the introductory header block is emitted.
    pub header: bool,
    /// Patterns added on top of the built-in list.
    pub extra_patterns: Vec<String>,
}

/// Build a context file from directory contents with Markdown formatting
#[derive(Parser, Debug)]
#[command(name = "codesushi", version, about, long_about = None)]
pub struct Cli {
    /// Directory to process
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Path to ignore file (similar to .gitignore)
    #[arg(short = 'i', long = "ignore-file", value_name = "FILE", default_value = ".sushignore")]
    pub ignore_file: PathBuf,

    /// Output file path
    #[arg(short, long, value_name = "FILE", default_value = "context_output.md")]
    pub output: PathBuf,

    /// Skip adding the header explanation
    #[arg(long)]
    pub no_header: bool,

    /// Additional ignore pattern (can be repeated)
    #[arg(short = 'x', long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn into_config(self) -> Config {
        Config {
            directory: self.directory,
            ignore_file: self.ignore_file,
            output_path: self.output,
            header: !self.no_header,
            extra_patterns: self.exclude,
        }
    }
}

/// Parses the process arguments, returning the run config and the verbosity.
pub fn parse_args() -> (Config, u8) {
    let cli = Cli::parse();
    let verbosity = cli.verbose;
    (cli.into_config(), verbosity)
}

/// Installs the logger. Warnings are always shown; `RUST_LOG` overrides.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}
