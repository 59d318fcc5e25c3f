use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "side-effects")]
#[command(about = "Detects whether PHP code fragments have side effects", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify PHP files, .phpt sections or inline code
    Analyze {
        /// Files or directories to analyze; `-` reads code from stdin
        paths: Vec<PathBuf>,

        /// Analyze this PHP code instead of files
        #[arg(long, conflicts_with = "paths")]
        code: Option<String>,

        /// Do not count writes to standard output as side effects
        #[arg(long = "ignore-output")]
        ignore_output: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Configuration file (defaults to the nearest .side-effects.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Exit with status 1 when any unit reaches this verdict or worse
        #[arg(long = "fail-on", value_enum)]
        fail_on: Option<FailOn>,

        /// Disable colors in terminal output
        #[arg(long)]
        plain: bool,

        /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    Json,
    Terminal,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Json => crate::io::output::OutputFormat::Json,
            OutputFormat::Terminal => crate::io::output::OutputFormat::Terminal,
        }
    }
}

/// Verdict threshold for a failing exit status
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FailOn {
    /// Fail only on definite side effects
    Yes,
    /// Fail on definite or possible side effects
    Unknown,
}

impl From<FailOn> for crate::core::Verdict {
    fn from(f: FailOn) -> Self {
        match f {
            FailOn::Yes => crate::core::Verdict::Yes,
            FailOn::Unknown => crate::core::Verdict::Unknown,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
