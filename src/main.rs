use anyhow::Result;
use side_effects_detector::cli::Commands;
use side_effects_detector::commands::{self, analyze::exceeds_threshold, AnalyzeConfig};
use side_effects_detector::core::Verdict;
use side_effects_detector::formatting::FormattingConfig;

fn main() -> Result<()> {
    let cli = side_effects_detector::cli::parse_args();

    match cli.command {
        Commands::Analyze {
            paths,
            code,
            ignore_output,
            format,
            config,
            fail_on,
            plain,
            verbosity,
        } => {
            init_logging(verbosity);

            let fail_on: Option<Verdict> = fail_on.map(Into::into);
            let report = commands::handle_analyze(AnalyzeConfig {
                paths,
                code,
                ignore_output,
                format,
                config_path: config,
                fail_on,
                formatting_config: create_formatting_config(plain),
            })?;

            if exceeds_threshold(&report, fail_on) {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Init { force } => {
            init_logging(0);
            commands::init_config(force)
        }
    }
}

// Pure function to map -v occurrences onto a default log level
fn log_level_for(verbosity: u8) -> log::LevelFilter {
    match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

// RUST_LOG, when set, takes precedence over -v
fn init_logging(verbosity: u8) {
    env_logger::Builder::new()
        .filter_level(log_level_for(verbosity))
        .parse_env("RUST_LOG")
        .format_timestamp(None)
        .init();
}

// Pure function to create formatting configuration
fn create_formatting_config(plain: bool) -> FormattingConfig {
    if plain {
        FormattingConfig::plain()
    } else {
        FormattingConfig::from_env()
    }
}
