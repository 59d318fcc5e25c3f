use crate::{
    analyzers::SideEffectsDetector,
    cli, config,
    core::Verdict,
    formatting::FormattingConfig,
    io::{
        self,
        output::{create_writer, AnalysisReport, UnitReport},
        walker,
    },
    lexer::tokenize,
    sources::{self, AnalysisUnit},
};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::PathBuf;

const STDIN_PATH: &str = "-";

pub struct AnalyzeConfig {
    pub paths: Vec<PathBuf>,
    pub code: Option<String>,
    pub ignore_output: bool,
    pub format: cli::OutputFormat,
    pub config_path: Option<PathBuf>,
    pub fail_on: Option<Verdict>,
    pub formatting_config: FormattingConfig,
}

pub fn handle_analyze(config: AnalyzeConfig) -> Result<AnalysisReport> {
    config.formatting_config.apply();

    let settings = config::load_config(config.config_path.as_deref())
        .context("Failed to load configuration")?;
    let detector = settings
        .build_detector()
        .context("Failed to build side-effects detector")?;
    let ignore_output = config.ignore_output || settings.ignore_output;

    let units = collect_units(&config, &settings)?;
    log::info!("Analyzing {} units", units.len());

    let report = analyze_units(&detector, &units, ignore_output);

    let mut writer = create_writer(config.format.into());
    writer.write_report(&report)?;

    Ok(report)
}

/// Classify every unit in parallel; report order follows unit order
pub fn analyze_units(
    detector: &SideEffectsDetector,
    units: &[AnalysisUnit],
    ignore_output: bool,
) -> AnalysisReport {
    let reports = units
        .par_iter()
        .map(|unit| {
            log::debug!("Analyzing {}", unit.source);
            let side_effects = detector.classify_detailed(&tokenize(&unit.code), ignore_output);
            UnitReport::new(unit, side_effects)
        })
        .collect();
    AnalysisReport::new(reports)
}

/// Whether the report should turn into a failing exit status
pub fn exceeds_threshold(report: &AnalysisReport, fail_on: Option<Verdict>) -> bool {
    fail_on.is_some_and(|threshold| report.worst_verdict() >= threshold)
}

fn collect_units(
    config: &AnalyzeConfig,
    settings: &config::SideEffectsConfig,
) -> Result<Vec<AnalysisUnit>> {
    if let Some(code) = &config.code {
        return Ok(vec![AnalysisUnit::inline(code.clone())]);
    }

    let paths = if config.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        config.paths.clone()
    };
    let (stdin, roots): (Vec<PathBuf>, Vec<PathBuf>) =
        paths.into_iter().partition(|p| p.as_os_str() == STDIN_PATH);

    let mut units = Vec::new();
    if !stdin.is_empty() {
        units.push(AnalysisUnit::stdin(io::read_stdin()?));
    }

    let files = walker::find_php_files(&roots, &settings.ignore)
        .context("Failed to collect PHP files")?;
    units.extend(load_file_units(&files, &settings.phpt_section));
    Ok(units)
}

fn load_file_units(files: &[PathBuf], phpt_section: &str) -> Vec<AnalysisUnit> {
    files
        .par_iter()
        .filter_map(|path| match sources::load_unit(path, phpt_section) {
            Ok(unit) => unit,
            Err(e) => {
                log::warn!("Skipping {}: {}", path.display(), e);
                None
            }
        })
        .collect()
}
