use crate::core::{SideEffect, SideEffectSet, Verdict};
use crate::sources::AnalysisUnit;
use colored::*;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Terminal,
}

/// Outcome of classifying one analysis unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitReport {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    pub verdict: Verdict,
    pub side_effects: SideEffectSet,
}

impl UnitReport {
    pub fn new(unit: &AnalysisUnit, side_effects: SideEffectSet) -> Self {
        Self {
            source: unit.source.clone(),
            section: unit.section.clone(),
            verdict: side_effects.verdict(),
            side_effects,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnalysisReport {
    pub units: Vec<UnitReport>,
}

impl AnalysisReport {
    pub fn new(units: Vec<UnitReport>) -> Self {
        Self { units }
    }

    pub fn count(&self, verdict: Verdict) -> usize {
        self.units.iter().filter(|u| u.verdict == verdict).count()
    }

    /// The most severe verdict across all units; `No` for an empty report
    pub fn worst_verdict(&self) -> Verdict {
        self.units
            .iter()
            .map(|u| u.verdict)
            .max()
            .unwrap_or(Verdict::No)
    }
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &AnalysisReport) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_header(&mut self) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", "Side Effects Report".bold().blue())?;
        writeln!(self.writer, "{}", "===================".blue())?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_unit(&mut self, unit: &UnitReport) -> anyhow::Result<()> {
        let label = match &unit.section {
            Some(section) => format!("{} [{}]", unit.source, section),
            None => unit.source.clone(),
        };
        let categories: Vec<&str> = unit.side_effects.iter().map(|e| e.as_str()).collect();

        write!(self.writer, "  {}  {}", verdict_label(unit.verdict), label)?;
        if !categories.is_empty() {
            write!(self.writer, "  {}", categories.join(", ").dimmed())?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_summary(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "{} {} analyzed: {} with side effects, {} unknown, {} without",
            "Summary:".bold(),
            report.units.len(),
            report.count(Verdict::Yes).to_string().red(),
            report.count(Verdict::Unknown).to_string().yellow(),
            report.count(Verdict::No).to_string().green(),
        )?;
        Ok(())
    }

    /// Explain every category that occurs in the report
    fn write_legend(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        let seen: Vec<SideEffect> = SideEffect::ALL
            .into_iter()
            .filter(|effect| report.units.iter().any(|u| u.side_effects.contains(*effect)))
            .collect();
        if seen.is_empty() {
            return Ok(());
        }
        writeln!(self.writer)?;
        for effect in seen {
            writeln!(
                self.writer,
                "  {:<16} {}",
                effect.as_str().dimmed(),
                effect.description()
            )?;
        }
        Ok(())
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        self.write_header()?;
        for unit in &report.units {
            self.write_unit(unit)?;
        }
        self.write_summary(report)?;
        self.write_legend(report)?;
        Ok(())
    }
}

fn verdict_label(verdict: Verdict) -> ColoredString {
    let padded = format!("{:<7}", verdict.as_str());
    match verdict {
        Verdict::Yes => padded.red().bold(),
        Verdict::Unknown => padded.yellow(),
        Verdict::No => padded.green(),
    }
}

pub fn create_writer(format: OutputFormat) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(std::io::stdout())),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(std::io::stdout())),
    }
}
