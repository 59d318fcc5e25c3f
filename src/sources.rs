//! Analysis units
//!
//! A unit is one piece of PHP code with a label saying where it came from.
//! Plain `.php` files are a single unit; `.phpt` test files contribute
//! only the configured section (normally `--SKIPIF--`), which is the part
//! a test runner executes before deciding whether to run the test.

use crate::core::{Error, Result};
use serde::Serialize;
use std::path::Path;

pub const DEFAULT_PHPT_SECTION: &str = "SKIPIF";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisUnit {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip)]
    pub code: String,
}

impl AnalysisUnit {
    pub fn inline(code: impl Into<String>) -> Self {
        Self {
            source: "<inline>".to_string(),
            section: None,
            code: code.into(),
        }
    }

    pub fn stdin(code: impl Into<String>) -> Self {
        Self {
            source: "<stdin>".to_string(),
            section: None,
            code: code.into(),
        }
    }
}

/// One `--NAME--` block of a `.phpt` file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhptSection<'a> {
    pub name: &'a str,
    pub body: String,
}

fn section_header(line: &str) -> Option<&str> {
    let name = line
        .trim_end_matches(['\r', '\n'])
        .strip_prefix("--")?
        .strip_suffix("--")?;
    let valid = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_');
    valid.then_some(name)
}

/// Split a `.phpt` file into its sections, in file order.
///
/// Text before the first header belongs to no section and is dropped.
pub fn phpt_sections(content: &str) -> Vec<PhptSection<'_>> {
    let mut sections: Vec<PhptSection<'_>> = Vec::new();
    for line in content.split_inclusive('\n') {
        if let Some(name) = section_header(line) {
            sections.push(PhptSection {
                name,
                body: String::new(),
            });
        } else if let Some(current) = sections.last_mut() {
            current.body.push_str(line);
        }
    }
    sections
}

/// Body of the first section called `name`
pub fn phpt_section(content: &str, name: &str) -> Option<String> {
    phpt_sections(content)
        .into_iter()
        .find(|section| section.name == name)
        .map(|section| section.body)
}

pub fn is_phpt(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "phpt")
}

/// Build the unit for a file whose contents are already in memory.
///
/// Returns `None` for a `.phpt` file without the requested section.
pub fn unit_from_contents(path: &Path, contents: String, phpt_section_name: &str) -> Option<AnalysisUnit> {
    let source = path.display().to_string();
    if !is_phpt(path) {
        return Some(AnalysisUnit {
            source,
            section: None,
            code: contents,
        });
    }

    match phpt_section(&contents, phpt_section_name) {
        Some(code) => Some(AnalysisUnit {
            source,
            section: Some(phpt_section_name.to_string()),
            code,
        }),
        None => {
            log::debug!("{} has no --{}-- section", source, phpt_section_name);
            None
        }
    }
}

pub fn load_unit(path: &Path, phpt_section_name: &str) -> Result<Option<AnalysisUnit>> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(unit_from_contents(path, contents, phpt_section_name))
}
